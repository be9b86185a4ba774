//! # Localisation module
//!
//! Defines the pose of the robot, as reported by the pose source each cycle.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Quaternions with a norm below this value cannot describe an orientation.
const MIN_QUATERNION_NORM: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (position and heading in the world frame) of the robot.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector2<f64>,

    /// The heading of the robot, counterclockwise from the world X axis.
    ///
    /// Sources report this in the range [-pi, pi], so the sign changes as the
    /// robot turns through pi.
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    /// Build a pose from a position and an attitude quaternion (`w, x, y, z`).
    ///
    /// The heading is the direction the world X axis points in once rotated
    /// by the attitude, projected into the XY plane. Returns `None` if the
    /// quaternion is degenerate.
    pub fn from_quaternion(position_m: Vector2<f64>, w: f64, x: f64, y: f64, z: f64) -> Option<Self> {
        let q = Quaternion::new(w, x, y, z);

        if !(q.norm() > MIN_QUATERNION_NORM) {
            return None;
        }

        let forward = UnitQuaternion::from_quaternion(q) * Vector3::x();

        Some(Self {
            position_m,
            heading_rad: forward.y.atan2(forward.x),
        })
    }
}
