//! Commands output by Pure Pursuit

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use comms_if::eqpt::lokarria::DriveDems;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A velocity command for the robot's differential drive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityCommand {
    /// The speed with which the robot body should move forwards.
    ///
    /// Units: meters/second
    pub linear_speed_ms: f64,

    /// The rate at which the robot shall turn, positive to the left.
    ///
    /// Units: radians/second
    pub turn_rate_rads: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VelocityCommand {
    pub fn new(linear_speed_ms: f64, turn_rate_rads: f64) -> Self {
        Self {
            linear_speed_ms,
            turn_rate_rads,
        }
    }

    /// Bring the robot to a full stop.
    pub fn stop() -> Self {
        Self::default()
    }

    pub fn is_stop(&self) -> bool {
        self.linear_speed_ms == 0.0 && self.turn_rate_rads == 0.0
    }
}

impl From<VelocityCommand> for DriveDems {
    fn from(cmd: VelocityCommand) -> Self {
        DriveDems {
            linear_speed_ms: cmd.linear_speed_ms,
            angular_speed_rads: cmd.turn_rate_rads,
        }
    }
}
