//! Pursuit geometry: range and turn rate to a goal in the robot's frame

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::Serialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Quantities needed to steer towards a goal point.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PursuitGeometry {
    /// Straight line range to the goal.
    ///
    /// Units: meters
    pub distance_m: f64,

    /// Curvature of the arc through the robot and the goal, tangent to the
    /// robot's heading. Positive to the left.
    ///
    /// Units: 1/meters
    pub curvature_m: f64,

    /// Turn rate demand, the curvature scaled by the look-ahead distance.
    ///
    /// Units: radians/second
    pub turn_rate_rads: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The goal is at the robot's position so no curvature can be computed.
    /// This means the goal has been reached.
    #[error("The goal point is at the robot's position")]
    DegenerateGeometry,

    /// The goal or look-ahead contained a NaN or infinite value.
    #[error("Non-finite pursuit geometry input (goal: {0:?}, look-ahead: {1})")]
    NonFinite([f64; 2], f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PursuitGeometry {
    /// Compute the pursuit geometry for a goal in the robot frame.
    ///
    /// Returns `GeometryError::DegenerateGeometry` if the goal is at zero
    /// distance, the output is always finite.
    pub fn from_rcs(goal_rcs: &Vector2<f64>, look_ahead_m: f64) -> Result<Self, GeometryError> {
        if !goal_rcs.x.is_finite() || !goal_rcs.y.is_finite() || !look_ahead_m.is_finite() {
            return Err(GeometryError::NonFinite([goal_rcs.x, goal_rcs.y], look_ahead_m));
        }

        let dist_sq = goal_rcs.norm_squared();

        if dist_sq == 0.0 {
            return Err(GeometryError::DegenerateGeometry);
        }

        let curvature_m = 2.0 * goal_rcs.y / dist_sq;

        // Very small distances can overflow the curvature
        if !curvature_m.is_finite() {
            return Err(GeometryError::DegenerateGeometry);
        }

        Ok(Self {
            distance_m: dist_sq.sqrt(),
            curvature_m,
            turn_rate_rads: look_ahead_m * curvature_m,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_straight_ahead() {
        let geom = PursuitGeometry::from_rcs(&Vector2::new(1.0, 0.0), 0.7).unwrap();
        assert_eq!(geom.distance_m, 1.0);
        assert_eq!(geom.turn_rate_rads, 0.0);
    }

    #[test]
    fn test_left() {
        let geom = PursuitGeometry::from_rcs(&Vector2::new(0.0, 1.0), 0.7).unwrap();
        assert_eq!(geom.distance_m, 1.0);
        assert_eq!(geom.curvature_m, 2.0);
        assert!((geom.turn_rate_rads - 1.4).abs() < 1e-12);
    }

    #[test]
    fn test_sign_convention() {
        let goals = [(1.0, 0.5), (-1.0, 0.1), (0.2, 3.0), (0.0, 0.8)];

        for &(x, y) in goals.iter() {
            let left = PursuitGeometry::from_rcs(&Vector2::new(x, y), 0.7).unwrap();
            let right = PursuitGeometry::from_rcs(&Vector2::new(x, -y), 0.7).unwrap();

            assert!(left.turn_rate_rads > 0.0);
            assert!(right.turn_rate_rads < 0.0);
            assert_eq!(left.turn_rate_rads, -right.turn_rate_rads);
        }
    }

    #[test]
    fn test_no_lateral_offset_means_no_turn() {
        for &x in [0.1, 0.7, 2.0, -1.5].iter() {
            let geom = PursuitGeometry::from_rcs(&Vector2::new(x, 0.0), 0.7).unwrap();
            assert_eq!(geom.turn_rate_rads, 0.0);
        }
    }

    #[test]
    fn test_degenerate() {
        assert_eq!(
            PursuitGeometry::from_rcs(&Vector2::new(0.0, 0.0), 0.7),
            Err(GeometryError::DegenerateGeometry)
        );
        assert!(matches!(
            PursuitGeometry::from_rcs(&Vector2::new(std::f64::NAN, 0.0), 0.7),
            Err(GeometryError::NonFinite(..))
        ));
    }
}
