//! Pure Pursuit parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::time::Duration;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Longest allowed cycle period.
///
/// Units: seconds
pub const MAX_CYCLE_PERIOD_S: f64 = 60.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for Pure Pursuit
#[derive(Deserialize, Debug, Clone)]
pub struct Params {

    /// Minimum distance between the robot and a path point for that point to
    /// be chosen as the goal. The forward speed demand is half this value.
    ///
    /// Units: meters
    pub look_ahead_m: f64,

    /// Time to wait after issuing each command before evaluating the next
    /// path point.
    ///
    /// Units: seconds
    pub cycle_period_s: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            look_ahead_m: 0.7,
            cycle_period_s: 0.2,
        }
    }
}

impl Params {
    /// Returns the name of the first invalid parameter, if any.
    pub fn find_invalid(&self) -> Option<&'static str> {
        if !(self.look_ahead_m.is_finite() && self.look_ahead_m > 0.0) {
            return Some("look_ahead_m");
        }
        if !(self.cycle_period_s >= 0.0 && self.cycle_period_s <= MAX_CYCLE_PERIOD_S) {
            return Some("cycle_period_s");
        }

        None
    }

    /// The constant forward speed demand.
    pub fn linear_speed_ms(&self) -> f64 {
        self.look_ahead_m / 2.0
    }

    /// The cycle period as a `Duration`. The parameters must be valid.
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs_f64(self.cycle_period_s)
    }
}
