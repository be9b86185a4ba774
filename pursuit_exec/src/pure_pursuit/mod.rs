//! # Pure Pursuit module
//!
//! Pure Pursuit keeps the robot on a recorded path by repeatedly choosing a
//! goal point on the path and steering towards it.
//!
//! The path is walked in order. A point becomes the goal if it lies further
//! than the look-ahead distance from the robot, otherwise it is skipped for
//! good. The goal is then moved into the robot's own frame (X forwards, Y to
//! the left), where the turn rate needed to reach it is
//!
//! ```text
//! turn_rate = L * 2y / d^2
//! ```
//!
//! with `L` the look-ahead distance and `d` the range to the goal. The
//! forward speed is held at `L / 2`. Once the path runs out a single stop
//! command is issued.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cmd;
pub mod geometry;
pub mod goal;
pub mod params;
pub mod state;
pub mod transform;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use cmd::VelocityCommand;
pub use geometry::{GeometryError, PursuitGeometry};
pub use goal::{is_goal_point, GoalSelector};
pub use params::Params;
pub use state::*;
pub use transform::{rcs_to_wcs, wcs_to_rcs};
