//! # Pursuit library.
//!
//! This library allows other crates in the workspace, as well as the benchmarks, to access items
//! defined inside the pursuit crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Robot interfaces - traits for the pose source, motion actuator and progress observer
pub mod interfaces;

/// Localisation - the robot's pose in the world
pub mod loc;

/// Lokarria client - gets the pose from and sends drive demands to the robot over HTTP
pub mod lokarria_client;

/// Path - the recorded path to follow
pub mod path;

/// Progress observers - log or archive progress along the path
pub mod progress;

/// Pure Pursuit module - chooses goals on the path and computes the commands to reach them
pub mod pure_pursuit;

/// Pursuit manager - runs the control loop against the robot
pub mod pursuit_mgr;

/// Simulation client - a kinematic model of the robot for use without hardware
pub mod sim_client;
