//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Request and response bodies for equipment (the robot's HTTP interface)
pub mod eqpt;

/// Network parameters
pub mod net;

/// Recorded path file format
pub mod path_file;
