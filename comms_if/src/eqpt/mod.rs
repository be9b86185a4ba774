//! # Equipment Interface
//!
//! This module defines the interface structures which are sent to and recieved from the robot.

// -----------------------------------------------------------------------------------------------
// MODULES
// -----------------------------------------------------------------------------------------------

pub mod lokarria;
