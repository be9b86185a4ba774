//! # Network Module
//!
//! Parameters describing how to reach the robot's HTTP interface.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Network parameters, normally loaded from `net.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetParams {
    /// Endpoint of the Lokarria interface, as `host:port`
    pub lokarria_endpoint: String,

    /// Timeout for establishing a connection to the robot.
    ///
    /// Units: milliseconds
    pub connect_timeout_ms: u64,

    /// Timeout for reading a response from the robot.
    ///
    /// Units: milliseconds
    pub read_timeout_ms: u64,

    /// Timeout for writing a request to the robot.
    ///
    /// Units: milliseconds
    pub write_timeout_ms: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for NetParams {
    fn default() -> Self {
        Self {
            lokarria_endpoint: String::from("localhost:50000"),
            connect_timeout_ms: 1000,
            read_timeout_ms: 1000,
            write_timeout_ms: 1000,
        }
    }
}

impl NetParams {
    /// Base URL of the robot's HTTP interface.
    pub fn base_url(&self) -> String {
        if self.lokarria_endpoint.starts_with("http://") {
            self.lokarria_endpoint.clone()
        }
        else {
            format!("http://{}", self.lokarria_endpoint)
        }
    }
}
