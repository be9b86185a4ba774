//! # Lokarria Interface
//!
//! Bodies exchanged with Microsoft Robotics Developer Studio through its Lokarria HTTP interface.
//! Field names follow the interface's PascalCase JSON keys.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Resource providing the robot's pose
pub const LOCALIZATION_RESOURCE: &str = "/lokarria/localization";

/// Resource accepting differential drive demands
pub const DIFFERENTIAL_DRIVE_RESOURCE: &str = "/lokarria/differentialdrive";

/// Resource providing the latest laser scan
pub const LASER_ECHOES_RESOURCE: &str = "/lokarria/laser/echoes";

/// Resource providing the laser's configuration
pub const LASER_PROPERTIES_RESOURCE: &str = "/lokarria/laser/properties";

/// HTTP status returned when drive demands have been accepted
pub const DRIVE_ACCEPTED_STATUS: u16 = 204;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A position in the world frame.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// An orientation quaternion in the world frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct Orientation {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A position and orientation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LokarriaPose {
    pub position: Position,
    pub orientation: Orientation,
}

/// Response to a localization request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LocalizationResponse {
    pub pose: LokarriaPose,

    #[serde(default)]
    pub timestamp: f64,
}

/// Demands sent to the differential drive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DriveDems {
    /// Forward speed of the robot body.
    ///
    /// Units: meters/second
    #[serde(rename = "TargetLinearSpeed")]
    pub linear_speed_ms: f64,

    /// Turn rate about the robot's upward axis, positive to the left.
    ///
    /// Units: radians/second
    #[serde(rename = "TargetAngularSpeed")]
    pub angular_speed_rads: f64,
}

/// Distances measured by each laser beam.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaserEchoes {
    /// Range of each beam, ordered from the start angle to the end angle.
    ///
    /// Units: meters
    pub echoes: Vec<f64>,

    #[serde(default)]
    pub timestamp: f64,
}

/// Configuration of the laser scanner.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaserProperties {
    /// Units: radians
    pub start_angle: f64,

    /// Units: radians
    pub end_angle: f64,

    /// Units: radians
    pub angle_increment: f64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_localization_decode() {
        let body = r#"{
            "Pose": {
                "Orientation": {"W": 1.0, "X": 0.0, "Y": 0.0, "Z": 0.0},
                "Position": {"X": 1.5, "Y": -2.0, "Z": 0.08}
            },
            "Timestamp": 12345
        }"#;

        let resp: LocalizationResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.pose.position.x, 1.5);
        assert_eq!(resp.pose.position.y, -2.0);
        assert_eq!(resp.pose.orientation.w, 1.0);
        assert_eq!(resp.timestamp, 12345.0);
    }

    #[test]
    fn test_drive_dems_encode() {
        let dems = DriveDems {
            linear_speed_ms: 0.35,
            angular_speed_rads: -1.0,
        };

        let value = serde_json::to_value(&dems).unwrap();
        assert_eq!(value["TargetLinearSpeed"], 0.35);
        assert_eq!(value["TargetAngularSpeed"], -1.0);
    }
}
