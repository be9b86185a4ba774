//! # Recorded Path Files
//!
//! A recorded path is a JSON array of timestamped robot poses, in the order they were visited.
//! The same pose structure as the Lokarria localization response is used.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::eqpt::lokarria::Position;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// One entry of a recorded path file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PathRecord {
    pub pose: RecordedPose,

    #[serde(default)]
    pub timestamp: f64,

    #[serde(default)]
    pub status: i64,
}

/// The pose stored in a path record. Only the position is required, the orientation is kept if
/// present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordedPose {
    pub position: Position,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<crate::eqpt::lokarria::Orientation>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_record_decode() {
        let body = r#"[
            {"Pose": {"Position": {"X": 0.0, "Y": 0.0, "Z": 0.0},
                      "Orientation": {"W": 1.0, "X": 0.0, "Y": 0.0, "Z": 0.0}},
             "Timestamp": 100, "Status": 4},
            {"Pose": {"Position": {"X": 1.0, "Y": 0.5, "Z": 0.1}}}
        ]"#;

        let records: Vec<PathRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, 4);
        assert_eq!(records[0].timestamp, 100.0);
        assert!(records[0].pose.orientation.is_some());
        assert_eq!(records[1].pose.position.y, 0.5);
        assert!(records[1].pose.orientation.is_none());
        assert_eq!(records[1].status, 0);
    }
}
