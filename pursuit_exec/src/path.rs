//! # Path
//!
//! This module defines the path followed by the robot, and loads it from a recorded path file.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::path::Path as FilePath;

// Internal
use crate::loc::Pose;
use comms_if::path_file::PathRecord;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the robot.
///
/// Points are in the world frame, in the order they shall be visited. The Z
/// coordinate is carried but not used for control.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct Path {
    points_m: Vec<Vector3<f64>>,
}

/// A path as recorded by driving the robot, including the timestamp and
/// status of each recorded pose.
#[derive(Clone, Debug)]
pub struct RecordedPath {
    records: Vec<PathRecord>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Cannot open the path file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the path file: {0}")]
    DeserialiseError(serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Create a path from a sequence of 3D points.
    pub fn new(points_m: Vec<Vector3<f64>>) -> Self {
        Self { points_m }
    }

    /// Create a path on the XY plane (Z = 0).
    pub fn from_xy(points_m: &[(f64, f64)]) -> Self {
        Self {
            points_m: points_m
                .iter()
                .map(|&(x, y)| Vector3::new(x, y, 0.0))
                .collect(),
        }
    }

    /// Get the XY position of the point at the given index, or `None` if the
    /// index is beyond the end of the path.
    pub fn get_point2(&self, index: usize) -> Option<Vector2<f64>> {
        self.points_m.get(index).map(|p| p.xy())
    }

    /// All points in the path.
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points_m
    }

    /// Get the number of points in the path
    pub fn get_num_points(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Return the length of the path in the XY plane, in meters.
    pub fn get_length(&self) -> f64 {
        self.points_m
            .windows(2)
            .map(|w| (w[1].xy() - w[0].xy()).norm())
            .sum()
    }
}

impl RecordedPath {
    /// Load a recorded path from a JSON file.
    pub fn load<P: AsRef<FilePath>>(file_path: P) -> Result<Self, PathError> {
        let path_str = std::fs::read_to_string(file_path)
            .map_err(PathError::FileLoadError)?;

        Self::from_json(&path_str)
    }

    /// Parse a recorded path from a JSON string.
    pub fn from_json(path_str: &str) -> Result<Self, PathError> {
        let records: Vec<PathRecord> = serde_json::from_str(path_str)
            .map_err(PathError::DeserialiseError)?;

        Ok(Self { records })
    }

    /// Get the number of recorded poses
    pub fn get_num_records(&self) -> usize {
        self.records.len()
    }

    /// Timestamps of each recorded pose, in the units of the recording system.
    pub fn timestamps(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.timestamp).collect()
    }

    /// Status of the robot at each recorded pose.
    pub fn statuses(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.status).collect()
    }

    /// The span between the first and last timestamps, or `None` if the
    /// recording is empty.
    pub fn get_duration(&self) -> Option<f64> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => Some(last.timestamp - first.timestamp),
            _ => None,
        }
    }

    /// The pose at the start of the recording.
    ///
    /// If the first record has no usable orientation the heading is taken
    /// as zero.
    pub fn start_pose(&self) -> Option<Pose> {
        let first = self.records.first()?;
        let pos = first.pose.position;
        let position_m = Vector2::new(pos.x, pos.y);

        let pose = first.pose.orientation
            .and_then(|q| Pose::from_quaternion(position_m, q.w, q.x, q.y, q.z))
            .unwrap_or(Pose { position_m, heading_rad: 0.0 });

        Some(pose)
    }

    /// Convert the recording into the path to follow.
    pub fn into_path(self) -> Path {
        Path::new(
            self.records
                .into_iter()
                .map(|r| {
                    let p = r.pose.position;
                    Vector3::new(p.x, p.y, p.z)
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const RECORDING: &str = r#"[
        {"Pose": {"Position": {"X": 0.0, "Y": 0.0, "Z": 0.1},
                  "Orientation": {"W": 1.0, "X": 0.0, "Y": 0.0, "Z": 0.0}},
         "Timestamp": 1000, "Status": 0},
        {"Pose": {"Position": {"X": 3.0, "Y": 0.0, "Z": 0.1},
                  "Orientation": {"W": 1.0, "X": 0.0, "Y": 0.0, "Z": 0.0}},
         "Timestamp": 1500, "Status": 0},
        {"Pose": {"Position": {"X": 3.0, "Y": 4.0, "Z": 0.1},
                  "Orientation": {"W": 1.0, "X": 0.0, "Y": 0.0, "Z": 0.0}},
         "Timestamp": 2500, "Status": 1}
    ]"#;

    #[test]
    fn test_recorded_path() {
        let rec = RecordedPath::from_json(RECORDING).unwrap();

        assert_eq!(rec.get_num_records(), 3);
        assert_eq!(rec.timestamps(), vec![1000.0, 1500.0, 2500.0]);
        assert_eq!(rec.statuses(), vec![0, 0, 1]);
        assert_eq!(rec.get_duration(), Some(1500.0));
        let start = rec.start_pose().unwrap();
        assert_eq!(start.position_m, Vector2::new(0.0, 0.0));
        assert!(start.heading_rad.abs() < 1e-12);

        let path = rec.into_path();
        assert_eq!(path.get_num_points(), 3);
        assert_eq!(path.points()[2], Vector3::new(3.0, 4.0, 0.1));
        assert_eq!(path.get_point2(1), Some(Vector2::new(3.0, 0.0)));
        assert_eq!(path.get_point2(3), None);
        assert!((path.get_length() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_bad_recording() {
        assert!(matches!(
            RecordedPath::from_json("{\"not\": \"a path\"}"),
            Err(PathError::DeserialiseError(_))
        ));
        assert!(matches!(
            RecordedPath::load("/this/path/does/not/exist.json"),
            Err(PathError::FileLoadError(_))
        ));
    }

    #[test]
    fn test_empty_path() {
        let rec = RecordedPath::from_json("[]").unwrap();
        assert_eq!(rec.start_pose(), None);

        let path = rec.into_path();
        assert!(path.is_empty());
        assert_eq!(path.get_length(), 0.0);
    }
}
