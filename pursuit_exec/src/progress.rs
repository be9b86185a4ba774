//! # Progress Observers
//!
//! Implementations of `ProgressObserver` for use by the pursuit manager.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use nalgebra::Vector2;
use serde::Serialize;

use crate::{interfaces::ProgressObserver, loc::Pose};
use util::{
    archive::{ArchiveError, Archiver},
    session::{self, Session},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Observer which ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

/// Observer which logs each accepted goal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress {
    num_goals: usize,
}

/// Observer which archives each accepted goal alongside the pose it was accepted from.
pub struct ArchiveProgress {
    arch: Archiver,
    num_goals: usize,
}

/// A single row of the progress archive.
#[derive(Debug, Clone, Copy, Serialize)]
struct ProgressRecord {
    time_s: f64,
    goal_num: usize,
    pose_x_m: f64,
    pose_y_m: f64,
    heading_rad: f64,
    goal_x_m: f64,
    goal_y_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ProgressObserver for NoProgress {
    fn goal_accepted(&mut self, _pose: &Pose, _goal_m: &Vector2<f64>) {}
}

impl ProgressObserver for LogProgress {
    fn goal_accepted(&mut self, pose: &Pose, goal_m: &Vector2<f64>) {
        self.num_goals += 1;

        info!(
            "Goal {}: ({:.03}, {:.03}) from ({:.03}, {:.03}) heading {:.03} rad",
            self.num_goals,
            goal_m.x,
            goal_m.y,
            pose.position_m.x,
            pose.position_m.y,
            pose.heading_rad
        );
    }

    fn finished(&mut self) {
        info!("Path complete after {} goals", self.num_goals);
    }
}

impl ArchiveProgress {
    /// Create a new progress archive at `pursuit/progress.csv` in the session's archive.
    pub fn new(session: &Session) -> Result<Self, ArchiveError> {
        Ok(Self {
            arch: Archiver::from_path(session, "pursuit/progress.csv")?,
            num_goals: 0,
        })
    }

    /// Create a new progress archive at the given file.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ArchiveError> {
        Ok(Self {
            arch: Archiver::from_file(path)?,
            num_goals: 0,
        })
    }

    /// Number of goals archived so far.
    pub fn num_goals(&self) -> usize {
        self.num_goals
    }
}

impl ProgressObserver for ArchiveProgress {
    fn goal_accepted(&mut self, pose: &Pose, goal_m: &Vector2<f64>) {
        self.num_goals += 1;

        let record = ProgressRecord {
            time_s: session::get_elapsed_seconds(),
            goal_num: self.num_goals,
            pose_x_m: pose.position_m.x,
            pose_y_m: pose.position_m.y,
            heading_rad: pose.heading_rad,
            goal_x_m: goal_m.x,
            goal_y_m: goal_m.y,
        };

        // Archive failures are not fatal
        if let Err(e) = self.arch.serialise(record) {
            warn!("Could not archive progress: {}", e);
        }
    }

    fn finished(&mut self) {
        info!("Archived {} goals", self.num_goals);
    }
}
