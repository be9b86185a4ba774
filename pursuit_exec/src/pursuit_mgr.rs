//! # Pursuit Manager
//!
//! The pursuit manager runs the control loop. Each cycle it polls the robot's pose, passes it to
//! the Pure Pursuit controller, and sends any resulting command to the robot before waiting for
//! the cycle period. Once the path is exhausted a single stop command is sent.
//!
//! Any failure to get the pose or send a command aborts the run. A stop command is attempted
//! before the error is returned, but errors are never retried.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::Duration};

use log::{error, info, warn};
use serde::Serialize;

use crate::{
    interfaces::{MotionActuator, MotionError, PoseSource, PoseSourceError, ProgressObserver},
    loc::Pose,
    path::Path,
    progress::NoProgress,
    pure_pursuit::{PursuitCtrl, PursuitCtrlError, VelocityCommand},
};
use util::{archive::Archived, module::State};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Runs a `PursuitCtrl` against a pose source and motion actuator.
pub struct PursuitMgr<S, A, O = NoProgress>
where
    S: PoseSource,
    A: MotionActuator,
    O: ProgressObserver,
{
    ctrl: PursuitCtrl,
    pose_source: S,
    actuator: A,
    observer: O,

    /// Time to wait after each command
    cycle_period: Duration,

    summary: RunSummary,
}

/// Summary of a run.
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct RunSummary {
    /// Number of path points evaluated
    pub points_visited: usize,

    /// Number of points accepted as goals
    pub goals_accepted: usize,

    /// Number of commands accepted by the robot, including the final stop
    pub commands_issued: usize,

    /// Number of goals at the robot's position, for which no command was sent
    pub degenerate_goals: usize,

    /// The last pose received from the pose source
    pub final_pose: Option<Pose>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PursuitMgrError {
    #[error("Could not get the robot's pose: {0}")]
    PoseError(PoseSourceError),

    #[error("Could not command the robot: {0}")]
    MotionError(MotionError),

    #[error("Pure Pursuit error: {0}")]
    CtrlError(PursuitCtrlError),
}

/// The kind of failure which stopped a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The pose source or actuator could not be reached or timed out.
    TransportFailure,

    /// The actuator responded with an unexpected status.
    UnexpectedResponse,

    /// The pose could not be decoded.
    MalformedPose,

    /// The controller itself failed.
    Controller,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PursuitMgrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PursuitMgrError::PoseError(PoseSourceError::UnreachableRobot(_)) => {
                ErrorKind::TransportFailure
            }
            PursuitMgrError::PoseError(PoseSourceError::MalformedPose(_)) => {
                ErrorKind::MalformedPose
            }
            PursuitMgrError::MotionError(MotionError::UnreachableRobot(_)) => {
                ErrorKind::TransportFailure
            }
            PursuitMgrError::MotionError(MotionError::UnexpectedResponse(_)) => {
                ErrorKind::UnexpectedResponse
            }
            PursuitMgrError::CtrlError(_) => ErrorKind::Controller,
        }
    }
}

impl<S, A> PursuitMgr<S, A, NoProgress>
where
    S: PoseSource,
    A: MotionActuator,
{
    /// Create a new manager which will follow the given path.
    ///
    /// The controller must not have had a path loaded already.
    pub fn new(
        mut ctrl: PursuitCtrl,
        path: Path,
        pose_source: S,
        actuator: A,
    ) -> Result<Self, PursuitMgrError> {
        ctrl.begin_path(path).map_err(PursuitMgrError::CtrlError)?;

        Ok(Self {
            cycle_period: ctrl.params().cycle_period(),
            ctrl,
            pose_source,
            actuator,
            observer: NoProgress,
            summary: RunSummary::default(),
        })
    }
}

impl<S, A, O> PursuitMgr<S, A, O>
where
    S: PoseSource,
    A: MotionActuator,
    O: ProgressObserver,
{
    /// Replace the progress observer.
    pub fn with_observer<P: ProgressObserver>(self, observer: P) -> PursuitMgr<S, A, P> {
        PursuitMgr {
            ctrl: self.ctrl,
            pose_source: self.pose_source,
            actuator: self.actuator,
            observer,
            cycle_period: self.cycle_period,
            summary: self.summary,
        }
    }

    pub fn ctrl(&self) -> &PursuitCtrl {
        &self.ctrl
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Follow the path until it is exhausted.
    ///
    /// On success the summary of the run is returned. On error the robot has been sent a stop
    /// command where possible, and the controller will not issue any more commands.
    pub fn run(&mut self) -> Result<RunSummary, PursuitMgrError> {
        info!("Starting run over {} points", self.ctrl.num_remaining());

        match self.follow() {
            Ok(()) => {
                info!(
                    "Run complete: {} points, {} goals, {} commands",
                    self.summary.points_visited,
                    self.summary.goals_accepted,
                    self.summary.commands_issued
                );
                Ok(self.summary)
            }
            Err(e) => {
                error!("Run aborted ({:?}): {}", e.kind(), e);
                self.stop_best_effort();
                Err(e)
            }
        }
    }

    /// Main loop, returns once the final stop has been sent.
    fn follow(&mut self) -> Result<(), PursuitMgrError> {
        while self.ctrl.has_pending_points() {
            let pose = self
                .pose_source
                .get_pose()
                .map_err(PursuitMgrError::PoseError)?;
            self.summary.final_pose = Some(pose);

            let (cmd, report) = self
                .ctrl
                .proc(&pose)
                .map_err(PursuitMgrError::CtrlError)?;

            if let Err(e) = self.ctrl.write() {
                warn!("Could not archive Pure Pursuit status: {}", e);
            }

            self.summary.points_visited += 1;
            if report.goal_reached {
                self.summary.degenerate_goals += 1;
            }

            if let Some(goal_m) = report.goal_m() {
                self.summary.goals_accepted += 1;
                self.observer.goal_accepted(&pose, &goal_m);
            }

            if let Some(cmd) = cmd {
                self.send(&cmd)?;
                thread::sleep(self.cycle_period);
            }
        }

        if let Some(stop) = self.ctrl.finish() {
            self.send(&stop)?;
        }

        self.observer.finished();

        Ok(())
    }

    fn send(&mut self, cmd: &VelocityCommand) -> Result<(), PursuitMgrError> {
        self.actuator
            .set_motion(cmd)
            .map_err(PursuitMgrError::MotionError)?;
        self.summary.commands_issued += 1;

        Ok(())
    }

    /// Try to stop the robot after a failure. Failure to stop is only logged.
    fn stop_best_effort(&mut self) {
        if let Some(stop) = self.ctrl.abort() {
            match self.actuator.set_motion(&stop) {
                Ok(()) => {
                    self.summary.commands_issued += 1;
                    info!("Stop command sent after failure");
                }
                Err(e) => warn!("Could not stop the robot: {}", e),
            }
        }
    }
}
