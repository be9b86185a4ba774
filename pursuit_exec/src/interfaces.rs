//! # Robot Interfaces
//!
//! Traits for the collaborators the pursuit manager needs. The pose source
//! provides the robot's current pose, the motion actuator accepts velocity
//! commands and the progress observer is told about each new goal.
//!
//! Both the Lokarria client and the simulator implement the pose source and
//! motion actuator, so the manager can drive either.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector2;

use crate::{loc::Pose, pure_pursuit::VelocityCommand};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Something which can report the robot's current pose in the world frame.
pub trait PoseSource {
    /// Get the robot's pose at this moment.
    fn get_pose(&mut self) -> Result<Pose, PoseSourceError>;
}

/// Something which can command the robot's motion.
pub trait MotionActuator {
    /// Set the robot's forward speed and turn rate.
    fn set_motion(&mut self, cmd: &VelocityCommand) -> Result<(), MotionError>;
}

/// Receives progress updates while a path is followed.
pub trait ProgressObserver {
    /// Called whenever a new goal point is accepted, before the command towards it is sent.
    fn goal_accepted(&mut self, pose: &Pose, goal_m: &Vector2<f64>);

    /// Called once after the stop command at the end of the path has been sent.
    fn finished(&mut self) {}
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoseSourceError {
    #[error("Could not reach the robot: {0}")]
    UnreachableRobot(String),

    #[error("The pose could not be decoded: {0}")]
    MalformedPose(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MotionError {
    #[error("Could not reach the robot: {0}")]
    UnreachableRobot(String),

    #[error("The robot did not accept the command: {0}")]
    UnexpectedResponse(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T: PoseSource + ?Sized> PoseSource for &mut T {
    fn get_pose(&mut self) -> Result<Pose, PoseSourceError> {
        (**self).get_pose()
    }
}

impl<T: MotionActuator + ?Sized> MotionActuator for &mut T {
    fn set_motion(&mut self, cmd: &VelocityCommand) -> Result<(), MotionError> {
        (**self).set_motion(cmd)
    }
}

impl<T: ProgressObserver + ?Sized> ProgressObserver for &mut T {
    fn goal_accepted(&mut self, pose: &Pose, goal_m: &Vector2<f64>) {
        (**self).goal_accepted(pose, goal_m)
    }

    fn finished(&mut self) {
        (**self).finished()
    }
}
