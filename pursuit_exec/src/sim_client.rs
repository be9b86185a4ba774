//! # Simulation Client
//!
//! A simple kinematic simulation of a differential drive robot, used to exercise the pursuit
//! manager without a real robot. The robot is modelled as a unicycle: each accepted command is
//! held for one control period and integrated exactly along the resulting arc.
//!
//! The simulated robot is shared between a pose source handle and an actuator handle, so that
//! both can be passed to the `PursuitMgr` at once.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::trace;
use nalgebra::Vector2;

use crate::{
    interfaces::{MotionActuator, MotionError, PoseSource, PoseSourceError},
    loc::Pose,
    pure_pursuit::{rcs_to_wcs, VelocityCommand},
};
use util::maths::wrap_to_pi;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Turn rates below this are integrated as straight lines.
const MIN_TURN_RATE_RADS: f64 = 1e-9;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A simulated robot.
#[derive(Clone)]
pub struct SimRobot {
    state: Arc<Mutex<SimState>>,
}

/// Pose source reading from a `SimRobot`.
#[derive(Clone)]
pub struct SimPoseSource {
    state: Arc<Mutex<SimState>>,
}

/// Motion actuator driving a `SimRobot`.
#[derive(Clone)]
pub struct SimActuator {
    state: Arc<Mutex<SimState>>,
}

struct SimState {
    pose: Pose,

    /// Time each command is held for
    ///
    /// Units: seconds
    dt_s: f64,

    /// All commands received, in order
    cmds: Vec<VelocityCommand>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimRobot {
    /// Create a new simulated robot at the given pose. Each command will be held for `dt_s`
    /// seconds.
    pub fn new(initial_pose: Pose, dt_s: f64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                pose: initial_pose,
                dt_s,
                cmds: Vec::new(),
            })),
        }
    }

    pub fn pose_source(&self) -> SimPoseSource {
        SimPoseSource {
            state: self.state.clone(),
        }
    }

    pub fn actuator(&self) -> SimActuator {
        SimActuator {
            state: self.state.clone(),
        }
    }

    /// The current pose of the robot.
    pub fn pose(&self) -> Pose {
        lock(&self.state).pose
    }

    /// All commands received by the robot.
    pub fn commands(&self) -> Vec<VelocityCommand> {
        lock(&self.state).cmds.clone()
    }
}

impl SimState {
    /// Hold the command for one period and move the robot along the resulting arc.
    fn integrate(&mut self, cmd: &VelocityCommand) {
        let v = cmd.linear_speed_ms;
        let w = cmd.turn_rate_rads;
        let dt = self.dt_s;

        // Displacement in the robot's frame at the start of the period
        let offset_rcs = if w.abs() < MIN_TURN_RATE_RADS {
            Vector2::new(v * dt, 0.0)
        }
        else {
            let r = v / w;
            Vector2::new(r * (w * dt).sin(), r * (1.0 - (w * dt).cos()))
        };

        self.pose.position_m += rcs_to_wcs(&offset_rcs, self.pose.heading_rad);
        self.pose.heading_rad = wrap_to_pi(self.pose.heading_rad + w * dt);

        trace!(
            "Sim pose: ({:.03}, {:.03}) heading {:.03} rad",
            self.pose.position_m.x,
            self.pose.position_m.y,
            self.pose.heading_rad
        );
    }
}

impl PoseSource for SimPoseSource {
    fn get_pose(&mut self) -> Result<Pose, PoseSourceError> {
        Ok(lock(&self.state).pose)
    }
}

impl MotionActuator for SimActuator {
    fn set_motion(&mut self, cmd: &VelocityCommand) -> Result<(), MotionError> {
        let mut state = lock(&self.state);

        if !(cmd.linear_speed_ms.is_finite() && cmd.turn_rate_rads.is_finite()) {
            return Err(MotionError::UnexpectedResponse(format!(
                "non-finite command {:?}",
                cmd
            )));
        }

        state.integrate(cmd);
        state.cmds.push(*cmd);

        Ok(())
    }
}

/// Lock the state, ignoring poisoning.
fn lock(state: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_straight() {
        let robot = SimRobot::new(Pose::new(1.0, 1.0, FRAC_PI_2), 0.5);
        robot
            .actuator()
            .set_motion(&VelocityCommand::new(2.0, 0.0))
            .unwrap();

        let pose = robot.pose_source().get_pose().unwrap();
        assert!((pose.position_m.x - 1.0).abs() < 1e-12);
        assert!((pose.position_m.y - 2.0).abs() < 1e-12);
        assert!((pose.heading_rad - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_quarter_circle() {
        // Radius 1 m, quarter turn to the left
        let robot = SimRobot::new(Pose::default(), 1.0);
        robot
            .actuator()
            .set_motion(&VelocityCommand::new(FRAC_PI_2, FRAC_PI_2))
            .unwrap();

        let pose = robot.pose();
        assert!((pose.position_m.x - 1.0).abs() < 1e-9);
        assert!((pose.position_m.y - 1.0).abs() < 1e-9);
        assert!((pose.heading_rad - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_heading_wraps() {
        let robot = SimRobot::new(Pose::new(0.0, 0.0, 3.0), 1.0);
        robot
            .actuator()
            .set_motion(&VelocityCommand::new(0.0, 1.0))
            .unwrap();

        let heading = robot.pose().heading_rad;
        assert!(heading >= -PI && heading <= PI);
        assert!((heading - (4.0 - 2.0 * PI)).abs() < 1e-9);
    }

    #[test]
    fn test_stop_holds_pose() {
        let robot = SimRobot::new(Pose::new(0.5, -0.5, 0.3), 0.2);
        robot
            .actuator()
            .set_motion(&VelocityCommand::stop())
            .unwrap();

        let pose = robot.pose();
        assert_eq!(pose.position_m, Vector2::new(0.5, -0.5));
        assert!((pose.heading_rad - 0.3).abs() < 1e-12);
        assert_eq!(robot.commands(), vec![VelocityCommand::stop()]);
    }

    #[test]
    fn test_rejects_non_finite() {
        let robot = SimRobot::new(Pose::default(), 0.2);
        let res = robot
            .actuator()
            .set_motion(&VelocityCommand::new(std::f64::NAN, 0.0));

        assert!(matches!(res, Err(MotionError::UnexpectedResponse(_))));
        assert!(robot.commands().is_empty());
    }
}
