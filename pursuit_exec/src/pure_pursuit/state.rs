//! Pure Pursuit module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace, warn};
use nalgebra::Vector2;
use serde::Serialize;

// Internal
use super::*;
use super::goal::Selection;
use crate::{loc::Pose, path::Path};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The Pure Pursuit controller.
///
/// Each call to `proc` evaluates one point of the path against the current
/// pose, producing a velocity command if that point becomes the new goal.
#[derive(Default)]
pub struct PursuitCtrl {
    params: Params,

    /// Executing mode
    mode: PursuitMode,

    output_cmd: Option<VelocityCommand>,

    report: StatusReport,
    arch_report: Option<Archiver>,

    /// The path being followed
    path: Option<Path>,

    /// Cursor over the path giving the next point to evaluate
    selector: GoalSelector,

    /// Number of goals accepted since the path was loaded
    num_goals: usize,
}

/// The status report containing the result of evaluating a single path point.
///
/// Fields which don't apply to the cycle are left as `None`.
#[derive(Debug, Default, Copy, Clone, Serialize)]
pub struct StatusReport {
    /// Session time at which the report was produced
    pub time_s: f64,

    /// Index of the path point evaluated this cycle
    pub point_index: Option<usize>,

    /// Distance from the robot to the evaluated point
    pub point_dist_m: Option<f64>,

    /// If true the evaluated point became the new goal
    pub goal_accepted: bool,

    /// If true the goal was at the robot's position, so no command was needed
    pub goal_reached: bool,

    /// Goal position in the world frame
    pub goal_x_m: Option<f64>,
    pub goal_y_m: Option<f64>,

    /// Goal position in the robot frame
    pub goal_x_rcs_m: Option<f64>,
    pub goal_y_rcs_m: Option<f64>,

    /// Turn rate demanded to reach the goal
    pub turn_rate_rads: Option<f64>,

    /// If true the path has been exhausted and the stop command issued
    pub path_finished: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum PursuitCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    #[error("Parameter {0} is invalid")]
    InvalidParam(&'static str),

    #[error("Could not initialise the status report archive: {0}")]
    ArchiveInitError(ArchiveError),

    /// A path is already loaded. Each controller follows a single path.
    #[error("Attempted to load a path while one is already loaded")]
    PathAlreadyLoaded,

    /// Attempted to process before any path was loaded.
    #[error("No path has been set")]
    NoPath,

    /// Attempted to process after the controller has stopped.
    #[error("Pure Pursuit has stopped and cannot be processed again")]
    AlreadyStopped,

    /// The pose contained a NaN or infinite value.
    #[error("Pose is not finite: {0:?}")]
    NonFinitePose(Pose),

    #[error("Could not compute the pursuit geometry: {0}")]
    GeometryError(GeometryError),
}

/// The possible modes of execution of Pure Pursuit. Each mode is handled by
/// a `mode_xyz` function.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PursuitMode {
    /// No path loaded yet
    Off,

    /// Walking the path
    Running,

    /// The path is finished or was aborted. This mode is terminal.
    Stopped,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PursuitMode {
    fn default() -> Self {
        PursuitMode::Off
    }
}

impl StatusReport {
    fn new() -> Self {
        Self {
            time_s: session::get_elapsed_seconds(),
            ..Default::default()
        }
    }

    /// The goal accepted this cycle in the world frame, if any.
    pub fn goal_m(&self) -> Option<Vector2<f64>> {
        match (self.goal_x_m, self.goal_y_m) {
            (Some(x), Some(y)) if self.goal_accepted => Some(Vector2::new(x, y)),
            _ => None,
        }
    }
}

impl State for PursuitCtrl {
    type InitData = &'static str;
    type InitError = PursuitCtrlError;

    type InputData = Pose;
    type OutputData = Option<VelocityCommand>;
    type StatusReport = StatusReport;
    type ProcError = PursuitCtrlError;

    /// Initialise the Pure Pursuit module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        let params: Params = params::load(init_data)
            .map_err(PursuitCtrlError::ParamLoadError)?;

        *self = Self::new(params)?;

        self.arch_report = Some(
            Archiver::from_path(session, "pure_pursuit/status_report.csv")
                .map_err(PursuitCtrlError::ArchiveInitError)?
        );

        Ok(())
    }

    /// Process Pure Pursuit for the current pose.
    ///
    /// Processing evaluates the next path point, returning either a velocity
    /// command towards it, no command if it was skipped, or the stop command
    /// if the path has run out.
    fn proc(&mut self, pose: &Pose)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        // Setup cycle data
        self.output_cmd = None;
        self.report = StatusReport::new();

        if !(pose.position_m.x.is_finite()
            && pose.position_m.y.is_finite()
            && pose.heading_rad.is_finite())
        {
            return Err(PursuitCtrlError::NonFinitePose(*pose))
        }

        // Mode execution
        match self.mode {
            PursuitMode::Off => return Err(PursuitCtrlError::NoPath),
            PursuitMode::Running => self.mode_running(pose)?,
            PursuitMode::Stopped => return Err(PursuitCtrlError::AlreadyStopped)
        };

        Ok((self.output_cmd, self.report))
    }
}

impl Archived for PursuitCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        match self.arch_report {
            Some(ref mut a) => a.serialise(self.report),
            None => Ok(())
        }
    }
}

impl PursuitCtrl {
    /// Create a new controller with the given parameters.
    pub fn new(params: Params) -> Result<Self, PursuitCtrlError> {
        if let Some(p) = params.find_invalid() {
            return Err(PursuitCtrlError::InvalidParam(p))
        }

        Ok(Self {
            params,
            ..Default::default()
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn mode(&self) -> PursuitMode {
        self.mode
    }

    /// Override the look-ahead distance.
    ///
    /// Only allowed before a path has been loaded.
    pub fn set_look_ahead(&mut self, look_ahead_m: f64) -> Result<(), PursuitCtrlError> {
        match self.mode {
            PursuitMode::Off => (),
            PursuitMode::Running => return Err(PursuitCtrlError::PathAlreadyLoaded),
            PursuitMode::Stopped => return Err(PursuitCtrlError::AlreadyStopped)
        }

        let params = Params {
            look_ahead_m,
            ..self.params.clone()
        };

        if let Some(p) = params.find_invalid() {
            return Err(PursuitCtrlError::InvalidParam(p))
        }

        self.params = params;

        Ok(())
    }

    /// Number of goals accepted so far.
    pub fn num_goals(&self) -> usize {
        self.num_goals
    }

    /// Index of the next path point to be evaluated, or `None` if there is
    /// nothing left to evaluate.
    pub fn next_point_index(&self) -> Option<usize> {
        match self.mode {
            PursuitMode::Running => self.selector.next_index(),
            _ => None
        }
    }

    /// Number of path points still to be evaluated.
    pub fn num_remaining(&self) -> usize {
        match self.mode {
            PursuitMode::Running => self.selector.num_remaining(),
            _ => 0
        }
    }

    /// Returns true if the controller is running and there are still path
    /// points to evaluate.
    pub fn has_pending_points(&self) -> bool {
        self.next_point_index().is_some()
    }

    /// Begin following a path.
    ///
    /// Execution starts at the first point of the path on the next call to
    /// `proc`. An empty path is accepted, in which case the only output will
    /// be the stop command.
    pub fn begin_path(&mut self, path: Path) -> Result<(), PursuitCtrlError> {
        match self.mode {
            PursuitMode::Off => (),
            PursuitMode::Running => return Err(PursuitCtrlError::PathAlreadyLoaded),
            PursuitMode::Stopped => return Err(PursuitCtrlError::AlreadyStopped)
        }

        info!(
            "Following path of {} points ({:.02} m), look-ahead {:.02} m",
            path.get_num_points(),
            path.get_length(),
            self.params.look_ahead_m
        );

        self.selector = GoalSelector::new(&path);
        self.path = Some(path);
        self.num_goals = 0;
        self.mode = PursuitMode::Running;

        Ok(())
    }

    /// Finish following the path.
    ///
    /// Returns the stop command if the controller was running. Once stopped
    /// no further commands are produced, so the stop command is only ever
    /// returned once.
    pub fn finish(&mut self) -> Option<VelocityCommand> {
        match self.mode {
            PursuitMode::Running => {
                self.mode_stopped();
                self.output_cmd
            },
            _ => None
        }
    }

    /// Abort the path, returning the stop command if the controller was
    /// running.
    pub fn abort(&mut self) -> Option<VelocityCommand> {
        if self.mode == PursuitMode::Running {
            warn!(
                "Aborting path with {} points unvisited",
                self.selector.num_remaining()
            );
        }

        self.finish()
    }

    /// Mode running.
    ///
    /// Evaluates the next path point. Points within the look-ahead distance
    /// are skipped, the first point beyond it becomes the goal and a command
    /// towards it is output.
    fn mode_running(&mut self, pose: &Pose) -> Result<(), PursuitCtrlError> {
        let path = match self.path {
            Some(ref p) => p,
            None => return Err(PursuitCtrlError::NoPath)
        };

        let look_ahead_m = self.params.look_ahead_m;

        match self.selector.evaluate(path, &pose.position_m, look_ahead_m) {
            Selection::Exhausted => {
                self.mode_stopped();
            },
            Selection::Skipped { index, dist_m } => {
                trace!("Skipping point {} at {:.03} m", index, dist_m);

                self.report.point_index = Some(index);
                self.report.point_dist_m = Some(dist_m);
            },
            Selection::Goal { index, point_m } => {
                self.report.point_index = Some(index);
                self.report.point_dist_m = Some((point_m - pose.position_m).norm());
                self.report.goal_accepted = true;
                self.report.goal_x_m = Some(point_m.x);
                self.report.goal_y_m = Some(point_m.y);
                self.num_goals += 1;

                let goal_rcs = wcs_to_rcs(&pose.position_m, &point_m, pose.heading_rad);
                self.report.goal_x_rcs_m = Some(goal_rcs.x);
                self.report.goal_y_rcs_m = Some(goal_rcs.y);

                match PursuitGeometry::from_rcs(&goal_rcs, look_ahead_m) {
                    Ok(geom) => {
                        self.report.turn_rate_rads = Some(geom.turn_rate_rads);
                        self.output_cmd = Some(VelocityCommand::new(
                            self.params.linear_speed_ms(),
                            geom.turn_rate_rads
                        ));

                        debug!(
                            "Goal {} at ({:.03}, {:.03}), rcs ({:.03}, {:.03}), \
                            dist {:.03} m, turn rate {:.03} rad/s",
                            index,
                            point_m.x, point_m.y,
                            goal_rcs.x, goal_rcs.y,
                            geom.distance_m,
                            geom.turn_rate_rads
                        );
                    },
                    // Goal is where we are, nothing to steer towards
                    Err(GeometryError::DegenerateGeometry) => {
                        debug!("Goal {} reached, no command issued", index);
                        self.report.goal_reached = true;
                    },
                    Err(e) => return Err(PursuitCtrlError::GeometryError(e))
                }
            }
        }

        Ok(())
    }

    /// Mode stopped.
    ///
    /// Sets the stop command as the output and leaves the controller in the
    /// terminal `Stopped` mode.
    fn mode_stopped(&mut self) {
        info!("Path finished after {} goals, stopping", self.num_goals);

        self.output_cmd = Some(VelocityCommand::stop());
        self.report.path_finished = true;
        self.mode = PursuitMode::Stopped;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ctrl_with_path(points: &[(f64, f64)]) -> PursuitCtrl {
        let mut ctrl = PursuitCtrl::new(Params {
            look_ahead_m: 0.7,
            cycle_period_s: 0.0,
        }).unwrap();
        ctrl.begin_path(Path::from_xy(points)).unwrap();
        ctrl
    }

    #[test]
    fn test_straight_ahead_goal() {
        let mut ctrl = ctrl_with_path(&[(1.0, 0.0)]);

        let (cmd, rpt) = ctrl.proc(&Pose::new(0.0, 0.0, 0.0)).unwrap();

        assert_eq!(cmd, Some(VelocityCommand::new(0.35, 0.0)));
        assert!(rpt.goal_accepted);
        assert_eq!(rpt.goal_m(), Some(Vector2::new(1.0, 0.0)));
        assert_eq!(rpt.goal_x_rcs_m, Some(1.0));
        assert_eq!(rpt.goal_y_rcs_m, Some(0.0));
    }

    #[test]
    fn test_left_goal() {
        let mut ctrl = ctrl_with_path(&[(0.0, 1.0)]);

        let (cmd, rpt) = ctrl.proc(&Pose::new(0.0, 0.0, 0.0)).unwrap();
        let cmd = cmd.unwrap();

        assert_eq!(cmd.linear_speed_ms, 0.35);
        assert!((cmd.turn_rate_rads - 1.4).abs() < 1e-12);
        assert!((rpt.goal_y_rcs_m.unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_skip_then_goal_then_stop() {
        let mut ctrl = ctrl_with_path(&[(0.2, 0.0), (0.5, 0.0), (1.0, 0.0)]);
        let pose = Pose::new(0.0, 0.0, 0.0);

        let (cmd, rpt) = ctrl.proc(&pose).unwrap();
        assert_eq!(cmd, None);
        assert_eq!(rpt.point_index, Some(0));
        assert!(!rpt.goal_accepted);
        assert_eq!(rpt.goal_m(), None);

        let (cmd, _) = ctrl.proc(&pose).unwrap();
        assert_eq!(cmd, None);

        let (cmd, rpt) = ctrl.proc(&pose).unwrap();
        assert!(cmd.is_some());
        assert_eq!(rpt.point_index, Some(2));
        assert_eq!(ctrl.num_goals(), 1);

        // Path exhausted
        assert!(!ctrl.has_pending_points());
        let (cmd, rpt) = ctrl.proc(&pose).unwrap();
        assert_eq!(cmd, Some(VelocityCommand::stop()));
        assert!(rpt.path_finished);
        assert_eq!(ctrl.mode(), PursuitMode::Stopped);

        // Terminal
        assert!(matches!(ctrl.proc(&pose), Err(PursuitCtrlError::AlreadyStopped)));
        assert_eq!(ctrl.finish(), None);
    }

    #[test]
    fn test_finish_only_stops_once() {
        let mut ctrl = ctrl_with_path(&[]);

        assert!(!ctrl.has_pending_points());
        assert_eq!(ctrl.finish(), Some(VelocityCommand::stop()));
        assert_eq!(ctrl.finish(), None);
        assert_eq!(ctrl.abort(), None);
    }

    #[test]
    fn test_abort_mid_path() {
        let mut ctrl = ctrl_with_path(&[(5.0, 0.0), (6.0, 0.0)]);
        ctrl.proc(&Pose::new(0.0, 0.0, 0.0)).unwrap();

        assert_eq!(ctrl.abort(), Some(VelocityCommand::stop()));
        assert_eq!(ctrl.mode(), PursuitMode::Stopped);
        assert!(!ctrl.has_pending_points());
    }

    #[test]
    fn test_point_on_robot_is_skipped() {
        let mut ctrl = ctrl_with_path(&[(0.0, 0.0)]);
        let (cmd, rpt) = ctrl.proc(&Pose::new(0.0, 0.0, 0.0)).unwrap();
        assert_eq!(cmd, None);
        assert!(!rpt.goal_accepted);
        assert_eq!(ctrl.num_goals(), 0);
    }

    #[test]
    fn test_errors() {
        let mut ctrl = PursuitCtrl::new(Params::default()).unwrap();
        assert!(matches!(
            ctrl.proc(&Pose::new(0.0, 0.0, 0.0)),
            Err(PursuitCtrlError::NoPath)
        ));

        ctrl.begin_path(Path::from_xy(&[(1.0, 1.0)])).unwrap();
        assert!(matches!(
            ctrl.begin_path(Path::default()),
            Err(PursuitCtrlError::PathAlreadyLoaded)
        ));

        assert!(matches!(
            ctrl.proc(&Pose::new(std::f64::NAN, 0.0, 0.0)),
            Err(PursuitCtrlError::NonFinitePose(_))
        ));

        // The bad pose didn't consume the point
        assert_eq!(ctrl.next_point_index(), Some(0));

        assert!(matches!(
            PursuitCtrl::new(Params { look_ahead_m: 0.0, cycle_period_s: 0.2 }),
            Err(PursuitCtrlError::InvalidParam("look_ahead_m"))
        ));
        assert!(matches!(
            PursuitCtrl::new(Params { look_ahead_m: 0.7, cycle_period_s: 1e20 }),
            Err(PursuitCtrlError::InvalidParam("cycle_period_s"))
        ));
    }

    #[test]
    fn test_set_look_ahead() {
        let mut ctrl = PursuitCtrl::new(Params::default()).unwrap();

        assert!(matches!(
            ctrl.set_look_ahead(-1.0),
            Err(PursuitCtrlError::InvalidParam("look_ahead_m"))
        ));
        ctrl.set_look_ahead(1.0).unwrap();
        assert_eq!(ctrl.params().linear_speed_ms(), 0.5);

        ctrl.begin_path(Path::from_xy(&[(2.0, 0.0)])).unwrap();
        assert!(ctrl.set_look_ahead(0.5).is_err());
    }

    #[test]
    fn test_write_without_archive() {
        let mut ctrl = ctrl_with_path(&[(1.0, 0.0)]);
        ctrl.proc(&Pose::new(0.0, 0.0, 0.0)).unwrap();
        assert!(ctrl.write().is_ok());
    }
}
