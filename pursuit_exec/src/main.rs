//! Main pursuit executable entry point.
//!
//! # Architecture
//!
//! The executable follows a single recorded path then exits:
//!
//!     - Initialise the session and logging
//!     - Load parameters and the recorded path
//!     - Connect to the robot, or create the simulated robot
//!     - Run the pursuit manager until the path is exhausted or a failure occurs
//!     - Save the run summary

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::{info, warn};
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use comms_if::net::NetParams;
use pursuit_lib::{
    lokarria_client::{self, LokarriaClient},
    path::RecordedPath,
    progress::ArchiveProgress,
    pure_pursuit::{Params, PursuitCtrl},
    pursuit_mgr::{PursuitMgr, PursuitMgrError, RunSummary},
    sim_client::SimRobot,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// STRUCTS
// ---------------------------------------------------------------------------

/// Follow a recorded path using Pure Pursuit.
#[derive(Debug, StructOpt)]
#[structopt(name = "pursuit_exec")]
struct Args {
    /// The recorded path file to follow.
    #[structopt(parse(from_os_str))]
    path_file: PathBuf,

    /// Drive a simulated robot rather than connecting to the real one.
    #[structopt(long)]
    sim: bool,

    /// Override the look-ahead distance in pure_pursuit.toml (meters).
    #[structopt(long)]
    look_ahead: Option<f64>,

    /// Override the Lokarria endpoint in net.toml (host:port).
    #[structopt(long)]
    endpoint: Option<String>,

    /// Minimum level of log messages.
    #[structopt(long, default_value = "debug")]
    log_level: LevelFilter,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let Args { path_file, sim, look_ahead, endpoint, log_level } = Args::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "pursuit_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Pure Pursuit Executable\n");
    if let Some(hostname) = host::get_hostname() {
        info!("Running on: {}", hostname);
    }
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let mut ctrl = PursuitCtrl::default();
    ctrl.init("pure_pursuit.toml", &session)
        .wrap_err("Failed to initialise Pure Pursuit")?;

    if let Some(look_ahead_m) = look_ahead {
        ctrl.set_look_ahead(look_ahead_m)
            .wrap_err("Invalid look-ahead override")?;
        info!("Look-ahead distance overridden to {:.03} m", look_ahead_m);
    }

    let mut net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load net params")?;

    if let Some(endpoint) = endpoint {
        net_params.lokarria_endpoint = endpoint;
    }

    info!("Parameters loaded");

    // ---- LOAD PATH ----

    info!("Loading path from {:?}", path_file);

    let recording = RecordedPath::load(&path_file)
        .wrap_err_with(|| format!("Failed to load path from {:?}", path_file))?;

    info!(
        "Loaded path contains {} poses spanning {:.02} s of recording\n",
        recording.get_num_records(),
        recording.get_duration().unwrap_or(0.0)
    );

    let start_pose = recording.start_pose().unwrap_or_default();
    let path = recording.into_path();
    session.save("pursuit/path.json", path.clone());

    // ---- RUN ----

    let observer = ArchiveProgress::new(&session)
        .wrap_err("Failed to create the progress archive")?;

    let result = if sim {
        info!("Using simulated robot starting at {:?}", start_pose);

        let robot = SimRobot::new(start_pose, sim_period_s(ctrl.params()));

        let result = PursuitMgr::new(ctrl, path, robot.pose_source(), robot.actuator())
            .map(|m| m.with_observer(observer))
            .and_then(|mut m| m.run());

        info!("Final simulated pose: {:?}", robot.pose());
        result
    }
    else {
        info!("Connecting to the robot at {}", net_params.base_url());

        let client = LokarriaClient::new(&net_params);
        log_laser_summary(&client);

        PursuitMgr::new(ctrl, path, client.clone(), client)
            .map(|m| m.with_observer(observer))
            .and_then(|mut m| m.run())
    };

    finish(session, result)
}

/// Save the summary of a successful run and end the session.
fn finish(session: Session, result: Result<RunSummary, PursuitMgrError>) -> Result<(), Report> {
    match result {
        Ok(summary) => {
            info!("Run summary: {:#?}", summary);
            session.save("pursuit/summary.json", summary);
            session.exit();
            Ok(())
        }
        Err(e) => {
            let kind = e.kind();
            session.exit();
            Err(Report::new(e).wrap_err(format!("Run aborted ({:?})", kind)))
        }
    }
}

/// Period the simulator holds each command for.
///
/// A zero cycle period would leave the simulated robot stationary, so the
/// default period is used instead.
fn sim_period_s(params: &Params) -> f64 {
    if params.cycle_period_s > 0.0 {
        params.cycle_period_s
    }
    else {
        Params::default().cycle_period_s
    }
}

/// Log the laser's state as a check that the robot is responding.
fn log_laser_summary(client: &LokarriaClient) {
    let props = match client.get_laser_properties() {
        Ok(p) => p,
        Err(e) => {
            warn!("Could not get laser properties: {}", e);
            return
        }
    };

    let angles = match lokarria_client::laser_angles(&props) {
        Ok(a) => a,
        Err(e) => {
            warn!("{}", e);
            return
        }
    };

    match client.get_laser_echoes() {
        Ok(echoes) => {
            let nearest_m = echoes.echoes
                .iter()
                .cloned()
                .fold(std::f64::INFINITY, f64::min);

            info!(
                "Laser: {} beams from {:.03} to {:.03} rad, {} echoes, nearest {:.03} m",
                angles.len(),
                props.start_angle,
                props.end_angle,
                echoes.echoes.len(),
                nearest_m
            );

            if angles.len() != echoes.echoes.len() {
                warn!(
                    "Laser reported {} echoes for {} beams",
                    echoes.echoes.len(),
                    angles.len()
                );
            }
        }
        Err(e) => warn!("Could not get laser echoes: {}", e),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_args() {
        let args = Args::from_iter_safe(&[
            "pursuit_exec",
            "paths/square.json",
            "--sim",
            "--look-ahead",
            "1.0",
            "--endpoint",
            "robot.local:50000",
        ]).unwrap();

        assert_eq!(args.path_file, PathBuf::from("paths/square.json"));
        assert!(args.sim);
        assert_eq!(args.look_ahead, Some(1.0));
        assert_eq!(args.endpoint.as_deref(), Some("robot.local:50000"));
        assert_eq!(args.log_level, LevelFilter::Debug);

        let args = Args::from_iter_safe(&["pursuit_exec", "path.json", "--log-level", "trace"])
            .unwrap();
        assert!(!args.sim);
        assert_eq!(args.look_ahead, None);
        assert_eq!(args.endpoint, None);
        assert_eq!(args.log_level, LevelFilter::Trace);

        assert!(Args::from_iter_safe(&["pursuit_exec"]).is_err());
    }

    #[test]
    fn test_sim_period() {
        let p = Params { cycle_period_s: 0.5, ..Default::default() };
        assert_eq!(sim_period_s(&p), 0.5);

        let p = Params { cycle_period_s: 0.0, ..Default::default() };
        assert_eq!(sim_period_s(&p), Params::default().cycle_period_s);
    }
}
