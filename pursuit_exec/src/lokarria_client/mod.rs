//! # Lokarria Client
//!
//! Blocking HTTP client for the Lokarria interface of the robot. The client provides the robot's
//! pose and accepts drive demands, and so implements both `PoseSource` and `MotionActuator`. Laser
//! data is also available for diagnostics.
//!
//! All requests are bounded by the timeouts in `net.toml`. A timeout is reported in the same way
//! as an unreachable robot.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;

use log::{debug, trace};
use nalgebra::Vector2;
use serde::de::DeserializeOwned;
use ureq::{Agent, AgentBuilder};

use crate::{
    interfaces::{MotionActuator, MotionError, PoseSource, PoseSourceError},
    loc::Pose,
    pure_pursuit::VelocityCommand,
};
use comms_if::{
    eqpt::lokarria::{
        DriveDems, LaserEchoes, LaserProperties, LocalizationResponse, Orientation,
        DIFFERENTIAL_DRIVE_RESOURCE, DRIVE_ACCEPTED_STATUS, LASER_ECHOES_RESOURCE,
        LASER_PROPERTIES_RESOURCE, LOCALIZATION_RESOURCE,
    },
    net::NetParams,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Status expected from all GET requests.
const GET_OK_STATUS: u16 = 200;

/// Most laser beams accepted from a properties response.
pub const MAX_LASER_BEAMS: usize = 10_000;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The Lokarria client
#[derive(Clone)]
pub struct LokarriaClient {
    agent: Agent,
    base_url: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LokarriaClientError {
    #[error("Could not reach the robot: {0}")]
    Unreachable(String),

    #[error("The robot responded with status {0}")]
    UnexpectedStatus(u16),

    #[error("Could not decode the response from the robot: {0}")]
    DecodeError(std::io::Error),

    #[error("Could not serialize the request: {0}")]
    SerializationError(serde_json::Error),

    #[error("The orientation quaternion is degenerate: {0:?}")]
    DegenerateOrientation(Orientation),

    #[error("The laser properties are invalid: {0:?}")]
    InvalidLaserProperties(LaserProperties),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LokarriaClient {
    pub fn new(params: &NetParams) -> Self {
        let agent = AgentBuilder::new()
            .timeout_connect(Duration::from_millis(params.connect_timeout_ms))
            .timeout_read(Duration::from_millis(params.read_timeout_ms))
            .timeout_write(Duration::from_millis(params.write_timeout_ms))
            .build();

        let base_url = params.base_url();
        debug!("Lokarria client using {}", base_url);

        Self { agent, base_url }
    }

    /// Request the robot's localization.
    pub fn get_localization(&self) -> Result<LocalizationResponse, LokarriaClientError> {
        self.get(LOCALIZATION_RESOURCE)
    }

    /// Request the latest laser echoes.
    pub fn get_laser_echoes(&self) -> Result<LaserEchoes, LokarriaClientError> {
        self.get(LASER_ECHOES_RESOURCE)
    }

    /// Request the laser's properties.
    pub fn get_laser_properties(&self) -> Result<LaserProperties, LokarriaClientError> {
        self.get(LASER_PROPERTIES_RESOURCE)
    }

    /// Send drive demands to the robot.
    ///
    /// The robot must respond with `204 No Content`, any other status is an error.
    pub fn drive(&self, dems: &DriveDems) -> Result<(), LokarriaClientError> {
        let body = serde_json::to_value(dems).map_err(LokarriaClientError::SerializationError)?;

        trace!("POST {}: {}", DIFFERENTIAL_DRIVE_RESOURCE, body);

        let resp = self
            .agent
            .post(&self.url(DIFFERENTIAL_DRIVE_RESOURCE))
            .send_json(body)
            .map_err(from_ureq)?;

        match resp.status() {
            DRIVE_ACCEPTED_STATUS => Ok(()),
            s => Err(LokarriaClientError::UnexpectedStatus(s)),
        }
    }

    fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T, LokarriaClientError> {
        trace!("GET {}", resource);

        let resp = self
            .agent
            .get(&self.url(resource))
            .call()
            .map_err(from_ureq)?;

        if resp.status() != GET_OK_STATUS {
            return Err(LokarriaClientError::UnexpectedStatus(resp.status()));
        }

        resp.into_json().map_err(LokarriaClientError::DecodeError)
    }

    fn url(&self, resource: &str) -> String {
        format!("{}{}", self.base_url, resource)
    }
}

impl PoseSource for LokarriaClient {
    fn get_pose(&mut self) -> Result<Pose, PoseSourceError> {
        self.get_localization()
            .and_then(|r| pose_from_response(&r))
            .map_err(|e| match e {
                LokarriaClientError::Unreachable(s) => PoseSourceError::UnreachableRobot(s),
                e => PoseSourceError::MalformedPose(e.to_string()),
            })
    }
}

impl MotionActuator for LokarriaClient {
    fn set_motion(&mut self, cmd: &VelocityCommand) -> Result<(), MotionError> {
        self.drive(&DriveDems::from(*cmd)).map_err(|e| match e {
            LokarriaClientError::Unreachable(s) => MotionError::UnreachableRobot(s),
            e => MotionError::UnexpectedResponse(e.to_string()),
        })
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Get the robot's pose from a localization response.
///
/// The heading is the angle of the world X axis once rotated by the orientation quaternion, in
/// the range [-pi, pi].
pub fn pose_from_response(resp: &LocalizationResponse) -> Result<Pose, LokarriaClientError> {
    let pos = resp.pose.position;
    let q = resp.pose.orientation;

    Pose::from_quaternion(Vector2::new(pos.x, pos.y), q.w, q.x, q.y, q.z)
        .ok_or(LokarriaClientError::DegenerateOrientation(q))
}

/// Get the angle of each laser beam, from the start angle to the end angle inclusive.
pub fn laser_angles(props: &LaserProperties) -> Result<Vec<f64>, LokarriaClientError> {
    let span = props.end_angle - props.start_angle;

    if !(props.angle_increment.is_finite()
        && props.angle_increment > 0.0
        && span.is_finite()
        && span >= 0.0)
    {
        return Err(LokarriaClientError::InvalidLaserProperties(*props));
    }

    let num_beams = (span / props.angle_increment).floor() + 1.0;
    if num_beams > MAX_LASER_BEAMS as f64 {
        return Err(LokarriaClientError::InvalidLaserProperties(*props));
    }
    let num_beams = num_beams as usize;

    Ok((0..num_beams)
        .map(|i| props.start_angle + i as f64 * props.angle_increment)
        .collect())
}

fn from_ureq(e: ureq::Error) -> LokarriaClientError {
    match e {
        ureq::Error::Status(code, _) => LokarriaClientError::UnexpectedStatus(code),
        ureq::Error::Transport(t) => LokarriaClientError::Unreachable(t.to_string()),
    }
}
