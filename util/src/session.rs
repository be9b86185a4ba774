//! Session management

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use erased_serde::Serialize;
use log::{info, warn};
use std::fs;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A chrono format string which diplays a timestamp. See
/// https://docs.rs/chrono/0.4.11/chrono/format/strftime/index.html for more
/// information.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A struct storing information about the current session
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The root directory for this session's archives
    pub arch_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,

    save_sender: Sender<SaveMsg>,

    save_jh: Option<JoinHandle<()>>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (PURSUIT_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error(
        "Cannot initialise the session epoch, have you already initialised the \
         session? (conquer_once error: {0})"
    )]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("Cannot get the epoch time, did you forget to initialise the session?")]
    CannotGetEpoch,
}

/// Messages handled by the background save thread.
enum SaveMsg {
    Data(PathBuf, Box<dyn Serialize + Send>),
    Stop,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session within the given directory.
    ///
    /// This will create a new session directory named `{exec_name}_{timestamp}`
    /// inside `$PURSUIT_SW_ROOT/{sessions_dir}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        // Set the session epoch
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(SessionError::CannotInitEpoch)?;

        // Format the session epoch as a timestamp
        let timestamp = match SESSION_EPOCH.get() {
            Some(e) => e.format(TIMESTAMP_FORMAT),
            None => return Err(SessionError::CannotGetEpoch),
        };

        // Get the root directory
        let root = crate::host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        // Create the session path
        let mut path: PathBuf = root;
        path.push(sessions_dir);
        path.push(format!("{}_{}", exec_name, timestamp));

        fs::create_dir_all(&path).map_err(SessionError::CannotCreateDir)?;

        // Create the archive dir
        let arch_path = path.join("arch");
        fs::create_dir_all(&arch_path).map_err(SessionError::CannotCreateDir)?;

        let log_file_path = path.join(format!("{}.log", exec_name));

        // Setup the save thread
        let (tx, rx) = channel();

        let session_root = path.clone();
        let save_jh = thread::spawn(move || save_thread(session_root, rx));

        Ok(Session {
            session_root: path,
            arch_root: arch_path,
            log_file_path,
            save_sender: tx,
            save_jh: Some(save_jh),
        })
    }

    /// Exit the session, waiting for the save thread to finish any pending actions
    pub fn exit(mut self) {
        info!("Stopping save thread");

        // Messages are processed in order, so everything queued before the
        // stop will be written.
        if self.save_sender.send(SaveMsg::Stop).is_err() {
            warn!("Save thread has already exited");
        }

        if let Some(jh) = self.save_jh.take() {
            if jh.join().is_err() {
                warn!("Save thread panicked");
            }
        }

        info!("Save thread exited");
    }

    /// Saves the given data to the given session-relative path in a background thread.
    pub fn save<P: AsRef<Path>, T: Serialize + Send + 'static>(&self, path: P, data: T) {
        if let Err(e) = self
            .save_sender
            .send(SaveMsg::Data(path.as_ref().to_path_buf(), Box::new(data)))
        {
            warn!(
                "Could not send data to be saved to path {:?}: {}",
                path.as_ref(),
                e
            )
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// If the session has not been started yet `NAN` is returned.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => time::duration_to_seconds(Utc::now() - *e).unwrap_or(std::f64::NAN),
        None => std::f64::NAN,
    }
}

/// Return a reference to the session's epoch.
///
/// # Panics
/// - This function will panic if the session epoch has not been
///   initialised, which is performed on creating a new Session instance.
pub fn get_epoch() -> &'static DateTime<Utc> {
    match SESSION_EPOCH.get() {
        Some(e) => e,
        None => panic!("Cannot get the session epoch!"),
    }
}

// -----------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// -----------------------------------------------------------------------------------------------

fn save_thread(session_root: PathBuf, receiver: Receiver<SaveMsg>) {
    // Blocks until a message arrives, exits on stop or when every sender has
    // been dropped.
    while let Ok(msg) = receiver.recv() {
        let (path, data) = match msg {
            SaveMsg::Data(p, d) => (p, d),
            SaveMsg::Stop => break,
        };

        let full_path = session_root.join(path);

        match full_path.extension().and_then(|s| s.to_str()) {
            Some("json") => {
                if let Err(e) = write_json(&full_path, &data) {
                    warn!("Couldn't save {:?}: {}", full_path, e);
                }
            }
            ext => warn!(
                "Unrecognised file path extension for {:?} (got {:?})",
                full_path, ext
            ),
        }
    }
}

/// Write a serializable object into a pretty-printed JSON file, creating the
/// parent directories if needed.
fn write_json(
    full_path: &Path,
    data: &Box<dyn Serialize + Send>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(full_path)?;

    serde_json::to_writer_pretty(&file, data)?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_elapsed_without_session() {
        assert!(get_elapsed_seconds().is_nan());
    }

    #[test]
    fn test_write_json() {
        let root = std::env::temp_dir().join(format!("util_session_test_{}", std::process::id()));
        let full_path = root.join("pursuit").join("summary.json");

        let data: Box<dyn Serialize + Send> = Box::new(vec![1.0, 2.5]);
        write_json(&full_path, &data).unwrap();

        let content = fs::read_to_string(&full_path).unwrap();
        let value: Vec<f64> = serde_json::from_str(&content).unwrap();
        assert_eq!(value, vec![1.0, 2.5]);

        fs::remove_dir_all(&root).ok();
    }
}
