//! Session management
//!
//! A session is one execution of an exec. Each session gets its own directory
//! under the software root's `sessions` directory, which holds the log file
//! and any data artefacts saved during the run (maps, planned paths, etc.).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use log::warn;
use serde::Serialize;
use std::fs;
use std::fs::OpenOptions;
use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// A chrono format string used to timestamp session directories.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A struct storing information about the current session
#[derive(Clone)]
pub struct Session {
    /// The root directory for this session
    pub session_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Cannot determine the software root directory: {0}")]
    SwRootNotFound(std::io::Error),

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error(
        "Cannot initialise the session epoch, have you already initialised the\
         session? (conquer_once error: {0})"
    )]
    CannotInitEpoch(conquer_once::TryInitError),

    #[error("Cannot get the epoch time, did you forget to initialise the session?")]
    CannotGetEpoch,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start a new session within the given directory.
    ///
    /// This will create a new session directory named `{exec_name}_{timestamp}`
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
        let root = crate::host::get_sweep_sw_root().map_err(SessionError::SwRootNotFound)?;

        // Create the session path
        let mut path: PathBuf = root;
        path.push(String::from(sessions_dir));
        path.push(format!("{}_{}", exec_name, timestamp));

        // Create the directory
        fs::create_dir_all(path.clone()).map_err(SessionError::CannotCreateDir)?;

        // Create the log file path
        let mut log_file_path = path.clone();
        log_file_path.push(format!("{}.log", exec_name));

        // Build the session struct
        Ok(Session {
            session_root: path,
            log_file_path,
        })
    }

    /// Saves the given data as pretty JSON at the given session-relative path.
    ///
    /// Save failures are warnings, not errors, since losing an artefact should
    /// never bring down the exec itself.
    pub fn save<P: AsRef<Path>, T: Serialize>(&self, path: P, data: &T) {
        let full_path = self.session_root.join(path.as_ref());

        // Create the parent path if needed
        if let Some(parent) = full_path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(
                    "Couldn't create parent directory for {:?}: {}",
                    full_path, e
                );
                return;
            }
        }

        let file = match OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(&full_path)
        {
            Ok(f) => f,
            Err(e) => {
                warn!("Couldn't create file {:?}: {}", full_path, e);
                return;
            }
        };

        if let Err(e) = serde_json::to_writer_pretty(&file, data) {
            warn!("Couldn't serialise data for file {:?}: {}", full_path, e);
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the number of seconds elapsed since the start of the session.
///
/// Returns `0.0` if the session epoch has not been initialised yet, which
/// happens on creating a new Session instance.
pub fn get_elapsed_seconds() -> f64 {
    match SESSION_EPOCH.get() {
        Some(e) => {
            let elapsed = Utc::now() - *e;
            (elapsed.num_milliseconds() as f64) * 0.001
        }
        None => 0.0,
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
