//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs::read_to_string;
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Cannot determine the software root directory: {0}")]
    SwRootNotFound(std::io::Error),

    #[error("Cannot load the parameter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Cannot read the parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file.
///
/// The file path is relative to the software root's `params` directory.
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned,
{
    // Get the params dir
    let mut path = crate::host::get_sweep_sw_root().map_err(LoadError::SwRootNotFound)?;
    path.push("params");
    path.push(param_file_path);

    // Load the file into a string
    let params_str = read_to_string(path).map_err(LoadError::FileLoadError)?;

    // Parse the string into the parameter struct
    toml::from_str(params_str.as_str()).map_err(LoadError::DeserialiseError)
}
