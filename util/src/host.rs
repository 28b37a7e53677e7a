//! Host environment utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name of the environment variable holding the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "SWEEP_SW_ROOT";

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Get the software root directory.
///
/// This is the directory containing the `params` and `sessions` directories.
/// It is read from the `SWEEP_SW_ROOT` environment variable, falling back to
/// the current working directory so the execs can be run straight from the
/// repository root.
pub fn get_sweep_sw_root() -> Result<PathBuf, std::io::Error> {
    match std::env::var(SW_ROOT_ENV_VAR) {
        Ok(root) => Ok(PathBuf::from(root)),
        Err(_) => std::env::current_dir(),
    }
}
