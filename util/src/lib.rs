//! Utility library for the sweep rover software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
pub mod logger;
pub mod params;
pub mod session;
