//! Navigation
//!
//! Path planning over the occupancy map and the return-to-home controller
//! that consumes planned paths, falling back to direct movement when no safe
//! path exists.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod path_planner;
mod return_home;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use path_planner::find_path;
pub use return_home::{ReturnMode, ReturnToHomeCtrl};
