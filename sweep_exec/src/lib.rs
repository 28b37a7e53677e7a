//! Library for the sweep rover executable.
//!
//! The rover systematically covers an unknown grid-shaped area, building an
//! occupancy map from local distance scans as it goes, and returns to its
//! home cell when the battery runs low. The autonomy core lives in [`auto`],
//! while [`mech`] defines the boundary to the physical sensing and actuation
//! layer.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod auto;
pub mod mech;
