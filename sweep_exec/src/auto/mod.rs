//! Autonomy module
//!
//! Everything the rover needs to cover a grid on its own: the heading model,
//! local scanning, the occupancy map, reactive obstacle avoidance, path
//! planning and the coverage state machine. All of it is single threaded and
//! strictly sequential, one control step at a time, so the rover state and
//! map have exactly one owner for the whole run.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod avoid;
pub mod explorer;
pub mod heading;
pub mod map;
pub mod nav;
pub mod params;
pub mod scan;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Point2;

use crate::mech::{Mech, MechError};

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use explorer::{explore, CoverageExplorer, ExploreStatus, StepOutput};
pub use params::AutoParams;

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// A single cell of the exploration grid.
///
/// Cells are identified by value, one rover step moves one cell along the
/// current heading.
pub type GridCell = Point2<i32>;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The rover's tracked state: grid position, heading and low-energy flag.
///
/// Positions are exact grid units, tracked from the issued commands, there is
/// no odometry correction.
#[derive(Debug, Clone)]
pub struct RobotState {
    /// Current cell.
    pub position: GridCell,

    /// Heading controller, owning the current absolute heading.
    pub heading: heading::HeadingCtrl,

    /// Set once the battery level drops below the configured threshold.
    pub low_battery: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur in the autonomy core.
#[derive(Debug, thiserror::Error)]
pub enum AutoError {
    #[error("Invalid autonomy parameters: {0}")]
    InvalidParams(String),

    #[error("Sensor fault: {0}")]
    SensorFault(MechError),

    #[error("Actuator fault: {0}")]
    ActuatorFault(MechError),

    #[error("Rotation of {0} degrees does not land on a 45 degree compass point")]
    InvalidRotation(i32),

    #[error("Planned path step from {0:?} to {1:?} is not between adjacent cells")]
    NonAdjacentStep(GridCell, GridCell),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl RobotState {
    pub fn new(position: GridCell, initial_heading: heading::Heading) -> Self {
        Self {
            position,
            heading: heading::HeadingCtrl::new(initial_heading),
            low_battery: false,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Read the forward distance, validating the reading.
///
/// A non-finite or negative reading means the sensor can no longer be
/// trusted, which is fatal for the sweep.
pub(crate) fn read_distance_checked<M: Mech>(mech: &mut M) -> Result<f64, AutoError> {
    let dist = mech.read_distance().map_err(AutoError::SensorFault)?;

    if !dist.is_finite() || dist < 0.0 {
        return Err(AutoError::SensorFault(MechError::DistanceOutOfRange(dist)));
    }

    Ok(dist)
}

/// Read the battery level, validating it is a percentage.
pub(crate) fn read_battery_checked<M: Mech>(mech: &mut M) -> Result<f64, AutoError> {
    let level = mech.read_battery().map_err(AutoError::SensorFault)?;

    if !level.is_finite() || !(0.0..=100.0).contains(&level) {
        return Err(AutoError::SensorFault(MechError::BatteryOutOfRange(level)));
    }

    Ok(level)
}
