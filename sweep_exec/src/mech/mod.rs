//! Mechanisms interface
//!
//! The autonomy core drives the rover through the [`Mech`] trait, which wraps
//! the four primitive operations the hardware provides: a forward distance
//! sensor, a rotate-by-angle actuator, a move-one-cell actuator and a battery
//! level sensor. The physical backend is out of scope for this exec, so the
//! only implementation here is the simulated one in [`sim`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod sim;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Errors raised by a mechanisms backend.
#[derive(Debug, Error)]
pub enum MechError {
    #[error("Distance sensor returned an out of range reading: {0}")]
    DistanceOutOfRange(f64),

    #[error("Battery sensor returned an out of range level: {0}")]
    BatteryOutOfRange(f64),

    #[error("Rotation actuator fault: {0}")]
    RotateFault(String),

    #[error("Drive actuator fault: {0}")]
    MoveFault(String),
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Contract with the rover's mechanisms.
///
/// All calls are synchronous and blocking, one command at a time. Distance
/// readings are in sensor units, consistent with the configured safe
/// distance; battery levels are percentages.
pub trait Mech {
    /// Instantaneous forward distance reading, in sensor units.
    fn read_distance(&mut self) -> Result<f64, MechError>;

    /// Rotate the rover by a signed relative angle, in degrees.
    fn rotate(&mut self, rel_deg: f64) -> Result<(), MechError>;

    /// Advance exactly one grid cell along the current heading.
    fn move_forward(&mut self) -> Result<(), MechError>;

    /// Remaining battery level, 0 to 100 percent.
    fn read_battery(&mut self) -> Result<f64, MechError>;
}
