//! Autonomy parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use super::GridCell;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the autonomy core, loaded from `params/auto.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoParams {
    /// Forward distance below which a cell is considered obstructed, in
    /// sensor units.
    pub safe_distance: f64,

    /// Battery percentage below which the rover returns home.
    pub low_battery_threshold: f64,

    /// Maximum number of rotations attempted while avoiding an obstacle
    /// before the rover is declared boxed in.
    pub max_avoidance_retries: u32,

    /// Rotation increment used during obstacle avoidance, in degrees. Must be
    /// a multiple of 45 that actually changes the heading.
    pub avoid_turn_deg: i32,

    /// The home cell, where the sweep starts and the rover returns to.
    pub home_position: (i32, i32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AutoParams {
    /// The home cell as a [`GridCell`].
    pub fn home(&self) -> GridCell {
        GridCell::new(self.home_position.0, self.home_position.1)
    }
}

impl Default for AutoParams {
    fn default() -> Self {
        Self {
            safe_distance: 10.0,
            low_battery_threshold: 20.0,
            max_avoidance_retries: 4,
            avoid_turn_deg: 90,
            home_position: (0, 0),
        }
    }
}
