//! Simulated mechanisms backend
//!
//! Stands in for the physical rover during development and test. The world is
//! a set of obstacle cells on the exploration grid, and the rover's ground
//! truth pose is tracked from the actuation calls themselves. Headings are
//! quantised to 45 degrees, which is all the autonomy core ever commands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashSet;

use log::trace;
use serde::Deserialize;

use super::{Mech, MechError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the simulated mechanisms backend.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Obstacle cells in the simulated world.
    pub obstacles: Vec<(i32, i32)>,

    /// Sensor units per grid cell.
    pub units_per_cell: f64,

    /// Maximum distance sensor range, in sensor units.
    pub max_range: f64,

    /// Battery level at the start of the run, in percent.
    pub initial_battery: f64,

    /// Battery drained by one forward move, in percent.
    pub drain_per_move: f64,

    /// Battery drained by one rotation command, in percent.
    pub drain_per_rotate: f64,
}

/// Simulated mechanisms backend.
pub struct SimMech {
    params: SimParams,

    /// Obstacle cell lookup, built from the params at construction.
    obstacles: HashSet<(i32, i32)>,

    /// Ground truth position, in cells.
    position: (i32, i32),

    /// Ground truth heading, in degrees, always a multiple of 45.
    heading_deg: i32,

    /// Remaining battery level, in percent.
    battery: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for SimParams {
    fn default() -> Self {
        Self {
            obstacles: Vec::new(),
            units_per_cell: 10.0,
            max_range: 400.0,
            initial_battery: 100.0,
            drain_per_move: 0.5,
            drain_per_rotate: 0.1,
        }
    }
}

impl SimMech {
    pub fn new(params: SimParams) -> Self {
        let obstacles = params.obstacles.iter().copied().collect();
        let battery = params.initial_battery;

        Self {
            params,
            obstacles,
            position: (0, 0),
            heading_deg: 0,
            battery,
        }
    }

    /// Ground truth position of the simulated rover, in cells.
    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    /// Ground truth heading of the simulated rover, in degrees.
    pub fn heading_deg(&self) -> i32 {
        self.heading_deg
    }

    /// Unit cell delta for the current heading.
    fn heading_delta(&self) -> (i32, i32) {
        match self.heading_deg.rem_euclid(360) {
            0 => (1, 0),
            45 => (1, 1),
            90 => (0, 1),
            135 => (-1, 1),
            180 => (-1, 0),
            225 => (-1, -1),
            270 => (0, -1),
            315 => (1, -1),
            // rotate() keeps the heading 45 degree quantised
            _ => unreachable!("Simulated heading is not 45 degree quantised"),
        }
    }

    fn drain(&mut self, amount: f64) {
        self.battery = (self.battery - amount).max(0.0);
    }
}

impl Mech for SimMech {
    /// Ray-cast along the current heading to the nearest obstacle cell.
    ///
    /// The returned distance is measured from the rover's cell centre to the
    /// near edge of the obstacle cell, so an obstacle in the adjacent cell
    /// reads as half a cell. Diagonal rays scale by sqrt(2).
    fn read_distance(&mut self) -> Result<f64, MechError> {
        let (dx, dy) = self.heading_delta();

        let step_units = if dx != 0 && dy != 0 {
            self.params.units_per_cell * std::f64::consts::SQRT_2
        } else {
            self.params.units_per_cell
        };

        let max_cells = (self.params.max_range / step_units).ceil() as i32;

        for i in 1..=max_cells {
            let cell = (self.position.0 + dx * i, self.position.1 + dy * i);
            if self.obstacles.contains(&cell) {
                let dist = ((i as f64) - 0.5) * step_units;
                trace!("Sim distance reading: obstacle at {:?}, {:.1} units", cell, dist);
                return Ok(dist);
            }
        }

        Ok(self.params.max_range)
    }

    fn rotate(&mut self, rel_deg: f64) -> Result<(), MechError> {
        let rel = rel_deg.round() as i32;

        // The sim only supports the 45 degree quantised headings the autonomy
        // core commands, anything else is an actuator fault.
        if rel.rem_euclid(45) != 0 {
            return Err(MechError::RotateFault(format!(
                "unsupported rotation of {} degrees",
                rel_deg
            )));
        }

        self.heading_deg = (self.heading_deg + rel).rem_euclid(360);
        self.drain(self.params.drain_per_rotate);
        Ok(())
    }

    fn move_forward(&mut self) -> Result<(), MechError> {
        let (dx, dy) = self.heading_delta();
        self.position = (self.position.0 + dx, self.position.1 + dy);
        self.drain(self.params.drain_per_move);
        trace!("Sim moved to {:?}", self.position);
        Ok(())
    }

    fn read_battery(&mut self) -> Result<f64, MechError> {
        Ok(self.battery)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_distance_ray() {
        let mut mech = SimMech::new(SimParams {
            obstacles: vec![(2, 0), (1, 1)],
            ..Default::default()
        });

        // Obstacle two cells ahead reads 1.5 cells
        assert_eq!(mech.read_distance().unwrap(), 15.0);

        // Diagonal obstacle one cell away reads half a diagonal cell
        mech.rotate(45.0).unwrap();
        let dist = mech.read_distance().unwrap();
        assert!((dist - 5.0 * std::f64::consts::SQRT_2).abs() < 1e-9);

        // Nothing behind, full range
        mech.rotate(135.0).unwrap();
        assert_eq!(mech.read_distance().unwrap(), 400.0);
    }

    #[test]
    fn test_pose_tracking() {
        let mut mech = SimMech::new(SimParams::default());

        mech.move_forward().unwrap();
        mech.rotate(90.0).unwrap();
        mech.move_forward().unwrap();
        assert_eq!(mech.position(), (1, 1));
        assert_eq!(mech.heading_deg(), 90);

        // Full scan rotation returns to the original heading
        for _ in 0..8 {
            mech.rotate(45.0).unwrap();
        }
        assert_eq!(mech.heading_deg(), 90);
    }

    #[test]
    fn test_battery_drain() {
        let mut mech = SimMech::new(SimParams {
            drain_per_move: 10.0,
            drain_per_rotate: 1.0,
            ..Default::default()
        });

        mech.move_forward().unwrap();
        mech.rotate(90.0).unwrap();
        assert_eq!(mech.read_battery().unwrap(), 89.0);
    }

    #[test]
    fn test_unquantised_rotation_rejected() {
        let mut mech = SimMech::new(SimParams::default());
        assert!(matches!(
            mech.rotate(30.0),
            Err(MechError::RotateFault(_))
        ));
    }
}
