//! Return-to-home control
//!
//! Plans a path home through the occupancy map and walks it cell by cell.
//! When no safe path exists the controller falls back to direct greedy
//! movement towards home, ignoring the map entirely. That degraded mode may
//! not avoid obstacles, so it is logged loudly and surfaced in the returned
//! [`ReturnMode`] rather than being indistinguishable from a planned return.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use serde::Serialize;

use super::path_planner::find_path;
use crate::auto::{
    heading::Heading,
    map::OccupancyMap,
    AutoError, GridCell, RobotState,
};
use crate::mech::Mech;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// How the rover got home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReturnMode {
    /// A map-validated path from the planner was followed.
    Planned,

    /// Direct greedy movement ignoring the map, the degraded last resort.
    Direct,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Drives the rover back to the home cell.
#[derive(Debug, Clone)]
pub struct ReturnToHomeCtrl {
    home: GridCell,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ReturnToHomeCtrl {
    pub fn new(home: GridCell) -> Self {
        Self { home }
    }

    /// Drive the rover from its current position back to home.
    ///
    /// Returns the mode that was used. On return the rover's position equals
    /// the home cell in either mode.
    pub fn return_home<M: Mech>(
        &self,
        mech: &mut M,
        robot: &mut RobotState,
        map: &OccupancyMap,
    ) -> Result<ReturnMode, AutoError> {
        match find_path(map, robot.position, self.home) {
            Some(path) => {
                info!(
                    "Returning home along a planned path of {} cell(s)",
                    path.len()
                );
                self.follow_path(mech, robot, &path)?;
                Ok(ReturnMode::Planned)
            }
            None => {
                warn!("No safe path home through the map, degraded direct return engaged");
                self.direct_return(mech, robot)?;
                Ok(ReturnMode::Direct)
            }
        }
    }

    /// Walk a planned path step by step.
    ///
    /// Steps may be diagonal, each one is a turn to the delta's heading
    /// followed by a single forward move.
    fn follow_path<M: Mech>(
        &self,
        mech: &mut M,
        robot: &mut RobotState,
        path: &[GridCell],
    ) -> Result<(), AutoError> {
        for &next in path.iter().skip(1) {
            let delta = next - robot.position;
            let heading = Heading::from_delta(delta)
                .ok_or(AutoError::NonAdjacentStep(robot.position, next))?;

            robot.heading.turn_to(mech, heading)?;
            mech.move_forward().map_err(AutoError::ActuatorFault)?;
            robot.position = next;
        }

        Ok(())
    }

    /// Direct greedy movement towards home, ignoring the map.
    ///
    /// Reduces the larger-magnitude axis offset first, x on ties, cardinal
    /// headings only, one cell at a time.
    fn direct_return<M: Mech>(
        &self,
        mech: &mut M,
        robot: &mut RobotState,
    ) -> Result<(), AutoError> {
        while robot.position != self.home {
            let offset = self.home - robot.position;

            let heading = if offset.x.abs() >= offset.y.abs() {
                if offset.x > 0 {
                    Heading::East
                } else {
                    Heading::West
                }
            } else if offset.y > 0 {
                Heading::North
            } else {
                Heading::South
            };

            robot.heading.turn_to(mech, heading)?;
            mech.move_forward().map_err(AutoError::ActuatorFault)?;
            robot.position += heading.delta();
        }

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
