//! # CoverageExplorer module
//!
//! The top level coverage state machine. The rover sweeps a `width` by
//! `height` grid in a boustrophedon pattern: `width` cells per row,
//! alternating direction each row, scanning and mapping every cell it
//! visits. The machine has three states:
//!
//! - `Sweeping` - the boustrophedon traversal is in progress
//! - `ReturningHome` - the battery ran low, the rover is heading home
//! - `Done` - terminal, no further commands are issued
//!
//! One call to [`CoverageExplorer::step`] performs one control step. Within a
//! sweeping step the order is fixed: battery flag check, scan and map update,
//! forward clearance check with reactive avoidance, one cell move, battery
//! re-read, row bookkeeping. Everything is sequential, nothing about a step
//! is concurrent.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{info, warn};
use serde::Serialize;

use super::{
    avoid::{self, AvoidanceOutcome},
    heading::Heading,
    map::OccupancyMap,
    nav::{ReturnMode, ReturnToHomeCtrl},
    params::AutoParams,
    read_battery_checked, read_distance_checked, scan, AutoError, RobotState,
};
use crate::mech::Mech;

// ------------------------------------------------------------------------------------------------
// ENUMERATIONS
// ------------------------------------------------------------------------------------------------

/// Terminal status of an exploration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExploreStatus {
    /// The full sweep was completed.
    Completed,

    /// The battery ran low mid-sweep and the rover returned home, in the
    /// given mode.
    ReturnedHomeLowBattery(ReturnMode),

    /// The rover was boxed in during obstacle avoidance, the sweep was
    /// aborted without moving.
    FailedBoxedIn,
}

/// Current state of the explorer state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExplorerState {
    Sweeping,
    ReturningHome,
    Done(ExploreStatus),
}

/// Output of one explorer step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutput {
    /// The run is still in progress, step again.
    Continue,

    /// The run finished with the given terminal status.
    Finished(ExploreStatus),
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Coverage exploration state machine.
///
/// Owns the rover state and the occupancy map for the whole run, there are
/// no ambient globals.
pub struct CoverageExplorer {
    params: AutoParams,

    /// Cells per row.
    width: u32,

    /// Number of rows.
    height: u32,

    /// Row currently being swept, 0-based.
    row: u32,

    /// Cells already scanned in the current row.
    step_in_row: u32,

    state: ExplorerState,

    pub robot: RobotState,

    pub map: OccupancyMap,

    return_ctrl: ReturnToHomeCtrl,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CoverageExplorer {
    /// Build an explorer for a `width` by `height` sweep starting at home,
    /// facing along the first row.
    pub fn new(params: AutoParams, width: u32, height: u32) -> Result<Self, AutoError> {
        if width == 0 || height == 0 {
            return Err(AutoError::InvalidParams(format!(
                "sweep dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        // A full-turn increment would leave every avoidance retry re-reading
        // the same blocked direction.
        if params.avoid_turn_deg.rem_euclid(45) != 0 || params.avoid_turn_deg.rem_euclid(360) == 0 {
            return Err(AutoError::InvalidParams(format!(
                "avoid_turn_deg must be a heading-changing multiple of 45, got {}",
                params.avoid_turn_deg
            )));
        }

        let home = params.home();

        Ok(Self {
            map: OccupancyMap::new(home, params.safe_distance),
            robot: RobotState::new(home, Heading::East),
            return_ctrl: ReturnToHomeCtrl::new(home),
            state: ExplorerState::Sweeping,
            row: 0,
            step_in_row: 0,
            width,
            height,
            params,
        })
    }

    /// The terminal status, `None` while the run is still in progress.
    pub fn status(&self) -> Option<ExploreStatus> {
        match self.state {
            ExplorerState::Done(status) => Some(status),
            _ => None,
        }
    }

    /// Perform one control step.
    ///
    /// Call repeatedly until [`StepOutput::Finished`] is returned. Stepping a
    /// finished explorer is harmless and returns the same status again.
    pub fn step<M: Mech>(&mut self, mech: &mut M) -> Result<StepOutput, AutoError> {
        match self.state {
            ExplorerState::Sweeping => self.step_sweep(mech),
            ExplorerState::ReturningHome => {
                let mode = self
                    .return_ctrl
                    .return_home(mech, &mut self.robot, &self.map)?;

                info!("Rover returned home ({:?})", mode);
                Ok(self.finish(ExploreStatus::ReturnedHomeLowBattery(mode)))
            }
            ExplorerState::Done(status) => Ok(StepOutput::Finished(status)),
        }
    }

    /// One step of the boustrophedon sweep.
    fn step_sweep<M: Mech>(&mut self, mech: &mut M) -> Result<StepOutput, AutoError> {
        // 1. Honour the low-energy flag before anything else: the very next
        //    action must be the return, not another sweep step.
        if self.robot.low_battery {
            info!("Low battery, handing over to return-to-home");
            self.state = ExplorerState::ReturningHome;
            return Ok(StepOutput::Continue);
        }

        // 2. Scan the current cell and store the snapshot
        let snapshot = scan::scan(mech, &mut self.robot.heading)?;
        self.map.update(self.robot.position, snapshot);

        // 3/4. Move on: either one cell along the row, or into the next row,
        // or finish if this was the last cell of the last row.
        if self.step_in_row + 1 < self.width {
            // Forward clearance check, with reactive avoidance if blocked
            let dist = read_distance_checked(mech)?;
            if dist < self.params.safe_distance {
                info!("Obstacle ahead at {:.1} units, avoiding", dist);

                match avoid::clear_path(mech, &mut self.robot.heading, &self.params)? {
                    AvoidanceOutcome::Clear => (),
                    AvoidanceOutcome::BoxedIn => {
                        warn!("Rover is boxed in, aborting sweep");
                        return Ok(self.finish(ExploreStatus::FailedBoxedIn));
                    }
                }
            }

            self.move_one_cell(mech)?;
            self.step_in_row += 1;
        } else if self.row + 1 < self.height {
            self.advance_row(mech)?;
            self.row += 1;
            self.step_in_row = 0;
        } else {
            info!("Sweep complete, {} cell(s) mapped", self.map.len());
            return Ok(self.finish(ExploreStatus::Completed));
        }

        // 5. Re-check the battery once per step
        let battery = read_battery_checked(mech)?;
        if battery < self.params.low_battery_threshold && !self.robot.low_battery {
            warn!(
                "Battery at {:.0}%, below the {:.0}% threshold",
                battery, self.params.low_battery_threshold
            );
        }
        self.robot.low_battery = battery < self.params.low_battery_threshold;

        Ok(StepOutput::Continue)
    }

    /// Issue one forward move and track the position change.
    fn move_one_cell<M: Mech>(&mut self, mech: &mut M) -> Result<(), AutoError> {
        mech.move_forward().map_err(AutoError::ActuatorFault)?;
        self.robot.position += self.robot.heading.current().delta();
        Ok(())
    }

    /// Transition into the next row: turn towards it, move one cell in, then
    /// face the opposite horizontal heading, alternating sweep direction.
    fn advance_row<M: Mech>(&mut self, mech: &mut M) -> Result<(), AutoError> {
        let reversed = self.robot.heading.current().reverse();

        self.robot.heading.turn_to(mech, Heading::North)?;
        self.move_one_cell(mech)?;
        self.robot.heading.turn_to(mech, reversed)?;

        info!(
            "Row {} complete, sweeping row {} towards {:?}",
            self.row,
            self.row + 1,
            reversed
        );

        Ok(())
    }

    fn finish(&mut self, status: ExploreStatus) -> StepOutput {
        self.state = ExplorerState::Done(status);
        StepOutput::Finished(status)
    }

    /// Run the explorer to completion.
    pub fn run<M: Mech>(&mut self, mech: &mut M) -> Result<ExploreStatus, AutoError> {
        loop {
            if let StepOutput::Finished(status) = self.step(mech)? {
                return Ok(status);
            }
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Run a full coverage sweep of a `width` by `height` grid.
///
/// Convenience entry point wrapping [`CoverageExplorer`]; returns the
/// terminal status of the run.
pub fn explore<M: Mech>(
    mech: &mut M,
    params: AutoParams,
    width: u32,
    height: u32,
) -> Result<ExploreStatus, AutoError> {
    CoverageExplorer::new(params, width, height)?.run(mech)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::GridCell;
    use crate::mech::sim::{SimMech, SimParams};
    use crate::mech::MechError;
    use std::collections::VecDeque;

    /// Mech stub with a fixed distance reading and a scripted battery
    /// sequence, one entry per battery read.
    struct ScriptedMech {
        distance: f64,
        battery: VecDeque<f64>,
        last_battery: f64,
    }

    impl ScriptedMech {
        fn new(distance: f64, battery: Vec<f64>) -> Self {
            Self {
                distance,
                battery: battery.into(),
                last_battery: 100.0,
            }
        }
    }

    impl Mech for ScriptedMech {
        fn read_distance(&mut self) -> Result<f64, MechError> {
            Ok(self.distance)
        }

        fn rotate(&mut self, _rel_deg: f64) -> Result<(), MechError> {
            Ok(())
        }

        fn move_forward(&mut self) -> Result<(), MechError> {
            Ok(())
        }

        fn read_battery(&mut self) -> Result<f64, MechError> {
            if let Some(level) = self.battery.pop_front() {
                self.last_battery = level;
            }
            Ok(self.last_battery)
        }
    }

    #[test]
    fn test_boustrophedon_coverage_order() {
        let mut mech = SimMech::new(SimParams::default());
        let mut explorer = CoverageExplorer::new(AutoParams::default(), 3, 2).unwrap();

        // Record the cell at the start of every step, i.e. the cell scanned
        // by that step.
        let mut visited = Vec::new();
        let status = loop {
            visited.push(explorer.robot.position);
            match explorer.step(&mut mech).unwrap() {
                StepOutput::Continue => (),
                StepOutput::Finished(status) => break status,
            }
        };

        assert_eq!(status, ExploreStatus::Completed);
        assert_eq!(
            visited,
            vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(2, 0),
                GridCell::new(2, 1),
                GridCell::new(1, 1),
                GridCell::new(0, 1),
            ]
        );

        // Every visited cell has a snapshot
        assert_eq!(explorer.map.len(), 6);
        for cell in visited {
            assert!(explorer.map.get(&cell).is_some());
        }

        // The sim agrees the rover ended on the last cell of the sweep
        assert_eq!(mech.position(), (0, 1));
    }

    #[test]
    fn test_low_battery_interrupts_sweep() {
        // Battery drops below the threshold on the third read, which happens
        // after the row transition onto (2, 1).
        let mut mech = ScriptedMech::new(400.0, vec![100.0, 100.0, 10.0]);
        let mut explorer = CoverageExplorer::new(AutoParams::default(), 3, 2).unwrap();

        let status = explorer.run(&mut mech).unwrap();

        assert_eq!(
            status,
            ExploreStatus::ReturnedHomeLowBattery(ReturnMode::Planned)
        );
        assert_eq!(explorer.robot.position, GridCell::new(0, 0));

        // (2, 1) was reached but never scanned: the step after the flag was
        // set went straight to the return, not another sweep step.
        assert!(explorer.map.get(&GridCell::new(2, 1)).is_none());
        assert_eq!(explorer.map.len(), 3);
    }

    #[test]
    fn test_boxed_in_aborts_sweep() {
        // Forward always blocked, avoidance can never find a clear direction
        let mut mech = ScriptedMech::new(1.0, vec![]);
        let mut explorer = CoverageExplorer::new(AutoParams::default(), 3, 2).unwrap();

        let status = explorer.run(&mut mech).unwrap();
        assert_eq!(status, ExploreStatus::FailedBoxedIn);

        // The sweep aborted without moving off the first cell
        assert_eq!(explorer.robot.position, GridCell::new(0, 0));
        assert_eq!(explorer.status(), Some(ExploreStatus::FailedBoxedIn));
    }

    #[test]
    fn test_sensor_fault_propagates() {
        let mut mech = ScriptedMech::new(f64::NAN, vec![]);
        let mut explorer = CoverageExplorer::new(AutoParams::default(), 3, 2).unwrap();

        assert!(matches!(
            explorer.step(&mut mech),
            Err(AutoError::SensorFault(_))
        ));
    }

    #[test]
    fn test_single_cell_sweep_completes_immediately() {
        let mut mech = SimMech::new(SimParams::default());
        let status = explore(&mut mech, AutoParams::default(), 1, 1).unwrap();

        assert_eq!(status, ExploreStatus::Completed);
    }

    #[test]
    fn test_battery_fault_propagates() {
        // A level above 100 is not a valid percentage
        let mut mech = ScriptedMech::new(400.0, vec![150.0]);
        let mut explorer = CoverageExplorer::new(AutoParams::default(), 3, 2).unwrap();

        assert!(matches!(
            explorer.step(&mut mech),
            Err(AutoError::SensorFault(MechError::BatteryOutOfRange(_)))
        ));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(matches!(
            CoverageExplorer::new(AutoParams::default(), 0, 2),
            Err(AutoError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_noop_avoid_turn_rejected() {
        // Full-turn increments would retry the same blocked direction
        for &turn in &[0, 360, -720] {
            let params = AutoParams {
                avoid_turn_deg: turn,
                ..Default::default()
            };
            assert!(matches!(
                CoverageExplorer::new(params, 3, 2),
                Err(AutoError::InvalidParams(_))
            ));
        }
    }

    #[test]
    fn test_avoidance_keeps_sweeping() {
        // One obstacle directly ahead of the start cell: the rover should
        // turn away, keep sweeping in the new direction and still finish.
        let mut mech = SimMech::new(SimParams {
            obstacles: vec![(1, 0)],
            ..Default::default()
        });
        let mut explorer = CoverageExplorer::new(AutoParams::default(), 2, 1).unwrap();

        let status = explorer.run(&mut mech).unwrap();
        assert_eq!(status, ExploreStatus::Completed);

        // Avoidance turned 90 degrees to North before the move
        assert_eq!(explorer.robot.position, GridCell::new(0, 1));
    }
}
