//! Local environment scanning
//!
//! A scan is a full 8 direction distance sweep, rotating the rover 45 degrees
//! between readings, assembled into a 3x3 snapshot of the rover's immediate
//! neighbourhood. Readings are stored by the *absolute* bearing they were
//! taken on, so a snapshot's layout is independent of the heading the rover
//! happened to be facing when it scanned.
//!
//! Snapshot layout: entry `[row][col]` holds the reading towards cell delta
//! `(dx, dy)` with `row = 1 - dy` and `col = 1 + dx`, i.e. +y is the top row
//! and +x is the right column. The centre is the rover's own cell and always
//! holds the self sentinel, never a sensor reading.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use serde::{Deserialize, Serialize};

use super::{
    heading::{Heading, HeadingCtrl},
    read_distance_checked, AutoError,
};
use crate::mech::Mech;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Sentinel stored at the centre of every snapshot, marking the rover's own
/// cell.
pub const SELF_READING: f64 = 0.0;

/// Reading representing no obstruction within sensor range, used for the
/// home cell's initial all-clear snapshot.
pub const CLEAR_READING: f64 = 400.0;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A 3x3 grid of distance readings centred on one cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    readings: [[f64; 3]; 3],
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ScanSnapshot {
    /// A snapshot with all 8 readings clear of obstruction.
    pub fn all_clear() -> Self {
        let mut readings = [[CLEAR_READING; 3]; 3];
        readings[1][1] = SELF_READING;
        Self { readings }
    }

    /// The reading taken towards the given bearing.
    pub fn reading(&self, bearing: Heading) -> f64 {
        let d = bearing.delta();
        self.readings[(1 - d.y) as usize][(1 + d.x) as usize]
    }

    /// Set the reading towards the given bearing.
    pub fn set_reading(&mut self, bearing: Heading, value: f64) {
        let d = bearing.delta();
        self.readings[(1 - d.y) as usize][(1 + d.x) as usize] = value;
    }

    /// Minimum of the 8 non-centre readings.
    pub fn min_reading(&self) -> f64 {
        super::heading::COMPASS_POINTS
            .iter()
            .map(|&b| self.reading(b))
            .fold(f64::INFINITY, f64::min)
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Perform a full 8 direction scan from the rover's current cell.
///
/// Issues 8 distance readings, rotating +45 degrees between each, starting
/// from the current heading. The net rotation over a complete scan is 360
/// degrees, so the heading is unchanged afterwards. A bad reading or a failed
/// rotation aborts the scan; a snapshot is only ever returned with all 9
/// entries populated.
///
/// The map is not touched here, storing the snapshot is the caller's job.
pub fn scan<M: Mech>(mech: &mut M, heading: &mut HeadingCtrl) -> Result<ScanSnapshot, AutoError> {
    let mut snapshot = ScanSnapshot {
        readings: [[SELF_READING; 3]; 3],
    };

    for _ in 0..8 {
        let bearing = heading.current();
        let dist = read_distance_checked(mech)?;
        snapshot.set_reading(bearing, dist);

        heading.turn_by(mech, 45)?;
    }

    trace!("Scan complete, min reading {:.1}", snapshot.min_reading());

    Ok(snapshot)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
