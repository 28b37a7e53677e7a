//! Occupancy map
//!
//! The single source of spatial knowledge: a growing mapping from each
//! visited cell to the most recent 3x3 scan snapshot taken there. A cell that
//! is absent is *unexplored*, not blocked, and unexplored cells are never
//! traversable, which keeps planned paths confined to ground the rover has
//! already scanned safely.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::HashMap;

use serde::Serialize;

use super::{scan::ScanSnapshot, GridCell};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Mapping from visited grid cell to its most recent scan snapshot.
///
/// Entries are only ever added or overwritten, never removed. The home cell
/// is present from construction with an all-clear snapshot so that return
/// paths always have a reachable goal.
#[derive(Debug, Clone)]
pub struct OccupancyMap {
    cells: HashMap<GridCell, ScanSnapshot>,

    /// Reading below which a snapshot entry counts as an immediate
    /// obstruction.
    safe_distance: f64,
}

/// Serialisable dump of an [`OccupancyMap`], used for session artefacts.
#[derive(Debug, Clone, Serialize)]
pub struct OccupancyMapDump {
    pub safe_distance: f64,
    pub cells: Vec<(GridCell, ScanSnapshot)>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl OccupancyMap {
    /// New map containing only the home cell, marked all-clear.
    pub fn new(home: GridCell, safe_distance: f64) -> Self {
        let mut cells = HashMap::new();
        cells.insert(home, ScanSnapshot::all_clear());

        Self {
            cells,
            safe_distance,
        }
    }

    /// Store or overwrite the snapshot for the given cell.
    pub fn update(&mut self, cell: GridCell, snapshot: ScanSnapshot) {
        self.cells.insert(cell, snapshot);
    }

    /// The stored snapshot for the given cell, `None` if unexplored.
    pub fn get(&self, cell: &GridCell) -> Option<&ScanSnapshot> {
        self.cells.get(cell)
    }

    /// Number of explored cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Traversability oracle for the path planner.
    ///
    /// A cell is traversable iff it has been explored and its snapshot shows
    /// no reading below the safe distance, i.e. no immediate obstruction
    /// around that cell.
    pub fn is_traversable(&self, cell: &GridCell) -> bool {
        match self.cells.get(cell) {
            Some(snapshot) => snapshot.min_reading() >= self.safe_distance,
            None => false,
        }
    }

    /// Dump the map in a deterministic, serialisable form.
    pub fn dump(&self) -> OccupancyMapDump {
        let mut cells: Vec<(GridCell, ScanSnapshot)> =
            self.cells.iter().map(|(c, s)| (*c, *s)).collect();
        cells.sort_by_key(|(c, _)| (c.x, c.y));

        OccupancyMapDump {
            safe_distance: self.safe_distance,
            cells,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::heading::Heading;

    #[test]
    fn test_home_present_and_traversable_from_init() {
        let home = GridCell::new(0, 0);
        let map = OccupancyMap::new(home, 10.0);

        assert_eq!(map.len(), 1);
        assert!(map.get(&home).is_some());
        assert!(map.is_traversable(&home));
    }

    #[test]
    fn test_map_monotonicity() {
        let home = GridCell::new(0, 0);
        let mut map = OccupancyMap::new(home, 10.0);

        let cells = [
            GridCell::new(1, 0),
            GridCell::new(2, 0),
            GridCell::new(2, 1),
        ];
        for &c in cells.iter() {
            map.update(c, ScanSnapshot::all_clear());
        }

        // Overwriting a cell never loses any other cell
        let mut blocked = ScanSnapshot::all_clear();
        blocked.set_reading(Heading::East, 2.0);
        map.update(cells[0], blocked);

        assert_eq!(map.len(), 4);
        for &c in cells.iter() {
            assert!(map.get(&c).is_some());
        }
        assert_eq!(map.get(&cells[0]), Some(&blocked));
    }

    #[test]
    fn test_traversability() {
        let home = GridCell::new(0, 0);
        let mut map = OccupancyMap::new(home, 10.0);

        // Unexplored is never traversable
        assert!(!map.is_traversable(&GridCell::new(5, 5)));

        // Clear cell is traversable
        let clear = GridCell::new(1, 0);
        map.update(clear, ScanSnapshot::all_clear());
        assert!(map.is_traversable(&clear));

        // A single reading below the safe distance blocks the cell
        let mut snapshot = ScanSnapshot::all_clear();
        snapshot.set_reading(Heading::North, 5.0);
        let blocked = GridCell::new(2, 0);
        map.update(blocked, snapshot);
        assert!(!map.is_traversable(&blocked));

        // A reading exactly at the safe distance is still traversable
        let mut snapshot = ScanSnapshot::all_clear();
        snapshot.set_reading(Heading::North, 10.0);
        map.update(blocked, snapshot);
        assert!(map.is_traversable(&blocked));
    }

    #[test]
    fn test_dump_is_sorted() {
        let mut map = OccupancyMap::new(GridCell::new(0, 0), 10.0);
        map.update(GridCell::new(3, 1), ScanSnapshot::all_clear());
        map.update(GridCell::new(-1, 2), ScanSnapshot::all_clear());

        let dump = map.dump();
        let cells: Vec<GridCell> = dump.cells.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            cells,
            vec![
                GridCell::new(-1, 2),
                GridCell::new(0, 0),
                GridCell::new(3, 1)
            ]
        );
    }
}
