//! Plans shortest cell paths through an [`OccupancyMap`], using breadth-first
//! search.
//!
//! The search graph is the 8-connected neighbourhood restricted to cells the
//! map considers traversable. Edge weights are uniform, so BFS gives the
//! shortest path in move count; the neighbour expansion order is a fixed
//! table, so ties between equal-length paths resolve deterministically.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::{HashMap, HashSet, VecDeque};

use nalgebra::Vector2;

use crate::auto::{map::OccupancyMap, GridCell};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Neighbour expansion order: the four cardinals first, then the diagonals.
pub const NEIGHBOUR_OFFSETS: [[i32; 2]; 8] = [
    [1, 0],
    [-1, 0],
    [0, 1],
    [0, -1],
    [1, 1],
    [1, -1],
    [-1, 1],
    [-1, -1],
];

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Find the shortest path from `start` to `goal` through traversable cells.
///
/// The returned sequence includes both endpoints. Returns `None` if the goal
/// cannot be reached through explored-and-safe cells; the start cell itself
/// is not required to be traversable, since the rover is already there.
pub fn find_path(map: &OccupancyMap, start: GridCell, goal: GridCell) -> Option<Vec<GridCell>> {
    if start == goal {
        return Some(vec![start]);
    }

    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();
    let mut parent: HashMap<GridCell, GridCell> = HashMap::new();

    queue.push_back(start);
    visited.insert(start);

    while let Some(cell) = queue.pop_front() {
        for offset in NEIGHBOUR_OFFSETS.iter() {
            let next = cell + Vector2::new(offset[0], offset[1]);

            if visited.contains(&next) || !map.is_traversable(&next) {
                continue;
            }

            visited.insert(next);
            parent.insert(next, cell);

            if next == goal {
                return Some(backtrack(&parent, start, goal));
            }

            queue.push_back(next);
        }
    }

    None
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Rebuild the start-to-goal sequence from the parent links.
fn backtrack(
    parent: &HashMap<GridCell, GridCell>,
    start: GridCell,
    goal: GridCell,
) -> Vec<GridCell> {
    let mut path = vec![goal];
    let mut cell = goal;

    while cell != start {
        // Every cell on the path was given a parent when it was visited
        cell = parent[&cell];
        path.push(cell);
    }

    path.reverse();
    path
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::auto::heading::Heading;
    use crate::auto::scan::ScanSnapshot;

    fn map_with_clear_cells(cells: &[(i32, i32)]) -> OccupancyMap {
        let mut map = OccupancyMap::new(GridCell::new(0, 0), 10.0);
        for &(x, y) in cells {
            map.update(GridCell::new(x, y), ScanSnapshot::all_clear());
        }
        map
    }

    #[test]
    fn test_bfs_shortest_path_corridor() {
        let map = map_with_clear_cells(&[(1, 0), (2, 0)]);

        let path = find_path(&map, GridCell::new(0, 0), GridCell::new(2, 0)).unwrap();
        assert_eq!(
            path,
            vec![
                GridCell::new(0, 0),
                GridCell::new(1, 0),
                GridCell::new(2, 0)
            ]
        );
    }

    #[test]
    fn test_diagonal_steps_shorten_paths() {
        let map = map_with_clear_cells(&[(1, 0), (1, 1), (0, 1)]);

        // The diagonal is one move, not two
        let path = find_path(&map, GridCell::new(0, 0), GridCell::new(1, 1)).unwrap();
        assert_eq!(path, vec![GridCell::new(0, 0), GridCell::new(1, 1)]);
    }

    #[test]
    fn test_no_path_through_unexplored() {
        let map = map_with_clear_cells(&[(1, 0)]);

        assert_eq!(
            find_path(&map, GridCell::new(1, 0), GridCell::new(5, 5)),
            None
        );
    }

    #[test]
    fn test_no_path_through_blocked() {
        let mut map = map_with_clear_cells(&[]);

        // A corridor with an obstructed middle cell
        let mut blocked = ScanSnapshot::all_clear();
        blocked.set_reading(Heading::East, 2.0);
        map.update(GridCell::new(1, 0), blocked);
        map.update(GridCell::new(2, 0), ScanSnapshot::all_clear());

        assert_eq!(
            find_path(&map, GridCell::new(0, 0), GridCell::new(2, 0)),
            None
        );
    }

    #[test]
    fn test_start_equals_goal() {
        let map = map_with_clear_cells(&[]);
        let home = GridCell::new(0, 0);

        assert_eq!(find_path(&map, home, home), Some(vec![home]));
    }

    #[test]
    fn test_untraversable_start_still_plans_out() {
        // The rover may be standing next to an obstacle, its own cell then
        // fails the traversability check but it must still be able to leave.
        let mut map = map_with_clear_cells(&[(1, 0)]);
        let start = GridCell::new(2, 0);
        let mut snapshot = ScanSnapshot::all_clear();
        snapshot.set_reading(Heading::East, 1.0);
        map.update(start, snapshot);

        let path = find_path(&map, start, GridCell::new(0, 0)).unwrap();
        assert_eq!(
            path,
            vec![start, GridCell::new(1, 0), GridCell::new(0, 0)]
        );
    }
}
