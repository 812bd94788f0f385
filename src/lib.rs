//! # stepwise_astar
//!
//! A grid-based pathfinding system built around an
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) search that can be driven one event at a
//! time. The grid is 4-connected with unit step cost and the heuristic is the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), which is consistent on such
//! a grid and therefore yields shortest paths.
//!
//! Instead of only returning a final answer, [AstarSearch](solver::astar::AstarSearch) exposes the
//! exploration as a sequence of [SearchEvent]s (cells entering the open set, cells being expanded
//! and finally the cells of the path) which a caller can replay onto a [PathingGrid] for display
//! using [PathingGrid::apply_event]. The search can be cancelled cooperatively between two events.
//!
//! ```
//! use stepwise_astar::{Coord, PathingGrid, SearchResult, solver::find_path};
//!
//! let mut grid = PathingGrid::new(3, 3, Coord::new(1, 0), Coord::new(1, 2)).unwrap();
//! grid.toggle_obstacle(Coord::new(1, 1)).unwrap();
//! match find_path(&grid) {
//!     SearchResult::Found { total_steps, .. } => assert_eq!(total_steps, 4),
//!     other => panic!("unexpected result {:?}", other),
//! }
//! ```
mod astar_stepper;
pub mod config;
pub mod error;
pub mod pathing_grid;
pub mod solver;

#[cfg(test)]
mod fuzz_test;

use core::fmt;
use itertools::Itertools;

pub use config::GridConfig;
pub use error::ConfigurationError;
pub use pathing_grid::{Overlay, PathingGrid, Role};
pub use solver::astar::{AstarSearch, CellCosts};
pub use solver::cancel::CancelToken;
pub use solver::{SearchEvent, SearchResult, SearchStep};

/// Number of rows of the reference layout.
pub const DEFAULT_ROWS: usize = 15;
/// Number of columns of the reference layout.
pub const DEFAULT_COLS: usize = 20;
/// Start cell of the reference layout.
pub const DEFAULT_START: Coord = Coord::new(7, 3);
/// Goal cell of the reference layout.
pub const DEFAULT_GOAL: Coord = Coord::new(7, 16);

/// Inline capacity for neighbour lists; a 4-neighbourhood never spills to the heap.
pub const N_SMALLVEC_SIZE: usize = 4;

/// A cell position on the grid. The derived ordering (row first, then column) is the final
/// tie-break of the search's open set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Coord {
        Coord { row, col }
    }

    /// Number of orthogonal steps between two cells when nothing is in the way.
    pub fn manhattan_distance(&self, other: &Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// Whether `other` is one orthogonal step away.
    pub fn is_adjacent(&self, other: &Coord) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Coord {
        Coord::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Checks that `path` leads from `start` to `goal` over free cells of `grid` in single orthogonal
/// steps.
pub fn is_valid_path(grid: &PathingGrid, path: &[Coord], start: Coord, goal: Coord) -> bool {
    match (path.first(), path.last()) {
        (Some(first), Some(last)) if *first == start && *last == goal => {
            path.iter()
                .all(|c| grid.in_bounds(*c) && !grid.is_obstacle(*c))
                && path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
        }
        _ => false,
    }
}
