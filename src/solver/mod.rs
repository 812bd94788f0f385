use crate::{pathing_grid::PathingGrid, Coord};

pub mod astar;
pub mod cancel;

use astar::AstarSearch;

/// Observable progress of a search, in the order it happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchEvent {
    /// A cell entered the open set for the first time. Never emitted for the start or the goal.
    Frontier(Coord),
    /// A cell was expanded and is now final. Never emitted for the start.
    Visited(Coord),
    /// A cell of the shortest path; `index` is its position counted from the start.
    PathStep { coord: Coord, index: usize },
}

impl SearchEvent {
    pub fn coord(&self) -> Coord {
        match *self {
            SearchEvent::Frontier(coord)
            | SearchEvent::Visited(coord)
            | SearchEvent::PathStep { coord, .. } => coord,
        }
    }
}

/// How a search ended. None of these are errors.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchResult {
    /// `path` runs from start to goal and `total_steps == path.len() - 1`.
    Found { path: Vec<Coord>, total_steps: usize },
    /// Every cell reachable from the start was expanded without meeting the goal.
    Unreachable,
    /// The search was stopped through its [CancelToken](cancel::CancelToken).
    Cancelled,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found { .. })
    }

    pub fn path(&self) -> Option<&[Coord]> {
        match self {
            SearchResult::Found { path, .. } => Some(path),
            _ => None,
        }
    }

    pub fn total_steps(&self) -> Option<usize> {
        match self {
            SearchResult::Found { total_steps, .. } => Some(*total_steps),
            _ => None,
        }
    }
}

/// One unit of progress returned by [AstarSearch::step].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchStep {
    Event(SearchEvent),
    Done(SearchResult),
}

/// Runs a search between the grid's start and goal to completion, discarding the events.
pub fn find_path(grid: &PathingGrid) -> SearchResult {
    AstarSearch::new(grid).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_accessors() {
        let found = SearchResult::Found {
            path: vec![Coord::new(0, 0), Coord::new(0, 1)],
            total_steps: 1,
        };
        assert!(found.is_found());
        assert_eq!(found.total_steps(), Some(1));
        assert_eq!(found.path().map(|p| p.len()), Some(2));
        assert_eq!(SearchResult::Cancelled.path(), None);
        assert!(!SearchResult::Unreachable.is_found());
    }

    #[test]
    fn find_path_on_open_grid() {
        let grid = PathingGrid::new(4, 6, Coord::new(0, 0), Coord::new(3, 5)).unwrap();
        assert_eq!(find_path(&grid).total_steps(), Some(8));
    }
}
