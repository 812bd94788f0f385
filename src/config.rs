use crate::{Coord, DEFAULT_COLS, DEFAULT_GOAL, DEFAULT_ROWS, DEFAULT_START};

/// Dimensions and initial endpoints used to build a [PathingGrid](crate::PathingGrid). The default
/// is the 15x20 layout with the start at (7, 3) and the goal at (7, 16).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub start: Coord,
    pub goal: Coord,
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            start: DEFAULT_START,
            goal: DEFAULT_GOAL,
        }
    }
}

impl GridConfig {
    pub fn with_size(mut self, rows: usize, cols: usize) -> GridConfig {
        self.rows = rows;
        self.cols = cols;
        self
    }
    pub fn with_start(mut self, start: Coord) -> GridConfig {
        self.start = start;
        self
    }
    pub fn with_goal(mut self, goal: Coord) -> GridConfig {
        self.goal = goal;
        self
    }
}
