use thiserror::Error;

use crate::Coord;

/// Invalid grid layouts or coordinates. These are rejected when a grid is built or edited, so a
/// running search never has to deal with them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("cell {coord} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        coord: Coord,
        rows: usize,
        cols: usize,
    },
    #[error("start and goal must be different cells, both are {0}")]
    CoincidentEndpoints(Coord),
}
