use thiserror::Error;

use crate::common::Cell;

/// Errors raised while building a [`crate::map::GridEnvironment`].
#[derive(Error, Debug)]
pub enum MapError {
    #[error("invalid grid shape: {0}")]
    InvalidGridShape(String),

    #[error("terrain cost at {cell:?} must be in 1..={}, got {cost}", crate::map::MAX_TERRAIN_COST)]
    InvalidTerrainCost { cell: Cell, cost: usize },

    #[error("map file line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised before a search starts. An unreachable goal is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{role} cell {cell:?} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        role: &'static str,
        cell: Cell,
        rows: usize,
        cols: usize,
    },
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("cannot place start and goal on a grid with {0} cell(s)")]
    TooSmall(usize),
}
