use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::map::GridEnvironment;

/// Grid coordinate as (row, column).
pub type Cell = (usize, usize);

/// Ordered cells from start to goal. Empty when no path exists.
pub type Path = Vec<Cell>;

/// How the search consults the dynamic obstacle schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DynamicObstaclePolicy {
    /// Never pass a time step to the blocking check; only static obstacles apply.
    #[default]
    Ignore,
    /// A cell is checked at the step on which the path would enter it.
    ArrivalTime,
}

impl DynamicObstaclePolicy {
    pub(crate) fn time_at(&self, steps: usize) -> Option<usize> {
        match self {
            DynamicObstaclePolicy::Ignore => None,
            DynamicObstaclePolicy::ArrivalTime => Some(steps),
        }
    }
}

pub fn is_adjacent(a: Cell, b: Cell) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

/// Sum of terrain costs of every cell entered after the start.
pub fn path_cost(env: &GridEnvironment, path: &[Cell]) -> usize {
    path.iter()
        .skip(1)
        .fold(0, |total: usize, &cell| total.saturating_add(env.cost(cell)))
}

/// Checks that `path` walks from `start` to `goal` through adjacent, in-bounds,
/// unblocked cells. An empty path is always accepted.
pub fn verify_path(
    env: &GridEnvironment,
    path: &[Cell],
    start: Cell,
    goal: Cell,
    policy: DynamicObstaclePolicy,
) -> bool {
    let (Some(&first), Some(&last)) = (path.first(), path.last()) else {
        return true;
    };
    if first != start || last != goal {
        return false;
    }

    for (step, &cell) in path.iter().enumerate() {
        if !env.contains(cell) || env.is_cell_blocked(cell, policy.time_at(step)) {
            return false;
        }
    }

    path.windows(2).all(|pair| is_adjacent(pair[0], pair[1]))
}
