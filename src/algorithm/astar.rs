use super::{heuristic, search, PriorityFrontier, SearchOptions, SearchStrategy};
use crate::common::{Cell, Path};
use crate::error::SearchError;
use crate::map::GridEnvironment;

/// Uniform-cost relaxation ordered by cost plus Manhattan distance to the goal.
///
/// Every step enters a cell costing at least `env.min_cost()`, so Manhattan
/// distance scaled by that minimum never overshoots the remaining cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar;

impl SearchStrategy for AStar {
    type Frontier = PriorityFrontier;

    const NAME: &'static str = "astar";

    fn step_cost(&self, env: &GridEnvironment, cell: Cell) -> usize {
        env.cost(cell)
    }

    fn heuristic(&self, env: &GridEnvironment, cell: Cell, goal: Cell) -> usize {
        heuristic(cell, goal).saturating_mul(env.min_cost())
    }
}

pub fn a_star_search(env: &GridEnvironment, start: Cell, goal: Cell) -> Result<Path, SearchError> {
    Ok(search(env, start, goal, &AStar, &SearchOptions::default())?.path)
}
