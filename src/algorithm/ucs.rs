use super::{search, PriorityFrontier, SearchOptions, SearchStrategy};
use crate::common::{Cell, Path};
use crate::error::SearchError;
use crate::map::GridEnvironment;

/// Dijkstra over terrain costs: entering a cell costs that cell's terrain value.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformCost;

impl SearchStrategy for UniformCost {
    type Frontier = PriorityFrontier;

    const NAME: &'static str = "ucs";

    fn step_cost(&self, env: &GridEnvironment, cell: Cell) -> usize {
        env.cost(cell)
    }
}

pub fn uniform_cost_search(
    env: &GridEnvironment,
    start: Cell,
    goal: Cell,
) -> Result<Path, SearchError> {
    Ok(search(env, start, goal, &UniformCost, &SearchOptions::default())?.path)
}
