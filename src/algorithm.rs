mod astar;
mod bfs;
mod frontier;
mod ucs;

pub use astar::{a_star_search, AStar};
pub use bfs::{bfs, BreadthFirst};
pub use frontier::{FifoFrontier, Frontier, FrontierNode, PriorityFrontier};
pub use ucs::{uniform_cost_search, UniformCost};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, instrument, trace};

use crate::common::{path_cost, Cell, DynamicObstaclePolicy, Path};
use crate::error::SearchError;
use crate::map::GridEnvironment;
use crate::stat::Stats;

/// Cell -> predecessor on the best known path. The start maps to `None`.
pub type Trace = HashMap<Cell, Option<Cell>>;

/// What distinguishes one frontier search from another: how the frontier
/// orders cells, what entering a cell costs, and how far the goal looks.
pub trait SearchStrategy {
    type Frontier: Frontier;

    const NAME: &'static str;

    fn step_cost(&self, env: &GridEnvironment, cell: Cell) -> usize;

    fn heuristic(&self, _env: &GridEnvironment, _cell: Cell, _goal: Cell) -> usize {
        0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub dynamic_obstacles: DynamicObstaclePolicy,
    /// Stop with an empty path once this many cells have been expanded.
    pub max_expansions: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path: Path,
    pub cost: usize,
    pub stats: Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    Bfs,
    Ucs,
    #[value(name = "astar")]
    #[serde(rename = "astar")]
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bfs, Algorithm::Ucs, Algorithm::AStar];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => BreadthFirst::NAME,
            Algorithm::Ucs => UniformCost::NAME,
            Algorithm::AStar => AStar::NAME,
        }
    }

    pub fn run(
        &self,
        env: &GridEnvironment,
        start: Cell,
        goal: Cell,
        options: &SearchOptions,
    ) -> Result<SearchOutcome, SearchError> {
        match self {
            Algorithm::Bfs => search(env, start, goal, &BreadthFirst, options),
            Algorithm::Ucs => search(env, start, goal, &UniformCost, options),
            Algorithm::AStar => search(env, start, goal, &AStar, options),
        }
    }
}

/// Manhattan distance between two cells.
pub(crate) fn heuristic(a: Cell, b: Cell) -> usize {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1)
}

fn check_bounds(env: &GridEnvironment, role: &'static str, cell: Cell) -> Result<(), SearchError> {
    if env.contains(cell) {
        Ok(())
    } else {
        Err(SearchError::OutOfBounds {
            role,
            cell,
            rows: env.rows(),
            cols: env.cols(),
        })
    }
}

/// Shared frontier expansion: pop, stop at the goal, relax every unblocked
/// neighbor. Strategies only decide ordering, step cost and heuristic.
///
/// A blocked start (or goal) yields an empty path rather than an error.
#[instrument(skip_all, name = "search", fields(algorithm = S::NAME, start = ?start, goal = ?goal), level = "debug")]
pub fn search<S: SearchStrategy>(
    env: &GridEnvironment,
    start: Cell,
    goal: Cell,
    strategy: &S,
    options: &SearchOptions,
) -> Result<SearchOutcome, SearchError> {
    check_bounds(env, "start", start)?;
    check_bounds(env, "goal", goal)?;

    let timer = Instant::now();
    let policy = options.dynamic_obstacles;
    let mut stats = Stats::new(S::NAME);

    if env.is_cell_blocked(start, policy.time_at(0)) {
        debug!("start cell is blocked");
        return Ok(finish(env, Path::new(), stats, timer));
    }

    let mut frontier = S::Frontier::default();
    let mut came_from: Trace = HashMap::from([(start, None)]);
    let mut cost_so_far: HashMap<Cell, usize> = HashMap::from([(start, 0)]);
    // Hop count of the best known path, i.e. the time step a cell is entered.
    let mut steps: HashMap<Cell, usize> = HashMap::from([(start, 0)]);

    frontier.push(start, strategy.heuristic(env, start, goal), 0);

    let mut reached = false;
    loop {
        if options
            .max_expansions
            .is_some_and(|limit| stats.expanded_nodes >= limit)
        {
            debug!("expansion budget of {} exhausted", stats.expanded_nodes);
            stats.budget_exhausted = true;
            break;
        }

        let Some(current) = frontier.pop() else {
            break;
        };

        // Stale entry, a cheaper path was pushed after this one.
        if current.g_cost > cost_so_far[&current.position] {
            continue;
        }

        trace!("expand node: {current:?}");
        stats.expanded_nodes += 1;

        if current.position == goal {
            reached = true;
            break;
        }

        let next_steps = steps[&current.position] + 1;
        let time = policy.time_at(next_steps);

        for neighbor in env.neighbors(current.position) {
            if env.is_cell_blocked(neighbor, time) {
                continue;
            }

            let tentative_g_cost = current
                .g_cost
                .saturating_add(strategy.step_cost(env, neighbor));
            if cost_so_far
                .get(&neighbor)
                .map_or(true, |&best| tentative_g_cost < best)
            {
                cost_so_far.insert(neighbor, tentative_g_cost);
                steps.insert(neighbor, next_steps);
                came_from.insert(neighbor, Some(current.position));
                frontier.push(
                    neighbor,
                    tentative_g_cost.saturating_add(strategy.heuristic(env, neighbor, goal)),
                    tentative_g_cost,
                );
            }
        }
        trace!("open list size {}", frontier.len());
    }

    let path = if reached {
        construct_path(&came_from, start, goal)
    } else {
        debug!("cannot find solution");
        Path::new()
    };

    Ok(finish(env, path, stats, timer))
}

fn finish(env: &GridEnvironment, path: Path, mut stats: Stats, timer: Instant) -> SearchOutcome {
    let cost = path_cost(env, &path);
    stats.path_len = path.len();
    stats.path_cost = cost;
    stats.time_us = timer.elapsed().as_micros() as usize;
    debug!("path {path:?} cost {cost}");
    SearchOutcome { path, cost, stats }
}

/// Walks predecessor links back from `goal`. Empty when `goal` was never reached.
pub fn construct_path(came_from: &Trace, start: Cell, goal: Cell) -> Path {
    if !came_from.contains_key(&goal) {
        return Path::new();
    }

    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match came_from.get(&current).copied().flatten() {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            // Only the start has no predecessor.
            None => return Path::new(),
        }
    }
    path.reverse();
    path
}
