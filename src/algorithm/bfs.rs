use super::{search, FifoFrontier, SearchOptions, SearchStrategy};
use crate::common::{Cell, Path};
use crate::error::SearchError;
use crate::map::GridEnvironment;

/// Fewest steps, terrain cost ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirst;

impl SearchStrategy for BreadthFirst {
    type Frontier = FifoFrontier;

    const NAME: &'static str = "bfs";

    // Every move counts as one step, so the recorded "cost" is the hop count
    // and a cell is never enqueued twice.
    fn step_cost(&self, _env: &GridEnvironment, _cell: Cell) -> usize {
        1
    }
}

pub fn bfs(env: &GridEnvironment, start: Cell, goal: Cell) -> Result<Path, SearchError> {
    Ok(search(env, start, goal, &BreadthFirst, &SearchOptions::default())?.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::tests::{init_tracing, reference_env};
    use crate::common::{verify_path, DynamicObstaclePolicy};
    use std::collections::HashSet;

    #[test]
    fn test_bfs_fewest_steps() {
        init_tracing();
        let env = reference_env();
        let path = bfs(&env, (0, 0), (4, 4)).unwrap();
        assert_eq!(path.len(), 9);
        assert!(verify_path(&env, &path, (0, 0), (4, 4), DynamicObstaclePolicy::Ignore));
        // Right first, then down.
        assert_eq!(
            path,
            vec![(0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (1, 4), (2, 4), (3, 4), (4, 4)]
        );
    }

    #[test]
    fn test_bfs_enqueues_each_cell_once() {
        let env = reference_env();
        let outcome = search(&env, (0, 0), (4, 4), &BreadthFirst, &SearchOptions::default()).unwrap();
        // 23 open cells, the goal is the last one dequeued.
        assert_eq!(outcome.stats.expanded_nodes, 23);
    }

    #[test]
    fn test_bfs_walled_goal() {
        let env = GridEnvironment::new(
            vec![vec![1; 5]; 5],
            HashSet::from([(1, 2), (3, 2), (2, 1), (2, 3)]),
            None,
        )
        .unwrap();
        assert!(bfs(&env, (0, 0), (2, 2)).unwrap().is_empty());
    }
}
