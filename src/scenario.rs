use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::info;

use crate::common::Cell;
use crate::error::ScenarioError;
use crate::map::{DynamicSchedule, GridEnvironment};

/// A grid, its obstacles and one start/goal query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub grid: Vec<Vec<usize>>,
    #[serde(default)]
    pub static_obstacles: HashSet<Cell>,
    #[serde(default)]
    pub dynamic_obstacles: DynamicSchedule,
    pub start: Cell,
    pub goal: Cell,
}

impl Scenario {
    /// The 5x5 demonstration terrain.
    pub fn sample() -> Self {
        Scenario {
            grid: vec![
                vec![1, 1, 2, 1, 3],
                vec![1, 3, 2, 1, 1],
                vec![1, 1, 1, 4, 1],
                vec![4, 1, 1, 1, 1],
                vec![1, 1, 2, 1, 1],
            ],
            static_obstacles: HashSet::from([(1, 1), (3, 0)]),
            dynamic_obstacles: HashMap::from([
                (3, HashSet::from([(2, 3)])),
                (4, HashSet::from([(3, 3), (4, 2)])),
            ]),
            start: (0, 0),
            goal: (4, 4),
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, ScenarioError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn write_to_yaml(&self, path: &str) -> Result<(), ScenarioError> {
        let file = File::create(path)?;
        let mut writer = io::BufWriter::new(file);
        let yaml_data = serde_yaml::to_string(self)?;
        writer.write_all(yaml_data.as_bytes())?;
        Ok(())
    }

    /// Random terrain with costs in `1..=max_cost` and roughly
    /// `obstacle_ratio` of the cells blocked. Start and goal are drawn from
    /// distinct cells and are never blocked.
    pub fn random<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        obstacle_ratio: f64,
        max_cost: usize,
        rng: &mut R,
    ) -> Result<Self, ScenarioError> {
        let mut cells: Vec<Cell> = (0..rows)
            .flat_map(|x| (0..cols).map(move |y| (x, y)))
            .collect();
        if cells.len() < 2 {
            return Err(ScenarioError::TooSmall(cells.len()));
        }

        let grid = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| rng.gen_range(1..=max_cost.max(1)))
                    .collect::<Vec<usize>>()
            })
            .collect();

        cells.shuffle(rng);
        let (start, goal) = (cells[0], cells[1]);
        let static_obstacles = cells[2..]
            .iter()
            .copied()
            .filter(|_| rng.gen_bool(obstacle_ratio.clamp(0.0, 1.0)))
            .collect();

        let scenario = Scenario {
            grid,
            static_obstacles,
            dynamic_obstacles: HashMap::new(),
            start,
            goal,
        };
        info!(
            "Generate scen: {rows}x{cols}, {} obstacles, start {start:?} goal {goal:?}",
            scenario.static_obstacles.len()
        );
        Ok(scenario)
    }

    pub fn environment(&self) -> Result<GridEnvironment, ScenarioError> {
        Ok(GridEnvironment::new(
            self.grid.clone(),
            self.static_obstacles.clone(),
            Some(self.dynamic_obstacles.clone()),
        )?)
    }
}
