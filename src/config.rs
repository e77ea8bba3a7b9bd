use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;

use crate::algorithm::{Algorithm, SearchOptions};
use crate::common::{Cell, DynamicObstaclePolicy};
use crate::map::MAX_TERRAIN_COST;

#[derive(Parser, Debug, Default)]
#[command(
    name = "terrain_path",
    about = "Grid pathfinding over weighted terrain with BFS, uniform-cost search and A*.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to a YAML scenario (grid, obstacles, start, goal)")]
    pub scenario_path: Option<String>,

    #[arg(long, help = "Path to a text cost map; needs --start and --goal")]
    pub map_path: Option<String>,

    #[arg(long, help = "Start cell as row,col", value_parser = parse_cell)]
    pub start: Option<Cell>,

    #[arg(long, help = "Goal cell as row,col", value_parser = parse_cell)]
    pub goal: Option<Cell>,

    #[arg(long, help = "Algorithms to run", value_enum, value_delimiter = ',')]
    pub algorithms: Vec<Algorithm>,

    #[arg(long, help = "How dynamic obstacles are applied during search", value_enum)]
    pub dynamic_obstacles: Option<DynamicObstaclePolicy>,

    #[arg(long, help = "Give up after expanding this many cells")]
    pub max_expansions: Option<usize>,

    #[arg(long, help = "Append per-search statistics to this CSV file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Print results as JSON", default_value_t = false)]
    pub json: bool,

    #[arg(long, help = "Rows of a randomly generated scenario")]
    pub random_rows: Option<usize>,

    #[arg(long, help = "Columns of a randomly generated scenario")]
    pub random_cols: Option<usize>,

    #[arg(long, help = "Share of random cells that are static obstacles")]
    pub obstacle_ratio: Option<f64>,

    #[arg(long, help = "Highest terrain cost in a random scenario")]
    pub max_terrain_cost: Option<usize>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,
}

fn parse_cell(value: &str) -> Result<Cell, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected row,col, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|err| format!("bad coordinate `{part}`: {err}"))
    };
    Ok((parse(row)?, parse(col)?))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub scenario_path: Option<String>,
    pub map_path: Option<String>,
    pub start: Option<Cell>,
    pub goal: Option<Cell>,
    pub algorithms: Vec<Algorithm>,
    pub dynamic_obstacles: DynamicObstaclePolicy,
    pub max_expansions: Option<usize>,
    pub output_path: Option<String>,
    pub json: bool,
    pub random_size: Option<(usize, usize)>,
    pub obstacle_ratio: f64,
    pub max_terrain_cost: usize,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scenario_path: None,
            map_path: None,
            start: None,
            goal: None,
            algorithms: Algorithm::ALL.to_vec(),
            dynamic_obstacles: DynamicObstaclePolicy::Ignore,
            max_expansions: None,
            output_path: None,
            json: false,
            random_size: None,
            obstacle_ratio: 0.2,
            max_terrain_cost: 5,
            seed: 0,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Command line flags win over the config file.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if cli.scenario_path.is_some() {
            self.scenario_path = cli.scenario_path.clone();
        }
        if cli.map_path.is_some() {
            self.map_path = cli.map_path.clone();
        }
        self.start = cli.start.or(self.start);
        self.goal = cli.goal.or(self.goal);
        if !cli.algorithms.is_empty() {
            self.algorithms = cli.algorithms.clone();
        }
        if let Some(policy) = cli.dynamic_obstacles {
            self.dynamic_obstacles = policy;
        }
        self.max_expansions = cli.max_expansions.or(self.max_expansions);
        if cli.output_path.is_some() {
            self.output_path = cli.output_path.clone();
        }
        self.json |= cli.json;
        match (cli.random_rows, cli.random_cols) {
            (Some(rows), Some(cols)) => self.random_size = Some((rows, cols)),
            (None, None) => {}
            _ => return Err(anyhow!("--random-rows and --random-cols must be given together")),
        }
        if let Some(ratio) = cli.obstacle_ratio {
            self.obstacle_ratio = ratio;
        }
        if let Some(max_cost) = cli.max_terrain_cost {
            self.max_terrain_cost = max_cost;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.algorithms.is_empty() {
            return Err(anyhow!("At least one algorithm must be selected"));
        }

        if !(0.0..1.0).contains(&self.obstacle_ratio) {
            return Err(anyhow!(
                "Obstacle ratio must be in [0, 1), got {}",
                self.obstacle_ratio
            ));
        }

        if !(1..=MAX_TERRAIN_COST).contains(&self.max_terrain_cost) {
            return Err(anyhow!(
                "Max terrain cost must be in [1, {MAX_TERRAIN_COST}], got {}",
                self.max_terrain_cost
            ));
        }

        let sources = [
            self.scenario_path.is_some(),
            self.map_path.is_some(),
            self.random_size.is_some(),
        ];
        if sources.iter().filter(|&&given| given).count() > 1 {
            return Err(anyhow!(
                "Choose only one of scenario path, map path and random size"
            ));
        }

        if self.map_path.is_some() && (self.start.is_none() || self.goal.is_none()) {
            return Err(anyhow!("A map file needs both a start and a goal"));
        }

        Ok(())
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            dynamic_obstacles: self.dynamic_obstacles,
            max_expansions: self.max_expansions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("3,4"), Ok((3, 4)));
        assert_eq!(parse_cell(" 0 , 12"), Ok((0, 12)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("a,1").is_err());
    }

    #[test]
    fn test_yaml_config() {
        let config = Config::from_yaml_str(
            "map_path: map_file/test/test.map\nstart: [0, 0]\ngoal: [4, 4]\nalgorithms: [ucs, astar]\ndynamic_obstacles: arrival-time\n",
        )
        .unwrap();
        assert_eq!(config.algorithms, vec![Algorithm::Ucs, Algorithm::AStar]);
        assert_eq!(config.dynamic_obstacles, DynamicObstaclePolicy::ArrivalTime);
        assert_eq!(config.start, Some((0, 0)));
        assert_eq!(config.seed, 0);
        config.validate().unwrap();

        assert!(Config::from_yaml_str("unknown_key: 1\n").is_err());
    }

    #[test]
    fn test_command_line_overrides() {
        let cli = Cli::parse_from([
            "terrain_path",
            "--algorithms",
            "bfs,astar",
            "--start",
            "1,2",
            "--max-expansions",
            "50",
            "--random-rows",
            "4",
            "--random-cols",
            "6",
            "--seed",
            "9",
        ]);
        let config = Config::default().override_from_command_line(&cli).unwrap();
        assert_eq!(config.algorithms, vec![Algorithm::Bfs, Algorithm::AStar]);
        assert_eq!(config.start, Some((1, 2)));
        assert_eq!(config.random_size, Some((4, 6)));
        assert_eq!(config.seed, 9);
        assert_eq!(config.search_options().max_expansions, Some(50));
        assert_eq!(config.search_options().dynamic_obstacles, DynamicObstaclePolicy::Ignore);
    }

    #[test]
    fn test_validate() {
        let config = Config {
            obstacle_ratio: 1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            map_path: Some("map_file/test/test.map".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_terrain_cost: usize::MAX,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            scenario_path: Some("a.yaml".to_string()),
            random_size: Some((3, 3)),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let cli = Cli::parse_from(["terrain_path", "--random-rows", "4"]);
        assert!(Config::default().override_from_command_line(&cli).is_err());

        Config::default().validate().unwrap();
    }
}
