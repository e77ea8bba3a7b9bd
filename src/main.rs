use terrain_path::common::verify_path;
use terrain_path::config::{Cli, Config};
use terrain_path::map::GridEnvironment;
use terrain_path::scenario::Scenario;
use terrain_path::stat::Stats;
use terrain_path::Cell;

use anyhow::{anyhow, Context};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Report<'a> {
    start: Cell,
    goal: Cell,
    path: &'a [Cell],
    stats: &'a Stats,
}

fn load_environment(config: &Config) -> anyhow::Result<(GridEnvironment, Cell, Cell)> {
    let scenario = if let Some(path) = config.scenario_path.as_ref() {
        Scenario::load_from_file(path).with_context(|| format!("error with scenario file: {path}"))?
    } else if let Some(path) = config.map_path.as_ref() {
        let env = GridEnvironment::from_file(path)
            .with_context(|| format!("error with map file: {path}"))?;
        let (Some(start), Some(goal)) = (config.start, config.goal) else {
            return Err(anyhow!("A map file needs both a start and a goal"));
        };
        return Ok((env, start, goal));
    } else if let Some((rows, cols)) = config.random_size {
        let mut rng = StdRng::seed_from_u64(config.seed);
        Scenario::random(rows, cols, config.obstacle_ratio, config.max_terrain_cost, &mut rng)?
    } else {
        info!("No scenario specified, using the built-in sample");
        Scenario::sample()
    };

    let env = scenario.environment()?;
    Ok((
        env,
        config.start.unwrap_or(scenario.start),
        config.goal.unwrap_or(scenario.goal),
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let (env, start, goal) = load_environment(&config)?;
    let options = config.search_options();
    info!("Search from {start:?} to {goal:?} on a {}x{} grid", env.rows(), env.cols());

    for algorithm in &config.algorithms {
        let outcome = algorithm.run(&env, start, goal, &options)?;
        if !verify_path(&env, &outcome.path, start, goal, options.dynamic_obstacles) {
            return Err(anyhow!("{} returned an invalid path: {:?}", algorithm.name(), outcome.path));
        }

        if config.json {
            let report = Report {
                start,
                goal,
                path: &outcome.path,
                stats: &outcome.stats,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else if outcome.path.is_empty() {
            warn!("{} found no path", algorithm.name());
        } else {
            info!("{} path: {:?}", algorithm.name(), outcome.path);
        }
        outcome.stats.print();

        if let Some(output_path) = config.output_path.as_ref() {
            outcome
                .stats
                .append_csv(output_path)
                .with_context(|| format!("error writing stats to {output_path}"))?;
        }
    }

    Ok(())
}
