pub mod algorithm;
pub mod common;
pub mod config;
pub mod error;
pub mod map;
pub mod scenario;
pub mod stat;

pub use algorithm::{a_star_search, bfs, uniform_cost_search, Algorithm, SearchOptions, SearchOutcome};
pub use common::{Cell, DynamicObstaclePolicy, Path};
pub use error::{MapError, ScenarioError, SearchError};
pub use map::GridEnvironment;
