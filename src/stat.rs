use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

const CSV_HEADER: &str = "algorithm,path_len,path_cost,expanded_nodes,time_us,budget_exhausted";

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub algorithm: &'static str,
    pub path_len: usize,
    pub path_cost: usize,
    pub expanded_nodes: usize,
    pub time_us: usize,
    pub budget_exhausted: bool,
}

impl Stats {
    pub(crate) fn new(algorithm: &'static str) -> Self {
        Stats {
            algorithm,
            ..Default::default()
        }
    }

    pub fn print(&self) {
        info!(
            "{} Cost {:?} Path length {:?} Time(microseconds) {:?} Expanded nodes number: {:?}",
            self.algorithm, self.path_cost, self.path_len, self.time_us, self.expanded_nodes
        );
    }

    /// Appends one row to the CSV at `path`, writing the header if the file is new.
    pub fn append_csv(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let is_new = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if is_new {
            writeln!(file, "{CSV_HEADER}")?;
        }
        writeln!(file, "{}", self.csv_row())
    }

    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.algorithm,
            self.path_len,
            self.path_cost,
            self.expanded_nodes,
            self.time_us,
            self.budget_exhausted
        )
    }
}
