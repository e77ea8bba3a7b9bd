use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};

use tracing::{debug, warn};

use crate::common::Cell;
use crate::error::MapError;

/// Time step -> cells blocked only during that step.
pub type DynamicSchedule = HashMap<usize, HashSet<Cell>>;

/// Largest accepted terrain cost. Path costs are sums of at most `rows * cols`
/// of these, which keeps them well inside `usize` on 64-bit targets.
pub const MAX_TERRAIN_COST: usize = u32::MAX as usize;

#[derive(Debug, Clone)]
pub struct GridEnvironment {
    rows: usize,
    cols: usize,
    grid: Vec<Vec<usize>>,
    static_obstacles: HashSet<Cell>,
    dynamic_obstacles: DynamicSchedule,
    min_cost: usize,
}

impl GridEnvironment {
    /// Builds the environment, validating the grid once so searches never have to.
    pub fn new(
        grid: Vec<Vec<usize>>,
        static_obstacles: HashSet<Cell>,
        dynamic_obstacles: Option<DynamicSchedule>,
    ) -> Result<Self, MapError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if rows == 0 || cols == 0 {
            return Err(MapError::InvalidGridShape(format!(
                "grid must have at least one row and one column, got {rows}x{cols}"
            )));
        }
        if let Some((row, cells)) = grid.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(MapError::InvalidGridShape(format!(
                "row {row} has {} columns, expected {cols}",
                cells.len()
            )));
        }

        let mut min_cost = usize::MAX;
        for (x, row) in grid.iter().enumerate() {
            for (y, &cost) in row.iter().enumerate() {
                if cost == 0 || cost > MAX_TERRAIN_COST {
                    return Err(MapError::InvalidTerrainCost { cell: (x, y), cost });
                }
                min_cost = min_cost.min(cost);
            }
        }

        let dynamic_obstacles = dynamic_obstacles.unwrap_or_default();
        let out_of_bounds = static_obstacles
            .iter()
            .chain(dynamic_obstacles.values().flatten())
            .filter(|&&(x, y)| x >= rows || y >= cols)
            .count();
        if out_of_bounds > 0 {
            warn!("{out_of_bounds} obstacle(s) lie outside the {rows}x{cols} grid and have no effect");
        }

        debug!(
            "grid {rows}x{cols}, {} static obstacles, {} scheduled time steps",
            static_obstacles.len(),
            dynamic_obstacles.len()
        );

        Ok(GridEnvironment {
            rows,
            cols,
            grid,
            static_obstacles,
            dynamic_obstacles,
            min_cost,
        })
    }

    /// Reads a text cost map.
    ///
    /// ```text
    /// type costgrid
    /// height 2
    /// width 3
    /// map
    /// 1 1 2
    /// 4 @ 1
    /// ```
    ///
    /// `@` marks a static obstacle; its terrain cost is recorded as 1.
    pub fn from_file(path: &str) -> Result<Self, MapError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines().enumerate();

        read_header(&mut lines, "type")?;
        let height = parse_header(read_header(&mut lines, "height")?, "height")?;
        let width = parse_header(read_header(&mut lines, "width")?, "width")?;
        read_header(&mut lines, "map")?;

        let mut grid = Vec::new();
        let mut static_obstacles = HashSet::new();
        for (index, line) in lines.take(height) {
            let line = line?;
            let x = grid.len();
            let mut row = Vec::new();
            for (y, token) in line.split_whitespace().enumerate() {
                if token == "@" {
                    static_obstacles.insert((x, y));
                    row.push(1);
                    continue;
                }
                let cost = token.parse::<usize>().map_err(|err| MapError::Parse {
                    line: index + 1,
                    reason: format!("bad terrain cost `{token}`: {err}"),
                })?;
                row.push(cost);
            }
            grid.push(row);
        }

        if grid.len() != height || grid.iter().any(|row| row.len() != width) {
            return Err(MapError::InvalidGridShape(format!(
                "map body does not match declared size {height}x{width}"
            )));
        }

        GridEnvironment::new(grid, static_obstacles, None)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.0 < self.rows && cell.1 < self.cols
    }

    /// Terrain cost of entering `cell`, in `1..=MAX_TERRAIN_COST`.
    pub fn cost(&self, cell: Cell) -> usize {
        self.grid[cell.0][cell.1]
    }

    pub fn min_cost(&self) -> usize {
        self.min_cost
    }

    /// True for static obstacles, and for cells scheduled as blocked at `time`
    /// when a time is given. `Some(0)` consults the step 0 entry like any other
    /// step; only `None` skips the schedule.
    pub fn is_cell_blocked(&self, cell: Cell, time: Option<usize>) -> bool {
        if self.static_obstacles.contains(&cell) {
            return true;
        }
        time.and_then(|t| self.dynamic_obstacles.get(&t))
            .is_some_and(|blocked| blocked.contains(&cell))
    }

    /// In-bounds 4-connected neighbors in the order right, down, left, up.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let directions: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
        directions.into_iter().filter_map(move |(dx, dy)| {
            let x = cell.0.checked_add_signed(dx)?;
            let y = cell.1.checked_add_signed(dy)?;
            self.contains((x, y)).then_some((x, y))
        })
    }
}

type NumberedLines = std::iter::Enumerate<std::io::Lines<BufReader<File>>>;

/// Consumes one `key [value]` header line, returning its line number and value.
fn read_header(lines: &mut NumberedLines, key: &str) -> Result<(usize, String), MapError> {
    let (index, line) = lines.next().ok_or_else(|| MapError::Parse {
        line: 0,
        reason: format!("missing `{key}` header"),
    })?;
    let line = line?;
    let mut parts = line.split_whitespace();
    if parts.next() != Some(key) {
        return Err(MapError::Parse {
            line: index + 1,
            reason: format!("expected `{key}` header, got `{line}`"),
        });
    }
    Ok((index + 1, parts.next().unwrap_or_default().to_string()))
}

fn parse_header((line, value): (usize, String), key: &str) -> Result<usize, MapError> {
    value.parse::<usize>().map_err(|err| MapError::Parse {
        line,
        reason: format!("bad `{key}` value `{value}`: {err}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GridEnvironment {
        GridEnvironment::new(
            vec![
                vec![1, 1, 2],
                vec![1, 3, 2],
                vec![4, 1, 1],
            ],
            HashSet::from([(1, 1)]),
            Some(HashMap::from([(3, HashSet::from([(2, 2)]))])),
        )
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            GridEnvironment::new(vec![], HashSet::new(), None),
            Err(MapError::InvalidGridShape(_))
        ));
        assert!(matches!(
            GridEnvironment::new(vec![vec![]], HashSet::new(), None),
            Err(MapError::InvalidGridShape(_))
        ));
        assert!(matches!(
            GridEnvironment::new(vec![vec![1, 1], vec![1]], HashSet::new(), None),
            Err(MapError::InvalidGridShape(_))
        ));
        assert!(matches!(
            GridEnvironment::new(vec![vec![1, 0]], HashSet::new(), None),
            Err(MapError::InvalidTerrainCost { cell: (0, 1), cost: 0 })
        ));
        assert!(matches!(
            GridEnvironment::new(vec![vec![1, usize::MAX, 1]], HashSet::new(), None),
            Err(MapError::InvalidTerrainCost { cell: (0, 1), cost: usize::MAX })
        ));
        GridEnvironment::new(vec![vec![1, MAX_TERRAIN_COST, 1]], HashSet::new(), None).unwrap();
    }

    #[test]
    fn test_blocking() {
        let env = sample();
        assert!(env.is_cell_blocked((1, 1), None));
        assert!(env.is_cell_blocked((1, 1), Some(7)));
        assert!(!env.is_cell_blocked((2, 2), None));
        assert!(!env.is_cell_blocked((2, 2), Some(2)));
        assert!(env.is_cell_blocked((2, 2), Some(3)));
        assert!(!env.is_cell_blocked((0, 0), Some(3)));
    }

    #[test]
    fn test_schedule_at_step_zero() {
        let env = GridEnvironment::new(
            vec![vec![1, 1]],
            HashSet::new(),
            Some(HashMap::from([(0, HashSet::from([(0, 1)]))])),
        )
        .unwrap();
        assert!(env.is_cell_blocked((0, 1), Some(0)));
        assert!(!env.is_cell_blocked((0, 1), None));
        assert!(!env.is_cell_blocked((0, 1), Some(1)));
    }

    #[test]
    fn test_neighbors_order_and_bounds() {
        let env = sample();
        let corner: Vec<_> = env.neighbors((0, 0)).collect();
        assert_eq!(corner, vec![(0, 1), (1, 0)]);

        let center: Vec<_> = env.neighbors((1, 1)).collect();
        assert_eq!(center, vec![(1, 2), (2, 1), (1, 0), (0, 1)]);

        let far: Vec<_> = env.neighbors((2, 2)).collect();
        assert_eq!(far, vec![(2, 1), (1, 2)]);

        // Restartable.
        assert_eq!(env.neighbors((1, 1)).collect::<Vec<_>>(), center);
    }

    #[test]
    fn test_costs() {
        let env = sample();
        assert_eq!(env.rows(), 3);
        assert_eq!(env.cols(), 3);
        assert_eq!(env.cost((2, 0)), 4);
        assert_eq!(env.min_cost(), 1);
        assert!(env.contains((2, 2)));
        assert!(!env.contains((3, 0)));
    }

    #[test]
    fn test_read_map() {
        let env = GridEnvironment::from_file("map_file/test/test.map").unwrap();

        assert_eq!(env.rows(), 5);
        assert_eq!(env.cols(), 5);

        assert!(env.is_cell_blocked((1, 1), None));
        assert!(env.is_cell_blocked((3, 0), None));
        assert!(!env.is_cell_blocked((0, 0), None));
        assert_eq!(env.cost((0, 4)), 3);
        assert_eq!(env.cost((1, 1)), 1);
        assert!(!env.is_cell_blocked((0, 1), Some(0)));
    }

    #[test]
    fn test_read_map_with_oversized_header() {
        let path = std::env::temp_dir().join(format!("terrain_path_huge_{}.map", std::process::id()));
        std::fs::write(
            &path,
            format!("type costgrid\nheight {}\nwidth {}\nmap\n1 1\n", usize::MAX, usize::MAX),
        )
        .unwrap();

        let result = GridEnvironment::from_file(path.to_str().unwrap());
        assert!(matches!(result, Err(MapError::InvalidGridShape(_))));

        std::fs::write(&path, "type costgrid\nheight lots\nwidth 2\nmap\n").unwrap();
        let result = GridEnvironment::from_file(path.to_str().unwrap());
        assert!(matches!(result, Err(MapError::Parse { line: 2, .. })));

        let _ = std::fs::remove_file(&path);
    }
}
