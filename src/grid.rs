//! Rectangular sliding-robot boards.
//!
//! Boards are written one row per line, top row first:
//! - `.` free cell
//! - `#` obstacle
//! - `@` the goal robot
//! - `1`-`9` other robots
//! - `*` the goal cell (free)
//!
//! Cells are numbered row-major, `cell = y * width + x`. A robot slides in one
//! direction until the next cell is off the board, an obstacle, or another
//! robot.

use std::fmt;

use crate::error::{SolveError, StoreError};
use crate::geometry::{BoardGeometry, UNUSABLE};

/// Built-in 16x16 board used by the default CLI action and the benches.
pub const DEMO_BOARD: &str = "\
@.....#.........
................
................
..........1.....
................
...#............
................
.....*..........
.....#..........
............#...
................
................
..2.............
........#.......
..............3.
................
";

/// One of the four slide directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline(always)]
    fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// A parsed board with its starting robot placement.
#[derive(Clone, Debug)]
pub struct Board {
    width: u32,
    height: u32,
    obstacles: Vec<bool>,
    /// Starting cells; index 0 is the goal robot, the rest follow label order.
    robots: Vec<u32>,
    labels: Vec<char>,
    goal: u32,
}

fn board_error(line: usize, reason: impl Into<String>) -> SolveError {
    SolveError::Board {
        line,
        reason: reason.into(),
    }
}

impl Board {
    /// Parses the text format described in the module docs.
    ///
    /// Blank lines are ignored. Errors that concern the whole board rather
    /// than one row report line 0.
    pub fn parse(text: &str) -> Result<Self, SolveError> {
        let mut width = None;
        let mut height = 0u32;
        let mut obstacles = Vec::new();
        let mut goal_robot = None;
        let mut others: Vec<(char, u32)> = Vec::new();
        let mut goal = None;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let row = line.trim_end();
            if row.is_empty() {
                continue;
            }
            let row_width = row.chars().count() as u32;
            match width {
                None => width = Some(row_width),
                Some(w) if w != row_width => {
                    return Err(board_error(
                        line_no,
                        format!("row has {row_width} cells, expected {w}"),
                    ));
                }
                Some(_) => {}
            }

            for (x, ch) in row.chars().enumerate() {
                let cell = height * row_width + x as u32;
                obstacles.push(ch == '#');
                match ch {
                    '.' | '#' => {}
                    '@' => {
                        if goal_robot.replace(cell).is_some() {
                            return Err(board_error(line_no, "more than one goal robot"));
                        }
                    }
                    '*' => {
                        if goal.replace(cell).is_some() {
                            return Err(board_error(line_no, "more than one goal cell"));
                        }
                    }
                    '1'..='9' => {
                        if others.iter().any(|&(label, _)| label == ch) {
                            return Err(board_error(line_no, format!("robot {ch} appears twice")));
                        }
                        others.push((ch, cell));
                    }
                    other => {
                        return Err(board_error(line_no, format!("unexpected character {other:?}")));
                    }
                }
            }
            height += 1;
        }

        let width = width.ok_or_else(|| board_error(0, "board is empty"))?;
        let goal_robot = goal_robot.ok_or_else(|| board_error(0, "no goal robot '@'"))?;
        let goal = goal.ok_or_else(|| board_error(0, "no goal cell '*'"))?;

        others.sort_unstable();
        let mut robots = vec![goal_robot];
        let mut labels = vec!['@'];
        for (label, cell) in others {
            robots.push(cell);
            labels.push(label);
        }

        Ok(Self {
            width,
            height,
            obstacles,
            robots,
            labels,
            goal,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cell_count(&self) -> u32 {
        self.width * self.height
    }

    #[inline(always)]
    pub fn is_obstacle(&self, cell: u32) -> bool {
        self.obstacles[cell as usize]
    }

    /// Starting cells, goal robot first.
    pub fn robots(&self) -> &[u32] {
        &self.robots
    }

    /// Display label of robot `index` (`@` for the goal robot).
    pub fn label(&self, index: usize) -> char {
        self.labels[index]
    }

    /// Cell the goal robot has to reach.
    pub fn goal(&self) -> u32 {
        self.goal
    }

    /// Store geometry for this board and its robot count.
    pub fn geometry(&self) -> Result<BoardGeometry, StoreError> {
        BoardGeometry::new(
            self.cell_count(),
            |cell| self.is_obstacle(cell),
            self.robots.len() as u32,
        )
    }

    /// Where `robot` ends up when it slides towards `direction`, or `None`
    /// if it cannot move at all.
    #[inline]
    pub fn slide(&self, positions: &[u32], robot: usize, direction: Direction) -> Option<u32> {
        let (dx, dy) = direction.delta();
        let start = positions[robot];
        let mut x = (start % self.width) as i32;
        let mut y = (start / self.width) as i32;
        loop {
            let (nx, ny) = (x + dx, y + dy);
            if nx < 0 || ny < 0 || nx >= self.width as i32 || ny >= self.height as i32 {
                break;
            }
            let next = ny as u32 * self.width + nx as u32;
            if self.is_obstacle(next) || positions.contains(&next) {
                break;
            }
            x = nx;
            y = ny;
        }
        let end = y as u32 * self.width + x as u32;
        (end != start).then_some(end)
    }

    /// Renders the rank and free-above tables of `geometry` on this board's
    /// grid, one row per line, `#` for obstacles.
    pub fn format_tables(&self, geometry: &BoardGeometry) -> String {
        let widest = geometry.max_node_len().to_string().len();
        let mut output = String::new();
        let tables: [(&str, &dyn Fn(u32) -> u32); 2] = [
            ("rank", &|cell: u32| geometry.rank(cell)),
            ("free above", &|cell: u32| geometry.free_above(cell)),
        ];
        for (title, table) in tables {
            output.push_str(title);
            output.push('\n');
            for y in 0..self.height {
                let row: Vec<String> = (0..self.width)
                    .map(|x| match table(y * self.width + x) {
                        UNUSABLE => format!("{:>widest$}", "#"),
                        value => format!("{value:>widest$}"),
                    })
                    .collect();
                output.push_str(&row.join(" "));
                output.push('\n');
            }
        }
        output
    }
}
