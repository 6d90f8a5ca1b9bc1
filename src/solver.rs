//! Iterative-deepening search over robot placements.
//!
//! One visited-state store is shared by every deepening iteration. The value
//! stored per placement is the number of moves still allowed when it was
//! reached; a placement is expanded only if `put_if_greater` reports that it
//! is now reached with a larger budget than ever before.
//!
//! - Placements live in fixed-size arrays on an explicit stack, no recursion
//! - Interchangeable robots are canonicalized by the key encoder, so
//!   permutations of helper robots share one store entry
//! - The time limit is checked between expansions, never inside the store

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::SolveError;
use crate::geometry::BoardGeometry;
use crate::grid::{Board, Direction};
use crate::key::{KeyLayout, KeyWidth, TrieKey};
use crate::{new_key_depth_map, KeyDepthMap};

/// Goal robot plus the nine labelled helpers.
const MAX_ROBOTS: usize = 10;

/// Expansions between two deadline checks.
const DEADLINE_CHECK_INTERVAL: u64 = 4096;

/// Search limits and store settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolverConfig {
    /// Longest solution searched for.
    pub max_depth: u8,
    pub time_limit: Option<Duration>,
    pub store: StoreConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 30,
            time_limit: None,
            store: StoreConfig::default(),
        }
    }
}

/// One robot slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Move {
    /// Robot index on the board, 0 being the goal robot.
    pub robot: usize,
    pub direction: Direction,
}

/// A shortest move sequence and what the store held when it was found.
#[derive(Clone, Debug)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub states_stored: u32,
    pub allocated_bytes: u64,
}

/// A placement on the search path.
#[derive(Clone, Copy)]
struct Frame {
    positions: [u32; MAX_ROBOTS],
    /// Moves still allowed from this placement.
    remaining: u8,
    /// Next `robot * 4 + direction` to try.
    next_choice: usize,
    /// Move that produced this placement, `None` for the start.
    arrived_by: Option<Move>,
}

struct Search<'a, K: TrieKey> {
    board: &'a Board,
    layout: KeyLayout,
    robot_count: usize,
    store: Box<dyn KeyDepthMap<K>>,
    deadline: Option<Instant>,
    expansions: u64,
}

impl<'a, K: TrieKey> Search<'a, K> {
    fn new(
        board: &'a Board,
        geometry: &BoardGeometry,
        config: &SolverConfig,
    ) -> Result<Self, SolveError> {
        let store = new_key_depth_map::<K>(geometry, &config.store)?;
        Ok(Self {
            board,
            layout: geometry.layout(),
            robot_count: board.robots().len(),
            store,
            deadline: config.time_limit.map(|limit| Instant::now() + limit),
            expansions: 0,
        })
    }

    #[inline(always)]
    fn key(&self, positions: &[u32; MAX_ROBOTS]) -> K {
        let robots = &positions[..self.robot_count];
        K::from_u64(self.layout.encode(robots[0], &robots[1..]))
    }

    fn check_deadline(&mut self, limit: u8) -> Result<(), SolveError> {
        self.expansions += 1;
        if self.expansions % DEADLINE_CHECK_INTERVAL != 0 {
            return Ok(());
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(SolveError::TimedOut { depth: limit })
            }
            _ => Ok(()),
        }
    }

    fn run(mut self, max_depth: u8) -> Result<Option<Solution>, SolveError> {
        let mut start = [0u32; MAX_ROBOTS];
        start[..self.robot_count].copy_from_slice(self.board.robots());

        for limit in 0..=max_depth {
            if let Some(moves) = self.deepen(&start, limit)? {
                info!(depth = limit, stored = self.store.len(), "solution found");
                return Ok(Some(Solution {
                    moves,
                    states_stored: self.store.len(),
                    allocated_bytes: self.store.allocated_bytes(),
                }));
            }
            info!(
                depth = limit,
                stored = self.store.len(),
                bytes = self.store.allocated_bytes(),
                "search iteration finished"
            );
        }
        Ok(None)
    }

    /// Depth-limited search from `start`; returns the move list on success.
    fn deepen(
        &mut self,
        start: &[u32; MAX_ROBOTS],
        limit: u8,
    ) -> Result<Option<Vec<Move>>, SolveError> {
        let board = self.board;
        if start[0] == board.goal() {
            return Ok(Some(Vec::new()));
        }
        let key = self.key(start);
        self.store.put_if_greater(key, limit)?;

        let choices = self.robot_count * Direction::ALL.len();
        let mut stack = vec![Frame {
            positions: *start,
            remaining: limit,
            next_choice: 0,
            arrived_by: None,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.remaining == 0 || frame.next_choice == choices {
                stack.pop();
                continue;
            }
            let choice = frame.next_choice;
            frame.next_choice += 1;

            let robot = choice / Direction::ALL.len();
            let direction = Direction::ALL[choice % Direction::ALL.len()];
            let Some(to) = board.slide(&frame.positions[..self.robot_count], robot, direction)
            else {
                continue;
            };
            let mut positions = frame.positions;
            positions[robot] = to;
            let remaining = frame.remaining - 1;
            let step = Move { robot, direction };

            if robot == 0 && to == board.goal() {
                let mut moves: Vec<Move> = stack.iter().filter_map(|f| f.arrived_by).collect();
                moves.push(step);
                return Ok(Some(moves));
            }

            self.check_deadline(limit)?;
            let key = self.key(&positions);
            if !self.store.put_if_greater(key, remaining)? {
                continue;
            }
            stack.push(Frame {
                positions,
                remaining,
                next_choice: 0,
                arrived_by: Some(step),
            });
        }
        debug!(depth = limit, expansions = self.expansions, "iteration exhausted");
        Ok(None)
    }
}

/// Finds a shortest solution of at most `config.max_depth` moves.
///
/// Returns `Ok(None)` when no solution exists within the depth limit.
pub fn solve(board: &Board, config: &SolverConfig) -> Result<Option<Solution>, SolveError> {
    let geometry = board.geometry()?;
    info!(
        cells = geometry.cell_count(),
        robots = geometry.robot_count(),
        free = geometry.free_count(),
        "solving"
    );
    match geometry.key_width() {
        KeyWidth::Narrow => Search::<u32>::new(board, &geometry, config)?.run(config.max_depth),
        KeyWidth::Wide => Search::<u64>::new(board, &geometry, config)?.run(config.max_depth),
    }
}

/// Formats a solution as a numbered move list.
pub fn format_solution(board: &Board, solution: &Solution) -> String {
    let mut output = format!("Solved in {} moves:\n", solution.moves.len());
    for (i, step) in solution.moves.iter().enumerate() {
        output.push_str(&format!(
            "{}. {} {}\n",
            i + 1,
            board.label(step.robot),
            step.direction
        ));
    }
    output
}
