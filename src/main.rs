//! Sliding-robot puzzle solver
//!
//! Finds shortest move sequences on ricochet-style boards with an
//! iterative-deepening search backed by the compressed key-depth trie. Without
//! a subcommand it solves a built-in 16x16 demo board.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use ricochet::grid::{Board, DEMO_BOARD};
use ricochet::solver::{self, SolverConfig};
use ricochet::{SolveError, StoreConfig};

/// Solves sliding-robot puzzles and inspects their state-store tables.
#[derive(Parser)]
#[command(name = "ricochet")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve the board in FILE and print the moves.
    Solve {
        file: PathBuf,
        /// Longest solution to search for.
        #[arg(long, default_value_t = 30)]
        max_depth: u8,
        /// Use the direct-indexed store when the board allows it (64 MiB up front).
        #[arg(long)]
        fast: bool,
        /// Give up after this many seconds.
        #[arg(long)]
        time_limit_secs: Option<u64>,
    },
    /// Print the rank and free-above tables the store builds for FILE.
    Tables { file: PathBuf },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Solve {
            file,
            max_depth,
            fast,
            time_limit_secs,
        }) => {
            let config = SolverConfig {
                max_depth,
                time_limit: time_limit_secs.map(Duration::from_secs),
                store: if fast {
                    StoreConfig::fast()
                } else {
                    StoreConfig::default()
                },
            };
            read_board(&file).and_then(|board| run_solve(&board, &config))
        }
        Some(Command::Tables { file }) => read_board(&file).and_then(|board| run_tables(&board)),
        None => Board::parse(DEMO_BOARD).and_then(|board| {
            println!("{}", DEMO_BOARD.trim_end());
            println!();
            run_solve(&board, &SolverConfig::default())
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact()
        .with_filter(filter);
    let _ = tracing_subscriber::registry().with(console).try_init();
}

fn read_board(path: &Path) -> Result<Board, SolveError> {
    let text = std::fs::read_to_string(path).map_err(|source| SolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Board::parse(&text)
}

/// Solves `board` and prints the moves plus store usage.
fn run_solve(board: &Board, config: &SolverConfig) -> Result<(), SolveError> {
    match solver::solve(board, config)? {
        Some(solution) => {
            print!("{}", solver::format_solution(board, &solution));
            println!(
                "{} states stored, {:.1} MiB allocated",
                solution.states_stored,
                solution.allocated_bytes as f64 / (1024.0 * 1024.0)
            );
        }
        None => println!("No solution within {} moves", config.max_depth),
    }
    Ok(())
}

fn run_tables(board: &Board) -> Result<(), SolveError> {
    let geometry = board.geometry()?;
    print!("{}", board.format_tables(&geometry));
    Ok(())
}
