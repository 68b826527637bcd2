use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
    time::Duration,
};

use clap::{Parser, ValueEnum};
use eight_puzzle::{
    board::parse_row, general_search, parse_board, Algorithm, Board, BoardError, SearchConfig,
    SearchOutcome,
};
use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_PUZZLE: Board = Board::new([[1, 5, 2], [4, 3, 6], [7, 8, 0]]);

/// Solve the 8-puzzle with uniform-cost search or A*.
///
/// Anything not given on the command line is asked for interactively.
#[derive(Parser)]
#[command(name = "eight-puzzle", version)]
struct Cli {
    /// Search algorithm
    #[arg(short, long, value_enum)]
    algorithm: Option<AlgorithmArg>,

    /// Tiles in row-major order with 0 for the blank, e.g. "1 5 2 4 3 6 7 8 0"
    #[arg(short, long)]
    puzzle: Option<String>,

    /// Give up after this many seconds
    #[arg(short, long, default_value_t = 300)]
    time_limit: u64,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Uniform,
    Misplaced,
    Manhattan,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Uniform => Algorithm::UniformCost,
            AlgorithmArg::Misplaced => Algorithm::MisplacedTile,
            AlgorithmArg::Manhattan => Algorithm::Manhattan,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("invalid choice {0:?}")]
    Choice(String),

    #[error("input ended early")]
    Eof,

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn prompt(input: &mut impl BufRead, text: &str) -> Result<String, CliError> {
    print!("{text}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(CliError::Eof);
    }
    Ok(line.trim().to_owned())
}

fn read_puzzle(input: &mut impl BufRead) -> Result<Board, CliError> {
    println!("Type '1' to use a default puzzle, or '2' to enter your own puzzle");
    match prompt(input, "")?.as_str() {
        "1" => Ok(DEFAULT_PUZZLE),
        "2" => {
            println!("Enter your puzzle, using 0 for the blank.");
            println!("Separate the numbers in each row with spaces.");

            let mut rows = Vec::new();
            for name in ["first", "second", "third"] {
                let line = prompt(input, &format!("Enter the {name} row: "))?;
                rows.push(parse_row(&line)?);
            }
            Ok(Board::from_rows(&rows)?)
        }
        other => Err(CliError::Choice(other.to_owned())),
    }
}

fn read_algorithm(input: &mut impl BufRead) -> Result<Algorithm, CliError> {
    println!("Select algorithm:");
    for (ix, algorithm) in Algorithm::ALL.iter().enumerate() {
        println!("  {}. {}", ix + 1, algorithm);
    }

    let choice = prompt(input, "")?;
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|ix| Algorithm::ALL.get(ix).copied())
        .ok_or(CliError::Choice(choice))
}

fn report(outcome: &SearchOutcome) {
    match &outcome.result {
        Ok(solution) => {
            for node in solution.path() {
                println!(
                    "The best state to expand with g(n) = {} and h(n) = {} is:",
                    node.g(),
                    node.h()
                );
                println!("{}", node.board());
                println!();
            }

            println!("Goal!!!");
            println!("Solution depth was {}", solution.depth());
        }
        Err(failure) => println!("{failure}"),
    }

    println!("Number of nodes expanded: {}", outcome.stats.expanded);
    println!("Max queue size: {}", outcome.stats.max_frontier);
}

fn run(cli: Cli) -> Result<bool, CliError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();

    println!("Welcome to the 8-Puzzle Solver");
    let board = match &cli.puzzle {
        Some(tiles) => parse_board(tiles)?,
        None => read_puzzle(&mut input)?,
    };
    let algorithm = match cli.algorithm {
        Some(arg) => arg.into(),
        None => read_algorithm(&mut input)?,
    };

    println!();
    println!("Solving with {algorithm}:");
    println!("{board}");
    println!();

    let config = SearchConfig::default().with_time_limit(Duration::from_secs(cli.time_limit));
    let outcome = general_search(&board, algorithm, &config);
    report(&outcome);

    Ok(outcome.result.is_ok())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(2)
        }
    }
}
