//! Best-first solver for the 8-puzzle.
//!
//! [`general_search`] runs uniform-cost search or A* with either the
//! misplaced-tile or the Manhattan-distance heuristic, chosen by
//! [`Algorithm`], and reports the goal node together with how many nodes
//! were expanded and how large the frontier grew.

pub mod board;
pub mod error;
pub mod heuristic;
pub mod search;

pub use board::{expand, parse_board, Board, GOAL};
pub use error::BoardError;
pub use heuristic::{manhattan_distance, misplaced_tile, Algorithm};
pub use search::{
    general_search, trace_solution, Node, SearchConfig, SearchFailure, SearchOutcome,
    SearchStats, Solution,
};
