use std::fmt::Display;

use itertools::Itertools;

use crate::board::{Board, BLANK, GOAL, SIDE};

/// Which cost estimate drives the search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// No estimate at all; the search orders purely by path cost.
    UniformCost,
    MisplacedTile,
    Manhattan,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::UniformCost,
        Algorithm::MisplacedTile,
        Algorithm::Manhattan,
    ];

    pub fn estimate(self, board: &Board) -> u32 {
        match self {
            Algorithm::UniformCost => 0,
            Algorithm::MisplacedTile => misplaced_tile(board),
            Algorithm::Manhattan => manhattan_distance(board),
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Algorithm::UniformCost => "uniform cost search",
            Algorithm::MisplacedTile => "A* with the misplaced tile heuristic",
            Algorithm::Manhattan => "A* with the Manhattan distance heuristic",
        })
    }
}

// assume we must make at least 1 move for each
// tile that is out-of-place
pub fn misplaced_tile(board: &Board) -> u32 {
    board
        .tiles()
        .iter()
        .zip_eq(GOAL.tiles())
        .filter(|(b, g)| **b != BLANK && b != g)
        .count() as u32
}

/// Goal cell of each tile, indexed by tile value. The blank has no goal.
const GOAL_POSITIONS: [(usize, usize); 9] = [
    (2, 2),
    (0, 0),
    (0, 1),
    (0, 2),
    (1, 0),
    (1, 1),
    (1, 2),
    (2, 0),
    (2, 1),
];

pub fn manhattan_distance(board: &Board) -> u32 {
    board
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(ix, &tile)| {
            let (gi, gj) = GOAL_POSITIONS[tile as usize];
            ((ix / SIDE).abs_diff(gi) + (ix % SIDE).abs_diff(gj)) as u32
        })
        .sum()
}
