use std::{
    fmt::{Display, Write},
    ops::Index,
};

use itertools::Itertools;
use smallvec::SmallVec;

use crate::error::BoardError;

pub const SIDE: usize = 3;
pub const CELLS: usize = SIDE * SIDE;
pub const BLANK: u8 = 0;

/// A 3x3 arrangement of the tiles 1-8 plus the blank (0), stored row-major.
///
/// Boards are small and `Copy`; two boards are the same state exactly when
/// their tiles match, however they were reached.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    board: [u8; CELLS],
    // derived from `board`, cached so moves don't rescan
    blank: u8,
}

pub const GOAL: Board = Board::new([[1, 2, 3], [4, 5, 6], [7, 8, 0]]);

impl Board {
    /// Builds a board without checking the tile set. Use [`Board::from_rows`]
    /// for untrusted input.
    pub const fn new(rows: [[u8; SIDE]; SIDE]) -> Board {
        let board = [
            rows[0][0], rows[0][1], rows[0][2], //
            rows[1][0], rows[1][1], rows[1][2], //
            rows[2][0], rows[2][1], rows[2][2],
        ];

        let mut ix = 0;
        while ix < CELLS {
            if board[ix] == BLANK {
                break;
            }
            ix += 1;
        }
        assert!(ix < CELLS, "board has no blank tile");

        Board {
            board,
            blank: ix as u8,
        }
    }

    /// Checks that `rows` is 3x3 and holds each of 0-8 exactly once.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Board, BoardError> {
        if rows.len() != SIDE {
            return Err(BoardError::RowCount(rows.len()));
        }

        let mut grid = [[BLANK; SIDE]; SIDE];
        let mut seen = [false; CELLS];
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != SIDE {
                return Err(BoardError::RowLength {
                    row: i,
                    len: row.len(),
                });
            }

            for (j, &tile) in row.iter().enumerate() {
                let slot = seen
                    .get_mut(tile as usize)
                    .ok_or(BoardError::OutOfRange(tile))?;
                if *slot {
                    return Err(BoardError::Duplicate(tile));
                }
                *slot = true;
                grid[i][j] = tile;
            }
        }

        Ok(Board::new(grid))
    }

    pub fn tiles(&self) -> &[u8; CELLS] {
        &self.board
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.board.chunks(SIDE)
    }

    /// Row and column of the blank.
    pub fn blank(&self) -> (usize, usize) {
        let ix = self.blank as usize;
        (ix / SIDE, ix % SIDE)
    }

    pub fn is_goal(&self) -> bool {
        *self == GOAL
    }

    fn swap_blank(&self, target: (usize, usize)) -> Board {
        let mut next = *self;
        let to = target.0 * SIDE + target.1;
        next.board.swap(self.blank as usize, to);
        next.blank = to as u8;
        next
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for line in self.rows() {
            if !first {
                f.write_char('\n')?;
            } else {
                first = false;
            }

            write!(f, "{}", line.iter().join(" "))?;
        }

        Ok(())
    }
}

impl Index<(usize, usize)> for Board {
    type Output = u8;
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.board[index.0 * SIDE + index.1]
    }
}

/// Reads a grid written as three lines of whitespace- or comma-separated
/// tiles, or as a single line of all nine tiles in row-major order.
pub fn parse_board(b: &str) -> Result<Board, BoardError> {
    let mut rows: Vec<Vec<u8>> = b
        .trim()
        .lines()
        .map(parse_row)
        .collect::<Result<_, _>>()?;

    if rows.len() == 1 && rows[0].len() == CELLS {
        rows = rows[0].chunks(SIDE).map(<[u8]>::to_vec).collect();
    }

    Board::from_rows(&rows)
}

pub fn parse_row(line: &str) -> Result<Vec<u8>, BoardError> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<u8>()
                .map_err(|_| BoardError::BadToken(token.to_owned()))
        })
        .collect()
}

/// Directions the blank can slide, in expansion order: up, down, left, right.
const DELTAS: &[(isize, isize)] = &[(-1, 0), (1, 0), (0, -1), (0, 1)];

pub type Successors = SmallVec<[Board; 4]>;

/// Every board reachable by sliding one tile into the blank.
///
/// A corner blank gives 2 successors, an edge blank 3, the centre 4.
pub fn expand(board: &Board) -> Successors {
    let (i, j) = board.blank();
    let mut out = Successors::new();

    for &(di, dj) in DELTAS {
        let target = match (i.checked_add_signed(di), j.checked_add_signed(dj)) {
            (Some(ti), Some(tj)) if ti < SIDE && tj < SIDE => (ti, tj),
            _ => continue,
        };

        out.push(board.swap_blank(target));
    }

    out
}
