use thiserror::Error;

/// Problems with a grid handed to us by the input layer.
///
/// Only the shape and the tile set are checked; whether the puzzle can be
/// solved is left to the search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("expected 3 rows, got {0}")]
    RowCount(usize),

    #[error("row {row} has {len} tiles, expected 3")]
    RowLength { row: usize, len: usize },

    #[error("could not read tile {0:?}")]
    BadToken(String),

    #[error("tile {0} is out of range (0-8)")]
    OutOfRange(u8),

    #[error("tile {0} appears more than once")]
    Duplicate(u8),
}
