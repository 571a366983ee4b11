//! Square sliding-tile boards and their heuristics, for use with the `tilepath` searcher.

mod board;
mod heuristic;

use thiserror::Error;

pub use self::board::*;
pub use self::heuristic::*;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseBoardError {
    #[error("board has no tiles")]
    Empty,
    #[error("{len} tiles do not form a square board between 2x2 and {max}x{max}", max = MAX_WIDTH)]
    NotSquare { len: usize },
    #[error("tile {tile} is out of range, tiles must be in 0..={max}")]
    OutOfRange { tile: u8, max: usize },
    #[error("tile {tile} appears more than once")]
    Duplicate { tile: u8 },
    #[error("cannot parse {token:?} as a tile")]
    InvalidToken { token: String },
}
