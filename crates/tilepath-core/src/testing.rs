//! Minimal puzzle for exercising the frontier and the resolver.

use enumset::EnumSet;

use crate::traits::{Direction, SlidingPuzzle};

/// A marker sliding along a track of 256 cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line(u8);

impl Line {
    /// Marker at cell `pos`.
    pub fn at(pos: u8) -> Self {
        Line(pos)
    }
}

impl SlidingPuzzle for Line {
    type Key = u8;

    fn state_key(&self) -> u8 {
        self.0
    }

    fn matches_goal(&self, goal: &Self) -> bool {
        self == goal
    }

    fn legal_moves(&self) -> EnumSet<Direction> {
        let mut moves = EnumSet::empty();
        if self.0 < u8::MAX {
            moves |= Direction::Right;
        }
        if self.0 > 0 {
            moves |= Direction::Left;
        }
        moves
    }

    fn apply_move(&self, direction: Direction) -> Self {
        match direction {
            Direction::Right => Line(self.0 + 1),
            Direction::Left => Line(self.0 - 1),
            Direction::Up | Direction::Down => *self,
        }
    }
}
