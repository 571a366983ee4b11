use std::fmt::Debug;
use std::hash::Hash;

use enumset::{EnumSet, EnumSetType};

/// Direction in which the blank travels.
///
/// Declaration order is the canonical successor order (up, right, down, left), and
/// iterating an `EnumSet<Direction>` yields directions in that order.
#[derive(EnumSetType, Debug, Hash)]
pub enum Direction {
    /// Blank moves one row towards the top.
    Up,
    /// Blank moves one column towards the right.
    Right,
    /// Blank moves one row towards the bottom.
    Down,
    /// Blank moves one column towards the left.
    Left,
}

impl Direction {
    /// All directions in canonical successor order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Single-letter symbol used when rendering a path.
    pub fn symbol(self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Right => 'R',
            Direction::Down => 'D',
            Direction::Left => 'L',
        }
    }

    /// The direction undoing this one.
    pub fn backwards(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

/// A puzzle configuration the searcher can expand.
///
/// Two states are the same search state iff their keys are equal, regardless of the path
/// taken to reach them.
pub trait SlidingPuzzle: Sized {
    /// Canonical serialized encoding of a configuration.
    type Key: Hash + Eq + Clone + Debug + Send + Sync;

    /// Key identifying this configuration in the expanded list and the frontier.
    fn state_key(&self) -> Self::Key;

    /// Goal test.
    fn matches_goal(&self, goal: &Self) -> bool;

    /// Moves available from this configuration.
    fn legal_moves(&self) -> EnumSet<Direction>;

    /// Returns the configuration reached by moving in `direction`.
    ///
    /// Callers must only pass directions contained in [`SlidingPuzzle::legal_moves`].
    fn apply_move(&self, direction: Direction) -> Self;

    /// Whether `direction` is a legal move.
    fn can_move(&self, direction: Direction) -> bool {
        self.legal_moves().contains(direction)
    }

    /// Whether `goal` describes a configuration of the same puzzle.
    fn compatible_with(&self, _goal: &Self) -> bool {
        true
    }
}
