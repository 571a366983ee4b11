use tilepath_core::traits::SlidingPuzzle;

use crate::{Board, MAX_WIDTH};

/// Estimates of the number of moves left to reach a goal board.
///
/// All three are admissible and consistent for unit move costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Heuristic {
    /// Always 0; A* then orders nodes exactly like uniform cost search.
    Zero,
    /// Number of tiles, blank excluded, not on their goal cell.
    MisplacedTiles,
    /// Sum over tiles, blank excluded, of the grid distance to their goal cell.
    #[default]
    Manhattan,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [
        Heuristic::Zero,
        Heuristic::MisplacedTiles,
        Heuristic::Manhattan,
    ];

    pub fn estimate(self, state: &Board, goal: &Board) -> u32 {
        match self {
            Heuristic::Zero => 0,
            Heuristic::MisplacedTiles => misplaced_tiles(state, goal),
            Heuristic::Manhattan => manhattan_distance(state, goal),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Zero => "zero",
            Heuristic::MisplacedTiles => "misplaced-tiles",
            Heuristic::Manhattan => "manhattan",
        }
    }
}

pub fn misplaced_tiles(state: &Board, goal: &Board) -> u32 {
    debug_assert!(state.compatible_with(goal));
    state
        .tiles()
        .iter()
        .zip(goal.tiles())
        .filter(|&(&tile, &target)| tile != 0 && tile != target)
        .count() as u32
}

pub fn manhattan_distance(state: &Board, goal: &Board) -> u32 {
    debug_assert!(state.compatible_with(goal));
    let width = state.width();

    let mut goal_index = [0usize; MAX_WIDTH * MAX_WIDTH];
    for (index, &tile) in goal.tiles().iter().enumerate() {
        goal_index[tile as usize] = index;
    }

    state
        .tiles()
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != 0)
        .map(|(index, &tile)| {
            let target = goal_index[tile as usize];
            let rows = (index / width).abs_diff(target / width);
            let cols = (index % width).abs_diff(target % width);
            (rows + cols) as u32
        })
        .sum()
}
