use std::cell::Cell;
use std::fmt;

use bumpalo::Bump;

use crate::traits::{Direction, SlidingPuzzle};

/// One step of a move sequence, linked to the step before it.
///
/// Trails are allocated in a [`TrailArena`] and shared by every node descending from them,
/// so generating a successor never copies its parent's path.
pub struct Trail<'a> {
    parent: Option<&'a Trail<'a>>,
    direction: Direction,
    depth: u32,
}

impl<'a> Trail<'a> {
    /// Number of moves from the initial state, including this one.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Collects the moves from the initial state up to and including this step.
    pub fn to_path(&self) -> Vec<Direction> {
        let mut path = Vec::with_capacity(self.depth as usize);
        let mut step = Some(self);
        while let Some(trail) = step {
            path.push(trail.direction);
            step = trail.parent;
        }
        path.reverse();
        path
    }
}

/// Bump arena owning the move trails of a single search.
#[derive(Default)]
pub struct TrailArena {
    arena: Bump,
    steps: Cell<usize>,
}

impl TrailArena {
    /// Empty arena.
    pub fn new() -> Self {
        TrailArena::default()
    }

    /// Appends `direction` to `parent`, returning the new tail.
    pub fn extend<'a>(
        &'a self,
        parent: Option<&'a Trail<'a>>,
        direction: Direction,
    ) -> &'a Trail<'a> {
        let depth = parent.map_or(0, |p| p.depth) + 1;
        self.steps.set(self.steps.get() + 1);
        self.arena.alloc(Trail {
            parent,
            direction,
            depth,
        })
    }

    /// Frees every trail at once. Requires that no node borrows from the arena.
    pub fn reset(&mut self) {
        self.arena.reset();
        self.steps.set(0);
    }

    /// Number of trail steps allocated since the last reset.
    pub fn steps(&self) -> usize {
        self.steps.get()
    }
}

/// An open search node: a puzzle state plus the costs and moves that reached it.
///
/// The state key is computed once on construction so that frontier scans compare keys
/// without re-serializing states. A node's own move is kept inline and only written to
/// the arena once the node is expanded.
pub struct SearchNode<'a, P: SlidingPuzzle> {
    state: P,
    key: P::Key,
    g: u32,
    h: u32,
    f: u32,
    parent: Option<&'a Trail<'a>>,
    last_move: Option<Direction>,
}

impl<'a, P: SlidingPuzzle> SearchNode<'a, P> {
    /// Creates the node for the initial state: empty path, zero cost.
    pub fn root(state: P) -> Self {
        let key = state.state_key();
        SearchNode {
            state,
            key,
            g: 0,
            h: 0,
            f: 0,
            parent: None,
            last_move: None,
        }
    }

    /// Creates the successors reached by each legal move, in canonical order, at unit cost.
    ///
    /// This node's move is written to `arena` once and shared by all successors. Their
    /// heuristic estimates start at zero, so `f == g` until [`SearchNode::set_h`] is called.
    pub fn successors<'n>(
        &'n self,
        arena: &'a TrailArena,
    ) -> impl Iterator<Item = SearchNode<'a, P>> + 'n {
        let parent = self.trail(arena);
        self.state
            .legal_moves()
            .into_iter()
            .map(move |direction| self.step(parent, direction))
    }

    /// Creates the single successor reached by moving in `direction`.
    ///
    /// `direction` must be legal. Prefer [`SearchNode::successors`] when generating every
    /// move, since each call writes this node's move to `arena` again.
    pub fn successor(&self, direction: Direction, arena: &'a TrailArena) -> Self {
        self.step(self.trail(arena), direction)
    }

    fn trail(&self, arena: &'a TrailArena) -> Option<&'a Trail<'a>> {
        self.last_move
            .map(|direction| arena.extend(self.parent, direction))
    }

    fn step(&self, parent: Option<&'a Trail<'a>>, direction: Direction) -> Self {
        let state = self.state.apply_move(direction);
        let key = state.state_key();
        let g = self.g + 1;
        SearchNode {
            state,
            key,
            g,
            h: 0,
            f: g,
            parent,
            last_move: Some(direction),
        }
    }

    /// Puzzle configuration of this node.
    pub fn state(&self) -> &P {
        &self.state
    }

    /// Cached state key.
    pub fn key(&self) -> &P::Key {
        &self.key
    }

    /// Path cost from the initial state.
    pub fn g(&self) -> u32 {
        self.g
    }

    /// Heuristic estimate of the remaining cost.
    pub fn h(&self) -> u32 {
        self.h
    }

    /// Total estimate, `g + h`.
    pub fn f(&self) -> u32 {
        self.f
    }

    /// Sets the heuristic estimate and refreshes the total estimate.
    pub fn set_h(&mut self, h: u32) {
        self.h = h;
        self.f = self.g + h;
    }

    /// Number of moves taken from the initial state.
    pub fn depth(&self) -> u32 {
        self.parent.map_or(0, Trail::depth) + u32::from(self.last_move.is_some())
    }

    /// Move that produced this node, `None` for the root.
    pub fn last_move(&self) -> Option<Direction> {
        self.last_move
    }

    /// Moves from the root to this node.
    pub fn path(&self) -> Vec<Direction> {
        let mut path = self.parent.map_or_else(Vec::new, Trail::to_path);
        path.extend(self.last_move);
        path
    }

    #[cfg(test)]
    pub(crate) fn force_g(&mut self, g: u32) {
        self.g = g;
        self.f = g + self.h;
    }
}

impl<P: SlidingPuzzle> fmt::Debug for SearchNode<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchNode")
            .field("key", &self.key)
            .field("g", &self.g)
            .field("h", &self.h)
            .field("f", &self.f)
            .field("depth", &self.depth())
            .finish()
    }
}
