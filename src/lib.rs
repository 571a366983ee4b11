use std::time::Instant;

use tilepath_core::traits::{Direction, SlidingPuzzle};
use tracing::{debug, trace};

pub use tilepath_core::*;
pub use tilepath_tiles as tiles;

/// Searcher configuration.
#[derive(Debug, Default)]
pub struct SearchOptions {
    pub duplicate_scan: DuplicateScan,
}

/// How a search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// A node satisfying the goal test was popped.
    GoalFound,
    /// The frontier ran empty without reaching the goal.
    Exhausted,
}

/// Result of one search: the moves found (empty if none) and the search statistics.
#[derive(Clone, Debug)]
pub struct Solution {
    pub termination: Termination,
    pub path: Vec<Direction>,
    pub stats: SearchStats,
}

impl Solution {
    pub fn is_solved(&self) -> bool {
        self.termination == Termination::GoalFound
    }

    /// The path as concatenated move symbols, e.g. `"RRU"`.
    pub fn path_string(&self) -> String {
        self.path.iter().map(|d| d.symbol()).collect()
    }
}

/// Best-first searcher with a strict expanded list.
///
/// Every node popped from the frontier is expanded at most once per state, and each
/// successor is routed through [`resolve_successor`] so the frontier holds at most one
/// node per state.
pub struct Searcher {
    options: SearchOptions,
    arena: TrailArena,
}

impl Searcher {
    pub fn new(options: SearchOptions) -> Self {
        Searcher {
            options,
            arena: TrailArena::new(),
        }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Uniform cost search: the frontier is ordered by path cost alone.
    pub fn uniform_cost<P>(&mut self, start: P, goal: &P) -> Result<Solution, SearchError>
    where
        P: SlidingPuzzle + Sync,
    {
        self.search(
            "uniform-cost",
            UniformCostOrdering::default(),
            start,
            goal,
            None::<fn(&P, &P) -> u32>,
        )
    }

    /// A* search: the frontier is ordered by `f = g + h`, ties going to the larger `g`.
    ///
    /// `heuristic` receives a state and the goal. Paths are optimal only if it is
    /// admissible; this is not checked.
    pub fn astar<P>(
        &mut self,
        start: P,
        goal: &P,
        heuristic: impl FnMut(&P, &P) -> u32,
    ) -> Result<Solution, SearchError>
    where
        P: SlidingPuzzle + Sync,
    {
        self.search(
            "astar",
            AStarOrdering::default(),
            start,
            goal,
            Some(heuristic),
        )
    }

    fn search<P, C>(
        &mut self,
        algorithm: &'static str,
        ordering: C,
        start: P,
        goal: &P,
        mut heuristic: Option<impl FnMut(&P, &P) -> u32>,
    ) -> Result<Solution, SearchError>
    where
        P: SlidingPuzzle + Sync,
        C: NodeComparator,
    {
        if !start.compatible_with(goal) {
            return Err(SearchError::MismatchedGoal {
                start: format!("{:?}", start.state_key()),
                goal: format!("{:?}", goal.state_key()),
            });
        }

        let Self {
            ref options,
            ref mut arena,
        } = *self;
        arena.reset();
        let arena = &*arena;
        let scan = &options.duplicate_scan;

        let start_time = Instant::now();
        let mut stats = SearchStats::default();
        let mut frontier = PriorityQueue::new(ordering);
        let mut expanded = ExpandedSet::new();

        debug!(
            algorithm,
            start = ?start.state_key(),
            goal = ?goal.state_key(),
            workers = scan.workers(),
            "starting search"
        );

        let mut root = SearchNode::root(start);
        if let Some(heuristic) = heuristic.as_mut() {
            root.set_h(heuristic(root.state(), goal));
        }
        frontier.push(root);

        let (termination, path) = loop {
            stats.observe_frontier_len(frontier.len());

            let Ok(node) = frontier.extract_min() else {
                break (Termination::Exhausted, vec![]);
            };

            if expanded.contains(node.key()) {
                stats.attempted_reexpansions += 1;
                continue;
            }

            if node.state().matches_goal(goal) {
                frontier.clear();
                break (Termination::GoalFound, node.path());
            }

            expanded.insert(node.key().clone());
            stats.expansions += 1;
            trace!(key = ?node.key(), g = node.g(), f = node.f(), "expanding");

            for mut successor in node.successors(arena) {
                stats.generated += 1;
                if let Some(heuristic) = heuristic.as_mut() {
                    successor.set_h(heuristic(successor.state(), goal));
                }
                resolve_successor(successor, &mut frontier, &expanded, scan, &mut stats);
            }
        };

        stats.path_length = path.len();
        stats.elapsed = start_time.elapsed();

        debug!(
            algorithm,
            ?termination,
            path_length = stats.path_length,
            expansions = stats.expansions,
            generated = stats.generated,
            max_frontier_len = stats.max_frontier_len,
            mid_heap_deletions = stats.mid_heap_deletions,
            local_loops_avoided = stats.local_loops_avoided,
            attempted_reexpansions = stats.attempted_reexpansions,
            elapsed = ?stats.elapsed,
            trail_steps = arena.steps(),
            "search finished"
        );

        Ok(Solution {
            termination,
            path,
            stats,
        })
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Searcher::new(SearchOptions::default())
    }
}

/// Runs uniform cost search with default options.
pub fn uniform_cost<P>(start: P, goal: &P) -> Result<Solution, SearchError>
where
    P: SlidingPuzzle + Sync,
{
    Searcher::default().uniform_cost(start, goal)
}

/// Runs A* search with default options.
pub fn astar<P>(
    start: P,
    goal: &P,
    heuristic: impl FnMut(&P, &P) -> u32,
) -> Result<Solution, SearchError>
where
    P: SlidingPuzzle + Sync,
{
    Searcher::default().astar(start, goal, heuristic)
}
