use std::time::Duration;

/// Counters accumulated by one search.
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    /// Nodes expanded, i.e. states added to the expanded set.
    pub expansions: u64,
    /// Successors generated across all expansions.
    pub generated: u64,
    /// Largest frontier size observed at the top of the search loop.
    pub max_frontier_len: usize,
    /// Frontier entries removed from the middle of the heap because a dominating
    /// duplicate replaced them.
    pub mid_heap_deletions: u64,
    /// Successors dropped because their state was already expanded.
    pub local_loops_avoided: u64,
    /// Popped nodes dropped because their state was already expanded.
    pub attempted_reexpansions: u64,
    /// Moves in the solution, 0 when no solution was found.
    pub path_length: usize,
    /// Wall-clock time of the search.
    pub elapsed: Duration,
}

impl SearchStats {
    /// Records a frontier size seen by the search loop.
    pub fn observe_frontier_len(&mut self, len: usize) {
        self.max_frontier_len = self.max_frontier_len.max(len);
    }

    /// Whether every counter except the elapsed time matches.
    pub fn same_counts(&self, other: &SearchStats) -> bool {
        let SearchStats {
            expansions,
            generated,
            max_frontier_len,
            mid_heap_deletions,
            local_loops_avoided,
            attempted_reexpansions,
            path_length,
            elapsed: _,
        } = *other;
        self.expansions == expansions
            && self.generated == generated
            && self.max_frontier_len == max_frontier_len
            && self.mid_heap_deletions == mid_heap_deletions
            && self.local_loops_avoided == local_loops_avoided
            && self.attempted_reexpansions == attempted_reexpansions
            && self.path_length == path_length
    }
}
