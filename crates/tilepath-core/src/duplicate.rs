use std::fmt;
use std::num::NonZeroUsize;

use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::expanded::ExpandedSet;
use crate::node::SearchNode;
use crate::pqueue::{NodeComparator, PriorityQueue};
use crate::stats::SearchStats;
use crate::traits::SlidingPuzzle;

/// Frontiers shorter than this are scanned sequentially even when a worker pool exists.
pub const DEFAULT_PARALLEL_MIN_LEN: usize = 4096;

/// How the frontier is scanned for an entry with a given state key.
#[derive(Default)]
pub enum DuplicateScan {
    /// Linear scan with early exit.
    #[default]
    Sequential,
    /// Each worker of a fixed-size pool scans one contiguous chunk of the frontier.
    Parallel(ParallelScan),
}

/// Worker pool and threshold of [`DuplicateScan::Parallel`].
pub struct ParallelScan {
    pool: ThreadPool,
    workers: NonZeroUsize,
    min_len: usize,
}

impl DuplicateScan {
    /// A parallel scan with one worker per logical CPU.
    pub fn parallel() -> Result<Self, ThreadPoolBuildError> {
        let workers = NonZeroUsize::new(num_cpus::get()).unwrap_or(NonZeroUsize::MIN);
        Self::with_workers(workers, DEFAULT_PARALLEL_MIN_LEN)
    }

    /// A parallel scan with `workers` threads, used once the frontier holds at least
    /// `min_len` nodes.
    pub fn with_workers(
        workers: NonZeroUsize,
        min_len: usize,
    ) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|i| format!("tilepath-scan-{i}"))
            .build()?;
        Ok(DuplicateScan::Parallel(ParallelScan {
            pool,
            workers,
            min_len,
        }))
    }

    /// Number of threads scanning, 1 for [`DuplicateScan::Sequential`].
    pub fn workers(&self) -> usize {
        match self {
            DuplicateScan::Sequential => 1,
            DuplicateScan::Parallel(scan) => scan.workers.get(),
        }
    }

    /// Finds the index of the node in `nodes` whose key equals `key`.
    ///
    /// The parallel variant returns the same index as the sequential one as long as `nodes`
    /// holds at most one node per key, which the resolver maintains for the frontier.
    pub fn find<P>(&self, nodes: &[SearchNode<P>], key: &P::Key) -> Option<usize>
    where
        P: SlidingPuzzle + Sync,
    {
        match self {
            DuplicateScan::Parallel(scan) if nodes.len() >= scan.min_len.max(2) => {
                scan.find(nodes, key)
            }
            _ => nodes.iter().position(|node| node.key() == key),
        }
    }
}

impl ParallelScan {
    fn find<P>(&self, nodes: &[SearchNode<P>], key: &P::Key) -> Option<usize>
    where
        P: SlidingPuzzle + Sync,
    {
        let chunk_len = nodes.len().div_ceil(self.workers.get());
        let found = Mutex::new(None);

        self.pool.install(|| {
            nodes
                .par_chunks(chunk_len)
                .enumerate()
                .for_each(|(chunk, nodes)| {
                    if found.lock().is_some() {
                        return;
                    }
                    if let Some(offset) = nodes.iter().position(|node| node.key() == key) {
                        let mut found = found.lock();
                        // first publisher wins
                        if found.is_none() {
                            *found = Some(chunk * chunk_len + offset);
                        }
                    }
                });
        });

        found.into_inner()
    }
}

impl fmt::Debug for DuplicateScan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateScan::Sequential => f.write_str("Sequential"),
            DuplicateScan::Parallel(scan) => f
                .debug_struct("Parallel")
                .field("workers", &scan.workers)
                .field("min_len", &scan.min_len)
                .finish(),
        }
    }
}

/// What happened to a generated successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Its state was already expanded; the successor was dropped.
    AlreadyExpanded,
    /// No node with its state was queued; the successor was queued.
    Inserted,
    /// It dominated the queued node with its state, which was removed from the middle of
    /// the heap and replaced by the successor.
    Replaced,
    /// A queued node with its state was at least as good; the successor was dropped.
    Dominated,
}

/// Routes a freshly generated successor into the frontier.
///
/// The successor dominates a queued node with the same state when it orders strictly
/// before it under the frontier's comparator: a strictly lower `g` for uniform cost
/// ordering, and a strictly lower `f` or an equal `f` with a strictly higher `g` for A*
/// ordering.
pub fn resolve_successor<'a, P, C>(
    successor: SearchNode<'a, P>,
    frontier: &mut PriorityQueue<'a, P, C>,
    expanded: &ExpandedSet<P::Key>,
    scan: &DuplicateScan,
    stats: &mut SearchStats,
) -> Disposition
where
    P: SlidingPuzzle + Sync,
    C: NodeComparator,
{
    if expanded.contains(successor.key()) {
        stats.local_loops_avoided += 1;
        return Disposition::AlreadyExpanded;
    }

    let Some(index) = frontier.position_of(successor.key(), scan) else {
        frontier.push(successor);
        return Disposition::Inserted;
    };

    if frontier.comparator().lt(&successor, &frontier.as_slice()[index]) {
        frontier.remove_at(index);
        stats.mid_heap_deletions += 1;
        frontier.push(successor);
        Disposition::Replaced
    } else {
        Disposition::Dominated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TrailArena;
    use crate::pqueue::{AStarOrdering, UniformCostOrdering};
    use crate::testing::Line;
    use crate::traits::Direction;

    fn queued(pos: u8, g: u32, h: u32) -> SearchNode<'static, Line> {
        let mut node = SearchNode::root(Line::at(pos));
        node.force_g(g);
        node.set_h(h);
        node
    }

    #[test]
    fn successor_of_expanded_state_is_dropped() {
        let arena = TrailArena::new();
        let mut frontier = PriorityQueue::new(UniformCostOrdering::default());
        let mut expanded = ExpandedSet::new();
        let mut stats = SearchStats::default();

        let root = SearchNode::root(Line::at(3));
        expanded.insert(root.key().clone());
        let back = root.successor(Direction::Right, &arena).successor(Direction::Left, &arena);

        let disposition = resolve_successor(
            back,
            &mut frontier,
            &expanded,
            &DuplicateScan::Sequential,
            &mut stats,
        );
        assert_eq!(disposition, Disposition::AlreadyExpanded);
        assert_eq!(stats.local_loops_avoided, 1);
        assert!(frontier.is_empty());
    }

    #[test]
    fn cheaper_duplicate_replaces_queued_node() {
        let mut frontier = PriorityQueue::new(UniformCostOrdering::default());
        let expanded = ExpandedSet::new();
        let mut stats = SearchStats::default();
        let scan = DuplicateScan::Sequential;

        for (pos, g) in [(1, 2), (5, 5), (7, 3), (9, 6)] {
            resolve_successor(queued(pos, g, 0), &mut frontier, &expanded, &scan, &mut stats);
        }

        let disposition =
            resolve_successor(queued(5, 3, 0), &mut frontier, &expanded, &scan, &mut stats);
        assert_eq!(disposition, Disposition::Replaced);
        assert_eq!(stats.mid_heap_deletions, 1);
        assert_eq!(frontier.len(), 4);
        assert!(frontier.is_heap());

        let survivors: Vec<_> = frontier
            .iter()
            .filter(|node| node.state() == &Line::at(5))
            .map(SearchNode::g)
            .collect();
        assert_eq!(survivors, [3]);
    }

    #[test]
    fn equal_or_worse_duplicate_is_dropped() {
        let mut frontier = PriorityQueue::new(UniformCostOrdering::default());
        let expanded = ExpandedSet::new();
        let mut stats = SearchStats::default();
        let scan = DuplicateScan::Sequential;

        resolve_successor(queued(4, 3, 0), &mut frontier, &expanded, &scan, &mut stats);
        for g in [3, 8] {
            let disposition =
                resolve_successor(queued(4, g, 0), &mut frontier, &expanded, &scan, &mut stats);
            assert_eq!(disposition, Disposition::Dominated);
        }
        assert_eq!(stats.mid_heap_deletions, 0);
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.peek().map(SearchNode::g), Some(3));
    }

    #[test]
    fn astar_prefers_deeper_duplicate_on_equal_f() {
        let mut frontier = PriorityQueue::new(AStarOrdering::default());
        let expanded = ExpandedSet::new();
        let mut stats = SearchStats::default();
        let scan = DuplicateScan::Sequential;

        resolve_successor(queued(2, 1, 5), &mut frontier, &expanded, &scan, &mut stats);
        resolve_successor(queued(6, 0, 9), &mut frontier, &expanded, &scan, &mut stats);

        let deeper = queued(2, 4, 2);
        assert_eq!(
            resolve_successor(deeper, &mut frontier, &expanded, &scan, &mut stats),
            Disposition::Replaced
        );
        let shallower = queued(2, 3, 3);
        assert_eq!(
            resolve_successor(shallower, &mut frontier, &expanded, &scan, &mut stats),
            Disposition::Dominated
        );
        let higher_f = queued(2, 5, 3);
        assert_eq!(
            resolve_successor(higher_f, &mut frontier, &expanded, &scan, &mut stats),
            Disposition::Dominated
        );
        assert_eq!(stats.mid_heap_deletions, 1);

        let first = frontier.extract_min().unwrap();
        assert_eq!((first.state(), first.g(), first.f()), (&Line::at(2), 4, 6));
    }

    #[test]
    fn parallel_scan_agrees_with_sequential_scan() {
        let parallel = DuplicateScan::with_workers(NonZeroUsize::new(3).unwrap(), 0).unwrap();
        let nodes: Vec<_> = (0..50).map(|pos| queued(pos, 0, 0)).collect();

        for pos in [0, 1, 16, 17, 33, 49, 50, 200] {
            let key = Line::at(pos).state_key();
            assert_eq!(
                parallel.find(&nodes, &key),
                DuplicateScan::Sequential.find(&nodes, &key),
                "position {pos}"
            );
        }
        assert_eq!(parallel.workers(), 3);
    }
}
