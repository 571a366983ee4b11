use std::cmp::Reverse;

use crate::duplicate::DuplicateScan;
use crate::error::SearchError;
use crate::node::SearchNode;
use crate::traits::SlidingPuzzle;

/// Trait for ordering [`SearchNode`]s by their cost field(s).
///
/// Fields compare ascending on their own; wrap one in [`Reverse`] to compare it descending,
/// and combine them in a tuple to compare lexicographically.
pub trait NodeComparator {
    /// Perform `<=` comparison.
    fn le<P: SlidingPuzzle>(&self, lhs: &SearchNode<P>, rhs: &SearchNode<P>) -> bool;

    /// Whether `lhs` orders strictly before `rhs`.
    fn lt<P: SlidingPuzzle>(&self, lhs: &SearchNode<P>, rhs: &SearchNode<P>) -> bool {
        !self.le(rhs, lhs)
    }
}

/// Orders by path cost.
#[derive(Clone, Copy, Debug, Default)]
pub struct GCost;

/// Orders by total estimate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FCost;

impl NodeComparator for GCost {
    fn le<P: SlidingPuzzle>(&self, lhs: &SearchNode<P>, rhs: &SearchNode<P>) -> bool {
        lhs.g() <= rhs.g()
    }
}

impl NodeComparator for FCost {
    fn le<P: SlidingPuzzle>(&self, lhs: &SearchNode<P>, rhs: &SearchNode<P>) -> bool {
        lhs.f() <= rhs.f()
    }
}

impl<C: NodeComparator> NodeComparator for Reverse<C> {
    fn le<P: SlidingPuzzle>(&self, lhs: &SearchNode<P>, rhs: &SearchNode<P>) -> bool {
        self.0.le(rhs, lhs)
    }
}

macro_rules! tuple_nodecmp_impl {
    ($($typ:ident $index:tt)*) => {
        impl<$($typ: NodeComparator),*> NodeComparator for ($($typ,)*) {
            fn le<P: SlidingPuzzle>(&self, lhs: &SearchNode<P>, rhs: &SearchNode<P>) -> bool {
                tuple_nodecmp_impl!(@cmp self lhs rhs $($index)*)
            }
        }
    };
    (@cmp $self:ident $lhs:ident $rhs:ident $last:tt) => {
        $self.$last.le($lhs, $rhs)
    };
    (@cmp $self:ident $lhs:ident $rhs:ident $next:tt $($rest:tt)+) => {{
        let l_leq_r = $self.$next.le($lhs, $rhs);
        let r_leq_l = $self.$next.le($rhs, $lhs);
        if l_leq_r && r_leq_l {
            tuple_nodecmp_impl!(@cmp $self $lhs $rhs $($rest)*)
        } else {
            l_leq_r
        }
    }};
}

tuple_nodecmp_impl!(A 0);
tuple_nodecmp_impl!(A 0 B 1);
tuple_nodecmp_impl!(A 0 B 1 C 2);

/// Uniform cost ordering: cheapest path first.
pub type UniformCostOrdering = GCost;

/// A* ordering: lowest `f` first, ties going to the node deeper into the search.
pub type AStarOrdering = (FCost, Reverse<GCost>);

/// Binary min-heap of [`SearchNode`]s under a [`NodeComparator`].
///
/// The heap owns its nodes. Besides popping the minimum, an arbitrary entry can be located
/// by state key and removed, after which the heap order is rebuilt.
pub struct PriorityQueue<'a, P: SlidingPuzzle, C> {
    cmp: C,
    heap: Vec<SearchNode<'a, P>>,
}

impl<'a, P: SlidingPuzzle, C: NodeComparator> PriorityQueue<'a, P, C> {
    /// Empty queue ordered by `cmp`.
    pub fn new(cmp: C) -> Self {
        PriorityQueue { cmp, heap: vec![] }
    }

    /// Ordering in use.
    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Number of nodes on the frontier.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the frontier is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The node that [`PriorityQueue::extract_min`] would return.
    pub fn peek(&self) -> Option<&SearchNode<'a, P>> {
        self.heap.first()
    }

    /// Read-only view of the backing storage, in heap order.
    pub fn as_slice(&self) -> &[SearchNode<'a, P>] {
        &self.heap
    }

    /// Nodes in heap order.
    pub fn iter(&self) -> std::slice::Iter<'_, SearchNode<'a, P>> {
        self.heap.iter()
    }

    /// Inserts a node.
    pub fn push(&mut self, node: SearchNode<'a, P>) {
        self.heap.push(node);
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes the node ordered first, or fails with [`SearchError::EmptyFrontier`].
    pub fn extract_min(&mut self) -> Result<SearchNode<'a, P>, SearchError> {
        if self.heap.is_empty() {
            return Err(SearchError::EmptyFrontier);
        }
        let ret = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Ok(ret)
    }

    /// Index of the entry whose state key equals `key`, if any.
    pub fn position_of(&self, key: &P::Key, scan: &DuplicateScan) -> Option<usize>
    where
        P: Sync,
    {
        scan.find(&self.heap, key)
    }

    /// Removes the entry at `index` and rebuilds the heap order.
    pub fn remove_at(&mut self, index: usize) -> SearchNode<'a, P> {
        let removed = self.heap.remove(index);
        self.heapify();
        debug_assert!(self.is_heap());
        removed
    }

    /// Drops every queued node.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Whether every parent orders no later than its children.
    pub fn is_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| self.cmp.le(&self.heap[(i - 1) / 2], &self.heap[i]))
    }

    fn heapify(&mut self) {
        for index in (0..self.heap.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent_index = (index - 1) / 2;
            if self.cmp.le(&self.heap[parent_index], &self.heap[index]) {
                break;
            }
            self.heap.swap(parent_index, index);
            index = parent_index;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let child_1_index = index * 2 + 1;
            if child_1_index >= self.heap.len() {
                break;
            }

            let child_2_index = child_1_index + 1;
            let child_index = if child_2_index < self.heap.len()
                && !self.cmp.le(&self.heap[child_1_index], &self.heap[child_2_index])
            {
                child_2_index
            } else {
                child_1_index
            };

            if self.cmp.le(&self.heap[index], &self.heap[child_index]) {
                break;
            }

            self.heap.swap(index, child_index);
            index = child_index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Line;

    fn node(pos: u8, g: u32, h: u32) -> SearchNode<'static, Line> {
        let mut node = SearchNode::root(Line::at(pos));
        node.force_g(g);
        node.set_h(h);
        node
    }

    #[test]
    fn extract_min_on_empty_queue_fails() {
        let mut queue: PriorityQueue<Line, GCost> = PriorityQueue::new(GCost);
        assert!(matches!(queue.extract_min(), Err(SearchError::EmptyFrontier)));
    }

    #[test]
    fn uniform_cost_pops_cheapest_path_first() {
        let mut queue = PriorityQueue::new(UniformCostOrdering::default());
        for (pos, g) in [(0, 7), (1, 3), (2, 9), (3, 1), (4, 5)] {
            queue.push(node(pos, g, 0));
        }
        let order: Vec<_> = std::iter::from_fn(|| queue.extract_min().ok())
            .map(|n| n.g())
            .collect();
        assert_eq!(order, [1, 3, 5, 7, 9]);
    }

    #[test]
    fn astar_breaks_f_ties_towards_deeper_nodes() {
        let mut queue = PriorityQueue::new(AStarOrdering::default());
        queue.push(node(0, 2, 4));
        queue.push(node(1, 5, 1));
        queue.push(node(2, 4, 2));
        queue.push(node(3, 0, 5));

        let first = queue.extract_min().unwrap();
        assert_eq!((first.f(), first.g()), (5, 0));
        let order: Vec<_> = std::iter::from_fn(|| queue.extract_min().ok())
            .map(|n| (n.f(), n.g()))
            .collect();
        assert_eq!(order, [(6, 5), (6, 4), (6, 2)]);
    }

    #[test]
    fn strict_order_is_derived_from_le() {
        let cmp = AStarOrdering::default();
        let shallow = node(0, 2, 4);
        let deep = node(0, 4, 2);
        let worse = node(0, 1, 9);
        assert!(cmp.lt(&deep, &shallow));
        assert!(!cmp.lt(&shallow, &deep));
        assert!(!cmp.lt(&deep, &node(0, 4, 2)));
        assert!(cmp.lt(&shallow, &worse));
    }

    #[test]
    fn interior_removal_keeps_heap_valid() {
        let mut queue = PriorityQueue::new(GCost);
        for pos in 0..20 {
            queue.push(node(pos, u32::from((pos * 7) % 11), 0));
        }
        assert!(queue.is_heap());

        let index = queue
            .position_of(&Line::at(13).state_key(), &DuplicateScan::Sequential)
            .unwrap();
        let removed = queue.remove_at(index);
        assert_eq!(removed.state(), &Line::at(13));
        assert_eq!(queue.len(), 19);
        assert!(queue.is_heap());
        assert_eq!(
            queue.position_of(&Line::at(13).state_key(), &DuplicateScan::Sequential),
            None
        );

        let mut last = 0;
        while let Ok(n) = queue.extract_min() {
            assert!(n.g() >= last);
            last = n.g();
        }
    }

    #[test]
    fn peek_matches_next_pop() {
        let mut queue = PriorityQueue::new(GCost);
        queue.push(node(0, 4, 0));
        queue.push(node(1, 2, 0));
        assert_eq!(queue.peek().map(SearchNode::g), Some(2));
        assert_eq!(queue.extract_min().unwrap().g(), 2);
    }
}
