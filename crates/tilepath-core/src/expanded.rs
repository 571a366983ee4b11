use std::hash::Hash;

use ahash::AHashSet;

/// Set of state keys that have been fully expanded.
///
/// Keys are only ever added: once a state is in the set, no node with that state is
/// expanded again or admitted to the frontier.
pub struct ExpandedSet<K> {
    keys: AHashSet<K>,
}

impl<K: Hash + Eq> ExpandedSet<K> {
    /// Empty set.
    pub fn new() -> Self {
        ExpandedSet {
            keys: AHashSet::new(),
        }
    }

    /// Whether `key` has been expanded.
    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, key: K) -> bool {
        self.keys.insert(key)
    }

    /// Number of expanded states.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether nothing has been expanded yet.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Hash + Eq> Default for ExpandedSet<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn membership_is_monotonic() {
    let mut expanded = ExpandedSet::new();
    assert!(!expanded.contains(&"1,2,3,0"));
    assert!(expanded.insert("1,2,3,0"));
    assert!(!expanded.insert("1,2,3,0"));
    assert!(expanded.insert("1,2,0,3"));
    assert!(expanded.contains(&"1,2,3,0"));
    assert_eq!(expanded.len(), 2);
}
