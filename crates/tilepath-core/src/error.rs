use thiserror::Error;

/// Errors reported by the frontier and the searcher.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// A node was requested from an empty frontier.
    #[error("frontier is empty")]
    EmptyFrontier,

    /// Start and goal states cannot belong to the same puzzle.
    #[error("start state {start} and goal state {goal} have different shapes")]
    MismatchedGoal {
        /// Debug rendering of the start key.
        start: String,
        /// Debug rendering of the goal key.
        goal: String,
    },
}
