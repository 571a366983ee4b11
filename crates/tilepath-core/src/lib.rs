#![warn(missing_docs)]
//! Core types for `tilepath`: search nodes, the frontier and the duplicate resolver.
//!
//! The searcher in the `tilepath` crate drives these; puzzles plug in through
//! [`traits::SlidingPuzzle`].

mod node;
mod pqueue;
mod expanded;
mod duplicate;
mod error;
mod stats;
pub mod traits;

#[cfg(test)]
mod testing;

pub use crate::node::*;
pub use crate::pqueue::*;
pub use crate::expanded::*;
pub use crate::duplicate::*;
pub use crate::error::*;
pub use crate::stats::*;
