//! Traversal algorithms over a flow graph snapshot.
//!
//! The path iterators either own an `Arc` snapshot of the graph they
//! walk or copy every edge they may yield up front, so results stay
//! valid while the originating analysis mutates its settings. Successor
//! enumeration order is always type-name order.

pub mod paths;
pub mod shortest;

pub use paths::AllPaths;
pub use shortest::{shortest_path, AllShortestPaths};
