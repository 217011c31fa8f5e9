//! Flow graph construction and filtering.

pub mod builder;
pub mod filter;
pub mod flowgraph;

pub use builder::{build_flow_graph, BuildError};
pub use filter::filter_flow_graph;
pub use flowgraph::{FlowGraph, GraphStats};
