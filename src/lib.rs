//! # infoflow-kernel
//!
//! Information flow analysis for type-enforcement policies.
//!
//! The kernel answers one question:
//!
//! > Given the access rules a policy grants, how can information move
//! > between security types, and through which rules?
//!
//! ## Core Contract
//!
//! 1. Classify every rule's permissions into directed, weighted flows
//! 2. Aggregate them into an immutable directed multigraph
//! 3. Answer path and flow queries over a settings-filtered view
//!
//! ## Architecture
//!
//! ```text
//! Rules + PermissionMap → FlowGraph → filter(settings) → queries
//!                                           ↑
//!                               InfoFlowAnalysis (façade)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same rules + same permission map → identical graph fingerprint,
//!   regardless of rule enumeration order
//! - Adjacency and traversal order is type-name order
//! - Edge records are ordered canonically by originating rule

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod graph;
pub mod permmap;
pub mod policy;
pub mod query;
pub mod types;

// Re-exports
pub use analysis::{AnalysisError, InfoFlowAnalysis, QuerySettings};
pub use graph::{build_flow_graph, filter_flow_graph, BuildError, FlowGraph, GraphStats};
pub use permmap::{
    FlowDirection, MemoryPermissionMap, PermMapError, PermissionEntry, PermissionMap, MAX_WEIGHT,
    MIN_WEIGHT,
};
pub use policy::{MemoryPolicy, PolicySource};
pub use query::{AllPaths, AllShortestPaths};
pub use types::{AccessRule, EdgeRecord, FlowEdge, Path, TypeId};

/// Schema version for exported analysis types; part of every graph
/// fingerprint. Increment on breaking changes to any exported type.
pub const FLOW_KERNEL_SCHEMA_VERSION: &str = "1.0.0";
