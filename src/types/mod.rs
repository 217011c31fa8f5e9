//! Core types for the flow analysis kernel.

pub mod flow;
pub mod rule;
pub mod ty;

pub use flow::{EdgeRecord, FlowEdge, Path};
pub use rule::AccessRule;
pub use ty::TypeId;
