//! Settings-driven subgraph projection.

use std::collections::BTreeSet;

use super::FlowGraph;
use crate::types::TypeId;

/// Derive the filtered view of a flow graph under the given settings.
///
/// Pure and total: every excluded node is dropped together with all its
/// incident edges, then every remaining edge below `min_weight`. The
/// resulting node set is the graph's nodes minus the exclusions; nodes
/// left without edges are retained as isolated nodes. This is a
/// projection, never a connectivity trim.
///
/// The operation is monotone: widening the exclusion set or raising
/// `min_weight` can only remove nodes and edges, never add.
pub fn filter_flow_graph(
    graph: &FlowGraph,
    min_weight: u8,
    excluded: &BTreeSet<TypeId>,
) -> FlowGraph {
    let mut view = FlowGraph::default();

    for node in graph.nodes() {
        if !excluded.contains(node) {
            view.insert_node(node.clone());
        }
    }

    for edge in graph.edges() {
        if edge.weight >= min_weight
            && !excluded.contains(&edge.source)
            && !excluded.contains(&edge.target)
        {
            view.insert_edge(edge.clone());
        }
    }

    view
}
