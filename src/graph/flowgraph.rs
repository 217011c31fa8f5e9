//! The directed weighted flow multigraph.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use xxhash_rust::xxh64::xxh64;

use crate::types::{FlowEdge, TypeId};

/// Directed weighted graph of possible information flows.
///
/// Nodes are every type touched by at least one classifying rule; each
/// (source, target) pair carries one [`FlowEdge`] aggregating every
/// justifying record. Adjacency is an explicit ordered structure, so
/// enumeration order is always type-name order, never incidental hash
/// order.
///
/// A `FlowGraph` is immutable once built. Filtered views produced by
/// [`filter_flow_graph`](super::filter_flow_graph) are the same type:
/// a projection has identical structure.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    /// source -> target -> edge.
    edges: BTreeMap<TypeId, BTreeMap<TypeId, FlowEdge>>,
    /// target -> sources, for incoming-edge queries.
    reverse: BTreeMap<TypeId, BTreeSet<TypeId>>,
    /// All nodes, including isolated ones.
    nodes: BTreeSet<TypeId>,
}

/// Size statistics for a flow graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    /// Node count, isolated nodes included.
    pub nodes: usize,
    /// Directed edge count.
    pub edges: usize,
    /// Total justifying records across all edges.
    pub records: usize,
}

impl FlowGraph {
    /// Register a node without requiring an edge.
    pub(crate) fn insert_node(&mut self, node: TypeId) {
        self.nodes.insert(node);
    }

    /// Get or create the edge (source, target), registering both
    /// endpoints and the reverse index.
    pub(crate) fn upsert_edge(&mut self, source: &TypeId, target: &TypeId) -> &mut FlowEdge {
        self.nodes.insert(source.clone());
        self.nodes.insert(target.clone());
        self.reverse
            .entry(target.clone())
            .or_default()
            .insert(source.clone());
        self.edges
            .entry(source.clone())
            .or_default()
            .entry(target.clone())
            .or_insert_with(|| FlowEdge::new(source.clone(), target.clone()))
    }

    /// Insert a fully-formed edge (used when projecting a view).
    pub(crate) fn insert_edge(&mut self, edge: FlowEdge) {
        self.nodes.insert(edge.source.clone());
        self.nodes.insert(edge.target.clone());
        self.reverse
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.source.clone());
        self.edges
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.target.clone(), edge);
    }

    /// Impose the canonical record order on every edge.
    pub(crate) fn sort_records(&mut self) {
        for targets in self.edges.values_mut() {
            for edge in targets.values_mut() {
                edge.records.sort();
            }
        }
    }

    /// Whether the graph contains a node.
    pub fn contains_node(&self, node: &TypeId) -> bool {
        self.nodes.contains(node)
    }

    /// All nodes, in name order.
    pub fn nodes(&self) -> impl Iterator<Item = &TypeId> {
        self.nodes.iter()
    }

    /// Node count, isolated nodes included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Directed edge count.
    pub fn num_edges(&self) -> usize {
        self.edges.values().map(BTreeMap::len).sum()
    }

    /// Look up the edge (source, target).
    pub fn edge(&self, source: &TypeId, target: &TypeId) -> Option<&FlowEdge> {
        self.edges.get(source).and_then(|targets| targets.get(target))
    }

    /// Outgoing edges of a node, in target-name order.
    pub fn out_edges(&self, source: &TypeId) -> impl Iterator<Item = &FlowEdge> {
        self.edges
            .get(source)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    /// Incoming edges of a node, in source-name order.
    pub fn in_edges<'a>(&'a self, target: &'a TypeId) -> impl Iterator<Item = &'a FlowEdge> + 'a {
        self.reverse.get(target).into_iter().flat_map(move |sources| {
            sources
                .iter()
                .filter_map(move |source| self.edge(source, target))
        })
    }

    /// Successor nodes of a node, in name order.
    pub fn successors(&self, source: &TypeId) -> impl Iterator<Item = &TypeId> {
        self.edges.get(source).into_iter().flat_map(BTreeMap::keys)
    }

    /// All edges, ordered by (source, target) name.
    pub fn edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.edges.values().flat_map(BTreeMap::values)
    }

    /// Size statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.num_nodes(),
            edges: self.num_edges(),
            records: self.edges().map(|e| e.records.len()).sum(),
        }
    }

    /// Stable hex digest of the canonical edge list.
    ///
    /// Identical rules and permission map produce an identical
    /// fingerprint regardless of rule enumeration order.
    pub fn fingerprint(&self) -> String {
        let edges: Vec<&FlowEdge> = self.edges().collect();
        let payload = (crate::FLOW_KERNEL_SCHEMA_VERSION, edges);
        let bytes = serde_json::to_vec(&payload).expect("canonical serialization failed");
        format!("{:016x}", xxh64(&bytes, 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccessRule;
    use std::collections::BTreeSet as Set;
    use std::sync::Arc;

    fn ty(name: &str) -> TypeId {
        TypeId::new(name)
    }

    fn add_edge(graph: &mut FlowGraph, source: &str, target: &str, weight: u8) {
        let rule = Arc::new(AccessRule::new(source, target, "infoflow", ["p"]));
        graph
            .upsert_edge(&ty(source), &ty(target))
            .push_record(&rule, rule.perms.clone(), weight);
    }

    #[test]
    fn test_upsert_maintains_nodes_and_reverse() {
        let mut graph = FlowGraph::default();
        add_edge(&mut graph, "a", "b", 5);
        add_edge(&mut graph, "c", "b", 3);

        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 2);

        let b = ty("b");
        let sources: Set<&str> = graph.in_edges(&b).map(|e| e.source.as_str()).collect();
        assert_eq!(sources, Set::from(["a", "c"]));
    }

    #[test]
    fn test_out_edges_in_target_order() {
        let mut graph = FlowGraph::default();
        add_edge(&mut graph, "a", "c", 1);
        add_edge(&mut graph, "a", "b", 1);

        let targets: Vec<&str> = graph.out_edges(&ty("a")).map(|e| e.target.as_str()).collect();
        assert_eq!(targets, ["b", "c"]);
    }

    #[test]
    fn test_isolated_node() {
        let mut graph = FlowGraph::default();
        graph.insert_node(ty("lonely"));

        assert!(graph.contains_node(&ty("lonely")));
        assert_eq!(graph.out_edges(&ty("lonely")).count(), 0);
        assert_eq!(graph.in_edges(&ty("lonely")).count(), 0);
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let mut g1 = FlowGraph::default();
        add_edge(&mut g1, "a", "b", 5);

        let mut g2 = FlowGraph::default();
        add_edge(&mut g2, "a", "b", 5);

        assert_eq!(g1.fingerprint(), g2.fingerprint());

        add_edge(&mut g2, "b", "c", 2);
        assert_ne!(g1.fingerprint(), g2.fingerprint());
    }

    #[test]
    fn test_stats_counts_records() {
        let mut graph = FlowGraph::default();
        add_edge(&mut graph, "a", "b", 5);
        add_edge(&mut graph, "a", "b", 9);
        add_edge(&mut graph, "b", "c", 2);

        let stats = graph.stats();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.records, 3);
    }
}
