//! Information flow analysis façade.
//!
//! Owns the query settings, builds the full flow graph once per
//! (policy, permission map) pair, and rebuilds the filtered view lazily
//! whenever a setting changed and a query is issued:
//!
//! ```text
//! Absent -> Built(settings) -> Stale (on any setter) -> Built(new)
//! ```

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::graph::{build_flow_graph, filter_flow_graph, BuildError, FlowGraph, GraphStats};
use crate::permmap::{PermissionMap, MAX_WEIGHT, MIN_WEIGHT};
use crate::policy::PolicySource;
use crate::query::{self, AllPaths, AllShortestPaths};
use crate::types::{FlowEdge, Path, TypeId};

/// Error type for analysis operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    /// A type name the policy cannot resolve.
    #[error("unknown type: {0}")]
    UnknownType(String),
    /// A minimum weight outside the valid range. The rejected setting
    /// never takes effect.
    #[error("minimum weight {0} outside {MIN_WEIGHT}..={MAX_WEIGHT}")]
    WeightOutOfRange(u8),
    /// Graph construction failed on a configuration fault.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Caller-controlled query settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySettings {
    /// Minimum edge weight visible to queries, in
    /// `[MIN_WEIGHT, MAX_WEIGHT]`.
    pub min_weight: u8,
    /// Types removed from the filtered view with all incident edges.
    pub excluded: BTreeSet<TypeId>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            min_weight: MIN_WEIGHT,
            excluded: BTreeSet::new(),
        }
    }
}

/// Information flow analysis over a policy and a permission map.
///
/// The full flow graph and every filtered view are immutable `Arc`
/// snapshots, safe to read from produced iterators while settings
/// change. The façade's own state is not synchronized: concurrent
/// consumers serialize calls on one instance or take an instance each.
#[derive(Debug)]
pub struct InfoFlowAnalysis<P, M> {
    policy: P,
    permmap: M,
    settings: QuerySettings,
    graph: Option<Arc<FlowGraph>>,
    subgraph: Option<Arc<FlowGraph>>,
    stale: bool,
}

impl<P: PolicySource, M: PermissionMap> InfoFlowAnalysis<P, M> {
    /// Create an analysis. No graph is built until the first query.
    pub fn new(policy: P, permmap: M) -> Self {
        Self {
            policy,
            permmap,
            settings: QuerySettings::default(),
            graph: None,
            subgraph: None,
            stale: true,
        }
    }

    /// Current minimum-weight setting.
    pub fn min_weight(&self) -> u8 {
        self.settings.min_weight
    }

    /// Currently excluded types.
    pub fn excluded(&self) -> &BTreeSet<TypeId> {
        &self.settings.excluded
    }

    /// Set the minimum edge weight visible to queries.
    ///
    /// Fails outside `[MIN_WEIGHT, MAX_WEIGHT]`, leaving the previous
    /// value intact. On success the filtered view is marked stale; the
    /// rebuild happens on the next query.
    pub fn set_min_weight(&mut self, weight: u8) -> Result<(), AnalysisError> {
        if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&weight) {
            return Err(AnalysisError::WeightOutOfRange(weight));
        }
        self.settings.min_weight = weight;
        self.stale = true;
        Ok(())
    }

    /// Replace the excluded-type set.
    ///
    /// Every name resolves through the policy before anything changes:
    /// the first unresolvable name fails the whole call with the
    /// previous exclusion set intact. An empty iterator clears the set.
    /// On success the filtered view is marked stale; the rebuild
    /// happens on the next query.
    pub fn set_exclude(
        &mut self,
        names: impl IntoIterator<Item = impl AsRef<str>>,
    ) -> Result<(), AnalysisError> {
        let mut excluded = BTreeSet::new();
        for name in names {
            excluded.insert(self.resolve(name.as_ref())?);
        }
        self.settings.excluded = excluded;
        self.stale = true;
        Ok(())
    }

    /// Clear the excluded-type set.
    pub fn clear_exclude(&mut self) {
        self.settings.excluded.clear();
        self.stale = true;
    }

    /// Every simple directed path from `source` to `target` in the
    /// current filtered view, lazily.
    ///
    /// Paths carry at most `max_len` edges when a bound is given;
    /// `None` means unbounded (callers are responsible for bounding
    /// enumeration cost on dense graphs). An endpoint that is excluded
    /// or absent from the view yields an empty iterator, never an
    /// error; only an unknown type name fails.
    pub fn all_paths(
        &mut self,
        source: &str,
        target: &str,
        max_len: Option<usize>,
    ) -> Result<AllPaths, AnalysisError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        let view = self.current_view()?;
        Ok(AllPaths::new(view, &source, &target, max_len))
    }

    /// Every minimum-length path from `source` to `target` in the
    /// current filtered view, lazily. Empty when no path exists.
    pub fn all_shortest_paths(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<AllShortestPaths, AnalysisError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        let view = self.current_view()?;
        Ok(AllShortestPaths::new(&view, &source, &target))
    }

    /// One minimum-length path from `source` to `target`, `None` when
    /// no path exists. Among tied paths the choice is deterministic but
    /// callers should rely only on the length.
    pub fn shortest_path(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<Option<Path>, AnalysisError> {
        let source = self.resolve(source)?;
        let target = self.resolve(target)?;
        let view = self.current_view()?;
        Ok(query::shortest_path(&view, &source, &target))
    }

    /// Direct flows of one type in the current filtered view: one flow
    /// per outgoing edge when `out` is true (each with
    /// `source == ty`), one per incoming edge otherwise (each with
    /// `target == ty`). A type absent from the view yields no flows.
    pub fn infoflows(&mut self, ty: &str, out: bool) -> Result<Vec<FlowEdge>, AnalysisError> {
        let ty = self.resolve(ty)?;
        let view = self.current_view()?;
        if !view.contains_node(&ty) {
            return Ok(Vec::new());
        }
        let flows = if out {
            view.out_edges(&ty).cloned().collect()
        } else {
            view.in_edges(&ty).cloned().collect()
        };
        Ok(flows)
    }

    /// Size statistics of the full flow graph (settings do not apply).
    pub fn graph_stats(&mut self) -> Result<GraphStats, AnalysisError> {
        Ok(self.full_graph()?.stats())
    }

    fn resolve(&self, name: &str) -> Result<TypeId, AnalysisError> {
        self.policy
            .lookup_type(name)
            .ok_or_else(|| AnalysisError::UnknownType(name.to_string()))
    }

    /// The full graph, built on first use and reused afterwards.
    fn full_graph(&mut self) -> Result<Arc<FlowGraph>, AnalysisError> {
        if let Some(graph) = &self.graph {
            return Ok(Arc::clone(graph));
        }
        let graph = Arc::new(build_flow_graph(self.policy.rules(), &self.permmap)?);
        self.graph = Some(Arc::clone(&graph));
        Ok(graph)
    }

    /// The filtered view for the current settings, rebuilt when stale.
    fn current_view(&mut self) -> Result<Arc<FlowGraph>, AnalysisError> {
        if !self.stale {
            if let Some(view) = &self.subgraph {
                return Ok(Arc::clone(view));
            }
        }
        let full = self.full_graph()?;
        let view = Arc::new(filter_flow_graph(
            &full,
            self.settings.min_weight,
            &self.settings.excluded,
        ));
        tracing::debug!(
            min_weight = self.settings.min_weight,
            excluded = self.settings.excluded.len(),
            nodes = view.num_nodes(),
            edges = view.num_edges(),
            "filtered view rebuilt"
        );
        self.subgraph = Some(Arc::clone(&view));
        self.stale = false;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permmap::{FlowDirection, MemoryPermissionMap};
    use crate::policy::MemoryPolicy;

    fn make_analysis() -> InfoFlowAnalysis<MemoryPolicy, MemoryPermissionMap> {
        let mut map = MemoryPermissionMap::new();
        map.insert("infoflow", "low_w", FlowDirection::Write, 2).unwrap();
        map.insert("infoflow", "hi_w", FlowDirection::Write, 9).unwrap();

        let mut policy = MemoryPolicy::new();
        policy.allow("a", "b", "infoflow", ["hi_w"]);
        policy.allow("b", "c", "infoflow", ["low_w"]);

        InfoFlowAnalysis::new(policy, map)
    }

    #[test]
    fn test_defaults() {
        let analysis = make_analysis();
        assert_eq!(analysis.min_weight(), 1);
        assert!(analysis.excluded().is_empty());
    }

    #[test]
    fn test_failed_set_min_weight_keeps_previous() {
        let mut analysis = make_analysis();
        analysis.set_min_weight(5).unwrap();

        assert!(analysis.set_min_weight(0).is_err());
        assert!(analysis.set_min_weight(11).is_err());
        assert_eq!(analysis.min_weight(), 5);
    }

    #[test]
    fn test_failed_set_exclude_keeps_previous() {
        let mut analysis = make_analysis();
        analysis.set_exclude(["a"]).unwrap();

        let err = analysis.set_exclude(["b", "invalid_type"]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownType(name) if name == "invalid_type"));
        assert!(analysis.excluded().contains("a"));
        assert!(!analysis.excluded().contains("b"));
    }

    #[test]
    fn test_setting_change_applies_on_next_query() {
        let mut analysis = make_analysis();
        assert_eq!(analysis.all_paths("a", "c", None).unwrap().count(), 1);

        analysis.set_min_weight(5).unwrap();
        assert_eq!(analysis.all_paths("a", "c", None).unwrap().count(), 0);
        assert_eq!(analysis.all_paths("a", "b", None).unwrap().count(), 1);
    }

    #[test]
    fn test_clear_exclude_restores_paths() {
        let mut analysis = make_analysis();
        analysis.set_exclude(["b"]).unwrap();
        assert_eq!(analysis.all_paths("a", "c", None).unwrap().count(), 0);

        analysis.clear_exclude();
        assert_eq!(analysis.all_paths("a", "c", None).unwrap().count(), 1);
    }

    #[test]
    fn test_iterator_survives_setting_change() {
        let mut analysis = make_analysis();
        let paths = analysis.all_paths("a", "c", None).unwrap();

        // The snapshot behind the iterator is unaffected by the change.
        analysis.set_min_weight(9).unwrap();
        assert_eq!(paths.count(), 1);
    }

    #[test]
    fn test_graph_stats() {
        let mut analysis = make_analysis();
        let stats = analysis.graph_stats().unwrap();
        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.edges, 2);
        assert_eq!(stats.records, 2);
    }
}
