//! Simple-path enumeration.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::graph::FlowGraph;
use crate::types::{FlowEdge, Path, TypeId};

/// One node on the active path: its outgoing edges and a cursor.
#[derive(Debug)]
struct Frame {
    out: Vec<FlowEdge>,
    cursor: usize,
}

/// Lazy iterator over every simple directed path between two nodes.
///
/// Depth-first with an explicit frame stack; each frame holds the
/// outgoing edges of one node on the active path, in target-name order,
/// so enumeration order is deterministic. A path never revisits a node,
/// which makes the enumeration finite, though it can still be
/// exponential on dense graphs; callers bound `max_len` to keep the
/// cost acceptable.
///
/// The iterator owns an `Arc` snapshot of the graph it walks, so it
/// stays valid while the originating analysis changes its settings.
#[derive(Debug)]
pub struct AllPaths {
    graph: Arc<FlowGraph>,
    target: TypeId,
    /// Maximum edges per path; `usize::MAX` when unbounded.
    max_len: usize,
    /// Edges chosen so far; `steps[i]` connects path node i to i + 1.
    steps: Vec<FlowEdge>,
    /// Nodes on the active path, for the simple-path check.
    on_path: BTreeSet<TypeId>,
    frames: Vec<Frame>,
}

impl AllPaths {
    /// Set up enumeration from `source` to `target`.
    ///
    /// Yields nothing when either endpoint is absent from the graph,
    /// when `source == target` (a flow path has at least one step and
    /// cannot revisit its source), or when the bound admits no edge.
    pub fn new(
        graph: Arc<FlowGraph>,
        source: &TypeId,
        target: &TypeId,
        max_len: Option<usize>,
    ) -> Self {
        let max_len = max_len.unwrap_or(usize::MAX);
        let mut paths = Self {
            target: target.clone(),
            max_len,
            steps: Vec::new(),
            on_path: BTreeSet::new(),
            frames: Vec::new(),
            graph,
        };

        let eligible = max_len > 0
            && source != target
            && paths.graph.contains_node(source)
            && paths.graph.contains_node(target);
        if eligible {
            let out = paths.graph.out_edges(source).cloned().collect();
            paths.on_path.insert(source.clone());
            paths.frames.push(Frame { out, cursor: 0 });
        }
        paths
    }
}

impl Iterator for AllPaths {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            let frame = self.frames.last_mut()?;
            let Some(edge) = frame.out.get(frame.cursor).cloned() else {
                // Frame exhausted: retreat one node.
                self.frames.pop();
                if let Some(step) = self.steps.pop() {
                    self.on_path.remove(&step.target);
                }
                continue;
            };
            frame.cursor += 1;

            if self.on_path.contains(&edge.target) {
                continue;
            }

            if edge.target == self.target {
                let mut path = self.steps.clone();
                path.push(edge);
                // The target is never descended into: any continuation
                // would have to revisit it.
                return Some(path);
            }

            // Descend only while another edge still fits the bound.
            if self.steps.len() + 1 < self.max_len {
                let out = self.graph.out_edges(&edge.target).cloned().collect();
                self.on_path.insert(edge.target.clone());
                self.steps.push(edge);
                self.frames.push(Frame { out, cursor: 0 });
            }
        }
    }
}
