//! Shortest-path queries.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::graph::FlowGraph;
use crate::types::{FlowEdge, Path, TypeId};

/// One minimum-length path from `source` to `target`, `None` when the
/// target is unreachable.
///
/// Breadth-first with first-discovery parents; successors enumerate in
/// target-name order, so the choice among tied paths is deterministic.
/// Callers should rely only on the returned path's length.
pub fn shortest_path(graph: &FlowGraph, source: &TypeId, target: &TypeId) -> Option<Path> {
    if source == target || !graph.contains_node(source) || !graph.contains_node(target) {
        return None;
    }

    // Parent edge of every discovered node.
    let mut parent: BTreeMap<TypeId, FlowEdge> = BTreeMap::new();
    let mut seen = BTreeSet::from([source.clone()]);
    let mut queue = VecDeque::from([source.clone()]);

    'bfs: while let Some(node) = queue.pop_front() {
        for edge in graph.out_edges(&node) {
            if seen.insert(edge.target.clone()) {
                parent.insert(edge.target.clone(), edge.clone());
                if edge.target == *target {
                    break 'bfs;
                }
                queue.push_back(edge.target.clone());
            }
        }
    }

    // Walk back from the target; an undiscovered target means there is
    // no path at all.
    let mut path = Vec::new();
    let mut node = target.clone();
    while node != *source {
        let edge = parent.remove(&node)?;
        node = edge.source.clone();
        path.push(edge);
    }
    path.reverse();
    Some(path)
}

/// One node's incoming shortest-path edges and a cursor.
#[derive(Debug)]
struct Frame {
    edges: Vec<FlowEdge>,
    cursor: usize,
}

/// Lazy iterator over every minimum-length path between two nodes.
///
/// A breadth-first pass records, for every node on some shortest path,
/// the edges arriving from the previous level; enumeration then walks
/// that predecessor structure backward from the target. The structure
/// is acyclic (distance strictly decreases along every predecessor
/// edge), so no visited bookkeeping is needed and every walk ends at
/// the source.
#[derive(Debug)]
pub struct AllShortestPaths {
    source: TypeId,
    /// node -> incoming shortest-path edges, in source-name order.
    preds: BTreeMap<TypeId, Vec<FlowEdge>>,
    /// Edges chosen so far, deepest (nearest the target) first.
    rev_steps: Vec<FlowEdge>,
    frames: Vec<Frame>,
}

impl AllShortestPaths {
    /// Set up enumeration from `source` to `target`.
    ///
    /// Yields nothing when either endpoint is absent, when
    /// `source == target`, or when no path exists.
    pub fn new(graph: &FlowGraph, source: &TypeId, target: &TypeId) -> Self {
        let mut paths = Self {
            source: source.clone(),
            preds: BTreeMap::new(),
            rev_steps: Vec::new(),
            frames: Vec::new(),
        };
        if source == target || !graph.contains_node(source) || !graph.contains_node(target) {
            return paths;
        }

        let mut dist: BTreeMap<TypeId, usize> = BTreeMap::from([(source.clone(), 0)]);
        let mut queue: VecDeque<(TypeId, usize)> = VecDeque::from([(source.clone(), 0)]);
        let mut target_dist: Option<usize> = None;

        while let Some((node, d)) = queue.pop_front() {
            // Nothing past the target's level can sit on a shortest path.
            if target_dist.is_some_and(|td| d + 1 > td) {
                continue;
            }
            for edge in graph.out_edges(&node) {
                match dist.get(&edge.target) {
                    None => {
                        dist.insert(edge.target.clone(), d + 1);
                        paths
                            .preds
                            .entry(edge.target.clone())
                            .or_default()
                            .push(edge.clone());
                        if edge.target == *target {
                            target_dist = Some(d + 1);
                        } else {
                            queue.push_back((edge.target.clone(), d + 1));
                        }
                    }
                    // Another arrival on the same level joins the
                    // predecessor list; later arrivals are not shortest.
                    Some(&existing) if existing == d + 1 => {
                        paths
                            .preds
                            .entry(edge.target.clone())
                            .or_default()
                            .push(edge.clone());
                    }
                    Some(_) => {}
                }
            }
        }

        if target_dist.is_none() {
            paths.preds.clear();
            return paths;
        }

        // Canonical enumeration order.
        for edges in paths.preds.values_mut() {
            edges.sort_by(|a, b| a.source.cmp(&b.source));
        }
        let start = paths.preds.get(target).cloned().unwrap_or_default();
        paths.frames.push(Frame {
            edges: start,
            cursor: 0,
        });
        paths
    }
}

impl Iterator for AllShortestPaths {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            let frame = self.frames.last_mut()?;
            let Some(edge) = frame.edges.get(frame.cursor).cloned() else {
                self.frames.pop();
                self.rev_steps.pop();
                continue;
            };
            frame.cursor += 1;

            if edge.source == self.source {
                let mut path = Vec::with_capacity(self.rev_steps.len() + 1);
                path.push(edge);
                path.extend(self.rev_steps.iter().rev().cloned());
                return Some(path);
            }

            let pre = self.preds.get(&edge.source).cloned().unwrap_or_default();
            self.rev_steps.push(edge);
            self.frames.push(Frame {
                edges: pre,
                cursor: 0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccessRule;
    use std::sync::Arc;

    fn ty(name: &str) -> TypeId {
        TypeId::new(name)
    }

    fn graph_of(edges: &[(&str, &str)]) -> FlowGraph {
        let mut graph = FlowGraph::default();
        for (source, target) in edges {
            let rule = Arc::new(AccessRule::new(*source, *target, "infoflow", ["p"]));
            graph
                .upsert_edge(&ty(source), &ty(target))
                .push_record(&rule, rule.perms.clone(), 5);
        }
        graph
    }

    fn node_trail(path: &Path) -> Vec<&str> {
        let mut trail = vec![path[0].source.as_str()];
        trail.extend(path.iter().map(|step| step.target.as_str()));
        trail
    }

    #[test]
    fn test_shortest_path_skips_longer_route() {
        let graph = graph_of(&[("a", "b"), ("b", "c"), ("c", "d"), ("a", "d")]);

        let path = shortest_path(&graph, &ty("a"), &ty("d")).unwrap();
        assert_eq!(node_trail(&path), ["a", "d"]);
    }

    #[test]
    fn test_shortest_path_unreachable() {
        let graph = graph_of(&[("a", "b"), ("c", "d")]);
        assert!(shortest_path(&graph, &ty("a"), &ty("d")).is_none());
    }

    #[test]
    fn test_shortest_path_source_equals_target() {
        let graph = graph_of(&[("a", "b"), ("b", "a")]);
        assert!(shortest_path(&graph, &ty("a"), &ty("a")).is_none());
    }

    #[test]
    fn test_all_shortest_paths_diamond() {
        let graph = graph_of(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);

        let paths: Vec<_> = AllShortestPaths::new(&graph, &ty("a"), &ty("d")).collect();
        assert_eq!(paths.len(), 2);
        assert_eq!(node_trail(&paths[0]), ["a", "b", "d"]);
        assert_eq!(node_trail(&paths[1]), ["a", "c", "d"]);
    }

    #[test]
    fn test_all_shortest_paths_excludes_longer() {
        let graph = graph_of(&[("a", "b"), ("b", "d"), ("a", "c"), ("c", "e"), ("e", "d")]);

        let paths: Vec<_> = AllShortestPaths::new(&graph, &ty("a"), &ty("d")).collect();
        assert_eq!(paths.len(), 1);
        assert_eq!(node_trail(&paths[0]), ["a", "b", "d"]);
    }

    #[test]
    fn test_all_shortest_paths_unreachable() {
        let graph = graph_of(&[("a", "b")]);
        assert_eq!(AllShortestPaths::new(&graph, &ty("b"), &ty("a")).count(), 0);
    }

    #[test]
    fn test_lengths_agree_with_shortest_path() {
        let graph = graph_of(&[
            ("a", "b"),
            ("b", "c"),
            ("a", "x"),
            ("x", "c"),
            ("a", "c"),
        ]);

        let single = shortest_path(&graph, &ty("a"), &ty("c")).unwrap();
        for path in AllShortestPaths::new(&graph, &ty("a"), &ty("c")) {
            assert_eq!(path.len(), single.len());
        }
    }
}
