//! Simple-path enumeration over the undirected skeleton.

use petgraph::stable_graph::NodeIndex;
use tracing::warn;

use super::conditioning::NodeMask;
use super::{Arrow, CausalPath};
use crate::graph::IndexedDag;

/// Paths found between two nodes, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathEnumeration {
    pub paths: Vec<CausalPath>,
    /// A path beyond the limit exists.
    pub truncated: bool,
    /// Neighbour references that no longer resolve to a node.
    pub skipped: usize,
}

impl PathEnumeration {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Precomputed skeleton adjacency, indexed by node index.
///
/// Built once per snapshot so repeated enumerations don't re-sort neighbours.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    adjacency: Vec<Option<Vec<(NodeIndex, Arrow)>>>,
}

impl Skeleton {
    pub fn new(graph: &IndexedDag) -> Self {
        let mut adjacency = vec![None; graph.node_bound()];
        for idx in graph.nodes() {
            adjacency[idx.index()] = Some(graph.skeleton_neighbors(idx));
        }
        Self { adjacency }
    }

    fn neighbors(&self, idx: NodeIndex) -> Option<&[(NodeIndex, Arrow)]> {
        self.adjacency
            .get(idx.index())
            .and_then(|n| n.as_deref())
    }

    fn contains(&self, idx: NodeIndex) -> bool {
        self.neighbors(idx).is_some()
    }

    /// Every simple path from `from` to `to`, stopping after `limit` paths.
    ///
    /// Depth-first with neighbours in insertion order; a node is never
    /// revisited on the current path. `limit` is clamped to at least one.
    pub fn simple_paths(&self, from: NodeIndex, to: NodeIndex, limit: usize) -> PathEnumeration {
        let limit = limit.max(1);
        let mut out = PathEnumeration::default();
        if from == to || !self.contains(from) || !self.contains(to) {
            return out;
        }

        let mut on_path = NodeMask::new(self.adjacency.len());
        let mut nodes = vec![from];
        let mut arrows: Vec<Arrow> = Vec::new();
        // (node, cursor into its neighbour list)
        let mut frames: Vec<(NodeIndex, usize)> = vec![(from, 0)];
        on_path.insert(from);

        while let Some(&(current, cursor)) = frames.last() {
            let neighbors = self.neighbors(current).unwrap_or(&[]);
            let Some(&(next, arrow)) = neighbors.get(cursor) else {
                frames.pop();
                on_path.remove(current);
                nodes.pop();
                arrows.pop();
                continue;
            };
            if let Some(top) = frames.last_mut() {
                top.1 += 1;
            }

            if !self.contains(next) {
                out.skipped += 1;
                warn!(node = next.index(), "skipping dangling neighbour during path enumeration");
                continue;
            }
            if on_path.contains(next) {
                continue;
            }
            if next == to {
                if out.paths.len() == limit {
                    out.truncated = true;
                    break;
                }
                let mut path_nodes = nodes.clone();
                path_nodes.push(to);
                let mut path_arrows = arrows.clone();
                path_arrows.push(arrow);
                out.paths.push(CausalPath::new(path_nodes, path_arrows));
                continue;
            }

            on_path.insert(next);
            nodes.push(next);
            arrows.push(arrow);
            frames.push((next, 0));
        }

        out
    }
}

/// One-shot enumeration without a cached skeleton.
pub fn simple_paths(
    graph: &IndexedDag,
    from: NodeIndex,
    to: NodeIndex,
    limit: usize,
) -> PathEnumeration {
    Skeleton::new(graph).simple_paths(from, to, limit)
}
