//! Open/blocked evaluation of paths under a conditioning set.

use petgraph::stable_graph::NodeIndex;
use tracing::debug;

use super::conditioning::NodeMask;
use super::enumerate::{PathEnumeration, Skeleton};
use super::CausalPath;
use crate::graph::IndexedDag;

/// Result of a d-separation query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DSeparation {
    pub separated: bool,
    /// Enumeration hit the path limit, so `separated` covers only the
    /// enumerated paths.
    pub truncated: bool,
}

/// Path oracle over one immutable graph snapshot.
///
/// Descendant sets are computed once up front; collider checks then cost a
/// scan of the descendant list against the conditioning mask.
#[derive(Debug, Clone)]
pub struct Oracle<'g> {
    graph: &'g IndexedDag,
    skeleton: Skeleton,
    descendants: Vec<Vec<NodeIndex>>,
    bound: usize,
    path_limit: usize,
}

impl<'g> Oracle<'g> {
    pub fn new(graph: &'g IndexedDag, path_limit: usize) -> Self {
        let bound = graph.node_bound();
        let mut descendants = vec![Vec::new(); bound];
        for idx in graph.nodes() {
            descendants[idx.index()] = graph.descendants(idx);
        }
        Self {
            graph,
            skeleton: Skeleton::new(graph),
            descendants,
            bound,
            path_limit: path_limit.max(1),
        }
    }

    pub fn graph(&self) -> &'g IndexedDag {
        self.graph
    }

    pub fn path_limit(&self) -> usize {
        self.path_limit
    }

    pub fn descendants(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.descendants
            .get(idx.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_descendant(&self, node: NodeIndex, of: NodeIndex) -> bool {
        self.descendants(of).contains(&node)
    }

    /// All simple paths between two nodes, up to the oracle's path limit.
    pub fn enumerate_paths(&self, from: NodeIndex, to: NodeIndex) -> PathEnumeration {
        self.enumerate_paths_limited(from, to, self.path_limit)
    }

    pub fn enumerate_paths_limited(
        &self,
        from: NodeIndex,
        to: NodeIndex,
        limit: usize,
    ) -> PathEnumeration {
        let found = self.skeleton.simple_paths(from, to, limit);
        debug!(
            from = from.index(),
            to = to.index(),
            paths = found.len(),
            truncated = found.truncated,
            "enumerated paths"
        );
        found
    }

    /// A collider is active when it or any of its descendants is conditioned on.
    pub fn collider_active(&self, node: NodeIndex, z: &NodeMask) -> bool {
        z.contains(node) || self.descendants(node).iter().any(|&d| z.contains(d))
    }

    fn blocks(&self, path: &CausalPath, pos: usize, node: NodeIndex, z: &NodeMask) -> bool {
        if path.is_collider_at(pos) {
            !self.collider_active(node, z)
        } else {
            z.contains(node)
        }
    }

    pub fn is_open(&self, path: &CausalPath, z: &NodeMask) -> bool {
        path.interior()
            .all(|(pos, node)| !self.blocks(path, pos, node, z))
    }

    /// Interior nodes that block `path` under `z`, in path order.
    pub fn blocking_nodes(&self, path: &CausalPath, z: &NodeMask) -> Vec<NodeIndex> {
        path.interior()
            .filter(|&(pos, node)| self.blocks(path, pos, node, z))
            .map(|(_, node)| node)
            .collect()
    }

    /// Whether every enumerated path between `x` and `y` is blocked by `z`.
    pub fn d_separated(&self, x: NodeIndex, y: NodeIndex, z: &NodeMask) -> DSeparation {
        let found = self.enumerate_paths(x, y);
        DSeparation {
            separated: found.paths.iter().all(|p| !self.is_open(p, z)),
            truncated: found.truncated,
        }
    }

    pub fn mask(&self) -> NodeMask {
        NodeMask::new(self.bound)
    }

    pub fn mask_of<'a>(&self, nodes: impl IntoIterator<Item = &'a NodeIndex>) -> NodeMask {
        NodeMask::from_nodes(self.bound, nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dagscope_core::models::VariableRole;

    fn graph(edges: &[(&str, &str)]) -> IndexedDag {
        let mut g = IndexedDag::new();
        for (a, b) in edges {
            for id in [a, b] {
                if g.get_node(id).is_none() {
                    g.add_node(id, VariableRole::Covariate).unwrap();
                }
            }
            g.add_edge(a, b).unwrap();
        }
        g
    }

    #[test]
    fn chain_blocked_by_conditioning() {
        let g = graph(&[("A", "B"), ("B", "C")]);
        let oracle = Oracle::new(&g, 100);
        let (a, b, c) = (g.get_node("A").unwrap(), g.get_node("B").unwrap(), g.get_node("C").unwrap());
        let path = &oracle.enumerate_paths(a, c).paths[0];
        assert!(oracle.is_open(path, &oracle.mask()));
        let z = oracle.mask_of(&[b]);
        assert!(!oracle.is_open(path, &z));
        assert_eq!(oracle.blocking_nodes(path, &z), vec![b]);
    }

    #[test]
    fn collider_opened_by_descendant() {
        // A -> C <- B, C -> D
        let g = graph(&[("A", "C"), ("B", "C"), ("C", "D")]);
        let oracle = Oracle::new(&g, 100);
        let a = g.get_node("A").unwrap();
        let b = g.get_node("B").unwrap();
        let d = g.get_node("D").unwrap();
        assert!(oracle.d_separated(a, b, &oracle.mask()).separated);
        assert!(!oracle.d_separated(a, b, &oracle.mask_of(&[d])).separated);
    }

    #[test]
    fn fork_blocked_by_common_cause() {
        let g = graph(&[("C", "X"), ("C", "Y")]);
        let oracle = Oracle::new(&g, 100);
        let x = g.get_node("X").unwrap();
        let y = g.get_node("Y").unwrap();
        let c = g.get_node("C").unwrap();
        assert!(!oracle.d_separated(x, y, &oracle.mask()).separated);
        assert!(oracle.d_separated(x, y, &oracle.mask_of(&[c])).separated);
    }
}
