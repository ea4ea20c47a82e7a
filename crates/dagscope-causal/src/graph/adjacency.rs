//! Parent/child/ancestor/descendant queries.
//! All results are sorted by node index so downstream output is deterministic.

use std::collections::VecDeque;

use dagscope_core::errors::GraphError;
use petgraph::stable_graph::NodeIndex;
use petgraph::Direction;

use super::stable_graph::IndexedDag;
use crate::paths::Arrow;

impl IndexedDag {
    pub fn parents(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Incoming)
    }

    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_sorted(idx, Direction::Outgoing)
    }

    /// Every node with a directed path into `idx` (excluding `idx`).
    pub fn ancestors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.reachable(idx, Direction::Incoming)
    }

    /// Every node reachable from `idx` by a directed path (excluding `idx`).
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.reachable(idx, Direction::Outgoing)
    }

    /// Neighbours over the undirected skeleton, tagged with the true edge
    /// direction as seen when stepping from `idx` to the neighbour.
    pub fn skeleton_neighbors(&self, idx: NodeIndex) -> Vec<(NodeIndex, Arrow)> {
        let mut out: Vec<(NodeIndex, Arrow)> = self
            .children(idx)
            .into_iter()
            .map(|c| (c, Arrow::Forward))
            .chain(self.parents(idx).into_iter().map(|p| (p, Arrow::Backward)))
            .collect();
        out.sort();
        out
    }

    pub fn parents_of(&self, id: &str) -> Result<Vec<String>, GraphError> {
        let idx = self.require(id)?;
        Ok(self.ids_of(&self.parents(idx)))
    }

    pub fn children_of(&self, id: &str) -> Result<Vec<String>, GraphError> {
        let idx = self.require(id)?;
        Ok(self.ids_of(&self.children(idx)))
    }

    pub fn ancestors_of(&self, id: &str) -> Result<Vec<String>, GraphError> {
        let idx = self.require(id)?;
        Ok(self.ids_of(&self.ancestors(idx)))
    }

    pub fn descendants_of(&self, id: &str) -> Result<Vec<String>, GraphError> {
        let idx = self.require(id)?;
        Ok(self.ids_of(&self.descendants(idx)))
    }

    fn neighbors_sorted(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut out: Vec<NodeIndex> = self.graph.neighbors_directed(idx, dir).collect();
        out.sort();
        out.dedup();
        out
    }

    /// BFS along `dir`. Terminates on cyclic graphs too.
    fn reachable(&self, start: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        if !self.contains(start) {
            return Vec::new();
        }
        let mut seen = vec![false; self.node_bound()];
        seen[start.index()] = true;
        let mut queue = VecDeque::from([start]);
        let mut out = Vec::new();

        while let Some(current) = queue.pop_front() {
            for next in self.graph.neighbors_directed(current, dir) {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    out.push(next);
                    queue.push_back(next);
                }
            }
        }
        // A cycle through `start` would otherwise leave it out of its own closure.
        out.retain(|&n| n != start);
        out.sort();
        out
    }
}
