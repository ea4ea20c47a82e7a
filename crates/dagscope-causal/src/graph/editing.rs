//! Copy-on-write edits. Every operation leaves `self` untouched and returns
//! a new graph, so a failed edit can never leave a snapshot half-modified.

use dagscope_core::errors::GraphError;
use dagscope_core::models::VariableRole;

use super::stable_graph::IndexedDag;

/// Result of removing a node.
#[derive(Debug, Clone)]
pub struct NodeRemoval {
    pub graph: IndexedDag,
    /// Edges that were incident to the removed node.
    pub edges_removed: usize,
}

impl IndexedDag {
    /// Remove `id` and every edge touching it.
    pub fn without_node(&self, id: &str) -> Result<NodeRemoval, GraphError> {
        let idx = self.require(id)?;
        let mut graph = self.clone();
        let edges_removed = graph.remove_node_at(idx);
        Ok(NodeRemoval {
            graph,
            edges_removed,
        })
    }

    /// Remove the single edge `from -> to`.
    pub fn without_edge(&self, from: &str, to: &str) -> Result<IndexedDag, GraphError> {
        let source = self.require(from)?;
        let target = self.require(to)?;
        let edge = self
            .graph
            .find_edge(source, target)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })?;
        let mut graph = self.clone();
        graph.graph.remove_edge(edge);
        Ok(graph)
    }

    /// Add `from -> to`. Cycles are allowed here; the validator reports them.
    pub fn with_edge(&self, from: &str, to: &str) -> Result<IndexedDag, GraphError> {
        let mut graph = self.clone();
        graph.add_edge(from, to)?;
        Ok(graph)
    }

    /// Change the declared role of `id`.
    pub fn with_role(&self, id: &str, role: VariableRole) -> Result<IndexedDag, GraphError> {
        let idx = self.require(id)?;
        let mut graph = self.clone();
        graph.set_role_at(idx, role);
        Ok(graph)
    }
}
