//! StableGraph wrapper with id lookup and role tagging.
//! Indices stay valid across removals, so clones of a snapshot can be
//! edited without renumbering the nodes analysis results refer to.

use dagscope_core::errors::GraphError;
use dagscope_core::models::VariableRole;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::Directed;
use rustc_hash::FxHashMap;

/// Node weight: a variable and its declared role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableNode {
    pub id: String,
    pub role: VariableRole,
}

/// A causal graph with O(1) id lookup.
#[derive(Debug, Clone, Default)]
pub struct IndexedDag {
    pub(crate) graph: StableGraph<VariableNode, (), Directed>,
    index: FxHashMap<String, NodeIndex>,
}

impl IndexedDag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only access to the underlying petgraph storage.
    pub fn inner(&self) -> &StableGraph<VariableNode, (), Directed> {
        &self.graph
    }

    /// Insert a variable. Ids must be unique and non-empty.
    pub fn add_node(&mut self, id: &str, role: VariableRole) -> Result<NodeIndex, GraphError> {
        if id.is_empty() {
            return Err(GraphError::EmptyId);
        }
        if self.index.contains_key(id) {
            return Err(GraphError::DuplicateNode { id: id.to_string() });
        }
        let idx = self.graph.add_node(VariableNode {
            id: id.to_string(),
            role,
        });
        self.index.insert(id.to_string(), idx);
        Ok(idx)
    }

    /// Insert `from -> to`. Returns `false` when the edge already exists.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<bool, GraphError> {
        let source = self.require(from)?;
        let target = self.require(to)?;
        if source == target {
            return Err(GraphError::SelfLoop {
                id: from.to_string(),
            });
        }
        if self.graph.contains_edge(source, target) {
            return Ok(false);
        }
        self.graph.add_edge(source, target, ());
        Ok(true)
    }

    /// Remove a node and its incident edges, returning how many edges went with it.
    pub(crate) fn remove_node_at(&mut self, idx: NodeIndex) -> usize {
        let incident = self.graph.edges_directed(idx, petgraph::Direction::Incoming).count()
            + self.graph.edges_directed(idx, petgraph::Direction::Outgoing).count();
        if let Some(node) = self.graph.remove_node(idx) {
            self.index.remove(&node.id);
        }
        incident
    }

    pub fn get_node(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Like [`Self::get_node`] but reports unknown ids as errors.
    pub fn require(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.get_node(id)
            .ok_or_else(|| GraphError::NodeNotFound { id: id.to_string() })
    }

    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.graph.contains_node(idx)
    }

    pub fn node_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(|n| n.id.as_str())
    }

    pub fn role(&self, idx: NodeIndex) -> Option<VariableRole> {
        self.graph.node_weight(idx).map(|n| n.role)
    }

    pub(crate) fn set_role_at(&mut self, idx: NodeIndex, role: VariableRole) {
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.role = role;
        }
    }

    /// Ids for a list of indices, skipping any that no longer exist.
    pub fn ids_of<'a>(&self, nodes: impl IntoIterator<Item = &'a NodeIndex>) -> Vec<String> {
        nodes
            .into_iter()
            .filter_map(|&idx| self.node_id(idx).map(str::to_string))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Upper bound on node indices, for index-addressed masks.
    pub fn node_bound(&self) -> usize {
        self.graph.node_indices().map(|i| i.index() + 1).max().unwrap_or(0)
    }

    pub fn contains_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> Vec<NodeIndex> {
        self.graph.node_indices().collect()
    }

    /// Nodes carrying `role`, in insertion order.
    pub fn nodes_with_role(&self, role: VariableRole) -> Vec<NodeIndex> {
        self.graph
            .node_indices()
            .filter(|&idx| self.role(idx) == Some(role))
            .collect()
    }

    /// All edges as index pairs, in insertion order.
    pub fn edges(&self) -> Vec<(NodeIndex, NodeIndex)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .collect()
    }

    /// All edges as id pairs, in insertion order.
    pub fn edge_ids(&self) -> Vec<(String, String)> {
        self.edges()
            .into_iter()
            .filter_map(|(s, t)| Some((self.node_id(s)?.to_string(), self.node_id(t)?.to_string())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_duplicate_and_empty_ids() {
        let mut g = IndexedDag::new();
        g.add_node("A", VariableRole::Covariate).unwrap();
        assert_eq!(
            g.add_node("A", VariableRole::Exposure),
            Err(GraphError::DuplicateNode { id: "A".into() })
        );
        assert_eq!(g.add_node("", VariableRole::Covariate), Err(GraphError::EmptyId));
    }

    #[test]
    fn add_edge_ignores_repeats_and_rejects_self_loops() {
        let mut g = IndexedDag::new();
        g.add_node("A", VariableRole::Covariate).unwrap();
        g.add_node("B", VariableRole::Covariate).unwrap();
        assert_eq!(g.add_edge("A", "B"), Ok(true));
        assert_eq!(g.add_edge("A", "B"), Ok(false));
        assert_eq!(g.edge_count(), 1);
        assert!(matches!(g.add_edge("A", "A"), Err(GraphError::SelfLoop { .. })));
        assert!(matches!(g.add_edge("A", "Z"), Err(GraphError::NodeNotFound { .. })));
    }

    #[test]
    fn edges_come_back_in_insertion_order() {
        let mut g = IndexedDag::new();
        for id in ["A", "B", "C"] {
            g.add_node(id, VariableRole::Covariate).unwrap();
        }
        g.add_edge("B", "C").unwrap();
        g.add_edge("A", "B").unwrap();
        assert_eq!(
            g.edge_ids(),
            vec![
                ("B".to_string(), "C".to_string()),
                ("A".to_string(), "B".to_string())
            ]
        );
    }
}
