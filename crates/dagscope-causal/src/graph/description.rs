//! Export to the description format graphs are imported from.

use dagscope_core::models::{EdgeSpec, GraphDescription, NodeSpec};

use super::stable_graph::IndexedDag;

impl IndexedDag {
    /// Nodes in insertion order with their roles, plus the exact edge set.
    pub fn to_description(&self) -> GraphDescription {
        let nodes = self
            .graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .map(|n| NodeSpec::new(n.id.clone(), n.role))
            .collect();
        let edges = self
            .edge_ids()
            .into_iter()
            .map(|(from, to)| EdgeSpec::new(from, to))
            .collect();
        GraphDescription { nodes, edges }
    }

    /// Stable content fingerprint: blake3 over length-prefixed node ids,
    /// roles and edges, in export order.
    pub fn fingerprint(&self) -> String {
        let desc = self.to_description();
        let mut hasher = blake3::Hasher::new();
        hasher.update(&(desc.nodes.len() as u64).to_le_bytes());
        for node in &desc.nodes {
            update_field(&mut hasher, &node.id);
            update_field(&mut hasher, node.role.as_str());
        }
        hasher.update(&(desc.edges.len() as u64).to_le_bytes());
        for edge in &desc.edges {
            update_field(&mut hasher, &edge.from);
            update_field(&mut hasher, &edge.to);
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn update_field(hasher: &mut blake3::Hasher, field: &str) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}
