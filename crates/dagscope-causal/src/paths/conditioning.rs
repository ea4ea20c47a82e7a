//! Conditioning sets as index-addressed membership masks.

use petgraph::stable_graph::NodeIndex;

/// Membership mask over node indices. Indices past the end read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeMask {
    bits: Vec<bool>,
    len: usize,
}

impl NodeMask {
    pub fn new(bound: usize) -> Self {
        Self {
            bits: vec![false; bound],
            len: 0,
        }
    }

    pub fn from_nodes<'a>(bound: usize, nodes: impl IntoIterator<Item = &'a NodeIndex>) -> Self {
        let mut mask = Self::new(bound);
        for &node in nodes {
            mask.insert(node);
        }
        mask
    }

    pub fn insert(&mut self, node: NodeIndex) {
        let i = node.index();
        if i >= self.bits.len() {
            self.bits.resize(i + 1, false);
        }
        if !self.bits[i] {
            self.bits[i] = true;
            self.len += 1;
        }
    }

    pub fn remove(&mut self, node: NodeIndex) {
        if let Some(bit) = self.bits.get_mut(node.index()) {
            if *bit {
                *bit = false;
                self.len -= 1;
            }
        }
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.bits.get(node.index()).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in index order.
    pub fn iter(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, &b)| b)
            .map(|(i, _)| NodeIndex::new(i))
    }
}
