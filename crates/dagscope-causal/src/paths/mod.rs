//! Path & d-separation oracle.
//!
//! Paths are walked over the undirected skeleton while remembering the true
//! direction of every edge, so one representation serves both path
//! classification (causal / backdoor / non-causal) and d-separation.

pub mod conditioning;
pub mod d_separation;
pub mod enumerate;

use std::fmt;

use dagscope_core::models::PathKind;
use petgraph::stable_graph::NodeIndex;

use crate::graph::IndexedDag;

pub use conditioning::NodeMask;
pub use d_separation::{DSeparation, Oracle};
pub use enumerate::{simple_paths, PathEnumeration};

/// Direction of an edge relative to the walk from path source to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arrow {
    /// `prev -> next`
    Forward,
    /// `prev <- next`
    Backward,
}

impl Arrow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forward => "->",
            Self::Backward => "<-",
        }
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node of a path with the directions of the edges on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathStep {
    pub node: NodeIndex,
    pub incoming: Option<Arrow>,
    pub outgoing: Option<Arrow>,
}

impl PathStep {
    /// Both adjacent edges point into this node.
    pub fn is_collider(&self) -> bool {
        self.incoming == Some(Arrow::Forward) && self.outgoing == Some(Arrow::Backward)
    }
}

/// A simple path: `nodes[i]` and `nodes[i + 1]` are joined by `arrows[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CausalPath {
    nodes: Vec<NodeIndex>,
    arrows: Vec<Arrow>,
}

impl CausalPath {
    pub fn new(nodes: Vec<NodeIndex>, arrows: Vec<Arrow>) -> Self {
        debug_assert_eq!(nodes.len(), arrows.len() + 1);
        Self { nodes, arrows }
    }

    pub fn nodes(&self) -> &[NodeIndex] {
        &self.nodes
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    pub fn source(&self) -> Option<NodeIndex> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeIndex> {
        self.nodes.last().copied()
    }

    /// (node, incoming, outgoing) triples from source to target.
    pub fn steps(&self) -> Vec<PathStep> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| PathStep {
                node,
                incoming: i.checked_sub(1).map(|j| self.arrows[j]),
                outgoing: self.arrows.get(i).copied(),
            })
            .collect()
    }

    /// Positions and nodes strictly between source and target.
    pub fn interior(&self) -> impl Iterator<Item = (usize, NodeIndex)> + '_ {
        let end = self.nodes.len().saturating_sub(1);
        self.nodes
            .iter()
            .copied()
            .enumerate()
            .take(end)
            .skip(1)
    }

    pub fn is_collider_at(&self, pos: usize) -> bool {
        pos > 0
            && pos < self.arrows.len()
            && self.arrows[pos - 1] == Arrow::Forward
            && self.arrows[pos] == Arrow::Backward
    }

    pub fn position(&self, node: NodeIndex) -> Option<usize> {
        self.nodes.iter().position(|&n| n == node)
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        self.position(node).is_some()
    }

    /// Every edge points from source toward target.
    pub fn is_directed(&self) -> bool {
        !self.arrows.is_empty() && self.arrows.iter().all(|&a| a == Arrow::Forward)
    }

    /// The first edge points into the source.
    pub fn starts_into_source(&self) -> bool {
        self.arrows.first() == Some(&Arrow::Backward)
    }

    pub fn kind(&self) -> PathKind {
        if self.is_directed() {
            PathKind::Causal
        } else if self.starts_into_source() {
            PathKind::Backdoor
        } else {
            PathKind::NonCausal
        }
    }

    /// Whether the path uses an edge pointing out of `node`.
    pub fn leaves_through_outgoing(&self, node: NodeIndex) -> bool {
        let Some(pos) = self.position(node) else {
            return false;
        };
        let forward_out = self.arrows.get(pos) == Some(&Arrow::Forward);
        let backward_out = pos > 0 && self.arrows[pos - 1] == Arrow::Backward;
        forward_out || backward_out
    }

    pub fn labels(&self, graph: &IndexedDag) -> Vec<String> {
        graph.ids_of(&self.nodes)
    }

    /// Arrow rendering, e.g. `X <- C -> Y`.
    pub fn render(&self, graph: &IndexedDag) -> String {
        let mut out = String::new();
        for (i, &node) in self.nodes.iter().enumerate() {
            if i > 0 {
                out.push(' ');
                out.push_str(self.arrows[i - 1].as_str());
                out.push(' ');
            }
            out.push_str(graph.node_id(node).unwrap_or("?"));
        }
        out
    }
}
