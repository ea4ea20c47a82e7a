use super::error_code::{self, DagScopeErrorCode};

/// Graph model and description errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {id}")]
    NodeNotFound { id: String },

    #[error("edge not found: {from} -> {to}")]
    EdgeNotFound { from: String, to: String },

    #[error("duplicate node id: {id}")]
    DuplicateNode { id: String },

    #[error("self-loop on node: {id}")]
    SelfLoop { id: String },

    #[error("node id must not be empty")]
    EmptyId,

    #[error("failed to parse {format} graph description: {message}")]
    Parse { format: String, message: String },
}

impl DagScopeErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NodeNotFound { .. } => error_code::NODE_NOT_FOUND,
            Self::EdgeNotFound { .. } => error_code::EDGE_NOT_FOUND,
            Self::DuplicateNode { .. } => error_code::DUPLICATE_NODE,
            Self::SelfLoop { .. } => error_code::SELF_LOOP,
            Self::EmptyId => error_code::EMPTY_ID,
            Self::Parse { .. } => error_code::PARSE_ERROR,
        }
    }
}
