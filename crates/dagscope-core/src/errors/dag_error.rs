use super::error_code::DagScopeErrorCode;
use super::{AnalysisError, ConfigError, GraphError};

/// Top-level error aggregating every component error via `From`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DagError {
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl DagScopeErrorCode for DagError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Graph(e) => e.error_code(),
            Self::Analysis(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}

pub type DagResult<T> = Result<T, DagError>;
