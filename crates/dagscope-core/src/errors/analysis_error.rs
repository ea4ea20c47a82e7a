use super::error_code::{self, DagScopeErrorCode};

/// Causal analysis errors.
///
/// `Unidentifiable` and `ResultCapReached` describe findings rather than
/// failures; the orchestrator reports them as coded findings inside a
/// successful report. The remaining variants abort the query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid graph: {reason}")]
    InvalidGraph { reason: String },

    #[error("missing roles: {missing}")]
    MissingRoles { missing: String },

    #[error("no valid adjustment set for {exposure} -> {outcome}{detail}")]
    Unidentifiable {
        exposure: String,
        outcome: String,
        detail: String,
    },

    #[error("result cap of {cap} adjustment sets reached; more minimal sets exist")]
    ResultCapReached { cap: usize },

    #[error("cycle detected in causal graph: {path}")]
    CycleDetected { path: String },

    #[error("analysis cancelled")]
    Cancelled,
}

impl DagScopeErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidGraph { .. } => error_code::INVALID_GRAPH,
            Self::MissingRoles { .. } => error_code::MISSING_ROLES,
            Self::Unidentifiable { .. } => error_code::UNIDENTIFIABLE,
            Self::ResultCapReached { .. } => error_code::RESULT_CAP_REACHED,
            Self::CycleDetected { .. } => error_code::CYCLE_DETECTED,
            Self::Cancelled => error_code::CANCELLED,
        }
    }
}
