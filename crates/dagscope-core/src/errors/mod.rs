//! Error handling for DagScope.
//! One error enum per component, `thiserror` only, aggregated into [`DagError`].

pub mod analysis_error;
pub mod config_error;
pub mod dag_error;
pub mod error_code;
pub mod graph_error;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use dag_error::{DagError, DagResult};
pub use error_code::DagScopeErrorCode;
pub use graph_error::GraphError;
