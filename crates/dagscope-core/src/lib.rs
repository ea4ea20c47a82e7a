//! # dagscope-core
//!
//! Foundation crate for the DagScope causal analysis engine.
//! Defines graph descriptions, report models, errors, config, and constants.
//! The engine crate and every consumer of its reports depend on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::DagScopeConfig;
pub use errors::{AnalysisError, ConfigError, DagError, DagResult, GraphError};
pub use models::{
    AnalysisQuery, AnalysisReport, EdgeSpec, EffectType, GraphDescription, NodeSpec, Response,
    ValidationReport, VariableRole,
};
pub use traits::{Cancellable, CancellationToken};
