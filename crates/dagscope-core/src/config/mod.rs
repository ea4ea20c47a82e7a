//! Configuration system for DagScope.
//! TOML-based: environment > file > compiled defaults.

pub mod analysis_config;
pub mod dagscope_config;
pub mod observability_config;
pub mod session_config;

pub use analysis_config::AnalysisConfig;
pub use dagscope_config::DagScopeConfig;
pub use observability_config::ObservabilityConfig;
pub use session_config::SessionConfig;
