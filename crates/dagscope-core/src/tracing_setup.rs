//! Subscriber installation for binaries and tests that want log output.
//!
//! Span names used across the engine, as constants for filtering.

use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::errors::ConfigError;

pub mod names {
    pub const VALIDATION: &str = "dagscope.validation";
    pub const PATHS: &str = "dagscope.paths";
    pub const ADJUSTMENT: &str = "dagscope.adjustment";
    pub const INSTRUMENTS: &str = "dagscope.instruments";
    pub const BIAS: &str = "dagscope.bias";
    pub const ANALYSIS: &str = "dagscope.analysis";
    pub const SESSION: &str = "dagscope.session";
}

/// Install a global fmt subscriber. Returns `Ok(false)` if one was already set.
pub fn init(config: &ObservabilityConfig) -> Result<bool, ConfigError> {
    let filter = EnvFilter::try_new(&config.log_level).map_err(|e| {
        ConfigError::ValidationFailed {
            field: "observability.log_level".to_string(),
            message: e.to_string(),
        }
    })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json_logs {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    Ok(installed)
}
