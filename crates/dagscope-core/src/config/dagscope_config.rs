//! Top-level DagScope configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{AnalysisConfig, ObservabilityConfig, SessionConfig};
use crate::errors::ConfigError;
use crate::models::EffectType;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`DAGSCOPE_*`)
/// 2. Config file passed to [`DagScopeConfig::load`]
/// 3. Compiled defaults
///
/// Analysis functions never read the environment themselves; callers load a
/// config once and pass it explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DagScopeConfig {
    pub analysis: AnalysisConfig,
    pub session: SessionConfig,
    pub observability: ObservabilityConfig,
}

impl DagScopeConfig {
    /// Load configuration from an optional TOML file plus environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let caps = [
            ("analysis.max_results", self.analysis.max_results),
            ("analysis.path_limit", self.analysis.path_limit),
            ("analysis.max_set_size", self.analysis.max_set_size),
        ];
        for (field, value) in caps {
            if value == Some(0) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(ref effect) = self.analysis.default_effect {
            if EffectType::from_str_name(effect).is_none() {
                return Err(ConfigError::ValidationFailed {
                    field: "analysis.default_effect".to_string(),
                    message: format!("unknown effect type '{effect}', expected total or direct"),
                });
            }
        }
        if self.session.cache_capacity == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "session.cache_capacity".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `DAGSCOPE_MAX_RESULTS`, `DAGSCOPE_PATH_LIMIT`, etc.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse::<usize>("DAGSCOPE_MAX_RESULTS") {
            self.analysis.max_results = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DAGSCOPE_PATH_LIMIT") {
            self.analysis.path_limit = Some(v);
        }
        if let Some(v) = env_parse::<usize>("DAGSCOPE_MAX_SET_SIZE") {
            self.analysis.max_set_size = Some(v);
        }
        if let Some(v) = env_parse::<u64>("DAGSCOPE_SEARCH_BUDGET_MS") {
            self.analysis.search_budget_ms = Some(v);
        }
        if let Ok(v) = std::env::var("DAGSCOPE_DEFAULT_EFFECT") {
            self.analysis.default_effect = Some(v);
        }
        if let Ok(v) = std::env::var("DAGSCOPE_LOG_LEVEL") {
            self.observability.log_level = v;
        }
        if let Some(v) = env_parse::<bool>("DAGSCOPE_JSON_LOGS") {
            self.observability.json_logs = v;
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
