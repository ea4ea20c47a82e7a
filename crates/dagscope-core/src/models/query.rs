use std::fmt;

use serde::{Deserialize, Serialize};

/// Which causal effect the adjustment set must identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    /// Total effect: mediators are never adjusted for.
    #[default]
    Total,
    /// Direct effect: every path except the direct edge must be blocked.
    Direct,
}

impl EffectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Total => "total",
            Self::Direct => "direct",
        }
    }

    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" => Some(Self::Total),
            "direct" => Some(Self::Direct),
            _ => None,
        }
    }
}

impl fmt::Display for EffectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One analysis request against a graph snapshot.
///
/// Missing exposure/outcome fall back to the roles declared on the graph.
/// Missing caps fall back to the analysis config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisQuery {
    pub exposure: Option<String>,
    pub outcome: Option<String>,
    pub effect: Option<EffectType>,
    pub max_results: Option<usize>,
    pub path_limit: Option<usize>,
    pub max_set_size: Option<usize>,
}

impl AnalysisQuery {
    /// Query using the graph's declared roles and configured defaults.
    pub fn declared() -> Self {
        Self::default()
    }

    /// Query for an explicit exposure/outcome pair.
    pub fn between(exposure: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            exposure: Some(exposure.into()),
            outcome: Some(outcome.into()),
            ..Self::default()
        }
    }

    pub fn with_effect(mut self, effect: EffectType) -> Self {
        self.effect = Some(effect);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    pub fn with_path_limit(mut self, path_limit: usize) -> Self {
        self.path_limit = Some(path_limit);
        self
    }

    pub fn with_max_set_size(mut self, max_set_size: usize) -> Self {
        self.max_set_size = Some(max_set_size);
        self
    }
}
