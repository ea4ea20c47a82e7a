//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::models::EffectType;

/// Caps and defaults for causal analysis queries.
///
/// Every field is optional so that partial files merge over defaults;
/// the `effective_*` accessors resolve the compiled default.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum minimal adjustment sets per query. Default: 50.
    pub max_results: Option<usize>,
    /// Maximum simple paths enumerated between two variables. Default: 10 000.
    pub path_limit: Option<usize>,
    /// Largest adjustment set size the search explores. Default: 8.
    pub max_set_size: Option<usize>,
    /// Wall-clock budget per search in milliseconds; 0 disables it. Default: 5 000.
    pub search_budget_ms: Option<u64>,
    /// Effect type used when a query does not name one. Default: "total".
    pub default_effect: Option<String>,
    /// Skip exposure descendants when looking for instruments. Default: true.
    pub instrument_excludes_exposure_descendants: Option<bool>,
}

impl AnalysisConfig {
    pub fn effective_max_results(&self) -> usize {
        self.max_results.unwrap_or(constants::DEFAULT_MAX_RESULTS)
    }

    pub fn effective_path_limit(&self) -> usize {
        self.path_limit.unwrap_or(constants::DEFAULT_PATH_LIMIT)
    }

    pub fn effective_max_set_size(&self) -> usize {
        self.max_set_size.unwrap_or(constants::DEFAULT_MAX_SET_SIZE)
    }

    pub fn effective_search_budget_ms(&self) -> u64 {
        self.search_budget_ms
            .unwrap_or(constants::DEFAULT_SEARCH_BUDGET_MS)
    }

    /// Returns the default effect, falling back to `Total` on unknown names.
    pub fn effective_default_effect(&self) -> EffectType {
        self.default_effect
            .as_deref()
            .and_then(EffectType::from_str_name)
            .unwrap_or_default()
    }

    pub fn effective_instrument_excludes_exposure_descendants(&self) -> bool {
        self.instrument_excludes_exposure_descendants.unwrap_or(true)
    }
}
