use serde::{Deserialize, Serialize};

use crate::constants;

/// Editing session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Analysis reports kept in the result cache.
    pub cache_capacity: u64,
    /// Snapshots retained for undo.
    pub undo_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cache_capacity: constants::DEFAULT_CACHE_CAPACITY,
            undo_depth: constants::DEFAULT_UNDO_DEPTH,
        }
    }
}
