use std::fmt;

use serde::{Deserialize, Serialize};

/// The causal role a variable plays in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableRole {
    Exposure,
    Outcome,
    #[default]
    Covariate,
    /// Unobserved: lies on paths but can never be adjusted for.
    Latent,
}

impl VariableRole {
    pub const ALL: [VariableRole; 4] = [
        Self::Exposure,
        Self::Outcome,
        Self::Covariate,
        Self::Latent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exposure => "exposure",
            Self::Outcome => "outcome",
            Self::Covariate => "covariate",
            Self::Latent => "latent",
        }
    }

    /// Parse a role name as written in editing tables. Case-insensitive.
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exposure" | "treatment" => Some(Self::Exposure),
            "outcome" => Some(Self::Outcome),
            "covariate" | "adjusted" | "confounder" | "" => Some(Self::Covariate),
            "latent" | "unobserved" => Some(Self::Latent),
            _ => None,
        }
    }

    /// Whether a variable with this role may appear in an adjustment set.
    pub fn is_adjustable(&self) -> bool {
        matches!(self, Self::Covariate)
    }
}

impl fmt::Display for VariableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
