//! The aggregate analysis report handed to reporting and visualization.

use serde::{Deserialize, Serialize};

use super::query::EffectType;

/// Declared roles of every variable in the graph, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleListing {
    pub exposures: Vec<String>,
    pub outcomes: Vec<String>,
    pub covariates: Vec<String>,
    pub latent: Vec<String>,
}

/// A single minimal sufficient adjustment set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentSetReport {
    pub id: usize,
    pub variables: Vec<String>,
    pub size: usize,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentReport {
    pub sets: Vec<AdjustmentSetReport>,
    /// More minimal sets exist beyond the result cap.
    pub truncated: bool,
    /// The wall-clock budget expired before the search finished.
    pub timed_out: bool,
    /// Every subset size up to the universe size was explored.
    pub exhausted: bool,
    /// Variables the search was allowed to use.
    pub universe: Vec<String>,
    /// Number of paths every set had to block.
    pub target_paths: usize,
}

impl AdjustmentReport {
    pub fn is_identified(&self) -> bool {
        !self.sets.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// Directed from exposure to outcome.
    Causal,
    /// Starts with an edge pointing into the exposure.
    Backdoor,
    /// Starts out of the exposure but is not directed.
    NonCausal,
}

impl PathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Causal => "causal",
            Self::Backdoor => "backdoor",
            Self::NonCausal => "non_causal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathReport {
    pub nodes: Vec<String>,
    /// Arrow rendering, e.g. `X <- C -> Y`.
    pub display: String,
    pub kind: PathKind,
    /// Open with an empty conditioning set.
    pub open: bool,
    /// Open when conditioning on the first adjustment set, if any.
    pub open_when_adjusted: Option<bool>,
    /// Interior nodes blocking the path when adjusted.
    pub blocked_by: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentReport {
    pub variables: Vec<String>,
    pub count: usize,
    /// Some path enumeration hit its limit while testing candidates.
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MBiasFinding {
    pub variable: String,
    pub parents: Vec<String>,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MBiasReport {
    pub detected: bool,
    pub findings: Vec<MBiasFinding>,
}

impl MBiasReport {
    pub fn variables(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.variable.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButterflyFinding {
    pub variable: String,
    /// Parents of the variable that are themselves confounders.
    pub confounder_parents: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButterflyReport {
    pub detected: bool,
    /// Union of all variables in any valid adjustment set.
    pub confounders: Vec<String>,
    pub findings: Vec<ButterflyFinding>,
    /// Confounders recommended for direct adjustment.
    pub safe_confounders: Vec<String>,
    /// The confounder union is partial (search bound or budget hit).
    pub incomplete: bool,
    pub recommendation: String,
}

impl ButterflyReport {
    pub fn variables(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.variable.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFlags {
    pub has_exposures: bool,
    pub has_outcomes: bool,
    pub analysis_possible: bool,
}

/// A coded, non-fatal condition discovered during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub exposure: Option<String>,
    pub outcome: Option<String>,
    pub effect: EffectType,
    pub roles: RoleListing,
    pub adjustment: AdjustmentReport,
    pub instruments: InstrumentReport,
    pub paths: Vec<PathReport>,
    pub m_bias: MBiasReport,
    pub butterfly: ButterflyReport,
    pub summary: SummaryFlags,
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
}

impl AnalysisReport {
    pub fn has_finding(&self, code: &str) -> bool {
        self.findings.iter().any(|f| f.code == code)
    }

    /// Adjustment sets as plain variable lists.
    pub fn adjustment_sets(&self) -> Vec<Vec<String>> {
        self.adjustment
            .sets
            .iter()
            .map(|s| s.variables.clone())
            .collect()
    }
}
