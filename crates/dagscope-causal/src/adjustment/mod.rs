//! Adjustment set search: minimal sufficient covariate sets for one
//! exposure/outcome pair, plus the confounder union used by bias detection.

pub mod confounders;
pub mod problem;
pub mod search;

use dagscope_core::constants::NO_ADJUSTMENT_NEEDED;
use dagscope_core::models::AdjustmentSetReport;
use petgraph::stable_graph::NodeIndex;

use crate::graph::IndexedDag;

pub use confounders::{confounder_union, ConfounderUnion};
pub use problem::AdjustmentProblem;
pub use search::{minimal_sets, AdjustmentResult, SearchLimits};

/// One accepted minimal set, variables in universe order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjustmentSet {
    /// 1-based position in the result list.
    pub id: usize,
    pub variables: Vec<NodeIndex>,
}

impl AdjustmentSet {
    pub fn size(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn describe(&self, graph: &IndexedDag) -> String {
        if self.variables.is_empty() {
            NO_ADJUSTMENT_NEEDED.to_string()
        } else {
            format!("adjust for {}", graph.ids_of(&self.variables).join(", "))
        }
    }

    pub fn to_report(&self, graph: &IndexedDag) -> AdjustmentSetReport {
        AdjustmentSetReport {
            id: self.id,
            variables: graph.ids_of(&self.variables),
            size: self.size(),
            description: self.describe(graph),
        }
    }
}
