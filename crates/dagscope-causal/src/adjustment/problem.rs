//! Search universe and target paths for one (exposure, outcome, effect).

use dagscope_core::errors::AnalysisError;
use dagscope_core::models::{EffectType, PathKind};
use petgraph::stable_graph::NodeIndex;

use crate::graph::dag_enforcement::ensure_acyclic;
use crate::paths::{CausalPath, NodeMask, Oracle, PathEnumeration};

/// Everything the subset search needs, derived once per query.
#[derive(Debug, Clone)]
pub struct AdjustmentProblem<'o, 'g> {
    pub oracle: &'o Oracle<'g>,
    pub exposure: NodeIndex,
    pub outcome: NodeIndex,
    pub effect: EffectType,
    /// Candidate variables in insertion order.
    pub universe: Vec<NodeIndex>,
    /// Paths every accepted set must block.
    pub targets: Vec<CausalPath>,
    /// All exposure-outcome paths, as enumerated.
    pub paths: PathEnumeration,
}

impl<'o, 'g> AdjustmentProblem<'o, 'g> {
    /// Derive the universe and targets. A cyclic graph is refused before
    /// any path is enumerated.
    pub fn new(
        oracle: &'o Oracle<'g>,
        exposure: NodeIndex,
        outcome: NodeIndex,
        effect: EffectType,
    ) -> Result<Self, AnalysisError> {
        let graph = oracle.graph();
        ensure_acyclic(graph)?;
        let paths = oracle.enumerate_paths(exposure, outcome);

        let universe: Vec<NodeIndex> = graph
            .nodes()
            .into_iter()
            .filter(|&v| v != exposure && v != outcome)
            .filter(|&v| graph.role(v).is_some_and(|r| r.is_adjustable()))
            .filter(|&v| !oracle.is_descendant(v, outcome))
            .filter(|&v| effect == EffectType::Direct || !oracle.is_descendant(v, exposure))
            .collect();

        let targets = paths
            .paths
            .iter()
            .filter(|p| match effect {
                EffectType::Total => p.kind() == PathKind::Backdoor,
                EffectType::Direct => !(p.len() == 1 && p.is_directed()),
            })
            .cloned()
            .collect();

        Ok(Self {
            oracle,
            exposure,
            outcome,
            effect,
            universe,
            targets,
            paths,
        })
    }

    /// Whether conditioning on `z` blocks every target path.
    pub fn is_sufficient(&self, z: &NodeMask) -> bool {
        self.targets.iter().all(|p| !self.oracle.is_open(p, z))
    }

    pub fn paths_truncated(&self) -> bool {
        self.paths.truncated
    }

    pub fn mask(&self) -> NodeMask {
        self.oracle.mask()
    }
}
