//! M-bias: a collider on a backdoor path that is blocked as long as nobody
//! conditions on it.

use dagscope_core::models::{MBiasFinding, MBiasReport, PathKind, VariableRole};
use tracing::{debug, info_span};

use crate::adjustment::{AdjustmentProblem, AdjustmentSet};

/// Flag variables that are in no accepted set, have at least two parents and
/// sit as a collider on some backdoor path that conditioning on them opens.
pub fn detect_m_bias(problem: &AdjustmentProblem<'_, '_>, sets: &[AdjustmentSet]) -> MBiasReport {
    let oracle = problem.oracle;
    let graph = oracle.graph();
    let _span = info_span!("dagscope.bias", detector = "m_bias").entered();

    let empty = oracle.mask();
    let backdoor: Vec<_> = problem
        .paths
        .paths
        .iter()
        .filter(|p| p.kind() == PathKind::Backdoor)
        .collect();

    let mut report = MBiasReport::default();
    for v in graph.nodes() {
        if v == problem.exposure || v == problem.outcome {
            continue;
        }
        if graph.role(v) == Some(VariableRole::Latent) {
            continue;
        }
        if sets.iter().any(|s| s.variables.contains(&v)) {
            continue;
        }
        let parents = graph.parents(v);
        if parents.len() < 2 {
            continue;
        }

        let only_v = oracle.mask_of(&[v]);
        let paths: Vec<String> = backdoor
            .iter()
            .filter(|p| p.position(v).is_some_and(|pos| p.is_collider_at(pos)))
            .filter(|p| !oracle.is_open(p, &empty) && oracle.is_open(p, &only_v))
            .map(|p| p.render(graph))
            .collect();
        if paths.is_empty() {
            continue;
        }

        debug!(variable = graph.node_id(v).unwrap_or("?"), paths = paths.len(), "m-bias collider");
        report.findings.push(MBiasFinding {
            variable: graph.node_id(v).unwrap_or_default().to_string(),
            parents: graph.ids_of(&parents),
            paths,
        });
    }

    report.detected = !report.findings.is_empty();
    report
}
