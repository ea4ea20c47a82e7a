//! Analysis orchestrator: one aggregate report per
//! (graph snapshot, exposure, outcome, effect) query.

pub mod roles;

use std::time::Duration;

use dagscope_core::config::AnalysisConfig;
use dagscope_core::errors::{error_code, AnalysisError, DagScopeErrorCode};
use dagscope_core::models::{
    AdjustmentReport, AnalysisQuery, AnalysisReport, Finding, InstrumentReport, PathReport,
    SummaryFlags, ValidationReport,
};
use dagscope_core::traits::CancellationToken;
use petgraph::stable_graph::NodeIndex;
use tracing::{info, info_span, warn};

use crate::adjustment::{
    confounder_union, minimal_sets, AdjustmentProblem, AdjustmentSet, SearchLimits,
};
use crate::bias::{detect_butterfly, detect_m_bias};
use crate::graph::dag_enforcement::ensure_acyclic;
use crate::graph::IndexedDag;
use crate::instruments::find_instruments;
use crate::paths::{NodeMask, Oracle};

pub use roles::{resolve, role_listing, ResolvedRoles};

/// Caps resolved from the query, falling back to config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Caps {
    max_results: usize,
    path_limit: usize,
    max_set_size: usize,
}

impl Caps {
    fn resolve(query: &AnalysisQuery, config: &AnalysisConfig) -> Self {
        Self {
            max_results: query
                .max_results
                .unwrap_or_else(|| config.effective_max_results()),
            path_limit: query
                .path_limit
                .unwrap_or_else(|| config.effective_path_limit()),
            max_set_size: query
                .max_set_size
                .unwrap_or_else(|| config.effective_max_set_size()),
        }
    }
}

fn finding(code: &str, message: impl Into<String>) -> Finding {
    Finding {
        code: code.to_string(),
        message: message.into(),
    }
}

fn finding_from(err: &AnalysisError) -> Finding {
    finding(err.error_code(), err.to_string())
}

/// Run every analysis for one query.
///
/// Cycles, unknown explicit ids, an empty graph and exposure == outcome
/// are errors. Missing declared roles produce a report with
/// `analysis_possible = false`. If `token` carries no deadline, the
/// configured search budget is applied.
pub fn analyze(
    graph: &IndexedDag,
    validation: &ValidationReport,
    query: &AnalysisQuery,
    config: &AnalysisConfig,
    token: &CancellationToken,
) -> Result<AnalysisReport, AnalysisError> {
    let _span = info_span!(
        "dagscope.analysis",
        nodes = graph.node_count(),
        edges = graph.edge_count()
    )
    .entered();

    if graph.node_count() == 0 {
        return Err(AnalysisError::InvalidGraph {
            reason: "graph has no nodes".to_string(),
        });
    }
    if let Some(path) = validation.first_cycle_path() {
        warn!(cycle = %path, "analysis blocked by cycle");
        return Err(AnalysisError::CycleDetected { path });
    }
    // The report may be stale or default; the graph itself decides.
    if let Err(err) = ensure_acyclic(graph) {
        warn!(error = %err, "analysis blocked by cycle");
        return Err(err);
    }

    let effect = query
        .effect
        .unwrap_or_else(|| config.effective_default_effect());
    let mut report = AnalysisReport {
        effect,
        roles: role_listing(graph),
        ..AnalysisReport::default()
    };
    report.summary = SummaryFlags {
        has_exposures: !report.roles.exposures.is_empty(),
        has_outcomes: !report.roles.outcomes.is_empty(),
        analysis_possible: false,
    };
    if validation.fixes_applied > 0 {
        report.warnings.push(format!(
            "{} structural repair(s) applied to the graph",
            validation.fixes_applied
        ));
    }

    let (exposure, outcome) = match resolve(graph, query)? {
        ResolvedRoles::Pair { exposure, outcome } => (exposure, outcome),
        ResolvedRoles::Missing(err) => {
            info!(missing = %err, "analysis not possible");
            report.findings.push(finding_from(&err));
            return Ok(report);
        }
    };
    report.exposure = graph.node_id(exposure).map(str::to_string);
    report.outcome = graph.node_id(outcome).map(str::to_string);
    report.summary.analysis_possible = true;

    let caps = Caps::resolve(query, config);
    let token = if token.deadline().is_some() {
        token.clone()
    } else {
        token.with_budget(Duration::from_millis(config.effective_search_budget_ms()))
    };

    let oracle = Oracle::new(graph, caps.path_limit);
    let problem = AdjustmentProblem::new(&oracle, exposure, outcome, effect)?;
    if problem.paths.skipped > 0 {
        report.warnings.push(format!(
            "{} dangling reference(s) skipped during path enumeration",
            problem.paths.skipped
        ));
    }

    let search = minimal_sets(
        &problem,
        SearchLimits {
            max_results: caps.max_results,
            max_set_size: caps.max_set_size,
        },
        &token,
    )?;
    report.adjustment = AdjustmentReport {
        sets: search.sets.iter().map(|s| s.to_report(graph)).collect(),
        truncated: search.truncated,
        timed_out: search.timed_out,
        exhausted: search.exhausted,
        universe: graph.ids_of(&problem.universe),
        target_paths: problem.targets.len(),
    };

    if problem.paths_truncated() {
        report.findings.push(finding(
            error_code::PATH_LIMIT_REACHED,
            format!(
                "path enumeration stopped at {} paths; results cover only those paths",
                caps.path_limit
            ),
        ));
    }
    if search.truncated {
        report.findings.push(finding_from(&AnalysisError::ResultCapReached {
            cap: caps.max_results,
        }));
    }
    if search.timed_out {
        report.findings.push(finding(
            error_code::SEARCH_TIMED_OUT,
            format!(
                "adjustment search stopped at its deadline after {} candidate sets",
                search.evaluated
            ),
        ));
    } else if search.sets.is_empty() {
        let detail = if problem.universe.is_empty() {
            " (no adjustable covariates)".to_string()
        } else {
            format!(" (no sufficient set of size <= {})", caps.max_set_size)
        };
        report.findings.push(finding_from(&AnalysisError::Unidentifiable {
            exposure: report.exposure.clone().unwrap_or_default(),
            outcome: report.outcome.clone().unwrap_or_default(),
            detail,
        }));
    }

    let instruments = find_instruments(
        &oracle,
        exposure,
        outcome,
        config.effective_instrument_excludes_exposure_descendants(),
        &token,
    )?;
    report.instruments = InstrumentReport {
        count: instruments.variables.len(),
        variables: graph.ids_of(&instruments.variables),
        truncated: instruments.truncated,
    };

    report.paths = path_reports(&oracle, &problem, search.sets.first());

    report.m_bias = detect_m_bias(&problem, &search.sets);
    let known: Vec<NodeIndex> = search
        .sets
        .iter()
        .flat_map(|s| s.variables.iter().copied())
        .collect();
    let union = confounder_union(&problem, caps.max_set_size, &known, &token)?;
    report.butterfly = detect_butterfly(graph, &union, &report.m_bias);
    if union.incomplete {
        report
            .warnings
            .push("confounder union is incomplete: search deadline reached".to_string());
    }

    info!(
        exposure = report.exposure.as_deref().unwrap_or(""),
        outcome = report.outcome.as_deref().unwrap_or(""),
        effect = %effect,
        sets = report.adjustment.sets.len(),
        instruments = report.instruments.count,
        paths = report.paths.len(),
        m_bias = report.m_bias.detected,
        butterfly = report.butterfly.detected,
        "analysis complete"
    );
    Ok(report)
}

fn path_reports(
    oracle: &Oracle<'_>,
    problem: &AdjustmentProblem<'_, '_>,
    first_set: Option<&AdjustmentSet>,
) -> Vec<PathReport> {
    let graph = oracle.graph();
    let _span = info_span!("dagscope.paths", paths = problem.paths.len()).entered();

    let empty = oracle.mask();
    let adjusted: Option<NodeMask> = first_set.map(|s| oracle.mask_of(&s.variables));
    let conditioning = adjusted.as_ref().unwrap_or(&empty);

    problem
        .paths
        .paths
        .iter()
        .map(|p| PathReport {
            nodes: p.labels(graph),
            display: p.render(graph),
            kind: p.kind(),
            open: oracle.is_open(p, &empty),
            open_when_adjusted: adjusted.as_ref().map(|z| oracle.is_open(p, z)),
            blocked_by: graph.ids_of(&oracle.blocking_nodes(p, conditioning)),
        })
        .collect()
}
