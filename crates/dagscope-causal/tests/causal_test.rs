//! Integration tests for dagscope-causal: validation, paths, adjustment
//! sets, instruments, bias detectors and the orchestrator.

use std::time::Duration;

use dagscope_causal::graph::build_validated;
use dagscope_causal::paths::Oracle;
use dagscope_causal::{analyze, AdjustmentProblem, IndexedDag, Validated};
use dagscope_core::config::AnalysisConfig;
use dagscope_core::errors::{error_code, AnalysisError, GraphError};
use dagscope_core::models::{
    AnalysisQuery, EdgeSpec, EffectType, GraphDescription, NodeSpec, PathKind, ValidationReport,
    VariableRole,
};
use dagscope_core::traits::{Cancellable, CancellationToken};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn describe(nodes: &[(&str, VariableRole)], edges: &[(&str, &str)]) -> GraphDescription {
    let mut desc = GraphDescription::new();
    for (id, role) in nodes {
        desc = desc.with_node(*id, *role);
    }
    for (from, to) in edges {
        desc = desc.with_edge(*from, *to);
    }
    desc
}

fn build(nodes: &[(&str, VariableRole)], edges: &[(&str, &str)]) -> Validated {
    build_validated(&describe(nodes, edges)).unwrap()
}

fn run(validated: &Validated, query: &AnalysisQuery) -> Result<dagscope_core::AnalysisReport, AnalysisError> {
    analyze(
        &validated.graph,
        &validated.report,
        query,
        &AnalysisConfig::default(),
        &CancellationToken::new(),
    )
}

use VariableRole::{Covariate as Cov, Exposure as Exp, Latent as Lat, Outcome as Out};

fn m_bias_graph() -> Validated {
    build(
        &[("X", Exp), ("U1", Cov), ("U2", Cov), ("V", Cov), ("Y", Out)],
        &[("U1", "X"), ("U1", "V"), ("U2", "Y"), ("U2", "V"), ("X", "Y")],
    )
}

fn butterfly_graph() -> Validated {
    build(
        &[("X", Exp), ("C1", Cov), ("C2", Cov), ("C3", Cov), ("Y", Out)],
        &[
            ("C2", "C1"),
            ("C3", "C1"),
            ("C1", "X"),
            ("C1", "Y"),
            ("C2", "X"),
            ("C3", "Y"),
            ("X", "Y"),
        ],
    )
}

/// Covariates A1..An each confound X and Y on a separate backdoor path.
fn wide_confounding(n: usize) -> Validated {
    let mut desc = GraphDescription::new()
        .with_node("X", Exp)
        .with_node("Y", Out)
        .with_edge("X", "Y");
    for i in 0..n {
        let id = format!("A{i}");
        desc = desc
            .with_node(id.clone(), Cov)
            .with_edge(id.clone(), "X")
            .with_edge(id, "Y");
    }
    build_validated(&desc).unwrap()
}

// ---------------------------------------------------------------------------
// Structural validation
// ---------------------------------------------------------------------------

#[test]
fn triangle_cycle_is_reported_with_all_three_nodes() {
    let v = build(
        &[("A", Cov), ("B", Cov), ("C", Cov)],
        &[("A", "B"), ("B", "C"), ("C", "A")],
    );
    assert!(v.report.has_cycles());
    assert!(!v.report.valid);
    let mut cycle = v.report.cycles[0].clone();
    cycle.sort();
    assert_eq!(cycle, vec!["A", "B", "C"]);
    assert!(!v.report.has_critical_cycles());
    assert!(v.report.messages.iter().any(|m| m.contains("A -> B -> C -> A")));
}

#[test]
fn repairs_are_counted_and_described() {
    let desc = GraphDescription {
        nodes: vec![
            NodeSpec::new("A", Cov),
            NodeSpec::new("B", Cov),
            NodeSpec::new("A", Out),
        ],
        edges: vec![
            EdgeSpec::new("A", "B"),
            EdgeSpec::new("A", "B"),
            EdgeSpec::new("A", "ghost"),
            EdgeSpec::new("B", "B"),
        ],
    };
    let v = build_validated(&desc).unwrap();
    assert_eq!(v.report.orphaned_count, 1);
    assert_eq!(v.report.duplicate_count, 1);
    assert_eq!(v.report.self_loop_count, 1);
    assert_eq!(v.report.duplicate_node_count, 1);
    assert_eq!(v.report.fixes_applied, 4);
    assert!(v.report.valid);
    assert_eq!(v.graph.edge_count(), 1);
    // First occurrence of a repeated id wins.
    assert_eq!(v.graph.role(v.graph.get_node("A").unwrap()), Some(Cov));
}

#[test]
fn empty_node_id_is_fatal() {
    let desc = GraphDescription::new().with_node("", Cov);
    assert_eq!(build_validated(&desc).unwrap_err(), GraphError::EmptyId);
}

#[test]
fn analysis_refuses_cyclic_graphs() {
    let v = build(
        &[("X", Exp), ("M", Cov), ("Y", Out)],
        &[("X", "M"), ("M", "Y"), ("Y", "X")],
    );
    assert!(v.report.has_critical_cycles());
    let err = run(&v, &AnalysisQuery::declared()).unwrap_err();
    assert!(matches!(err, AnalysisError::CycleDetected { .. }));
}

#[test]
fn hand_built_cycle_is_refused_even_with_a_clean_report() {
    let mut g = IndexedDag::new();
    g.add_node("X", Exp).unwrap();
    g.add_node("A", Cov).unwrap();
    g.add_node("B", Cov).unwrap();
    g.add_node("Y", Out).unwrap();
    for (from, to) in [("A", "B"), ("B", "A"), ("A", "X"), ("B", "Y"), ("X", "Y")] {
        g.add_edge(from, to).unwrap();
    }
    let expected = AnalysisError::CycleDetected {
        path: "A -> B -> A".to_string(),
    };

    let err = analyze(
        &g,
        &ValidationReport::default(),
        &AnalysisQuery::declared(),
        &AnalysisConfig::default(),
        &CancellationToken::new(),
    )
    .unwrap_err();
    assert_eq!(err, expected);

    let oracle = Oracle::new(&g, 1_000);
    let x = g.get_node("X").unwrap();
    let y = g.get_node("Y").unwrap();
    let err = AdjustmentProblem::new(&oracle, x, y, EffectType::Total).unwrap_err();
    assert_eq!(err, expected);
}

// ---------------------------------------------------------------------------
// Graph model
// ---------------------------------------------------------------------------

#[test]
fn removing_a_node_removes_exactly_its_incident_edges() {
    let v = butterfly_graph();
    let before = v.graph.edge_count();
    let removal = v.graph.without_node("C1").unwrap();
    assert_eq!(removal.edges_removed, 4);
    assert_eq!(removal.graph.edge_count(), before - 4);
    assert!(removal.graph.get_node("C1").is_none());
    // The source snapshot is untouched.
    assert_eq!(v.graph.edge_count(), before);
}

#[test]
fn unknown_ids_are_reported() {
    let v = m_bias_graph();
    assert_eq!(
        v.graph.without_node("nope").unwrap_err(),
        GraphError::NodeNotFound { id: "nope".to_string() }
    );
    assert!(matches!(
        v.graph.without_edge("Y", "X").unwrap_err(),
        GraphError::EdgeNotFound { .. }
    ));
    assert!(v.graph.parents_of("nope").is_err());
}

#[test]
fn ancestry_queries_follow_edge_direction() {
    let v = butterfly_graph();
    assert_eq!(v.graph.parents_of("C1").unwrap(), vec!["C2", "C3"]);
    assert_eq!(v.graph.children_of("C1").unwrap(), vec!["X", "Y"]);
    assert_eq!(v.graph.ancestors_of("X").unwrap(), vec!["C1", "C2", "C3"]);
    assert_eq!(v.graph.descendants_of("X").unwrap(), vec!["Y"]);
}

#[test]
fn description_round_trip_preserves_roles_and_edges() {
    let v = butterfly_graph();
    let json = v.graph.to_description().to_json().unwrap();
    let reparsed = build_validated(&GraphDescription::from_json(&json).unwrap()).unwrap();
    assert_eq!(reparsed.graph.to_description(), v.graph.to_description());
    assert_eq!(reparsed.graph.fingerprint(), v.graph.fingerprint());
}

// ---------------------------------------------------------------------------
// Paths and d-separation
// ---------------------------------------------------------------------------

#[test]
fn paths_are_classified_structurally() {
    let v = build(
        &[("X", Exp), ("C", Cov), ("M", Cov), ("K", Cov), ("Y", Out)],
        &[("C", "X"), ("C", "Y"), ("X", "M"), ("M", "Y"), ("X", "K"), ("Y", "K")],
    );
    let oracle = Oracle::new(&v.graph, 100);
    let x = v.graph.get_node("X").unwrap();
    let y = v.graph.get_node("Y").unwrap();
    let found = oracle.enumerate_paths(x, y);
    let kinds: Vec<(String, PathKind)> = found
        .paths
        .iter()
        .map(|p| (p.render(&v.graph), p.kind()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("X <- C -> Y".to_string(), PathKind::Backdoor),
            ("X -> M -> Y".to_string(), PathKind::Causal),
            ("X -> K <- Y".to_string(), PathKind::NonCausal),
        ]
    );
    let collider = &found.paths[2];
    assert!(!oracle.is_open(collider, &oracle.mask()));
}

#[test]
fn path_limit_truncates_enumeration() {
    let v = wide_confounding(5);
    let report = run(&v, &AnalysisQuery::declared().with_path_limit(3)).unwrap();
    assert_eq!(report.paths.len(), 3);
    assert!(report.has_finding(error_code::PATH_LIMIT_REACHED));
}

// ---------------------------------------------------------------------------
// Adjustment sets
// ---------------------------------------------------------------------------

#[test]
fn no_backdoor_path_yields_the_empty_set() {
    let v = build(&[("X", Exp), ("M", Cov), ("Y", Out)], &[("X", "M"), ("M", "Y")]);
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert_eq!(report.adjustment_sets(), vec![Vec::<String>::new()]);
    assert_eq!(report.adjustment.sets[0].size, 0);
    assert_eq!(report.adjustment.sets[0].description, "no adjustment needed");
    assert!(report.adjustment.exhausted);
}

#[test]
fn total_effect_never_adjusts_for_mediators() {
    let v = build(
        &[("X", Exp), ("C", Cov), ("M", Cov), ("Y", Out)],
        &[("C", "X"), ("C", "Y"), ("X", "M"), ("M", "Y")],
    );
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert_eq!(report.adjustment_sets(), vec![vec!["C".to_string()]]);
    assert_eq!(report.adjustment.universe, vec!["C"]);
    assert_eq!(report.adjustment.sets[0].description, "adjust for C");
}

#[test]
fn direct_effect_blocks_mediated_paths() {
    let v = build(
        &[("X", Exp), ("C", Cov), ("M", Cov), ("Y", Out)],
        &[("C", "X"), ("C", "Y"), ("X", "M"), ("M", "Y"), ("X", "Y")],
    );
    let query = AnalysisQuery::declared().with_effect(EffectType::Direct);
    let report = run(&v, &query).unwrap();
    assert_eq!(report.effect, EffectType::Direct);
    assert_eq!(
        report.adjustment_sets(),
        vec![vec!["C".to_string(), "M".to_string()]]
    );
}

#[test]
fn latent_variables_are_never_adjusted_for() {
    let v = build(
        &[("X", Exp), ("U", Lat), ("Y", Out)],
        &[("U", "X"), ("U", "Y"), ("X", "Y")],
    );
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert!(report.adjustment.sets.is_empty());
    assert!(report.adjustment.universe.is_empty());
    assert!(report.has_finding(error_code::UNIDENTIFIABLE));
    assert!(report.summary.analysis_possible);
}

#[test]
fn returned_sets_are_minimal_and_sound() {
    let v = butterfly_graph();
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    let sets = report.adjustment_sets();
    assert_eq!(
        sets,
        vec![
            vec!["C1".to_string(), "C2".to_string()],
            vec!["C1".to_string(), "C3".to_string()],
        ]
    );
    for (i, a) in sets.iter().enumerate() {
        for (j, b) in sets.iter().enumerate() {
            if i != j {
                assert!(!a.iter().all(|v| b.contains(v)), "{a:?} is a subset of {b:?}");
            }
        }
    }
    // Soundness: with the first set, no backdoor path is open and every causal path is.
    for path in &report.paths {
        match path.kind {
            PathKind::Backdoor => assert_eq!(path.open_when_adjusted, Some(false)),
            PathKind::Causal => assert_eq!(path.open_when_adjusted, Some(true)),
            PathKind::NonCausal => {}
        }
    }
}

#[test]
fn result_cap_reports_truncation_and_finding() {
    // X <- A <- B <- C -> Y: any single one of A, B, C blocks the path.
    let v = build(
        &[("X", Exp), ("A", Cov), ("B", Cov), ("C", Cov), ("Y", Out)],
        &[("A", "X"), ("B", "A"), ("C", "B"), ("C", "Y")],
    );
    let all = run(&v, &AnalysisQuery::declared()).unwrap();
    assert_eq!(all.adjustment.sets.len(), 3);
    assert!(!all.adjustment.truncated);

    let capped = run(&v, &AnalysisQuery::declared().with_max_results(2)).unwrap();
    assert_eq!(capped.adjustment.sets.len(), 2);
    assert!(capped.adjustment.truncated);
    assert!(capped.has_finding(error_code::RESULT_CAP_REACHED));

    let exact = run(&v, &AnalysisQuery::declared().with_max_results(3)).unwrap();
    assert!(!exact.adjustment.truncated);
}

#[test]
fn set_size_ceiling_leaves_effect_unidentified() {
    let v = wide_confounding(3);
    let report = run(&v, &AnalysisQuery::declared().with_max_set_size(2)).unwrap();
    assert!(report.adjustment.sets.is_empty());
    assert!(!report.adjustment.exhausted);
    assert!(report.has_finding(error_code::UNIDENTIFIABLE));
}

#[test]
fn identical_inputs_give_identical_reports() {
    let v = butterfly_graph();
    let a = run(&v, &AnalysisQuery::declared()).unwrap();
    let b = run(&v, &AnalysisQuery::declared()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn cancelled_token_aborts_analysis() {
    let v = wide_confounding(4);
    let token = CancellationToken::new();
    token.cancel();
    let err = analyze(
        &v.graph,
        &v.report,
        &AnalysisQuery::declared(),
        &AnalysisConfig::default(),
        &token,
    )
    .unwrap_err();
    assert_eq!(err, AnalysisError::Cancelled);
}

#[test]
fn expired_deadline_keeps_partial_results() {
    let v = wide_confounding(6);
    let token = CancellationToken::new().with_budget(Duration::from_nanos(1));
    std::thread::sleep(Duration::from_millis(2));
    let report = analyze(
        &v.graph,
        &v.report,
        &AnalysisQuery::declared(),
        &AnalysisConfig::default(),
        &token,
    )
    .unwrap();
    assert!(report.adjustment.timed_out);
    assert!(report.has_finding(error_code::SEARCH_TIMED_OUT));
    assert!(!report.has_finding(error_code::UNIDENTIFIABLE));
}

// ---------------------------------------------------------------------------
// Instruments
// ---------------------------------------------------------------------------

#[test]
fn textbook_instrument_is_found() {
    let v = build(
        &[("Z", Cov), ("X", Exp), ("U", Cov), ("Y", Out)],
        &[("Z", "X"), ("X", "Y"), ("U", "X"), ("U", "Y")],
    );
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert_eq!(report.instruments.variables, vec!["Z"]);
    assert_eq!(report.instruments.count, 1);
}

#[test]
fn latent_candidates_are_not_instruments() {
    let v = build(
        &[("Z", Lat), ("X", Exp), ("Y", Out)],
        &[("Z", "X"), ("X", "Y")],
    );
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert!(report.instruments.variables.is_empty());
}

// ---------------------------------------------------------------------------
// Bias detectors
// ---------------------------------------------------------------------------

#[test]
fn m_bias_collider_is_flagged_and_never_adjusted() {
    let v = m_bias_graph();
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert!(report.m_bias.detected);
    assert_eq!(report.m_bias.variables(), vec!["V"]);
    let finding = &report.m_bias.findings[0];
    assert_eq!(finding.parents, vec!["U1", "U2"]);
    assert_eq!(finding.paths, vec!["X <- U1 -> V <- U2 -> Y"]);
    assert!(report
        .adjustment_sets()
        .iter()
        .all(|set| !set.contains(&"V".to_string())));
    // V also sits in the confounder union, but is never recommended.
    assert_eq!(report.butterfly.safe_confounders, vec!["U1", "U2"]);
    assert_eq!(
        report.butterfly.recommendation,
        "do not adjust for V: M-bias collider; adjust for U1, U2"
    );
}

#[test]
fn butterfly_node_is_flagged_and_its_parents_are_safe() {
    let v = butterfly_graph();
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert!(report.butterfly.detected);
    assert_eq!(report.butterfly.variables(), vec!["C1"]);
    assert_eq!(report.butterfly.confounders, vec!["C1", "C2", "C3"]);
    assert_eq!(report.butterfly.safe_confounders, vec!["C2", "C3"]);
    assert_eq!(report.butterfly.findings[0].confounder_parents, vec!["C2", "C3"]);
    assert!(!report.m_bias.detected);
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

#[test]
fn missing_roles_produce_an_unanalysable_report() {
    let v = build(&[("A", Cov), ("B", Cov)], &[("A", "B")]);
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert!(!report.summary.analysis_possible);
    assert!(!report.summary.has_exposures);
    assert!(report.has_finding(error_code::MISSING_ROLES));
    assert_eq!(report.roles.covariates, vec!["A", "B"]);
}

#[test]
fn explicit_pair_overrides_declared_roles() {
    let v = m_bias_graph();
    let report = run(&v, &AnalysisQuery::between("U1", "V")).unwrap();
    assert_eq!(report.exposure.as_deref(), Some("U1"));
    assert_eq!(report.outcome.as_deref(), Some("V"));
    assert!(report.summary.analysis_possible);
}

#[test]
fn invalid_queries_are_errors() {
    let v = m_bias_graph();
    assert!(matches!(
        run(&v, &AnalysisQuery::between("X", "X")),
        Err(AnalysisError::InvalidGraph { .. })
    ));
    assert!(matches!(
        run(&v, &AnalysisQuery::between("X", "missing")),
        Err(AnalysisError::InvalidGraph { .. })
    ));
    let empty = build_validated(&GraphDescription::new()).unwrap();
    assert!(matches!(
        run(&empty, &AnalysisQuery::declared()),
        Err(AnalysisError::InvalidGraph { .. })
    ));
}

#[test]
fn repairs_surface_as_warnings() {
    let desc = describe(&[("X", Exp), ("Y", Out)], &[("X", "Y"), ("X", "Y")]);
    let v = build_validated(&desc).unwrap();
    let report = run(&v, &AnalysisQuery::declared()).unwrap();
    assert!(report.warnings.iter().any(|w| w.contains("1 structural repair")));
}

#[test]
fn d_separation_matches_path_blocking() {
    let v = m_bias_graph();
    let oracle = Oracle::new(&v.graph, 100);
    let u1 = v.graph.get_node("U1").unwrap();
    let u2 = v.graph.get_node("U2").unwrap();
    let vv = v.graph.get_node("V").unwrap();
    // U1 and U2 connect through V and through X -> Y.
    let marginal = oracle.d_separated(u1, u2, &oracle.mask());
    assert!(marginal.separated);
    assert!(!marginal.truncated);
    assert!(!oracle.d_separated(u1, u2, &oracle.mask_of(&[vv])).separated);
}

#[test]
fn indexed_dag_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<IndexedDag>();
    assert_send_sync::<Oracle<'static>>();
}
