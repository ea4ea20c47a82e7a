//! Editing session: snapshot replacement, undo, cache invalidation.

use std::sync::Arc;
use std::thread;

use dagscope_causal::DagSession;
use dagscope_core::errors::GraphError;
use dagscope_core::models::{AnalysisQuery, GraphDescription, VariableRole};
use dagscope_core::DagScopeConfig;

fn confounded() -> GraphDescription {
    GraphDescription::new()
        .with_node("X", VariableRole::Exposure)
        .with_node("C", VariableRole::Covariate)
        .with_node("M", VariableRole::Covariate)
        .with_node("Y", VariableRole::Outcome)
        .with_edge("C", "X")
        .with_edge("C", "Y")
        .with_edge("X", "M")
        .with_edge("M", "Y")
}

fn session() -> DagSession {
    DagSession::from_description(&confounded(), DagScopeConfig::default()).unwrap()
}

#[test]
fn edit_returns_before_and_after_snapshots() {
    let s = session();
    let outcome = s.remove_node("C").unwrap();
    assert_eq!(outcome.edges_removed, 2);
    assert_eq!(outcome.before.graph.edge_count(), 4);
    assert_eq!(outcome.after.graph.edge_count(), 2);
    assert!(outcome.validation.valid);
    assert_eq!(s.snapshot().version, outcome.after.version);
}

#[test]
fn undo_restores_the_previous_graph() {
    let s = session();
    let original = s.snapshot();
    s.remove_edge("C", "Y").unwrap();
    assert_ne!(s.snapshot().fingerprint, original.fingerprint);

    let undone = s.undo().unwrap();
    let restored = s.snapshot();
    assert_eq!(restored.fingerprint, original.fingerprint);
    assert!(restored.version > original.version);
    assert_eq!(undone.after.version, restored.version);
    assert_eq!(s.export(), confounded());
}

#[test]
fn undo_on_fresh_session_is_none() {
    let s = DagSession::new(DagScopeConfig::default());
    assert!(s.undo().is_none());
    assert_eq!(s.snapshot().version, 0);
}

#[test]
fn adding_a_cyclic_edge_is_reported_by_validation() {
    let s = session();
    let outcome = s.add_edge("Y", "X").unwrap();
    assert!(!outcome.validation.valid);
    assert!(outcome.validation.has_critical_cycles());
    assert!(s.analyze(&AnalysisQuery::declared()).is_err());

    s.undo().unwrap();
    assert!(s.analyze(&AnalysisQuery::declared()).is_ok());
}

#[test]
fn edits_invalidate_cached_reports() {
    let s = session();
    let first = s.analyze(&AnalysisQuery::declared()).unwrap();
    let again = s.analyze(&AnalysisQuery::declared()).unwrap();
    assert!(Arc::ptr_eq(&first, &again));
    assert_eq!(s.cached_reports(), 1);

    s.set_role("C", VariableRole::Latent).unwrap();
    let after = s.analyze(&AnalysisQuery::declared()).unwrap();
    assert!(after.adjustment.sets.is_empty());
    assert_eq!(after.roles.latent, vec!["C"]);

    // Same graph as the first query, but the cache was cleared by the edits.
    s.undo().unwrap();
    let restored = s.analyze(&AnalysisQuery::declared()).unwrap();
    assert!(!Arc::ptr_eq(&first, &restored));
    assert_eq!(*first, *restored);
}

#[test]
fn failed_edits_return_graph_errors() {
    let s = session();
    assert_eq!(
        s.remove_edge("X", "C").unwrap_err(),
        GraphError::EdgeNotFound {
            from: "X".to_string(),
            to: "C".to_string()
        }
    );
    assert!(matches!(
        s.add_edge("X", "X").unwrap_err(),
        GraphError::SelfLoop { .. }
    ));
    assert!(matches!(
        s.set_role("ghost", VariableRole::Outcome).unwrap_err(),
        GraphError::NodeNotFound { .. }
    ));
}

#[test]
fn export_round_trips_through_yaml() {
    let s = session();
    let yaml = s.export().to_yaml().unwrap();
    let reloaded = DagSession::from_description(
        &GraphDescription::from_yaml(&yaml).unwrap(),
        DagScopeConfig::default(),
    )
    .unwrap();
    assert_eq!(reloaded.snapshot().fingerprint, s.snapshot().fingerprint);
}

#[test]
fn readers_see_complete_snapshots_during_edits() {
    let s = Arc::new(session());
    let writer = {
        let s = Arc::clone(&s);
        thread::spawn(move || {
            for _ in 0..20 {
                s.remove_node("M").unwrap();
                s.undo().unwrap();
            }
        })
    };
    for _ in 0..50 {
        let snap = s.snapshot();
        // Either the full graph or the graph without M, never in between.
        let edges = snap.graph.edge_count();
        assert!(edges == 4 || edges == 2, "unexpected edge count {edges}");
        assert!(snap.validation.valid);
    }
    writer.join().unwrap();
}
