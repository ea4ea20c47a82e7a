use dagscope_causal::graph::build_validated;
use dagscope_causal::paths::Oracle;
use dagscope_causal::{analyze, Validated};
use dagscope_core::config::AnalysisConfig;
use dagscope_core::models::{AnalysisQuery, GraphDescription, PathKind, VariableRole};
use dagscope_core::traits::CancellationToken;
use proptest::prelude::*;

/// Random DAG over `n` nodes: edges only go from lower to higher index, so
/// the graph is acyclic by construction. Node 0 is the exposure and the last
/// node the outcome.
fn dag_strategy() -> impl Strategy<Value = GraphDescription> {
    (3usize..8).prop_flat_map(|n| {
        let pairs = n * (n - 1) / 2;
        proptest::collection::vec(any::<bool>(), pairs).prop_map(move |mask| {
            let mut desc = GraphDescription::new();
            for i in 0..n {
                let role = if i == 0 {
                    VariableRole::Exposure
                } else if i == n - 1 {
                    VariableRole::Outcome
                } else {
                    VariableRole::Covariate
                };
                desc = desc.with_node(format!("v{i}"), role);
            }
            let mut bit = 0;
            for i in 0..n {
                for j in (i + 1)..n {
                    if mask[bit] {
                        desc = desc.with_edge(format!("v{i}"), format!("v{j}"));
                    }
                    bit += 1;
                }
            }
            desc
        })
    })
}

fn run(v: &Validated) -> dagscope_core::AnalysisReport {
    analyze(
        &v.graph,
        &v.report,
        &AnalysisQuery::declared(),
        &AnalysisConfig::default(),
        &CancellationToken::new(),
    )
    .unwrap()
}

proptest! {
    #[test]
    fn forward_only_graphs_have_no_cycles(desc in dag_strategy()) {
        let v = build_validated(&desc).unwrap();
        prop_assert!(!v.report.has_cycles());
        prop_assert_eq!(v.report.fixes_applied, 0);
    }

    #[test]
    fn returned_sets_are_minimal(desc in dag_strategy()) {
        let v = build_validated(&desc).unwrap();
        let sets = run(&v).adjustment_sets();
        for (i, a) in sets.iter().enumerate() {
            for (j, b) in sets.iter().enumerate() {
                if i != j {
                    prop_assert!(
                        !a.iter().all(|x| b.contains(x)),
                        "{:?} is contained in {:?}", a, b
                    );
                }
            }
        }
    }

    #[test]
    fn returned_sets_block_backdoor_and_keep_causal_paths(desc in dag_strategy()) {
        let v = build_validated(&desc).unwrap();
        let report = run(&v);
        let oracle = Oracle::new(&v.graph, 10_000);
        let x = v.graph.get_node("v0").unwrap();
        let y = v.graph.get_node(report.outcome.as_deref().unwrap()).unwrap();
        let paths = oracle.enumerate_paths(x, y);
        for set in report.adjustment_sets() {
            let members: Vec<_> = set.iter().filter_map(|id| v.graph.get_node(id)).collect();
            let z = oracle.mask_of(&members);
            for path in &paths.paths {
                match path.kind() {
                    PathKind::Backdoor => prop_assert!(!oracle.is_open(path, &z)),
                    PathKind::Causal => prop_assert!(oracle.is_open(path, &z)),
                    PathKind::NonCausal => {}
                }
            }
        }
    }

    #[test]
    fn analysis_is_deterministic(desc in dag_strategy()) {
        let v = build_validated(&desc).unwrap();
        prop_assert_eq!(run(&v), run(&v));
    }

    #[test]
    fn node_removal_conserves_edges(desc in dag_strategy(), pick in any::<prop::sample::Index>()) {
        let v = build_validated(&desc).unwrap();
        let id = desc.nodes[pick.index(desc.nodes.len())].id.clone();
        let incident = desc
            .edges
            .iter()
            .filter(|e| e.from == id || e.to == id)
            .count();
        let removal = v.graph.without_node(&id).unwrap();
        prop_assert_eq!(removal.edges_removed, incident);
        prop_assert_eq!(removal.graph.edge_count(), v.graph.edge_count() - incident);
    }

    #[test]
    fn description_round_trip(desc in dag_strategy()) {
        let v = build_validated(&desc).unwrap();
        let exported = v.graph.to_description();
        prop_assert_eq!(&exported, &desc);
        let rebuilt = build_validated(&exported).unwrap();
        prop_assert_eq!(rebuilt.graph.fingerprint(), v.graph.fingerprint());
    }
}
