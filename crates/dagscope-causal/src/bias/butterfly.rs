//! Butterfly bias: a confounder whose own parents are confounders.

use dagscope_core::models::{ButterflyFinding, ButterflyReport, MBiasReport};
use tracing::{debug, info_span};

use crate::adjustment::ConfounderUnion;
use crate::graph::IndexedDag;
use crate::paths::NodeMask;

/// Flag confounders with two or more confounder parents. Variables the
/// M-bias detector flagged are never recommended for adjustment.
pub fn detect_butterfly(
    graph: &IndexedDag,
    union: &ConfounderUnion,
    m_bias: &MBiasReport,
) -> ButterflyReport {
    let _span = info_span!("dagscope.bias", detector = "butterfly").entered();

    let members = NodeMask::from_nodes(graph.node_bound(), &union.members);
    let colliders = m_bias.variables();
    let mut flagged = NodeMask::new(graph.node_bound());
    let mut findings = Vec::new();

    for &c in &union.members {
        let confounder_parents: Vec<_> = graph
            .parents(c)
            .into_iter()
            .filter(|&p| members.contains(p))
            .collect();
        if confounder_parents.len() < 2 {
            continue;
        }
        debug!(variable = graph.node_id(c).unwrap_or("?"), "butterfly node");
        flagged.insert(c);
        findings.push(ButterflyFinding {
            variable: graph.node_id(c).unwrap_or_default().to_string(),
            confounder_parents: graph.ids_of(&confounder_parents),
        });
    }

    let confounders = graph.ids_of(&union.members);
    let safe: Vec<_> = union
        .members
        .iter()
        .copied()
        .filter(|&c| !flagged.contains(c))
        .filter(|&c| graph.node_id(c).is_some_and(|id| !colliders.contains(&id)))
        .collect();
    let safe_confounders = graph.ids_of(&safe);
    let recommendation = recommend(&confounders, &findings, &safe_confounders, &colliders);

    ButterflyReport {
        detected: !findings.is_empty(),
        confounders,
        findings,
        safe_confounders,
        incomplete: union.incomplete,
        recommendation,
    }
}

fn recommend(
    confounders: &[String],
    findings: &[ButterflyFinding],
    safe: &[String],
    colliders: &[&str],
) -> String {
    if confounders.is_empty() {
        return "no confounders identified".to_string();
    }
    let butterflies: Vec<&str> = findings
        .iter()
        .map(|f| f.variable.as_str())
        .filter(|v| !colliders.contains(v))
        .collect();
    let avoided: Vec<&str> = confounders
        .iter()
        .map(String::as_str)
        .filter(|v| colliders.contains(v))
        .collect();
    if butterflies.is_empty() && avoided.is_empty() {
        return format!("adjust for confounders: {}", safe.join(", "));
    }

    let mut clauses = Vec::new();
    if !butterflies.is_empty() {
        clauses.push(format!(
            "butterfly structure at {}: adjusting for it opens a path between its confounder parents",
            butterflies.join(", ")
        ));
    }
    if !avoided.is_empty() {
        clauses.push(format!(
            "do not adjust for {}: M-bias collider",
            avoided.join(", ")
        ));
    }
    if safe.is_empty() {
        clauses.push("choose a minimal adjustment set instead".to_string());
    } else if butterflies.is_empty() {
        clauses.push(format!("adjust for {}", safe.join(", ")));
    } else {
        clauses.push(format!(
            "adjust for {} together with {}",
            safe.join(", "),
            butterflies.join(", ")
        ));
    }
    clauses.join("; ")
}
