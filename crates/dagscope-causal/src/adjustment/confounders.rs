//! Confounder union: every variable that appears in some sufficient set of
//! bounded size, minimal or not.

use dagscope_core::errors::AnalysisError;
use dagscope_core::traits::{Cancellable, CancellationToken};
use petgraph::stable_graph::NodeIndex;
use rayon::prelude::*;
use tracing::{debug, info_span};

use super::problem::AdjustmentProblem;
use crate::paths::NodeMask;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfounderUnion {
    /// Members in universe order.
    pub members: Vec<NodeIndex>,
    /// Some candidate was not decided before the deadline.
    pub incomplete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    Member,
    Absent,
    Expired,
    Cancelled,
}

/// Compute the union, one bounded search per candidate, candidates in parallel.
///
/// `known` lists variables already seen in an accepted set; they are members
/// without a search.
pub fn confounder_union(
    problem: &AdjustmentProblem<'_, '_>,
    max_set_size: usize,
    known: &[NodeIndex],
    token: &CancellationToken,
) -> Result<ConfounderUnion, AnalysisError> {
    let _span = info_span!("dagscope.adjustment", candidates = problem.universe.len()).entered();

    let probes: Vec<(NodeIndex, Probe)> = problem
        .universe
        .par_iter()
        .enumerate()
        .map(|(pos, &candidate)| {
            if known.contains(&candidate) {
                return (candidate, Probe::Member);
            }
            (candidate, probe(problem, pos, max_set_size, token))
        })
        .collect();

    if probes.iter().any(|(_, p)| *p == Probe::Cancelled) {
        return Err(AnalysisError::Cancelled);
    }

    let union = ConfounderUnion {
        members: probes
            .iter()
            .filter(|(_, p)| *p == Probe::Member)
            .map(|(v, _)| *v)
            .collect(),
        incomplete: probes.iter().any(|(_, p)| *p == Probe::Expired),
    };
    debug!(
        members = union.members.len(),
        incomplete = union.incomplete,
        "confounder union computed"
    );
    Ok(union)
}

/// Look for any sufficient set of size <= `max_set_size` containing the
/// universe entry at `forced`.
fn probe(
    problem: &AdjustmentProblem<'_, '_>,
    forced: usize,
    max_set_size: usize,
    token: &CancellationToken,
) -> Probe {
    let n = problem.universe.len();
    let others: Vec<usize> = (0..n).filter(|&p| p != forced).collect();
    let mut mask = problem.mask();
    mask.insert(problem.universe[forced]);

    for extra in 0..max_set_size.min(n) {
        if let Some(found) = extend(problem, &others, 0, extra, &mut mask, token) {
            return found;
        }
    }
    Probe::Absent
}

fn extend(
    problem: &AdjustmentProblem<'_, '_>,
    others: &[usize],
    start: usize,
    remaining: usize,
    mask: &mut NodeMask,
    token: &CancellationToken,
) -> Option<Probe> {
    if token.is_cancelled() {
        return Some(Probe::Cancelled);
    }
    if remaining == 0 {
        if token.is_expired() {
            return Some(Probe::Expired);
        }
        return problem.is_sufficient(mask).then_some(Probe::Member);
    }
    for i in start..=(others.len() - remaining) {
        let node = problem.universe[others[i]];
        mask.insert(node);
        let found = extend(problem, others, i + 1, remaining - 1, mask, token);
        mask.remove(node);
        if found.is_some() {
            return found;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::IndexedDag;
    use crate::paths::Oracle;
    use dagscope_core::models::{EffectType, VariableRole};

    #[test]
    fn union_includes_non_minimal_members() {
        // X <- A -> Y with an unrelated covariate B: {A, B} is valid but not minimal.
        let mut g = IndexedDag::new();
        g.add_node("X", VariableRole::Exposure).unwrap();
        g.add_node("A", VariableRole::Covariate).unwrap();
        g.add_node("B", VariableRole::Covariate).unwrap();
        g.add_node("Y", VariableRole::Outcome).unwrap();
        g.add_edge("A", "X").unwrap();
        g.add_edge("A", "Y").unwrap();

        let oracle = Oracle::new(&g, 100);
        let x = g.get_node("X").unwrap();
        let y = g.get_node("Y").unwrap();
        let problem = AdjustmentProblem::new(&oracle, x, y, EffectType::Total).unwrap();
        let union = confounder_union(&problem, 4, &[], &CancellationToken::new()).unwrap();
        assert_eq!(g.ids_of(&union.members), vec!["A", "B"]);
        assert!(!union.incomplete);

        let bounded = confounder_union(&problem, 1, &[], &CancellationToken::new()).unwrap();
        assert_eq!(g.ids_of(&bounded.members), vec!["A"]);
    }
}
