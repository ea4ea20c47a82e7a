//! Iterative-deepening backtracking over the indexed universe.
//!
//! Sizes are explored in increasing order and combinations lexicographically
//! within a size, so the first sets accepted are the smallest and the output
//! order is fully determined by insertion order. Any combination containing
//! an already accepted set is pruned, which makes every accepted set minimal.

use dagscope_core::errors::AnalysisError;
use dagscope_core::traits::{Cancellable, CancellationToken};
use tracing::{debug, info, info_span};

use super::problem::AdjustmentProblem;
use super::AdjustmentSet;
use crate::paths::NodeMask;

/// Bounds for one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_results: usize,
    pub max_set_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjustmentResult {
    pub sets: Vec<AdjustmentSet>,
    /// Another minimal set exists beyond `max_results`.
    pub truncated: bool,
    pub timed_out: bool,
    /// Every subset size up to the universe size was explored.
    pub exhausted: bool,
    pub evaluated: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Truncated,
    TimedOut,
}

struct Search<'a, 'o, 'g> {
    problem: &'a AdjustmentProblem<'o, 'g>,
    token: &'a CancellationToken,
    max_results: usize,
    conditioning: NodeMask,
    chosen: Vec<usize>,
    chosen_at: Vec<bool>,
    accepted: Vec<Vec<usize>>,
    evaluated: u64,
    flow: Flow,
}

impl Search<'_, '_, '_> {
    fn push(&mut self, pos: usize) {
        self.chosen.push(pos);
        self.chosen_at[pos] = true;
        self.conditioning.insert(self.problem.universe[pos]);
    }

    fn pop(&mut self, pos: usize) {
        self.chosen.pop();
        self.chosen_at[pos] = false;
        self.conditioning.remove(self.problem.universe[pos]);
    }

    fn contains_accepted(&self) -> bool {
        self.accepted
            .iter()
            .any(|set| set.iter().all(|&p| self.chosen_at[p]))
    }

    fn evaluate(&mut self) {
        self.evaluated += 1;
        if self.token.is_expired() {
            self.flow = Flow::TimedOut;
            return;
        }
        if !self.problem.is_sufficient(&self.conditioning) {
            return;
        }
        if self.accepted.len() >= self.max_results {
            self.flow = Flow::Truncated;
            return;
        }
        debug!(size = self.chosen.len(), "accepted adjustment set");
        self.accepted.push(self.chosen.clone());
    }

    fn backtrack(&mut self, start: usize, size: usize) -> Result<(), AnalysisError> {
        if self.token.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if self.chosen.len() == size {
            self.evaluate();
            return Ok(());
        }
        let remaining = size - self.chosen.len();
        let n = self.problem.universe.len();
        for pos in start..=(n - remaining) {
            self.push(pos);
            if !self.contains_accepted() {
                self.backtrack(pos + 1, size)?;
            }
            self.pop(pos);
            if self.flow != Flow::Continue {
                break;
            }
        }
        Ok(())
    }
}

/// Enumerate minimal sufficient adjustment sets.
///
/// Once `max_results` sets are held the search keeps going only until it
/// meets one more minimal set, which sets `truncated`. A passed deadline
/// stops the search with the sets found so far; explicit cancellation is an
/// error.
pub fn minimal_sets(
    problem: &AdjustmentProblem<'_, '_>,
    limits: SearchLimits,
    token: &CancellationToken,
) -> Result<AdjustmentResult, AnalysisError> {
    let _span = info_span!(
        "dagscope.adjustment",
        universe = problem.universe.len(),
        targets = problem.targets.len()
    )
    .entered();

    let n = problem.universe.len();
    let max_size = limits.max_set_size.min(n);
    let mut search = Search {
        problem,
        token,
        max_results: limits.max_results.max(1),
        conditioning: problem.mask(),
        chosen: Vec::with_capacity(max_size),
        chosen_at: vec![false; n],
        accepted: Vec::new(),
        evaluated: 0,
        flow: Flow::Continue,
    };

    for size in 0..=max_size {
        search.backtrack(0, size)?;
        if search.flow != Flow::Continue {
            break;
        }
    }

    let sets: Vec<AdjustmentSet> = search
        .accepted
        .iter()
        .enumerate()
        .map(|(i, positions)| AdjustmentSet {
            id: i + 1,
            variables: positions.iter().map(|&p| problem.universe[p]).collect(),
        })
        .collect();

    let result = AdjustmentResult {
        sets,
        truncated: search.flow == Flow::Truncated,
        timed_out: search.flow == Flow::TimedOut,
        exhausted: search.flow == Flow::Continue && max_size == n,
        evaluated: search.evaluated,
    };

    info!(
        sets = result.sets.len(),
        evaluated = result.evaluated,
        truncated = result.truncated,
        timed_out = result.timed_out,
        "adjustment search finished"
    );
    Ok(result)
}
