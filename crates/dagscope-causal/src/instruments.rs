//! Instrumental variable finder.

use dagscope_core::errors::AnalysisError;
use dagscope_core::models::VariableRole;
use dagscope_core::traits::{Cancellable, CancellationToken};
use petgraph::stable_graph::NodeIndex;
use tracing::{debug, info_span};

use crate::paths::Oracle;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstrumentResult {
    /// Accepted instruments in insertion order.
    pub variables: Vec<NodeIndex>,
    /// Some path enumeration hit the path limit.
    pub truncated: bool,
}

/// Test every candidate against the instrument conditions:
///
/// - relevance: some path between candidate and exposure is open with nothing
///   conditioned on;
/// - exclusion: with the exposure held fixed, no path between candidate and
///   outcome stays open. Paths that leave the exposure through one of its
///   outgoing edges are cut there; every other path must already be blocked.
pub fn find_instruments(
    oracle: &Oracle<'_>,
    exposure: NodeIndex,
    outcome: NodeIndex,
    exclude_exposure_descendants: bool,
    token: &CancellationToken,
) -> Result<InstrumentResult, AnalysisError> {
    let graph = oracle.graph();
    let _span = info_span!("dagscope.instruments", nodes = graph.node_count()).entered();

    let empty = oracle.mask();
    let mut result = InstrumentResult::default();

    for candidate in graph.nodes() {
        if token.is_cancelled() {
            return Err(AnalysisError::Cancelled);
        }
        if candidate == exposure || candidate == outcome {
            continue;
        }
        if graph.role(candidate) == Some(VariableRole::Latent) {
            continue;
        }
        if oracle.is_descendant(candidate, outcome) {
            continue;
        }
        if exclude_exposure_descendants && oracle.is_descendant(candidate, exposure) {
            continue;
        }

        let to_exposure = oracle.enumerate_paths(candidate, exposure);
        result.truncated |= to_exposure.truncated;
        let relevant = to_exposure.paths.iter().any(|p| oracle.is_open(p, &empty));
        if !relevant {
            continue;
        }

        let to_outcome = oracle.enumerate_paths(candidate, outcome);
        result.truncated |= to_outcome.truncated;
        let excluded = to_outcome.paths.iter().all(|p| {
            p.leaves_through_outgoing(exposure) || !oracle.is_open(p, &empty)
        });
        if excluded {
            debug!(candidate = graph.node_id(candidate).unwrap_or("?"), "instrument accepted");
            result.variables.push(candidate);
        }
    }

    Ok(result)
}
