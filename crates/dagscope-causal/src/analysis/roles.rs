//! Role listing and exposure/outcome resolution.

use dagscope_core::errors::AnalysisError;
use dagscope_core::models::{AnalysisQuery, RoleListing, VariableRole};
use petgraph::stable_graph::NodeIndex;

use crate::graph::IndexedDag;

pub fn role_listing(graph: &IndexedDag) -> RoleListing {
    let ids = |role| graph.ids_of(&graph.nodes_with_role(role));
    RoleListing {
        exposures: ids(VariableRole::Exposure),
        outcomes: ids(VariableRole::Outcome),
        covariates: ids(VariableRole::Covariate),
        latent: ids(VariableRole::Latent),
    }
}

/// Outcome of resolving the query's exposure and outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRoles {
    Pair { exposure: NodeIndex, outcome: NodeIndex },
    Missing(AnalysisError),
}

/// Explicit ids win; otherwise the first declared exposure/outcome is used.
///
/// Unknown explicit ids and an exposure equal to the outcome are errors.
/// Roles that are simply absent are returned as `Missing`.
pub fn resolve(graph: &IndexedDag, query: &AnalysisQuery) -> Result<ResolvedRoles, AnalysisError> {
    let exposure = pick(graph, query.exposure.as_deref(), VariableRole::Exposure)?;
    let outcome = pick(graph, query.outcome.as_deref(), VariableRole::Outcome)?;

    let (exposure, outcome) = match (exposure, outcome) {
        (Some(e), Some(o)) => (e, o),
        (e, o) => {
            let mut missing = Vec::new();
            if e.is_none() {
                missing.push("exposure");
            }
            if o.is_none() {
                missing.push("outcome");
            }
            return Ok(ResolvedRoles::Missing(AnalysisError::MissingRoles {
                missing: missing.join(", "),
            }));
        }
    };

    if exposure == outcome {
        return Err(AnalysisError::InvalidGraph {
            reason: format!(
                "exposure and outcome are the same variable '{}'",
                graph.node_id(exposure).unwrap_or("?")
            ),
        });
    }
    Ok(ResolvedRoles::Pair { exposure, outcome })
}

fn pick(
    graph: &IndexedDag,
    explicit: Option<&str>,
    role: VariableRole,
) -> Result<Option<NodeIndex>, AnalysisError> {
    match explicit {
        Some(id) => graph
            .get_node(id)
            .map(Some)
            .ok_or_else(|| AnalysisError::InvalidGraph {
                reason: format!("unknown {role} '{id}'"),
            }),
        None => Ok(graph.nodes_with_role(role).first().copied()),
    }
}
