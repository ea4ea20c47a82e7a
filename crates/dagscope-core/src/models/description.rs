//! Graph description: the textual/structural form graphs are imported from
//! and exported to. JSON and YAML share one serde model.

use serde::{Deserialize, Deserializer, Serialize};

use super::role::VariableRole;
use crate::errors::GraphError;

/// A node row from the editing tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_role")]
    pub role: VariableRole,
}

/// An edge row from the editing tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(alias = "source")]
    pub from: String,
    #[serde(alias = "target")]
    pub to: String,
}

/// A complete graph description: node list plus ordered edge list.
///
/// The description is allowed to violate graph invariants (dangling edges,
/// duplicates); the structural validator repairs it when a graph is built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescription {
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>, role: VariableRole) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

impl EdgeSpec {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl GraphDescription {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style node insertion.
    pub fn with_node(mut self, id: impl Into<String>, role: VariableRole) -> Self {
        self.nodes.push(NodeSpec::new(id, role));
        self
    }

    /// Builder-style edge insertion.
    pub fn with_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push(EdgeSpec::new(from, to));
        self
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::Parse {
            format: "json".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Parse {
            format: "json".to_string(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, GraphError> {
        serde_yaml::from_str(yaml).map_err(|e| GraphError::Parse {
            format: "yaml".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_yaml(&self) -> Result<String, GraphError> {
        serde_yaml::to_string(self).map_err(|e| GraphError::Parse {
            format: "yaml".to_string(),
            message: e.to_string(),
        })
    }
}

/// Accepts any role spelling `VariableRole::from_str_name` understands.
fn deserialize_role<'de, D>(deserializer: D) -> Result<VariableRole, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(VariableRole::Covariate),
        Some(name) => VariableRole::from_str_name(&name).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown role '{name}', expected exposure, outcome, covariate or latent"
            ))
        }),
    }
}
