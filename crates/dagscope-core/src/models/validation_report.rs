use serde::{Deserialize, Serialize};

/// Outcome of structural validation and repair after an import or edit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True when no cycles remain after repair.
    pub valid: bool,
    /// Total number of automatic repairs applied.
    pub fixes_applied: usize,
    /// Edges dropped because an endpoint does not exist.
    pub orphaned_count: usize,
    /// Repeated edges dropped (first occurrence kept).
    pub duplicate_count: usize,
    /// Self-loop edges dropped.
    pub self_loop_count: usize,
    /// Repeated node ids dropped (first occurrence kept).
    pub duplicate_node_count: usize,
    /// Human-readable repair and cycle messages.
    pub messages: Vec<String>,
    /// One representative simple cycle per strongly connected component.
    pub cycles: Vec<Vec<String>>,
    /// Cycles containing both an exposure and an outcome.
    pub critical_cycles: Vec<Vec<String>>,
}

impl ValidationReport {
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    pub fn has_critical_cycles(&self) -> bool {
        !self.critical_cycles.is_empty()
    }

    /// Render the first cycle as `A -> B -> C -> A`.
    pub fn first_cycle_path(&self) -> Option<String> {
        self.cycles.first().map(|cycle| render_cycle(cycle))
    }
}

/// Render a cycle as a closed arrow chain.
pub fn render_cycle(cycle: &[String]) -> String {
    let mut parts: Vec<&str> = cycle.iter().map(String::as_str).collect();
    if let Some(first) = cycle.first() {
        parts.push(first);
    }
    parts.join(" -> ")
}
