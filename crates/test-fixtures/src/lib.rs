//! Test fixture loader for DagScope golden graphs.
//!
//! Each golden file holds a graph description, an optional query and the
//! expected analysis outcome. Graphs stay as raw JSON here so this crate
//! does not depend on the engine it is used to test.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of the fixture files.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// One golden scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct GoldenCase {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub input: GoldenInput,
    pub expected: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoldenInput {
    /// A graph description (`{nodes, edges}`).
    pub graph: serde_json::Value,
    /// An analysis query; absent means declared roles and defaults.
    #[serde(default)]
    pub query: serde_json::Value,
}

/// Load `golden/<name>.json`.
pub fn load_golden(name: &str) -> GoldenCase {
    load_fixture(&format!("golden/{name}.json"))
}

/// Every golden case, sorted by file name.
pub fn golden_cases() -> Vec<GoldenCase> {
    list_fixtures("golden")
        .into_iter()
        .map(|path| {
            let content = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
            serde_json::from_str(&content)
                .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
        })
        .collect()
}
