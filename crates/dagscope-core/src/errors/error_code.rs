//! Stable string codes carried across the component boundary.

pub const INVALID_GRAPH: &str = "INVALID_GRAPH";
pub const MISSING_ROLES: &str = "MISSING_ROLES";
pub const UNIDENTIFIABLE: &str = "UNIDENTIFIABLE";
pub const RESULT_CAP_REACHED: &str = "RESULT_CAP_REACHED";
pub const CYCLE_DETECTED: &str = "CYCLE_DETECTED";
pub const CANCELLED: &str = "CANCELLED";
pub const PATH_LIMIT_REACHED: &str = "PATH_LIMIT_REACHED";
pub const SEARCH_TIMED_OUT: &str = "SEARCH_TIMED_OUT";
pub const NODE_NOT_FOUND: &str = "NODE_NOT_FOUND";
pub const EDGE_NOT_FOUND: &str = "EDGE_NOT_FOUND";
pub const DUPLICATE_NODE: &str = "DUPLICATE_NODE";
pub const SELF_LOOP: &str = "SELF_LOOP";
pub const EMPTY_ID: &str = "EMPTY_ID";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";

/// Maps an error to the code reported in tagged responses.
pub trait DagScopeErrorCode {
    fn error_code(&self) -> &'static str;
}
