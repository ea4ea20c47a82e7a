/// DagScope version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default cap on the number of minimal adjustment sets returned per query.
pub const DEFAULT_MAX_RESULTS: usize = 50;

/// Default cap on simple paths enumerated between two variables.
pub const DEFAULT_PATH_LIMIT: usize = 10_000;

/// Default ceiling on adjustment set size explored by the search.
pub const DEFAULT_MAX_SET_SIZE: usize = 8;

/// Default wall-clock budget for a single adjustment search (milliseconds).
pub const DEFAULT_SEARCH_BUDGET_MS: u64 = 5_000;

/// Default number of analysis reports kept in the session cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 128;

/// Default number of snapshots retained for undo.
pub const DEFAULT_UNDO_DEPTH: usize = 32;

/// Default log level for the tracing subscriber.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Description attached to the empty adjustment set.
pub const NO_ADJUSTMENT_NEEDED: &str = "no adjustment needed";
