//! Graph model: storage, adjacency queries, copy-on-write edits, and the
//! structural validator that every import and edit passes through.

pub mod adjacency;
pub mod dag_enforcement;
pub mod description;
pub mod editing;
pub mod stable_graph;

pub use dag_enforcement::{build_validated, Validated};
pub use editing::NodeRemoval;
pub use stable_graph::{IndexedDag, VariableNode};
