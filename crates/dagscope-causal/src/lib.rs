//! # dagscope-causal
//!
//! Causal DAG engine. Builds a validated graph from a [`GraphDescription`],
//! enumerates and classifies paths, evaluates d-separation, searches for
//! minimal sufficient adjustment sets, finds instrumental variables and
//! flags M-bias and butterfly-bias structures.
//!
//! Every analysis is a pure function over an immutable [`IndexedDag`]
//! snapshot. [`DagSession`] layers versioned editing, undo and a result
//! cache on top.
//!
//! [`GraphDescription`]: dagscope_core::GraphDescription

pub mod adjustment;
pub mod analysis;
pub mod bias;
pub mod graph;
pub mod instruments;
pub mod paths;
pub mod session;

pub use adjustment::{
    confounder_union, minimal_sets, AdjustmentProblem, AdjustmentResult, AdjustmentSet,
    ConfounderUnion, SearchLimits,
};
pub use analysis::analyze;
pub use bias::{detect_butterfly, detect_m_bias};
pub use graph::dag_enforcement::would_create_cycle;
pub use graph::{build_validated, IndexedDag, NodeRemoval, Validated};
pub use instruments::{find_instruments, InstrumentResult};
pub use paths::{Arrow, CausalPath, DSeparation, NodeMask, Oracle, PathEnumeration};
pub use session::{DagSession, EditOutcome, GraphSnapshot};
