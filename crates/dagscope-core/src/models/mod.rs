//! Plain data exchanged across the engine boundary.
//! Everything here is owned serde data with no references into graph storage.

pub mod description;
pub mod query;
pub mod report;
pub mod response;
pub mod role;
pub mod validation_report;

pub use description::{EdgeSpec, GraphDescription, NodeSpec};
pub use query::{AnalysisQuery, EffectType};
pub use report::{
    AdjustmentReport, AdjustmentSetReport, AnalysisReport, ButterflyFinding, ButterflyReport,
    Finding, InstrumentReport, MBiasFinding, MBiasReport, PathKind, PathReport, RoleListing,
    SummaryFlags,
};
pub use response::Response;
pub use role::VariableRole;
pub use validation_report::ValidationReport;
