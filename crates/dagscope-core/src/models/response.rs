//! Tagged `{success, message, code, data}` wrapper used at the component boundary.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::report::AnalysisReport;
use crate::errors::error_code::{self, DagScopeErrorCode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Response<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            code: None,
            data: Some(data),
        }
    }

    pub fn failure<E: DagScopeErrorCode + Display>(err: &E) -> Self {
        Self {
            success: false,
            message: err.to_string(),
            code: Some(err.error_code().to_string()),
            data: None,
        }
    }

    pub fn from_result<E: DagScopeErrorCode + Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::ok(data, "ok"),
            Err(e) => Self::failure(&e),
        }
    }
}

impl Response<AnalysisReport> {
    /// Wrap an analysis result. A report whose roles could not be resolved is
    /// returned with `success = false` but keeps its role listing as data.
    pub fn from_analysis<E: DagScopeErrorCode + Display>(result: Result<AnalysisReport, E>) -> Self {
        match result {
            Ok(report) if !report.summary.analysis_possible => {
                let message = report
                    .findings
                    .iter()
                    .find(|f| f.code == error_code::MISSING_ROLES)
                    .map(|f| f.message.clone())
                    .unwrap_or_else(|| "analysis not possible".to_string());
                Self {
                    success: false,
                    message,
                    code: Some(error_code::MISSING_ROLES.to_string()),
                    data: Some(report),
                }
            }
            Ok(report) => {
                let message = format!(
                    "{} adjustment set(s), {} instrument(s), {} path(s)",
                    report.adjustment.sets.len(),
                    report.instruments.count,
                    report.paths.len()
                );
                Self::ok(report, message)
            }
            Err(e) => Self::failure(&e),
        }
    }
}
