//! Response DTO for the hook receiver.

use serde::Serialize;

use crate::services::notifications::{AdapterReport, DispatchReport};

/// Summary of one dispatch cycle triggered by an inbound hook
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub delivered: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<AdapterReport>,
}

impl From<DispatchReport> for DispatchResponse {
    fn from(report: DispatchReport) -> Self {
        Self {
            delivered: report.delivered(),
            skipped: report.skipped(),
            failed: report.failed(),
            results: report.results,
        }
    }
}
