//! Health check DTOs for API responses.

use serde::{Deserialize, Serialize};

/// Health check response structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    /// Timestamp of the check (RFC 3339)
    pub timestamp: String,
    pub adapters: AdapterCounts,
}

/// Health status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// Every configured adapter can deliver
    Healthy,
    /// Some adapters are disabled, or none are configured
    Degraded,
}

/// Number of configured and enabled adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterCounts {
    pub configured: usize,
    pub enabled: usize,
}

impl AdapterCounts {
    pub fn status(&self) -> HealthStatus {
        if self.configured > 0 && self.enabled == self.configured {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded
        }
    }
}
