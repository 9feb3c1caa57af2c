//! Body of `GET /health`: overall verdict plus the database, cache and click
//! queue checks.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Outcome of one component check. `Disabled` marks an optional component
/// that is switched off and does not degrade the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    Ok,
    Disabled,
    Error,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub checks: HealthChecks,
}

impl HealthResponse {
    /// Degraded as soon as any check reports an error.
    pub fn from_checks(checks: HealthChecks) -> Self {
        let degraded = [&checks.database, &checks.cache, &checks.click_queue]
            .iter()
            .any(|c| c.status == CheckState::Error);

        Self {
            status: if degraded {
                ServiceStatus::Degraded
            } else {
                ServiceStatus::Healthy
            },
            version: env!("CARGO_PKG_VERSION"),
            checks,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Store round-trip (short URL count).
    pub database: CheckStatus,
    /// Redis PING, or `disabled` without Redis.
    pub cache: CheckStatus,
    /// Whether the click worker still accepts events.
    pub click_queue: CheckStatus,
}

#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub status: CheckState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: CheckState::Ok,
            message: Some(message.into()),
        }
    }

    pub fn disabled(message: impl Into<String>) -> Self {
        Self {
            status: CheckState::Disabled,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: CheckState::Error,
            message: Some(message.into()),
        }
    }
}
