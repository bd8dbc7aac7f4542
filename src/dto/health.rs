use serde::Serialize;
use utoipa::ToSchema;

/// Storage availability as reported by `/healthcheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    /// Live viewer sessions currently registered.
    pub live_sessions: usize,
}

impl HealthResponse {
    pub fn new(degraded: bool, live_sessions: usize) -> Self {
        let status = if degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Ok
        };
        Self {
            status,
            live_sessions,
        }
    }
}
