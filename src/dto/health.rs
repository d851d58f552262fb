use serde::Serialize;
use utoipa::ToSchema;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Stations currently connected over websockets.
    pub connected_stations: usize,
    /// Notifier listeners currently subscribed across all stations.
    pub listeners: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(connected_stations: usize, listeners: usize) -> Self {
        Self {
            status: "ok".to_string(),
            connected_stations,
            listeners,
        }
    }

    /// Create a health response indicating the system is in degraded mode.
    pub fn degraded(connected_stations: usize, listeners: usize) -> Self {
        Self {
            status: "degraded".to_string(),
            connected_stations,
            listeners,
        }
    }
}
