use tracing::warn;

use crate::{
    dto::health::HealthResponse,
    state::{SharedState, score::Alliance},
};

/// Report whether both score keepers answer, along with the connected station
/// and notifier listener counts.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let connected = state.stations().len();
    let listeners = state.listener_count();
    let mut degraded = false;
    for alliance in Alliance::ALL {
        if let Err(err) = state.scores().get(alliance).snapshot().await {
            warn!(alliance = %alliance, error = %err, "score keeper health check failed");
            degraded = true;
        }
    }

    if degraded {
        HealthResponse::degraded(connected, listeners)
    } else {
        HealthResponse::ok(connected, listeners)
    }
}
