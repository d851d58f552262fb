use axum::{
    Router,
    extract::{Path, State, WebSocketUpgrade},
    response::IntoResponse,
    routing::get,
};

use crate::{
    error::AppError,
    services::{announcer_session, referee_session, scoring_session},
    state::{SharedState, score::Alliance},
};

#[utoipa::path(
    get,
    path = "/ws/scoring/{alliance}",
    tag = "stations",
    params(("alliance" = String, Path, description = "Alliance to score, `red` or `blue`")),
    responses(
        (status = 101, description = "Switching protocols to WebSocket"),
        (status = 400, description = "Unknown alliance")
    )
)]
/// Upgrade the HTTP connection into a scoring session for one alliance.
pub async fn scoring_ws(
    State(state): State<SharedState>,
    Path(alliance): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, AppError> {
    let alliance: Alliance = alliance.parse()?;
    Ok(ws.on_upgrade(move |socket| scoring_session::handle_socket(state, alliance, socket)))
}

#[utoipa::path(
    get,
    path = "/ws/referee",
    tag = "stations",
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
/// Upgrade the HTTP connection into a referee (foul entry) session.
pub async fn referee_ws(
    State(state): State<SharedState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| referee_session::handle_socket(state, socket))
}

#[utoipa::path(
    get,
    path = "/ws/announcer",
    tag = "stations",
    responses((status = 101, description = "Switching protocols to WebSocket"))
)]
/// Upgrade the HTTP connection into a read-only announcer session.
pub async fn announcer_ws(
    State(state): State<SharedState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| announcer_session::handle_socket(state, socket))
}

/// Configure the station WebSocket endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/ws/scoring/{alliance}", get(scoring_ws))
        .route("/ws/referee", get(referee_ws))
        .route("/ws/announcer", get(announcer_ws))
}
