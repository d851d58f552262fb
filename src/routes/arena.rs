use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::arena::{
        LoadMatchRequest, MatchTimeUpdate, MatchView, PostScoreResponse, RulesResponse, ScoreView,
    },
    error::AppError,
    services::arena_service,
    state::{SharedState, arena::PostedResult, score::Alliance},
};

/// Match controller endpoints driving what the stations see.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/arena/match", get(get_match).post(load_match))
        .route("/arena/match-time", post(update_match_time))
        .route("/arena/score", get(get_posted_score).post(post_score))
        .route("/arena/score/{alliance}", get(get_score))
        .route("/arena/rules", get(get_rules))
}

/// Load a new match on the field, resetting both realtime scores.
#[utoipa::path(
    post,
    path = "/arena/match",
    tag = "arena",
    request_body = LoadMatchRequest,
    responses(
        (status = 200, description = "Match loaded", body = MatchView),
        (status = 400, description = "Invalid roster")
    )
)]
pub async fn load_match(
    State(state): State<SharedState>,
    Valid(Json(request)): Valid<Json<LoadMatchRequest>>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(arena_service::load_match(&state, request).await?))
}

/// Retrieve the match currently loaded on the field.
#[utoipa::path(
    get,
    path = "/arena/match",
    tag = "arena",
    responses((status = 200, description = "Loaded match and clock", body = MatchView))
)]
pub async fn get_match(State(state): State<SharedState>) -> Json<MatchView> {
    Json(arena_service::current_match(&state).await)
}

/// Report the arena clock.
#[utoipa::path(
    post,
    path = "/arena/match-time",
    tag = "arena",
    request_body = MatchTimeUpdate,
    responses((status = 204, description = "Clock recorded"))
)]
pub async fn update_match_time(
    State(state): State<SharedState>,
    Valid(Json(update)): Valid<Json<MatchTimeUpdate>>,
) -> StatusCode {
    arena_service::update_match_time(&state, update);
    StatusCode::NO_CONTENT
}

/// Post the final result of the current match to announcer displays.
#[utoipa::path(
    post,
    path = "/arena/score",
    tag = "arena",
    responses((status = 200, description = "Result posted", body = PostScoreResponse))
)]
pub async fn post_score(
    State(state): State<SharedState>,
) -> Result<Json<PostScoreResponse>, AppError> {
    let result = arena_service::post_score(&state).await?;
    Ok(Json(PostScoreResponse { result }))
}

/// Retrieve the last posted result.
#[utoipa::path(
    get,
    path = "/arena/score",
    tag = "arena",
    responses(
        (status = 200, description = "Last posted result", body = PostedResult),
        (status = 404, description = "Nothing posted yet")
    )
)]
pub async fn get_posted_score(
    State(state): State<SharedState>,
) -> Result<Json<PostedResult>, AppError> {
    Ok(Json(arena_service::posted_result(&state).await?))
}

/// Retrieve the realtime score of one alliance.
#[utoipa::path(
    get,
    path = "/arena/score/{alliance}",
    tag = "arena",
    params(("alliance" = String, Path, description = "`red` or `blue`")),
    responses(
        (status = 200, description = "Realtime score", body = ScoreView),
        (status = 400, description = "Unknown alliance")
    )
)]
pub async fn get_score(
    State(state): State<SharedState>,
    Path(alliance): Path<String>,
) -> Result<Json<ScoreView>, AppError> {
    let alliance: Alliance = alliance.parse()?;
    Ok(Json(arena_service::score_view(&state, alliance).await?))
}

/// List the rule codes fouls may be assessed under.
#[utoipa::path(
    get,
    path = "/arena/rules",
    tag = "arena",
    responses((status = 200, description = "Rule book", body = RulesResponse))
)]
pub async fn get_rules() -> Json<RulesResponse> {
    Json(arena_service::rules())
}
