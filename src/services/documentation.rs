use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the realtime scoring server.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::websocket::scoring_ws,
        crate::routes::websocket::referee_ws,
        crate::routes::websocket::announcer_ws,
        crate::routes::arena::load_match,
        crate::routes::arena::get_match,
        crate::routes::arena::update_match_time,
        crate::routes::arena::post_score,
        crate::routes::arena::get_posted_score,
        crate::routes::arena::get_score,
        crate::routes::arena::get_rules,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::ws::InboundFrame,
            crate::dto::ws::MatchTimeMessage,
            crate::dto::ws::PreloadPayload,
            crate::dto::ws::AddFoulPayload,
            crate::dto::ws::DeleteFoulPayload,
            crate::state::StationKind,
            crate::state::arena::MatchTiming,
            crate::state::score::RealtimeScore,
            crate::state::score::Foul,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "arena", description = "Match controller operations"),
        (name = "stations", description = "WebSocket sessions for scoring, referee and announcer stations"),
    )
)]
pub struct ApiDoc;
