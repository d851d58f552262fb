/// Announcer display session.
pub mod announcer_session;
/// Match controller operations.
pub mod arena_service;
/// WebSocket framing shared by every station session.
pub mod connection;
/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Referee (foul entry) session.
pub mod referee_session;
/// Per-alliance scoring session.
pub mod scoring_session;
