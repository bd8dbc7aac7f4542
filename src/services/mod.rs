/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Match scheduling, hole results and status changes.
pub mod match_service;
/// Player management.
pub mod player_service;
/// Match play scoring of a single match.
pub mod scoring;
/// Live SSE viewer sessions.
pub mod sse_service;
/// Standings aggregation across all matches.
pub mod standings;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
/// Team management and rosters.
pub mod team_service;
/// Live WebSocket viewer sessions.
pub mod websocket_service;
