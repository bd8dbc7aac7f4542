use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI document for the match play backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::public::get_standings,
        crate::routes::public::get_teams,
        crate::routes::public::get_team_roster,
        crate::routes::public::get_players,
        crate::routes::public::get_matches,
        crate::routes::public::get_hole_card,
        crate::routes::admin::create_team,
        crate::routes::admin::update_team,
        crate::routes::admin::delete_team,
        crate::routes::admin::assign_roster,
        crate::routes::admin::create_player,
        crate::routes::admin::update_player,
        crate::routes::admin::delete_player,
        crate::routes::admin::create_match,
        crate::routes::admin::delete_match,
        crate::routes::admin::submit_hole_results,
        crate::routes::admin::set_match_status,
        crate::routes::sse::live_stream,
        crate::routes::websocket::ws_handler,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::standings::StandingsResponse,
            crate::dto::standings::TeamStanding,
            crate::dto::standings::MatchesByStatus,
            crate::dto::standings::MatchCard,
            crate::dto::standings::MatchSide,
            crate::dto::standings::MatchPlayer,
            crate::dto::standings::MatchScoreView,
            crate::dto::standings::MatchPoints,
            crate::dto::teams::TeamRequest,
            crate::dto::teams::TeamSummary,
            crate::dto::teams::RosterRequest,
            crate::dto::players::PlayerRequest,
            crate::dto::players::PlayerSummary,
            crate::dto::matches::CreateMatchRequest,
            crate::dto::matches::MatchSummary,
            crate::dto::matches::HoleResultsRequest,
            crate::dto::matches::HoleCardResponse,
            crate::dto::matches::StatusRequest,
            crate::state::status::MatchStatus,
            crate::state::tournament::MatchFormat,
            crate::state::tournament::HoleSpan,
            crate::state::tournament::HoleOutcome,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "public", description = "Read-only standings and listings"),
        (name = "admin", description = "Organizer commands"),
        (name = "live", description = "Live update channels"),
    )
)]
pub struct ApiDoc;
