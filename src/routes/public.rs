use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        matches::{HoleCardResponse, MatchSummary},
        players::PlayerSummary,
        standings::StandingsResponse,
        teams::TeamSummary,
    },
    error::AppError,
    services::{match_service, player_service, standings, team_service},
    state::SharedState,
};

/// Read-only endpoints used by scoreboards and spectators.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/public/standings", get(get_standings))
        .route("/public/teams", get(get_teams))
        .route("/public/teams/{id}/players", get(get_team_roster))
        .route("/public/players", get(get_players))
        .route("/public/matches", get(get_matches))
        .route("/public/matches/{id}/holes", get(get_hole_card))
}

#[utoipa::path(
    get,
    path = "/public/standings",
    tag = "public",
    responses(
        (status = 200, description = "Team totals and every match grouped by status", body = StandingsResponse),
        (status = 503, description = "Storage unavailable")
    )
)]
/// Return the full standings snapshot.
pub async fn get_standings(
    State(state): State<SharedState>,
) -> Result<Json<StandingsResponse>, AppError> {
    Ok(Json(standings::get_standings(&state).await?))
}

#[utoipa::path(
    get,
    path = "/public/teams",
    tag = "public",
    responses((status = 200, description = "Teams ordered by name", body = [TeamSummary]))
)]
pub async fn get_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    Ok(Json(team_service::list_teams(&state).await?))
}

#[utoipa::path(
    get,
    path = "/public/teams/{id}/players",
    tag = "public",
    params(("id" = Uuid, Path, description = "Identifier of the team")),
    responses(
        (status = 200, description = "Players rostered on the team, ordered by name", body = [PlayerSummary]),
        (status = 404, description = "Team not found")
    )
)]
/// Return the current roster of one team.
pub async fn get_team_roster(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    Ok(Json(team_service::team_roster(&state, id).await?))
}

#[utoipa::path(
    get,
    path = "/public/players",
    tag = "public",
    responses((status = 200, description = "Players ordered by handicap", body = [PlayerSummary]))
)]
pub async fn get_players(
    State(state): State<SharedState>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    Ok(Json(player_service::list_players(&state).await?))
}

#[utoipa::path(
    get,
    path = "/public/matches",
    tag = "public",
    responses((status = 200, description = "Matches in creation order", body = [MatchSummary]))
)]
pub async fn get_matches(
    State(state): State<SharedState>,
) -> Result<Json<Vec<MatchSummary>>, AppError> {
    Ok(Json(match_service::list_matches(&state).await?))
}

#[utoipa::path(
    get,
    path = "/public/matches/{id}/holes",
    tag = "public",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    responses(
        (status = 200, description = "One outcome per hole of the match span", body = HoleCardResponse),
        (status = 404, description = "Match not found")
    )
)]
/// Return the recorded outcome of every hole the match covers.
pub async fn get_hole_card(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HoleCardResponse>, AppError> {
    Ok(Json(match_service::get_hole_card(&state, id).await?))
}
