use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        matches::{
            CreateMatchRequest, HoleCardResponse, HoleResultsRequest, MatchSummary, StatusRequest,
        },
        players::{PlayerRequest, PlayerSummary},
        teams::{RosterRequest, TeamRequest, TeamSummary},
    },
    error::AppError,
    services::{match_service, player_service, team_service},
    state::SharedState,
};

/// Organizer endpoints. Every successful call notifies live viewers.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/admin/teams", post(create_team))
        .route("/admin/teams/{id}", put(update_team).delete(delete_team))
        .route("/admin/teams/{id}/players", put(assign_roster))
        .route("/admin/players", post(create_player))
        .route(
            "/admin/players/{id}",
            put(update_player).delete(delete_player),
        )
        .route("/admin/matches", post(create_match))
        .route("/admin/matches/{id}", delete(delete_match))
        .route("/admin/matches/{id}/holes", put(submit_hole_results))
        .route("/admin/matches/{id}/status", put(set_match_status))
}

#[utoipa::path(
    post,
    path = "/admin/teams",
    tag = "admin",
    request_body = TeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamSummary),
        (status = 400, description = "Invalid name or color")
    )
)]
/// Create a team. A palette color is picked when none is supplied.
pub async fn create_team(
    State(state): State<SharedState>,
    Json(payload): Json<TeamRequest>,
) -> Result<(StatusCode, Json<TeamSummary>), AppError> {
    payload.validate()?;
    let summary = team_service::create_team(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    put,
    path = "/admin/teams/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the team to update")),
    request_body = TeamRequest,
    responses(
        (status = 200, description = "Team updated", body = TeamSummary),
        (status = 404, description = "Team not found")
    )
)]
pub async fn update_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TeamRequest>,
) -> Result<Json<TeamSummary>, AppError> {
    payload.validate()?;
    Ok(Json(team_service::update_team(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/teams/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the team to delete")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "Team not found"),
        (status = 409, description = "Team still plays in a match")
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    team_service::delete_team(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/admin/teams/{id}/players",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the team")),
    request_body = RosterRequest,
    responses(
        (status = 200, description = "New roster of the team", body = [PlayerSummary]),
        (status = 404, description = "Team or player not found")
    )
)]
/// Replace the whole roster of a team.
pub async fn assign_roster(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RosterRequest>,
) -> Result<Json<Vec<PlayerSummary>>, AppError> {
    Ok(Json(team_service::assign_roster(&state, id, payload).await?))
}

#[utoipa::path(
    post,
    path = "/admin/players",
    tag = "admin",
    request_body = PlayerRequest,
    responses(
        (status = 201, description = "Player created", body = PlayerSummary),
        (status = 400, description = "Invalid player details"),
        (status = 404, description = "Team not found")
    )
)]
pub async fn create_player(
    State(state): State<SharedState>,
    Json(payload): Json<PlayerRequest>,
) -> Result<(StatusCode, Json<PlayerSummary>), AppError> {
    payload.validate()?;
    let summary = player_service::create_player(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    put,
    path = "/admin/players/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the player to update")),
    request_body = PlayerRequest,
    responses(
        (status = 200, description = "Player updated", body = PlayerSummary),
        (status = 404, description = "Player or team not found")
    )
)]
pub async fn update_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlayerRequest>,
) -> Result<Json<PlayerSummary>, AppError> {
    payload.validate()?;
    Ok(Json(player_service::update_player(&state, id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/admin/players/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the player to delete")),
    responses(
        (status = 204, description = "Player deleted"),
        (status = 404, description = "Player not found")
    )
)]
pub async fn delete_player(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    player_service::delete_player(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/admin/matches",
    tag = "admin",
    request_body = CreateMatchRequest,
    responses(
        (status = 201, description = "Match scheduled", body = MatchSummary),
        (status = 400, description = "Invalid pairing or start time"),
        (status = 404, description = "Team or player not found")
    )
)]
/// Schedule a match between two teams.
pub async fn create_match(
    State(state): State<SharedState>,
    Json(payload): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchSummary>), AppError> {
    payload.validate()?;
    let summary = match_service::create_match(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[utoipa::path(
    delete,
    path = "/admin/matches/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the match to delete")),
    responses(
        (status = 204, description = "Match and its hole results deleted"),
        (status = 404, description = "Match not found")
    )
)]
pub async fn delete_match(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    match_service::delete_match(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/admin/matches/{id}/holes",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    request_body = HoleResultsRequest,
    responses(
        (status = 200, description = "Stored card", body = HoleCardResponse),
        (status = 400, description = "Card length does not match the span or a code is unknown"),
        (status = 404, description = "Match not found")
    )
)]
/// Replace the hole results of a match. Codes are `A`, `B`, `AS` or empty.
pub async fn submit_hole_results(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<HoleResultsRequest>,
) -> Result<Json<HoleCardResponse>, AppError> {
    Ok(Json(
        match_service::submit_hole_results(&state, id, payload).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/admin/matches/{id}/status",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Identifier of the match")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status changed", body = MatchSummary),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Match not found"),
        (status = 409, description = "Transition refused by the configured policy")
    )
)]
pub async fn set_match_status(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusRequest>,
) -> Result<Json<MatchSummary>, AppError> {
    Ok(Json(match_service::set_status(&state, id, payload).await?))
}
