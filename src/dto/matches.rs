//! Match payloads: creation, hole result submission and status changes.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::MatchEntity,
    dto::{format_system_time, validation::validate_start_time},
    state::{
        status::MatchStatus,
        tournament::{HoleOutcome, HoleSpan, MatchFormat},
    },
};

/// Payload used to schedule a new match.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMatchRequest {
    pub team_a: Uuid,
    pub team_b: Uuid,
    pub format: MatchFormat,
    #[serde(default)]
    pub holes: HoleSpan,
    /// Scheduled tee time, `YYYY-MM-DDTHH:MM`.
    #[serde(default)]
    #[validate(custom(function = "validate_start_time"))]
    pub start_time: Option<String>,
    #[serde(default)]
    pub players_a: Vec<Uuid>,
    #[serde(default)]
    pub players_b: Vec<Uuid>,
}

/// Full score card for a match: one outcome code per hole of its span, in hole order.
///
/// Codes are `A`, `B`, `AS` (halved) or an empty string for an unplayed hole. The card
/// replaces every previously stored result of the match.
#[derive(Debug, Deserialize, ToSchema)]
pub struct HoleResultsRequest {
    pub results: Vec<String>,
}

/// New status for a match.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusRequest {
    /// `prepared`, `running` or `completed`.
    pub status: String,
}

/// Match header as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchSummary {
    pub id: Uuid,
    pub team_a_id: Uuid,
    pub team_b_id: Uuid,
    pub format: MatchFormat,
    pub status: MatchStatus,
    pub holes: HoleSpan,
    pub start_time: Option<String>,
    pub players_a: Vec<Uuid>,
    pub players_b: Vec<Uuid>,
    pub created_at: String,
}

impl From<MatchEntity> for MatchSummary {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id,
            team_a_id: value.team_a_id,
            team_b_id: value.team_b_id,
            format: value.format,
            status: MatchStatus::normalize(&value.status),
            holes: value.holes,
            start_time: value.start_time,
            players_a: value.players_a,
            players_b: value.players_b,
            created_at: format_system_time(value.created_at),
        }
    }
}

/// Stored results of a match laid out over its span.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoleCardResponse {
    pub match_id: Uuid,
    pub holes: HoleSpan,
    /// Course number of the first entry in `results`.
    pub first_hole: u8,
    pub results: Vec<HoleOutcome>,
}
