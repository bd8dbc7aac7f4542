use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

use crate::state::tournament::{HoleOutcome, HoleResult, HoleSpan, MatchFormat};

/// Representation of a team stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Display name chosen for the team.
    pub name: String,
    /// Display color as `#rrggbb`.
    pub color: String,
    /// Last time this team was updated.
    pub updated_at: SystemTime,
}

/// Player record. Handicap is informational and never used for scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerEntity {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub hcp: Option<f64>,
    /// Team the player is rostered on, if any.
    pub team_id: Option<Uuid>,
    pub updated_at: SystemTime,
}

/// Match header as persisted by the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEntity {
    /// Primary key of the match.
    pub id: Uuid,
    pub team_a_id: Uuid,
    pub team_b_id: Uuid,
    pub format: MatchFormat,
    /// Raw status value. Readers normalise it; unknown values count as prepared.
    pub status: String,
    /// Holes played in this match.
    pub holes: HoleSpan,
    /// Scheduled tee time (`YYYY-MM-DDTHH:MM`, local to the course).
    pub start_time: Option<String>,
    /// Players on side A, in card order.
    pub players_a: Vec<Uuid>,
    /// Players on side B, in card order.
    pub players_b: Vec<Uuid>,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// Last time the match header was updated.
    pub updated_at: SystemTime,
}

/// One stored hole outcome. Only played holes are stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HoleResultEntity {
    pub hole: u8,
    pub result: HoleOutcome,
}

impl From<HoleResult> for HoleResultEntity {
    fn from(value: HoleResult) -> Self {
        Self {
            hole: value.hole,
            result: value.outcome,
        }
    }
}

impl From<HoleResultEntity> for HoleResult {
    fn from(value: HoleResultEntity) -> Self {
        HoleResult::new(value.hole, value.result)
    }
}
