//! Player payloads for the admin and public APIs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::dao::models::PlayerEntity;

/// Payload used to create a player or replace its details.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlayerRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    /// Handicap index. Informational only.
    #[serde(default)]
    #[validate(range(min = -10.0, max = 54.0))]
    pub hcp: Option<f64>,
    /// Team to roster the player on, if any.
    #[serde(default)]
    pub team_id: Option<Uuid>,
}

/// Player as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub hcp: Option<f64>,
    pub team_id: Option<Uuid>,
    /// Name of the team the player is rostered on.
    pub team_name: Option<String>,
}

impl PlayerSummary {
    pub fn new(value: PlayerEntity, team_name: Option<String>) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            hcp: value.hcp,
            team_id: value.team_id,
            team_name,
        }
    }
}
