//! Team payloads for the admin and public APIs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::TeamEntity,
    dto::{format_system_time, validation::validate_hex_color},
};

/// Payload used to create or edit a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct TeamRequest {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    /// Optional `#rrggbb` color. If omitted on creation, the backend chooses the first
    /// unused color from the configured palette; if omitted on edit, the color is kept.
    #[serde(default)]
    #[validate(custom(function = "validate_hex_color"))]
    pub color: Option<String>,
}

/// Replacement roster for a team.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RosterRequest {
    pub player_ids: Vec<Uuid>,
}

/// Team as exposed to clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamSummary {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub updated_at: String,
}

impl From<TeamEntity> for TeamSummary {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            color: value.color,
            updated_at: format_system_time(value.updated_at),
        }
    }
}
