use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{MongoDaoError, MongoResult};
use crate::{
    dao::models::{HoleResultEntity, MatchEntity, PlayerEntity, TeamEntity},
    state::tournament::{HoleSpan, MatchFormat},
};

pub const TEAM_COLLECTION: &str = "teams";
pub const PLAYER_COLLECTION: &str = "players";
pub const MATCH_COLLECTION: &str = "matches";
pub const HOLE_CARD_COLLECTION: &str = "hole_cards";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoTeamDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    color: String,
    updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoPlayerDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: Option<String>,
    hcp: Option<f64>,
    pub team_id: Option<String>,
    updated_at: DateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoMatchDocument {
    #[serde(rename = "_id")]
    id: String,
    team_a_id: String,
    team_b_id: String,
    format: MatchFormat,
    #[serde(default)]
    status: String,
    #[serde(default)]
    holes: HoleSpan,
    start_time: Option<String>,
    #[serde(default)]
    players_a: Vec<String>,
    #[serde(default)]
    players_b: Vec<String>,
    created_at: DateTime,
    updated_at: DateTime,
}

/// Every hole result of one match lives in a single document so a replacement is
/// a single-document write, which MongoDB applies atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoHoleCardDocument {
    #[serde(rename = "_id")]
    pub match_id: String,
    pub results: Vec<HoleResultEntity>,
    pub updated_at: DateTime,
}

impl From<TeamEntity> for MongoTeamDocument {
    fn from(value: TeamEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            color: value.color,
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoTeamDocument> for TeamEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoTeamDocument) -> MongoResult<Self> {
        Ok(Self {
            id: parse_id(TEAM_COLLECTION, &value.id)?,
            name: value.name,
            color: value.color,
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

impl From<PlayerEntity> for MongoPlayerDocument {
    fn from(value: PlayerEntity) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
            hcp: value.hcp,
            team_id: value.team_id.map(|id| id.to_string()),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoPlayerDocument> for PlayerEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoPlayerDocument) -> MongoResult<Self> {
        let team_id = value
            .team_id
            .as_deref()
            .map(|raw| parse_id(PLAYER_COLLECTION, raw))
            .transpose()?;
        Ok(Self {
            id: parse_id(PLAYER_COLLECTION, &value.id)?,
            name: value.name,
            email: value.email,
            hcp: value.hcp,
            team_id,
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

impl From<MatchEntity> for MongoMatchDocument {
    fn from(value: MatchEntity) -> Self {
        Self {
            id: value.id.to_string(),
            team_a_id: value.team_a_id.to_string(),
            team_b_id: value.team_b_id.to_string(),
            format: value.format,
            status: value.status,
            holes: value.holes,
            start_time: value.start_time,
            players_a: value.players_a.iter().map(Uuid::to_string).collect(),
            players_b: value.players_b.iter().map(Uuid::to_string).collect(),
            created_at: DateTime::from_system_time(value.created_at),
            updated_at: DateTime::from_system_time(value.updated_at),
        }
    }
}

impl TryFrom<MongoMatchDocument> for MatchEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoMatchDocument) -> MongoResult<Self> {
        let parse_all = |ids: &[String]| {
            ids.iter()
                .map(|raw| parse_id(MATCH_COLLECTION, raw))
                .collect::<MongoResult<Vec<_>>>()
        };
        Ok(Self {
            id: parse_id(MATCH_COLLECTION, &value.id)?,
            team_a_id: parse_id(MATCH_COLLECTION, &value.team_a_id)?,
            team_b_id: parse_id(MATCH_COLLECTION, &value.team_b_id)?,
            format: value.format,
            status: value.status,
            holes: value.holes,
            start_time: value.start_time,
            players_a: parse_all(&value.players_a)?,
            players_b: parse_all(&value.players_b)?,
            created_at: value.created_at.to_system_time(),
            updated_at: value.updated_at.to_system_time(),
        })
    }
}

fn parse_id(collection: &'static str, raw: &str) -> MongoResult<Uuid> {
    Uuid::parse_str(raw).map_err(|err| MongoDaoError::CorruptDocument {
        collection,
        id: raw.to_owned(),
        reason: err.to_string(),
    })
}

pub fn doc_id(id: Uuid) -> Document {
    doc! {"_id": id.to_string()}
}
