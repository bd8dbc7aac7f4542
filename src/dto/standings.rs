//! Standings snapshot served to spectators.

use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{
    status::MatchStatus,
    tournament::{HoleOutcome, HoleSpan, MatchFormat},
};

/// Everything the live dashboard renders.
#[derive(Debug, Serialize, ToSchema)]
pub struct StandingsResponse {
    /// Teams ordered by name, with finalized points.
    pub teams: Vec<TeamStanding>,
    pub matches: MatchesByStatus,
    /// Live estimate per team id including running matches, ordered like `teams`.
    #[schema(value_type = Object)]
    pub projected_scores: IndexMap<Uuid, f64>,
}

/// A team and its finalized points.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamStanding {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub score: f64,
}

/// Matches grouped by lifecycle status. Every match is in exactly one group.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct MatchesByStatus {
    pub prepared: Vec<MatchCard>,
    pub running: Vec<MatchCard>,
    pub completed: Vec<MatchCard>,
}

impl MatchesByStatus {
    pub fn bucket_mut(&mut self, status: MatchStatus) -> &mut Vec<MatchCard> {
        match status {
            MatchStatus::Prepared => &mut self.prepared,
            MatchStatus::Running => &mut self.running,
            MatchStatus::Completed => &mut self.completed,
        }
    }

    pub fn len(&self) -> usize {
        self.prepared.len() + self.running.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Display record of one match.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchCard {
    pub id: Uuid,
    pub status: MatchStatus,
    pub format: MatchFormat,
    pub holes: HoleSpan,
    pub start_time: Option<String>,
    pub team_a: MatchSide,
    pub team_b: MatchSide,
    /// Absent when the hole results of this match could not be read.
    pub score: Option<MatchScoreView>,
}

/// One side of a match.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchSide {
    pub team_id: Uuid,
    pub name: String,
    pub color: String,
    pub players: Vec<MatchPlayer>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MatchPlayer {
    pub name: String,
    pub hcp: Option<f64>,
}

/// Current tally of a match.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchScoreView {
    /// One outcome per hole of the span, in hole order.
    pub hole_results: Vec<HoleOutcome>,
    pub wins_a: u32,
    pub wins_b: u32,
    pub holes_played: u32,
    pub holes_remaining: u32,
    /// `"<Team> N Up"` or `"A/S"`.
    pub text: String,
    /// Points this match is worth to each side. Absent for prepared matches.
    pub points: Option<MatchPoints>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MatchPoints {
    pub team_a: f64,
    pub team_b: f64,
}
