//! Standings aggregation: rolls every match into finalized and projected team points
//! and groups matches by status for the live dashboard.

use std::collections::HashMap;

use futures::future::join_all;
use indexmap::IndexMap;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::{
        models::{MatchEntity, PlayerEntity, TeamEntity},
        storage::{StorageError, StorageResult},
        tournament_store::TournamentStore,
    },
    dto::standings::{
        MatchCard, MatchPlayer, MatchPoints, MatchScoreView, MatchSide, MatchesByStatus,
        StandingsResponse, TeamStanding,
    },
    error::ServiceError,
    services::scoring::{MatchScore, MatchScorer, PointSplit},
    state::{SharedState, status::MatchStatus, tournament::HoleResult},
};

/// Name shown for a side whose team no longer exists.
const UNKNOWN_TEAM: &str = "Unknown team";
const UNKNOWN_TEAM_COLOR: &str = "#9ca3af";

/// Hole results per match id. A missing entry means the match has no results yet.
pub type HoleResultsByMatch = HashMap<Uuid, StorageResult<Vec<HoleResult>>>;

/// Everything [`StandingsAggregator::aggregate`] reads.
#[derive(Clone, Copy)]
pub struct StandingsInput<'a> {
    pub teams: &'a [TeamEntity],
    pub players: &'a [PlayerEntity],
    pub matches: &'a [MatchEntity],
    pub hole_results: &'a HoleResultsByMatch,
}

/// Computes a [`StandingsResponse`] from scratch on every call; nothing is cached.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandingsAggregator {
    scorer: MatchScorer,
}

impl StandingsAggregator {
    pub fn aggregate(&self, input: StandingsInput<'_>) -> StandingsResponse {
        let mut teams: Vec<&TeamEntity> = input.teams.iter().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let team_index: HashMap<Uuid, &TeamEntity> =
            teams.iter().map(|team| (team.id, *team)).collect();
        let player_index: HashMap<Uuid, &PlayerEntity> = input
            .players
            .iter()
            .map(|player| (player.id, player))
            .collect();

        let mut finalized: IndexMap<Uuid, f64> = teams.iter().map(|team| (team.id, 0.0)).collect();
        let mut projected = finalized.clone();
        let mut buckets = MatchesByStatus::default();

        let mut matches: Vec<&MatchEntity> = input.matches.iter().collect();
        matches.sort_by(|a, b| {
            (a.start_time.is_none(), &a.start_time, a.created_at).cmp(&(
                b.start_time.is_none(),
                &b.start_time,
                b.created_at,
            ))
        });

        for record in matches {
            let status = MatchStatus::normalize(&record.status);
            let team_a = team_index.get(&record.team_a_id).copied();
            let team_b = team_index.get(&record.team_b_id).copied();
            let name_a = team_a.map_or(UNKNOWN_TEAM, |team| team.name.as_str());
            let name_b = team_b.map_or(UNKNOWN_TEAM, |team| team.name.as_str());

            let score = match input.hole_results.get(&record.id) {
                Some(Ok(results)) => {
                    Some(self.scorer.score(name_a, name_b, results, record.holes))
                }
                None => Some(self.scorer.score(name_a, name_b, &[], record.holes)),
                Some(Err(err)) => {
                    warn!(
                        match_id = %record.id,
                        error = %err,
                        "hole results unavailable; match excluded from points"
                    );
                    None
                }
            };

            let points = score
                .as_ref()
                .filter(|_| status != MatchStatus::Prepared)
                .map(|score| score.tally.result().points());
            if let Some(split) = points {
                *projected.entry(record.team_a_id).or_insert(0.0) += split.team_a;
                *projected.entry(record.team_b_id).or_insert(0.0) += split.team_b;
                if status == MatchStatus::Completed {
                    *finalized.entry(record.team_a_id).or_insert(0.0) += split.team_a;
                    *finalized.entry(record.team_b_id).or_insert(0.0) += split.team_b;
                }
            }

            let card = MatchCard {
                id: record.id,
                status,
                format: record.format,
                holes: record.holes,
                start_time: record.start_time.clone(),
                team_a: side(record.team_a_id, team_a, &record.players_a, &player_index),
                team_b: side(record.team_b_id, team_b, &record.players_b, &player_index),
                score: score.map(|score| score_view(score, points)),
            };
            buckets.bucket_mut(status).push(card);
        }

        let teams = teams
            .into_iter()
            .map(|team| TeamStanding {
                id: team.id,
                name: team.name.clone(),
                color: team.color.clone(),
                score: finalized.get(&team.id).copied().unwrap_or_default(),
            })
            .collect();

        StandingsResponse {
            teams,
            matches: buckets,
            projected_scores: projected,
        }
    }
}

fn side(
    team_id: Uuid,
    team: Option<&TeamEntity>,
    player_ids: &[Uuid],
    players: &HashMap<Uuid, &PlayerEntity>,
) -> MatchSide {
    MatchSide {
        team_id,
        name: team.map_or_else(|| UNKNOWN_TEAM.to_string(), |team| team.name.clone()),
        color: team.map_or_else(|| UNKNOWN_TEAM_COLOR.to_string(), |team| team.color.clone()),
        players: player_ids
            .iter()
            .filter_map(|id| players.get(id))
            .map(|player| MatchPlayer {
                name: player.name.clone(),
                hcp: player.hcp,
            })
            .collect(),
    }
}

fn score_view(score: MatchScore, points: Option<PointSplit>) -> MatchScoreView {
    MatchScoreView {
        hole_results: score.card.outcomes().to_vec(),
        wins_a: score.tally.wins_a,
        wins_b: score.tally.wins_b,
        holes_played: score.tally.played(),
        holes_remaining: score.tally.remaining,
        text: score.text,
        points: points.map(|split| MatchPoints {
            team_a: split.team_a,
            team_b: split.team_b,
        }),
    }
}

/// Read everything the standings need from `store` and aggregate it.
///
/// Header reads fail the whole snapshot. A failed hole result read only excludes that
/// match from the points. Reads are not isolated from concurrent writers.
pub async fn snapshot(store: &dyn TournamentStore) -> Result<StandingsResponse, StorageError> {
    let (teams, players, matches) = futures::try_join!(
        store.list_teams(),
        store.list_players(),
        store.list_matches()
    )?;

    let reads = matches.iter().map(|record| {
        let id = record.id;
        let read = store.hole_results(id);
        async move {
            let results = read
                .await
                .map(|rows| rows.into_iter().map(HoleResult::from).collect::<Vec<_>>());
            (id, results)
        }
    });
    let hole_results: HoleResultsByMatch = join_all(reads).await.into_iter().collect();

    Ok(StandingsAggregator::default().aggregate(StandingsInput {
        teams: &teams,
        players: &players,
        matches: &matches,
        hole_results: &hole_results,
    }))
}

/// Current standings from the installed store.
pub async fn get_standings(state: &SharedState) -> Result<StandingsResponse, ServiceError> {
    let store = state.require_store().await?;
    Ok(snapshot(store.as_ref()).await?)
}
