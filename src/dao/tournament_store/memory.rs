//! Process-local store used when no database is configured, and by the test-suite.

use std::{sync::Arc, time::SystemTime};

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{HoleResultEntity, MatchEntity, PlayerEntity, TeamEntity},
    storage::StorageResult,
    tournament_store::TournamentStore,
};

/// In-memory [`TournamentStore`]. Cloning shares the same tables.
#[derive(Clone, Default)]
pub struct MemoryTournamentStore {
    inner: Arc<Tables>,
}

#[derive(Default)]
struct Tables {
    teams: DashMap<Uuid, TeamEntity>,
    players: DashMap<Uuid, PlayerEntity>,
    matches: DashMap<Uuid, MatchEntity>,
    /// Whole result set per match; replacing the value swaps the set in one step.
    hole_results: DashMap<Uuid, Vec<HoleResultEntity>>,
}

impl MemoryTournamentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryTournamentStore {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            Ok(tables
                .teams
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let tables = self.inner.clone();
        Box::pin(async move { Ok(tables.teams.get(&id).map(|entry| entry.value().clone())) })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            tables.teams.insert(team.id, team);
            Ok(())
        })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            let removed = tables.teams.remove(&id).is_some();
            if removed {
                for mut player in tables.players.iter_mut() {
                    if player.team_id == Some(id) {
                        player.team_id = None;
                        player.updated_at = SystemTime::now();
                    }
                }
            }
            Ok(removed)
        })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            Ok(tables
                .players
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let tables = self.inner.clone();
        Box::pin(async move { Ok(tables.players.get(&id).map(|entry| entry.value().clone())) })
    }

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            tables.players.insert(player.id, player);
            Ok(())
        })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let tables = self.inner.clone();
        Box::pin(async move { Ok(tables.players.remove(&id).is_some()) })
    }

    fn assign_roster(
        &self,
        team_id: Uuid,
        player_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            let now = SystemTime::now();
            for mut player in tables.players.iter_mut() {
                let listed = player_ids.contains(&player.id);
                if listed && player.team_id != Some(team_id) {
                    player.team_id = Some(team_id);
                    player.updated_at = now;
                } else if !listed && player.team_id == Some(team_id) {
                    player.team_id = None;
                    player.updated_at = now;
                }
            }
            Ok(())
        })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            Ok(tables
                .matches
                .iter()
                .map(|entry| entry.value().clone())
                .collect())
        })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let tables = self.inner.clone();
        Box::pin(async move { Ok(tables.matches.get(&id).map(|entry| entry.value().clone())) })
    }

    fn save_match(&self, record: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            tables.matches.insert(record.id, record);
            Ok(())
        })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            let removed = tables.matches.remove(&id).is_some();
            tables.hole_results.remove(&id);
            Ok(removed)
        })
    }

    fn set_match_status(
        &self,
        id: Uuid,
        status: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            match tables.matches.get_mut(&id) {
                Some(mut record) => {
                    record.status = status;
                    record.updated_at = SystemTime::now();
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn hole_results(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<HoleResultEntity>>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            Ok(tables
                .hole_results
                .get(&match_id)
                .map(|entry| entry.value().clone())
                .unwrap_or_default())
        })
    }

    fn replace_hole_results(
        &self,
        match_id: Uuid,
        results: Vec<HoleResultEntity>,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let tables = self.inner.clone();
        Box::pin(async move {
            // holding the match entry blocks `delete_match` until the card is in place
            let Some(_record) = tables.matches.get(&match_id) else {
                return Ok(false);
            };
            tables.hole_results.insert(match_id, results);
            Ok(true)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
