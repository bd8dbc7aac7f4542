pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{HoleResultEntity, MatchEntity, PlayerEntity, TeamEntity};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for teams, players, matches and hole results.
///
/// Reads are not isolated from concurrent writers. Only [`replace_hole_results`]
/// promises all-or-nothing semantics across several records.
///
/// [`replace_hole_results`]: TournamentStore::replace_hole_results
pub trait TournamentStore: Send + Sync {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a team and clear the team reference of its players.
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;
    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Make `player_ids` the full roster of `team_id`, releasing previous members.
    fn assign_roster(
        &self,
        team_id: Uuid,
        player_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<()>>;

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>>;
    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>>;
    fn save_match(&self, record: MatchEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a match together with its hole results.
    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Overwrite the stored status of a match. Returns `false` when the match does not exist.
    fn set_match_status(
        &self,
        id: Uuid,
        status: String,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    fn hole_results(&self, match_id: Uuid)
    -> BoxFuture<'static, StorageResult<Vec<HoleResultEntity>>>;
    /// Replace every hole result of a match in one atomic step.
    ///
    /// Returns `false` and keeps nothing when the match does not exist, so a card never
    /// outlives a concurrently deleted match.
    fn replace_hole_results(
        &self,
        match_id: Uuid,
        results: Vec<HoleResultEntity>,
    ) -> BoxFuture<'static, StorageResult<bool>>;

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
