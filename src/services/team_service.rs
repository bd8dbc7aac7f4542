use std::{collections::HashSet, time::SystemTime};

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{models::TeamEntity, tournament_store::TournamentStore},
    dto::{
        players::PlayerSummary,
        teams::{RosterRequest, TeamRequest, TeamSummary},
    },
    error::ServiceError,
    state::{SharedState, live::Change},
};

/// All teams ordered by name.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamSummary>, ServiceError> {
    let store = state.require_store().await?;
    let mut teams = store.list_teams().await?;
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(teams.into_iter().map(TeamSummary::from).collect())
}

/// Create a team, picking the first unused palette color when none is given.
pub async fn create_team(
    state: &SharedState,
    request: TeamRequest,
) -> Result<TeamSummary, ServiceError> {
    let name = clean_name(&request.name)?;
    let store = state.require_store().await?;

    let color = match request.color {
        Some(color) => color,
        None => {
            let existing = store.list_teams().await?;
            let used: Vec<&str> = existing.iter().map(|team| team.color.as_str()).collect();
            state.config().first_unused_color(&used)
        }
    };

    let team = TeamEntity {
        id: Uuid::new_v4(),
        name,
        color,
        updated_at: SystemTime::now(),
    };
    store.save_team(team.clone()).await?;

    info!(team_id = %team.id, name = %team.name, "team created");
    state.notify(Change::Team);
    Ok(team.into())
}

/// Rename or recolor a team. An absent color keeps the current one.
pub async fn update_team(
    state: &SharedState,
    id: Uuid,
    request: TeamRequest,
) -> Result<TeamSummary, ServiceError> {
    let name = clean_name(&request.name)?;
    let store = state.require_store().await?;
    let mut team = store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))?;

    team.name = name;
    if let Some(color) = request.color {
        team.color = color;
    }
    team.updated_at = SystemTime::now();
    store.save_team(team.clone()).await?;

    info!(team_id = %id, "team updated");
    state.notify(Change::Team);
    Ok(team.into())
}

/// Delete a team that no match refers to. Its players become unassigned.
pub async fn delete_team(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    let referenced = store
        .list_matches()
        .await?
        .iter()
        .any(|record| record.team_a_id == id || record.team_b_id == id);
    if referenced {
        return Err(ServiceError::InvalidState(format!(
            "team `{id}` still plays in scheduled matches"
        )));
    }

    if !store.delete_team(id).await? {
        return Err(ServiceError::NotFound(format!("team `{id}` not found")));
    }

    info!(team_id = %id, "team deleted");
    state.notify(Change::Team);
    Ok(())
}

/// Make `player_ids` the complete roster of a team and return it.
pub async fn assign_roster(
    state: &SharedState,
    id: Uuid,
    request: RosterRequest,
) -> Result<Vec<PlayerSummary>, ServiceError> {
    let store = state.require_store().await?;
    let team = store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))?;

    let wanted: HashSet<Uuid> = request.player_ids.iter().copied().collect();
    let known: HashSet<Uuid> = store
        .list_players()
        .await?
        .iter()
        .map(|player| player.id)
        .collect();
    if let Some(missing) = wanted.difference(&known).next() {
        return Err(ServiceError::NotFound(format!("player `{missing}` not found")));
    }

    store
        .assign_roster(id, wanted.into_iter().collect())
        .await?;
    info!(team_id = %id, players = request.player_ids.len(), "team roster replaced");
    state.notify(Change::Team);

    roster_of(store.as_ref(), &team).await
}

/// Players currently rostered on a team, ordered by name.
pub async fn team_roster(state: &SharedState, id: Uuid) -> Result<Vec<PlayerSummary>, ServiceError> {
    let store = state.require_store().await?;
    let team = store
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))?;
    roster_of(store.as_ref(), &team).await
}

async fn roster_of(
    store: &dyn TournamentStore,
    team: &TeamEntity,
) -> Result<Vec<PlayerSummary>, ServiceError> {
    let mut roster: Vec<PlayerSummary> = store
        .list_players()
        .await?
        .into_iter()
        .filter(|player| player.team_id == Some(team.id))
        .map(|player| PlayerSummary::new(player, Some(team.name.clone())))
        .collect();
    roster.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(roster)
}

fn clean_name(raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "team name must not be empty".into(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{MatchEntity, PlayerEntity},
            tournament_store::{TournamentStore, memory::MemoryTournamentStore},
        },
        state::{
            AppState,
            tournament::{HoleSpan, MatchFormat},
        },
    };

    async fn setup() -> (SharedState, MemoryTournamentStore) {
        let state = AppState::new(AppConfig::default());
        let store = MemoryTournamentStore::new();
        state.install_store(Arc::new(store.clone())).await;
        (state, store)
    }

    fn named(name: &str) -> TeamRequest {
        TeamRequest {
            name: name.into(),
            color: None,
        }
    }

    #[tokio::test]
    async fn created_teams_receive_distinct_palette_colors() {
        let (state, _) = setup().await;
        let first = create_team(&state, named("Europe")).await.unwrap();
        let second = create_team(&state, named("USA")).await.unwrap();
        assert_ne!(first.color, second.color);
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (state, _) = setup().await;
        assert!(matches!(
            create_team(&state, named("   ")).await,
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn update_keeps_color_when_absent() {
        let (state, _) = setup().await;
        let created = create_team(
            &state,
            TeamRequest {
                name: "Europe".into(),
                color: Some("#003399".into()),
            },
        )
        .await
        .unwrap();

        let updated = update_team(&state, created.id, named("Team Europe"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Team Europe");
        assert_eq!(updated.color, "#003399");
    }

    #[tokio::test]
    async fn team_with_matches_cannot_be_deleted() {
        let (state, store) = setup().await;
        let europe = create_team(&state, named("Europe")).await.unwrap();
        let usa = create_team(&state, named("USA")).await.unwrap();
        store
            .save_match(MatchEntity {
                id: Uuid::new_v4(),
                team_a_id: europe.id,
                team_b_id: usa.id,
                format: MatchFormat::Foursome,
                status: "prepared".into(),
                holes: HoleSpan::Full,
                start_time: None,
                players_a: vec![],
                players_b: vec![],
                created_at: SystemTime::now(),
                updated_at: SystemTime::now(),
            })
            .await
            .unwrap();

        assert!(matches!(
            delete_team(&state, europe.id).await,
            Err(ServiceError::InvalidState(_))
        ));
        assert!(matches!(
            delete_team(&state, Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn roster_rejects_unknown_players() {
        let (state, store) = setup().await;
        let europe = create_team(&state, named("Europe")).await.unwrap();
        let player = PlayerEntity {
            id: Uuid::new_v4(),
            name: "Tommy".into(),
            email: None,
            hcp: Some(0.4),
            team_id: None,
            updated_at: SystemTime::now(),
        };
        store.save_player(player.clone()).await.unwrap();

        let err = assign_roster(
            &state,
            europe.id,
            RosterRequest {
                player_ids: vec![player.id, Uuid::new_v4()],
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let roster = assign_roster(
            &state,
            europe.id,
            RosterRequest {
                player_ids: vec![player.id],
            },
        )
        .await
        .unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].team_name.as_deref(), Some("Europe"));
    }

    #[tokio::test]
    async fn roster_read_lists_only_team_members() {
        let (state, store) = setup().await;
        let europe = create_team(&state, named("Europe")).await.unwrap();
        let usa = create_team(&state, named("USA")).await.unwrap();
        for (name, team_id) in [
            ("Rory", Some(europe.id)),
            ("Jon", Some(europe.id)),
            ("Scottie", Some(usa.id)),
            ("Free agent", None),
        ] {
            store
                .save_player(PlayerEntity {
                    id: Uuid::new_v4(),
                    name: name.into(),
                    email: None,
                    hcp: None,
                    team_id,
                    updated_at: SystemTime::now(),
                })
                .await
                .unwrap();
        }

        let names: Vec<String> = team_roster(&state, europe.id)
            .await
            .unwrap()
            .into_iter()
            .map(|player| player.name)
            .collect();
        assert_eq!(names, ["Jon", "Rory"]);

        assert!(matches!(
            team_roster(&state, Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
