use std::{cmp::Ordering, collections::HashMap, time::SystemTime};

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::PlayerEntity,
    dto::players::{PlayerRequest, PlayerSummary},
    error::ServiceError,
    state::{SharedState, live::Change},
};

/// All players, lowest handicap first, then by name. Players without a handicap come last.
pub async fn list_players(state: &SharedState) -> Result<Vec<PlayerSummary>, ServiceError> {
    let store = state.require_store().await?;
    let (players, teams) = futures::try_join!(store.list_players(), store.list_teams())?;
    let team_names: HashMap<Uuid, String> =
        teams.into_iter().map(|team| (team.id, team.name)).collect();

    let mut players = players;
    players.sort_by(by_handicap_then_name);
    Ok(players
        .into_iter()
        .map(|player| {
            let team_name = player.team_id.and_then(|id| team_names.get(&id).cloned());
            PlayerSummary::new(player, team_name)
        })
        .collect())
}

pub async fn create_player(
    state: &SharedState,
    request: PlayerRequest,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_store().await?;
    let team_name = team_name(state, request.team_id).await?;

    let player = PlayerEntity {
        id: Uuid::new_v4(),
        name: clean_name(&request.name)?,
        email: request.email.filter(|email| !email.trim().is_empty()),
        hcp: request.hcp,
        team_id: request.team_id,
        updated_at: SystemTime::now(),
    };
    store.save_player(player.clone()).await?;

    info!(player_id = %player.id, team_id = ?player.team_id, "player created");
    state.notify(Change::Player);
    Ok(PlayerSummary::new(player, team_name))
}

/// Replace every detail of a player, including its team.
pub async fn update_player(
    state: &SharedState,
    id: Uuid,
    request: PlayerRequest,
) -> Result<PlayerSummary, ServiceError> {
    let store = state.require_store().await?;
    let mut player = store
        .find_player(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{id}` not found")))?;
    let team_name = team_name(state, request.team_id).await?;

    player.name = clean_name(&request.name)?;
    player.email = request.email.filter(|email| !email.trim().is_empty());
    player.hcp = request.hcp;
    player.team_id = request.team_id;
    player.updated_at = SystemTime::now();
    store.save_player(player.clone()).await?;

    info!(player_id = %id, "player updated");
    state.notify(Change::Player);
    Ok(PlayerSummary::new(player, team_name))
}

/// Delete a player. Matches that listed the player simply stop showing them.
pub async fn delete_player(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_player(id).await? {
        return Err(ServiceError::NotFound(format!("player `{id}` not found")));
    }

    info!(player_id = %id, "player deleted");
    state.notify(Change::Player);
    Ok(())
}

async fn team_name(
    state: &SharedState,
    team_id: Option<Uuid>,
) -> Result<Option<String>, ServiceError> {
    let Some(team_id) = team_id else {
        return Ok(None);
    };
    let store = state.require_store().await?;
    let team = store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;
    Ok(Some(team.name))
}

fn by_handicap_then_name(a: &PlayerEntity, b: &PlayerEntity) -> Ordering {
    let hcp = match (a.hcp, b.hcp) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    hcp.then_with(|| a.name.cmp(&b.name))
}

fn clean_name(raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "player name must not be empty".into(),
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        config::AppConfig, dao::tournament_store::memory::MemoryTournamentStore,
        state::AppState,
    };

    async fn setup() -> SharedState {
        let state = AppState::new(AppConfig::default());
        state
            .install_store(Arc::new(MemoryTournamentStore::new()))
            .await;
        state
    }

    fn player(name: &str, hcp: Option<f64>) -> PlayerRequest {
        PlayerRequest {
            name: name.into(),
            email: None,
            hcp,
            team_id: None,
        }
    }

    #[tokio::test]
    async fn players_are_listed_by_handicap_then_name() {
        let state = setup().await;
        for (name, hcp) in [
            ("Zed", Some(4.0)),
            ("Amy", None),
            ("Bob", Some(4.0)),
            ("Cal", Some(-1.2)),
        ] {
            create_player(&state, player(name, hcp)).await.unwrap();
        }

        let names: Vec<String> = list_players(&state)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["Cal", "Bob", "Zed", "Amy"]);
    }

    #[tokio::test]
    async fn player_on_unknown_team_is_rejected() {
        let state = setup().await;
        let mut request = player("Rory", Some(2.0));
        request.team_id = Some(Uuid::new_v4());
        assert!(matches!(
            create_player(&state, request).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_replaces_all_details() {
        let state = setup().await;
        let mut request = player("Rory", Some(2.0));
        request.email = Some("rory@example.com".into());
        let created = create_player(&state, request).await.unwrap();

        let updated = update_player(&state, created.id, player("Rory M", None))
            .await
            .unwrap();
        assert_eq!(updated.name, "Rory M");
        assert_eq!(updated.email, None);
        assert_eq!(updated.hcp, None);

        delete_player(&state, created.id).await.unwrap();
        assert!(matches!(
            update_player(&state, created.id, player("Rory", None)).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
