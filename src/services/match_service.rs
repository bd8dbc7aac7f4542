//! Match commands: scheduling, hole result submission and status changes.

use std::{collections::HashSet, time::SystemTime};

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{HoleResultEntity, MatchEntity},
    dto::matches::{CreateMatchRequest, HoleCardResponse, HoleResultsRequest, MatchSummary, StatusRequest},
    error::ServiceError,
    services::scoring::HoleCard,
    state::{
        SharedState,
        live::Change,
        status::MatchStatus,
        tournament::{HoleOutcome, HoleResult, HoleSpan, UnknownOutcome},
    },
};

/// Rejection of a submitted score card. Nothing is written when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreInputError {
    #[error("expected {expected} hole results for this match, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("hole {hole}: {source}")]
    UnknownCode { hole: u8, source: UnknownOutcome },
}

/// Turn a submitted card, one code per hole of `span` in order, into a [`HoleCard`].
pub fn parse_card(span: HoleSpan, codes: &[String]) -> Result<HoleCard, ScoreInputError> {
    let expected = span.hole_count();
    if codes.len() != expected {
        return Err(ScoreInputError::WrongLength {
            expected,
            actual: codes.len(),
        });
    }

    let results = span
        .holes()
        .zip(codes)
        .map(|(hole, code)| {
            code.parse::<HoleOutcome>()
                .map(|outcome| HoleResult::new(hole, outcome))
                .map_err(|source| ScoreInputError::UnknownCode { hole, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(HoleCard::from_results(span, &results))
}

pub async fn list_matches(state: &SharedState) -> Result<Vec<MatchSummary>, ServiceError> {
    let store = state.require_store().await?;
    let mut matches = store.list_matches().await?;
    matches.sort_by_key(|record| record.created_at);
    Ok(matches.into_iter().map(MatchSummary::from).collect())
}

/// Schedule a new match. It starts in the initial status of the transition policy.
pub async fn create_match(
    state: &SharedState,
    request: CreateMatchRequest,
) -> Result<MatchSummary, ServiceError> {
    if request.team_a == request.team_b {
        return Err(ServiceError::InvalidInput(
            "a match needs two different teams".into(),
        ));
    }
    if request
        .players_a
        .iter()
        .any(|id| request.players_b.contains(id))
    {
        return Err(ServiceError::InvalidInput(
            "a player cannot play on both sides of a match".into(),
        ));
    }

    let store = state.require_store().await?;
    for team_id in [request.team_a, request.team_b] {
        if store.find_team(team_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("team `{team_id}` not found")));
        }
    }

    let known: HashSet<Uuid> = store
        .list_players()
        .await?
        .into_iter()
        .map(|player| player.id)
        .collect();
    if let Some(missing) = request
        .players_a
        .iter()
        .chain(&request.players_b)
        .find(|id| !known.contains(*id))
    {
        return Err(ServiceError::NotFound(format!("player `{missing}` not found")));
    }

    let now = SystemTime::now();
    let record = MatchEntity {
        id: Uuid::new_v4(),
        team_a_id: request.team_a,
        team_b_id: request.team_b,
        format: request.format,
        status: state.statuses().initial().as_str().to_string(),
        holes: request.holes,
        start_time: request.start_time,
        players_a: request.players_a,
        players_b: request.players_b,
        created_at: now,
        updated_at: now,
    };
    store.save_match(record.clone()).await?;

    info!(match_id = %record.id, format = ?record.format, holes = ?record.holes, "match created");
    state.notify(Change::Match);
    Ok(MatchSummary::from(record))
}

/// Remove a match together with its hole results.
pub async fn delete_match(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_match(id).await? {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    }

    info!(match_id = %id, "match deleted");
    state.notify(Change::Match);
    Ok(())
}

/// Stored results of a match laid out over its span.
pub async fn get_hole_card(
    state: &SharedState,
    id: Uuid,
) -> Result<HoleCardResponse, ServiceError> {
    let store = state.require_store().await?;
    let record = store
        .find_match(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{id}` not found")))?;
    let results: Vec<HoleResult> = store
        .hole_results(id)
        .await?
        .into_iter()
        .map(HoleResult::from)
        .collect();

    Ok(hole_card_response(id, HoleCard::from_results(record.holes, &results)))
}

/// Replace every hole result of a match with the submitted card.
///
/// The card is validated in full before the store is touched, and the replacement is a
/// single store operation.
pub async fn submit_hole_results(
    state: &SharedState,
    id: Uuid,
    request: HoleResultsRequest,
) -> Result<HoleCardResponse, ServiceError> {
    let store = state.require_store().await?;
    let record = store
        .find_match(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{id}` not found")))?;

    let card = parse_card(record.holes, &request.results)?;
    let played: Vec<HoleResultEntity> = card.played().into_iter().map(Into::into).collect();
    let recorded = played.len();
    if !store.replace_hole_results(id, played).await? {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    }

    info!(match_id = %id, recorded, "hole results replaced");
    state.notify(Change::HoleResults);
    Ok(hole_card_response(id, card))
}

/// Move a match to a new status, subject to the configured transition policy.
pub async fn set_status(
    state: &SharedState,
    id: Uuid,
    request: StatusRequest,
) -> Result<MatchSummary, ServiceError> {
    let next: MatchStatus = request.status.parse()?;

    let store = state.require_store().await?;
    let mut record = store
        .find_match(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("match `{id}` not found")))?;

    let status = state.statuses().transition(&record.status, next)?;
    if !store
        .set_match_status(id, status.as_str().to_string())
        .await?
    {
        return Err(ServiceError::NotFound(format!("match `{id}` not found")));
    }

    info!(match_id = %id, from = %record.status, to = %status, "match status changed");
    record.status = status.as_str().to_string();
    state.notify(Change::MatchStatus);
    Ok(MatchSummary::from(record))
}

fn hole_card_response(match_id: Uuid, card: HoleCard) -> HoleCardResponse {
    let span = card.span();
    HoleCardResponse {
        match_id,
        holes: span,
        first_hole: *span.holes().start(),
        results: card.outcomes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use tokio::{sync::mpsc, time::timeout};

    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::TeamEntity,
            tournament_store::{TournamentStore, memory::MemoryTournamentStore},
        },
        services::standings,
        state::{
            AppState,
            live::LiveSignal,
            status::TransitionPolicy,
            tournament::MatchFormat,
        },
    };

    async fn setup(config: AppConfig) -> (SharedState, MemoryTournamentStore, Uuid, Uuid) {
        let state = AppState::new(config);
        let store = MemoryTournamentStore::new();
        state.install_store(Arc::new(store.clone())).await;

        let mut ids = Vec::new();
        for name in ["Europe", "USA"] {
            let team = TeamEntity {
                id: Uuid::new_v4(),
                name: name.into(),
                color: "#2563eb".into(),
                updated_at: SystemTime::now(),
            };
            ids.push(team.id);
            store.save_team(team).await.unwrap();
        }
        (state, store, ids[0], ids[1])
    }

    fn request(team_a: Uuid, team_b: Uuid, holes: HoleSpan) -> CreateMatchRequest {
        CreateMatchRequest {
            team_a,
            team_b,
            format: MatchFormat::Singles,
            holes,
            start_time: Some("2026-09-25T08:30".into()),
            players_a: vec![],
            players_b: vec![],
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|code| code.to_string()).collect()
    }

    async fn expect_signal(rx: &mut mpsc::UnboundedReceiver<LiveSignal>) {
        let signal = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("signal within timeout");
        assert_eq!(signal, Some(LiveSignal::Changed));
    }

    #[test]
    fn card_of_wrong_length_is_rejected() {
        let err = parse_card(HoleSpan::FrontNine, &codes(&["A"; 18])).unwrap_err();
        assert_eq!(
            err,
            ScoreInputError::WrongLength {
                expected: 9,
                actual: 18
            }
        );
    }

    #[test]
    fn unknown_code_reports_course_hole_number() {
        let mut card = codes(&[""; 9]);
        card[2] = "X".into();
        let err = parse_card(HoleSpan::BackNine, &card).unwrap_err();
        assert!(matches!(err, ScoreInputError::UnknownCode { hole: 12, .. }));
    }

    #[test]
    fn back_nine_card_maps_to_holes_ten_to_eighteen() {
        let mut card = codes(&[""; 9]);
        card[0] = "A".into();
        card[8] = "AS".into();
        let parsed = parse_card(HoleSpan::BackNine, &card).unwrap();
        assert_eq!(
            parsed.played(),
            vec![
                HoleResult::new(10, HoleOutcome::TeamA),
                HoleResult::new(18, HoleOutcome::Halved)
            ]
        );
    }

    #[tokio::test]
    async fn new_match_starts_prepared() {
        let (state, _, europe, usa) = setup(AppConfig::default()).await;
        let summary = create_match(&state, request(europe, usa, HoleSpan::Full))
            .await
            .unwrap();
        assert_eq!(summary.status, MatchStatus::Prepared);
    }

    #[tokio::test]
    async fn match_needs_two_distinct_known_teams() {
        let (state, _, europe, _) = setup(AppConfig::default()).await;
        assert!(matches!(
            create_match(&state, request(europe, europe, HoleSpan::Full)).await,
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            create_match(&state, request(europe, Uuid::new_v4(), HoleSpan::Full)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn submission_replaces_previous_card() {
        let (state, store, europe, usa) = setup(AppConfig::default()).await;
        let summary = create_match(&state, request(europe, usa, HoleSpan::FrontNine))
            .await
            .unwrap();

        submit_hole_results(
            &state,
            summary.id,
            HoleResultsRequest {
                results: codes(&["A", "A", "B", "", "", "", "", "", ""]),
            },
        )
        .await
        .unwrap();
        let card = submit_hole_results(
            &state,
            summary.id,
            HoleResultsRequest {
                results: codes(&[""; 9]),
            },
        )
        .await
        .unwrap();

        assert!(card.results.iter().all(|outcome| !outcome.is_played()));
        assert!(store.hole_results(summary.id).await.unwrap().is_empty());

        let response = standings::get_standings(&state).await.unwrap();
        let score = response.matches.prepared[0].score.as_ref().unwrap();
        assert_eq!((score.wins_a, score.wins_b), (0, 0));
        assert_eq!(score.text, "A/S");
    }

    #[tokio::test]
    async fn malformed_card_writes_nothing() {
        let (state, store, europe, usa) = setup(AppConfig::default()).await;
        let summary = create_match(&state, request(europe, usa, HoleSpan::FrontNine))
            .await
            .unwrap();
        submit_hole_results(
            &state,
            summary.id,
            HoleResultsRequest {
                results: codes(&["A", "", "", "", "", "", "", "", ""]),
            },
        )
        .await
        .unwrap();

        let mut bad = codes(&[""; 9]);
        bad[4] = "win".into();
        let err = submit_hole_results(&state, summary.id, HoleResultsRequest { results: bad })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));

        let stored = store.hole_results(summary.id).await.unwrap();
        assert_eq!(
            stored,
            vec![HoleResultEntity {
                hole: 1,
                result: HoleOutcome::TeamA
            }]
        );
    }

    #[tokio::test]
    async fn submission_to_unknown_match_is_not_found() {
        let (state, _, _, _) = setup(AppConfig::default()).await;
        let err = submit_hole_results(
            &state,
            Uuid::new_v4(),
            HoleResultsRequest {
                results: codes(&[""; 18]),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn status_overwrite_is_unrestricted_by_default() {
        let (state, _, europe, usa) = setup(AppConfig::default()).await;
        let summary = create_match(&state, request(europe, usa, HoleSpan::Full))
            .await
            .unwrap();

        for status in ["completed", "prepared", "Running"] {
            set_status(
                &state,
                summary.id,
                StatusRequest {
                    status: status.into(),
                },
            )
            .await
            .unwrap();
        }

        let matches = list_matches(&state).await.unwrap();
        assert_eq!(matches[0].status, MatchStatus::Running);
    }

    #[tokio::test]
    async fn forward_only_policy_rejects_going_back() {
        let config = AppConfig::default().with_status_transitions(TransitionPolicy::ForwardOnly);
        let (state, _, europe, usa) = setup(config).await;
        let summary = create_match(&state, request(europe, usa, HoleSpan::Full))
            .await
            .unwrap();

        set_status(
            &state,
            summary.id,
            StatusRequest {
                status: "completed".into(),
            },
        )
        .await
        .unwrap();
        let err = set_status(
            &state,
            summary.id,
            StatusRequest {
                status: "prepared".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_status_value_is_rejected() {
        let (state, _, europe, usa) = setup(AppConfig::default()).await;
        let summary = create_match(&state, request(europe, usa, HoleSpan::Full))
            .await
            .unwrap();
        let err = set_status(
            &state,
            summary.id,
            StatusRequest {
                status: "finished".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn hole_submission_signals_every_viewer_once() {
        let (state, _, europe, usa) = setup(AppConfig::default()).await;
        let summary = create_match(&state, request(europe, usa, HoleSpan::Full))
            .await
            .unwrap();
        // let the creation broadcast drain before viewers join
        tokio::time::sleep(Duration::from_millis(50)).await;

        let (first_tx, mut first) = mpsc::unbounded_channel::<LiveSignal>();
        let (second_tx, mut second) = mpsc::unbounded_channel::<LiveSignal>();
        state.sessions().register(first_tx).await;
        state.sessions().register(second_tx).await;

        let mut card = codes(&[""; 18]);
        card[0] = "B".into();
        submit_hole_results(&state, summary.id, HoleResultsRequest { results: card })
            .await
            .unwrap();

        expect_signal(&mut first).await;
        expect_signal(&mut second).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(first.try_recv().is_err());
        assert!(second.try_recv().is_err());
    }

    #[tokio::test]
    async fn failed_command_sends_no_signal() {
        let (state, _, _, _) = setup(AppConfig::default()).await;
        let (tx, mut rx) = mpsc::unbounded_channel::<LiveSignal>();
        state.sessions().register(tx).await;

        let _ = delete_match(&state, Uuid::new_v4()).await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(rx.try_recv().is_err());
    }
}
