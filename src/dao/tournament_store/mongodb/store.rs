use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Bson, DateTime, doc},
    options::IndexOptions,
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        HOLE_CARD_COLLECTION, MATCH_COLLECTION, MongoHoleCardDocument, MongoMatchDocument,
        MongoPlayerDocument, MongoTeamDocument, PLAYER_COLLECTION, TEAM_COLLECTION, doc_id,
    },
};
use crate::dao::{
    models::{HoleResultEntity, MatchEntity, PlayerEntity, TeamEntity},
    storage::StorageResult,
    tournament_store::TournamentStore,
};

#[derive(Clone)]
pub struct MongoTournamentStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoTournamentStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let players = self.collection::<MongoPlayerDocument>(PLAYER_COLLECTION).await;
        let index = IndexModel::builder()
            .keys(doc! {"team_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("player_team_idx".to_owned()))
                    .build(),
            )
            .build();

        players
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PLAYER_COLLECTION,
                index: "team_id",
                source,
            })?;

        Ok(())
    }

    async fn collection<T>(&self, name: &'static str) -> Collection<T>
    where
        T: Send + Sync,
    {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(name)
    }

    async fn list_all<D, E>(&self, name: &'static str) -> MongoResult<Vec<E>>
    where
        D: DeserializeOwned + Send + Sync + Unpin,
        E: TryFrom<D, Error = MongoDaoError>,
    {
        let documents: Vec<D> = self
            .collection::<D>(name)
            .await
            .find(doc! {})
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: name,
                source,
            })?;

        documents.into_iter().map(E::try_from).collect()
    }

    async fn upsert<D>(&self, name: &'static str, id: Uuid, document: D) -> MongoResult<()>
    where
        D: Serialize + Send + Sync,
    {
        self.collection::<D>(name)
            .await
            .replace_one(doc_id(id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: name,
                id,
                source,
            })?;
        Ok(())
    }

    async fn delete(&self, name: &'static str, id: Uuid) -> MongoResult<bool> {
        let result = self
            .collection::<mongodb::bson::Document>(name)
            .await
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: name,
                id,
                source,
            })?;
        Ok(result.deleted_count > 0)
    }

    async fn find_team(&self, id: Uuid) -> MongoResult<Option<TeamEntity>> {
        self.collection::<MongoTeamDocument>(TEAM_COLLECTION)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: TEAM_COLLECTION,
                source,
            })?
            .map(TeamEntity::try_from)
            .transpose()
    }

    async fn find_player(&self, id: Uuid) -> MongoResult<Option<PlayerEntity>> {
        self.collection::<MongoPlayerDocument>(PLAYER_COLLECTION)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: PLAYER_COLLECTION,
                source,
            })?
            .map(PlayerEntity::try_from)
            .transpose()
    }

    async fn delete_team(&self, id: Uuid) -> MongoResult<bool> {
        let removed = self.delete(TEAM_COLLECTION, id).await?;
        if removed {
            self.collection::<MongoPlayerDocument>(PLAYER_COLLECTION)
                .await
                .update_many(
                    doc! {"team_id": id.to_string()},
                    doc! {"$set": {"team_id": Bson::Null, "updated_at": DateTime::now()}},
                )
                .await
                .map_err(|source| MongoDaoError::Write {
                    collection: PLAYER_COLLECTION,
                    id,
                    source,
                })?;
        }
        Ok(removed)
    }

    async fn assign_roster(&self, team_id: Uuid, player_ids: Vec<Uuid>) -> MongoResult<()> {
        let players = self.collection::<MongoPlayerDocument>(PLAYER_COLLECTION).await;
        let ids: Vec<String> = player_ids.iter().map(Uuid::to_string).collect();
        let write_error = |source: mongodb::error::Error| MongoDaoError::Write {
            collection: PLAYER_COLLECTION,
            id: team_id,
            source,
        };

        players
            .update_many(
                doc! {"team_id": team_id.to_string(), "_id": {"$nin": ids.clone()}},
                doc! {"$set": {"team_id": Bson::Null, "updated_at": DateTime::now()}},
            )
            .await
            .map_err(write_error)?;
        players
            .update_many(
                doc! {"_id": {"$in": ids}},
                doc! {"$set": {"team_id": team_id.to_string(), "updated_at": DateTime::now()}},
            )
            .await
            .map_err(write_error)?;
        Ok(())
    }

    async fn find_match(&self, id: Uuid) -> MongoResult<Option<MatchEntity>> {
        self.collection::<MongoMatchDocument>(MATCH_COLLECTION)
            .await
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: MATCH_COLLECTION,
                source,
            })?
            .map(MatchEntity::try_from)
            .transpose()
    }

    async fn delete_match(&self, id: Uuid) -> MongoResult<bool> {
        let removed = self.delete(MATCH_COLLECTION, id).await?;
        self.delete(HOLE_CARD_COLLECTION, id).await?;
        Ok(removed)
    }

    async fn set_match_status(&self, id: Uuid, status: String) -> MongoResult<bool> {
        let result = self
            .collection::<MongoMatchDocument>(MATCH_COLLECTION)
            .await
            .update_one(
                doc_id(id),
                doc! {"$set": {"status": status, "updated_at": DateTime::now()}},
            )
            .await
            .map_err(|source| MongoDaoError::Write {
                collection: MATCH_COLLECTION,
                id,
                source,
            })?;
        Ok(result.matched_count > 0)
    }

    async fn hole_results(&self, match_id: Uuid) -> MongoResult<Vec<HoleResultEntity>> {
        let card = self
            .collection::<MongoHoleCardDocument>(HOLE_CARD_COLLECTION)
            .await
            .find_one(doc_id(match_id))
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: HOLE_CARD_COLLECTION,
                source,
            })?;
        Ok(card.map(|card| card.results).unwrap_or_default())
    }

    async fn replace_hole_results(
        &self,
        match_id: Uuid,
        results: Vec<HoleResultEntity>,
    ) -> MongoResult<bool> {
        if !self.match_exists(match_id).await? {
            return Ok(false);
        }
        let card = MongoHoleCardDocument {
            match_id: match_id.to_string(),
            results,
            updated_at: DateTime::now(),
        };
        self.upsert(HOLE_CARD_COLLECTION, match_id, card).await?;

        // a delete that ran between the check and the upsert leaves the card behind
        if !self.match_exists(match_id).await? {
            self.delete(HOLE_CARD_COLLECTION, match_id).await?;
            return Ok(false);
        }
        Ok(true)
    }

    async fn match_exists(&self, id: Uuid) -> MongoResult<bool> {
        let count = self
            .collection::<mongodb::bson::Document>(MATCH_COLLECTION)
            .await
            .count_documents(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::Read {
                collection: MATCH_COLLECTION,
                source,
            })?;
        Ok(count > 0)
    }
}

impl TournamentStore for MongoTournamentStore {
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_all::<MongoTeamDocument, TeamEntity>(TEAM_COLLECTION)
                .await
                .map_err(Into::into)
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team(id).await.map_err(Into::into) })
    }

    fn save_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = team.id;
            store
                .upsert(TEAM_COLLECTION, id, MongoTeamDocument::from(team))
                .await
                .map_err(Into::into)
        })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(id).await.map_err(Into::into) })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_all::<MongoPlayerDocument, PlayerEntity>(PLAYER_COLLECTION)
                .await
                .map_err(Into::into)
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_player(id).await.map_err(Into::into) })
    }

    fn save_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = player.id;
            store
                .upsert(PLAYER_COLLECTION, id, MongoPlayerDocument::from(player))
                .await
                .map_err(Into::into)
        })
    }

    fn delete_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .delete(PLAYER_COLLECTION, id)
                .await
                .map_err(Into::into)
        })
    }

    fn assign_roster(
        &self,
        team_id: Uuid,
        player_ids: Vec<Uuid>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .assign_roster(team_id, player_ids)
                .await
                .map_err(Into::into)
        })
    }

    fn list_matches(&self) -> BoxFuture<'static, StorageResult<Vec<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .list_all::<MongoMatchDocument, MatchEntity>(MATCH_COLLECTION)
                .await
                .map_err(Into::into)
        })
    }

    fn find_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<MatchEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_match(id).await.map_err(Into::into) })
    }

    fn save_match(&self, record: MatchEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            let id = record.id;
            store
                .upsert(MATCH_COLLECTION, id, MongoMatchDocument::from(record))
                .await
                .map_err(Into::into)
        })
    }

    fn delete_match(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_match(id).await.map_err(Into::into) })
    }

    fn set_match_status(
        &self,
        id: Uuid,
        status: String,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .set_match_status(id, status)
                .await
                .map_err(Into::into)
        })
    }

    fn hole_results(
        &self,
        match_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<HoleResultEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.hole_results(match_id).await.map_err(Into::into) })
    }

    fn replace_hole_results(
        &self,
        match_id: Uuid,
        results: Vec<HoleResultEntity>,
    ) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .replace_hole_results(match_id, results)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
