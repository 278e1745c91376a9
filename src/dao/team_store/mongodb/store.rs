use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Collection, Database,
    bson::{Document, doc},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
};
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{MongoTeamDocument, doc_id, patch_set_document, uuid_as_binary},
};
use crate::dao::{
    models::{PhaseCompletionStats, TeamEntity, TeamPatch},
    storage::StorageResult,
    team_store::{CommitOutcome, TeamStore, normalize_name},
};

const TEAM_COLLECTION_NAME: &str = "teams";
const PHASE_KEYS: [&str; 6] = ["prompt", "quiz", "code_quiz", "debug", "riddles", "location"];

/// Durable [`TeamStore`] backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoTeamStore {
    database: Database,
}

impl MongoTeamStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (_client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let store = Self { database };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let collection = self.collection();
        let index = mongodb::IndexModel::builder()
            .keys(doc! {"name": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("team_name_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();

        collection
            .create_index(index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: TEAM_COLLECTION_NAME,
                index: "name",
                source,
            })?;

        Ok(())
    }

    fn collection(&self) -> Collection<MongoTeamDocument> {
        self.database
            .collection::<MongoTeamDocument>(TEAM_COLLECTION_NAME)
    }

    async fn create_team(&self, team: TeamEntity) -> MongoResult<()> {
        let id = team.id;
        let name = team.name.clone();
        let document: MongoTeamDocument = team.into();

        self.collection()
            .insert_one(&document)
            .await
            .map_err(|source| {
                if is_duplicate_key(&source) {
                    MongoDaoError::DuplicateName { name }
                } else {
                    MongoDaoError::SaveTeam { id, source }
                }
            })?;

        Ok(())
    }

    async fn find_team(&self, id: Uuid) -> MongoResult<Option<TeamEntity>> {
        let document = self
            .collection()
            .find_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::LoadTeam { id, source })?;

        Ok(document.map(Into::into))
    }

    async fn find_team_by_name(&self, name: String) -> MongoResult<Option<TeamEntity>> {
        let key = normalize_name(&name);
        let document = self
            .collection()
            .find_one(doc! { "name": &key })
            .await
            .map_err(|source| MongoDaoError::LoadTeamByName { name: key, source })?;

        Ok(document.map(Into::into))
    }

    /// Conditional merge: one `update_one` whose filter pins the progress
    /// cursor, so a concurrent submission that already advanced the team
    /// matches nothing and is reported as a conflict.
    async fn save_progress(
        &self,
        id: Uuid,
        expected_phase: u8,
        patch: TeamPatch,
    ) -> MongoResult<CommitOutcome> {
        let filter = doc! {
            "_id": uuid_as_binary(id),
            "current_phase": i32::from(expected_phase),
        };
        let update = doc! { "$set": patch_set_document(&patch) };

        let result = self
            .collection()
            .update_one(filter, update)
            .await
            .map_err(|source| MongoDaoError::SaveTeam { id, source })?;

        if result.matched_count > 0 {
            return Ok(CommitOutcome::Committed);
        }

        match self.find_team(id).await? {
            Some(_) => Ok(CommitOutcome::PhaseConflict),
            None => Ok(CommitOutcome::NotFound),
        }
    }

    async fn list_teams(&self) -> MongoResult<Vec<TeamEntity>> {
        let documents: Vec<MongoTeamDocument> = self
            .collection()
            .find(doc! {})
            .sort(doc! { "registered_at": 1 })
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn list_finishers(&self, limit: usize) -> MongoResult<Vec<TeamEntity>> {
        let documents: Vec<MongoTeamDocument> = self
            .collection()
            .find(doc! { "progress.location.completed": true })
            .sort(doc! { "updated_at": 1 })
            .limit(limit as i64)
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListTeams { source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn phase_stats(&self) -> MongoResult<PhaseCompletionStats> {
        let collection = self.collection();
        let total_teams = collection
            .count_documents(doc! {})
            .await
            .map_err(|source| MongoDaoError::PhaseStats { source })?;

        let mut completed = [0u64; 6];
        for (slot, key) in completed.iter_mut().zip(PHASE_KEYS) {
            let mut filter = Document::new();
            filter.insert(format!("progress.{key}.completed"), true);
            *slot = collection
                .count_documents(filter)
                .await
                .map_err(|source| MongoDaoError::PhaseStats { source })?;
        }

        Ok(PhaseCompletionStats {
            total_teams,
            completed,
        })
    }

    async fn delete_team(&self, id: Uuid) -> MongoResult<bool> {
        let result = self
            .collection()
            .delete_one(doc_id(id))
            .await
            .map_err(|source| MongoDaoError::DeleteTeam { id, source })?;
        Ok(result.deleted_count > 0)
    }

    async fn purge_teams(&self) -> MongoResult<u64> {
        let result = self
            .collection()
            .delete_many(doc! {})
            .await
            .map_err(|source| MongoDaoError::PurgeTeams { source })?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> MongoResult<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write)) if write.code == 11000
    )
}

impl TeamStore for MongoTeamStore {
    fn create_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_team(team).await.map_err(Into::into) })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team(id).await.map_err(Into::into) })
    }

    fn find_team_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_team_by_name(name).await.map_err(Into::into) })
    }

    fn save_progress(
        &self,
        id: Uuid,
        expected_phase: u8,
        patch: TeamPatch,
    ) -> BoxFuture<'static, StorageResult<CommitOutcome>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .save_progress(id, expected_phase, patch)
                .await
                .map_err(Into::into)
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_teams().await.map_err(Into::into) })
    }

    fn list_finishers(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_finishers(limit).await.map_err(Into::into) })
    }

    fn phase_stats(&self) -> BoxFuture<'static, StorageResult<PhaseCompletionStats>> {
        let store = self.clone();
        Box::pin(async move { store.phase_stats().await.map_err(Into::into) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.delete_team(id).await.map_err(Into::into) })
    }

    fn purge_teams(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.purge_teams().await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
