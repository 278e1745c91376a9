//! In-memory [`TeamStore`] backend.
//!
//! Process-scoped state with an explicit lifecycle: the maps start empty and
//! are only emptied again by the purge operation. Per-record atomicity comes
//! from the map's entry guards, so a conditional progress merge observes a
//! consistent record.

use std::{sync::Arc, time::SystemTime};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    models::{PhaseCompletionStats, TeamEntity, TeamPatch},
    storage::{StorageError, StorageResult},
    team_store::{CommitOutcome, TeamStore, normalize_name},
};

/// Transient backend holding every team in process memory.
#[derive(Clone, Default)]
pub struct MemoryTeamStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    teams: DashMap<Uuid, TeamEntity>,
    /// Normalized name -> team id, the uniqueness index.
    names: DashMap<String, Uuid>,
}

impl MemoryTeamStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    async fn create_team(&self, team: TeamEntity) -> StorageResult<()> {
        let key = normalize_name(&team.name);
        match self.inner.names.entry(key) {
            Entry::Occupied(_) => Err(StorageError::Duplicate {
                field: "name",
                value: team.name,
            }),
            Entry::Vacant(slot) => {
                if self.inner.teams.contains_key(&team.id) {
                    return Err(StorageError::Duplicate {
                        field: "id",
                        value: team.id.to_string(),
                    });
                }
                // The vacant name slot is held until both inserts land, so a
                // concurrent registration of the same name waits here.
                slot.insert(team.id);
                self.inner.teams.insert(team.id, team);
                Ok(())
            }
        }
    }

    async fn save_progress(
        &self,
        id: Uuid,
        expected_phase: u8,
        patch: TeamPatch,
    ) -> StorageResult<CommitOutcome> {
        let Some(mut entry) = self.inner.teams.get_mut(&id) else {
            return Ok(CommitOutcome::NotFound);
        };
        if entry.current_phase != expected_phase {
            return Ok(CommitOutcome::PhaseConflict);
        }
        patch.apply_to(entry.value_mut());
        entry.updated_at = SystemTime::now();
        Ok(CommitOutcome::Committed)
    }

    async fn list_finishers(&self, limit: usize) -> Vec<TeamEntity> {
        let mut finishers = self
            .inner
            .teams
            .iter()
            .filter(|entry| entry.is_finisher())
            .map(|entry| entry.clone())
            .collect::<Vec<_>>();
        finishers.sort_by_key(|team| team.updated_at);
        finishers.truncate(limit);
        finishers
    }

    async fn phase_stats(&self) -> PhaseCompletionStats {
        let mut stats = PhaseCompletionStats::default();
        for entry in self.inner.teams.iter() {
            stats.total_teams += 1;
            for phase in 1..=6u8 {
                if entry.progress.completed(phase) {
                    stats.completed[usize::from(phase) - 1] += 1;
                }
            }
        }
        stats
    }

    async fn delete_team(&self, id: Uuid) -> bool {
        let Some((_, team)) = self.inner.teams.remove(&id) else {
            return false;
        };
        self.inner.names.remove(&normalize_name(&team.name));
        true
    }

    async fn purge_teams(&self) -> u64 {
        let count = self.inner.teams.len() as u64;
        self.inner.teams.clear();
        self.inner.names.clear();
        count
    }
}

impl TeamStore for MemoryTeamStore {
    fn create_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.create_team(team).await })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.inner.teams.get(&id).map(|entry| entry.clone())) })
    }

    fn find_team_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let Some(id) = store.inner.names.get(&normalize_name(&name)).map(|e| *e) else {
                return Ok(None);
            };
            Ok(store.inner.teams.get(&id).map(|entry| entry.clone()))
        })
    }

    fn save_progress(
        &self,
        id: Uuid,
        expected_phase: u8,
        patch: TeamPatch,
    ) -> BoxFuture<'static, StorageResult<CommitOutcome>> {
        let store = self.clone();
        Box::pin(async move { store.save_progress(id, expected_phase, patch).await })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut teams = store
                .inner
                .teams
                .iter()
                .map(|entry| entry.clone())
                .collect::<Vec<_>>();
            teams.sort_by_key(|team| team.registered_at);
            Ok(teams)
        })
    }

    fn list_finishers(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.list_finishers(limit).await) })
    }

    fn phase_stats(&self) -> BoxFuture<'static, StorageResult<PhaseCompletionStats>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.phase_stats().await) })
    }

    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.delete_team(id).await) })
    }

    fn purge_teams(&self) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.purge_teams().await) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{LocationRecord, PromptRecord, Theme};

    fn team(name: &str) -> TeamEntity {
        TeamEntity::register(
            normalize_name(name),
            "Lea".into(),
            vec!["Lea".into(), "Sam".into(), "Noor".into()],
            "team@example.org".into(),
            Theme::DeepSpace,
        )
    }

    #[tokio::test]
    async fn duplicate_names_rejected_up_to_case() {
        let store = MemoryTeamStore::new();
        store.create_team(team("Alpha")).await.unwrap();

        let err = TeamStore::create_team(&store, team("  ALPHA "))
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn lookup_by_name_is_case_insensitive() {
        let store = MemoryTeamStore::new();
        store.create_team(team("Rocket Owls")).await.unwrap();

        let found = store
            .find_team_by_name("Rocket OWLS".into())
            .await
            .unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().name, "rocket owls");
    }

    #[tokio::test]
    async fn save_progress_is_gated_on_expected_phase() {
        let store = MemoryTeamStore::new();
        let entity = team("gate");
        let id = entity.id;
        store.create_team(entity).await.unwrap();

        let patch = TeamPatch {
            current_phase: Some(2),
            prompt: Some(PromptRecord {
                completed: true,
                ai_prompt: Some("vu2050 poster".into()),
            }),
            ..TeamPatch::default()
        };

        let first = store.save_progress(id, 1, patch.clone()).await.unwrap();
        assert_eq!(first, CommitOutcome::Committed);

        // Replay of the same submission: the cursor moved, so the merge is refused.
        let second = store.save_progress(id, 1, patch).await.unwrap();
        assert_eq!(second, CommitOutcome::PhaseConflict);

        let stored = store.find_team(id).await.unwrap().unwrap();
        assert_eq!(stored.current_phase, 2);
        assert!(stored.progress.prompt.completed);
    }

    #[tokio::test]
    async fn save_progress_on_unknown_team_reports_not_found() {
        let store = MemoryTeamStore::new();
        let outcome = store
            .save_progress(Uuid::new_v4(), 1, TeamPatch::default())
            .await
            .unwrap();
        assert_eq!(outcome, CommitOutcome::NotFound);
    }

    #[tokio::test]
    async fn finisher_listing_filters_and_caps() {
        let store = MemoryTeamStore::new();
        for i in 0..15 {
            let mut entity = team(&format!("team-{i}"));
            if i < 12 {
                entity.current_phase = 7;
                entity.progress.location = LocationRecord {
                    completed: true,
                    answer: Some("rooftop garden".into()),
                };
            }
            store.create_team(entity).await.unwrap();
        }

        let finishers = store.list_finishers(10).await;
        assert_eq!(finishers.len(), 10);
        assert!(finishers.iter().all(|t| t.is_finisher()));
    }

    #[tokio::test]
    async fn stats_count_each_completed_phase() {
        let store = MemoryTeamStore::new();
        let mut a = team("a");
        a.progress.prompt.completed = true;
        a.progress.quiz.completed = true;
        let mut b = team("b");
        b.progress.prompt.completed = true;
        store.create_team(a).await.unwrap();
        store.create_team(b).await.unwrap();

        let stats = store.phase_stats().await;
        assert_eq!(stats.total_teams, 2);
        assert_eq!(stats.completed, [2, 1, 0, 0, 0, 0]);
    }

    #[tokio::test]
    async fn purge_empties_the_store_and_frees_names() {
        let store = MemoryTeamStore::new();
        store.create_team(team("ephemeral")).await.unwrap();
        assert_eq!(store.purge_teams().await, 1);
        assert!(
            store
                .find_team_by_name("ephemeral".into())
                .await
                .unwrap()
                .is_none()
        );
        // The name can be taken again after the purge.
        store.create_team(team("ephemeral")).await.unwrap();
    }

    #[tokio::test]
    async fn delete_removes_record_and_name_index() {
        let store = MemoryTeamStore::new();
        let entity = team("deleted");
        let id = entity.id;
        store.create_team(entity).await.unwrap();

        assert!(store.delete_team(id).await);
        assert!(!store.delete_team(id).await);
        assert!(store.find_team(id).await.unwrap().is_none());
        store.create_team(team("deleted")).await.unwrap();
    }
}
