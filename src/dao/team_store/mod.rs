/// Process-scoped in-memory backend.
pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{PhaseCompletionStats, TeamEntity, TeamPatch};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Maximum number of finisher entries served to the leaderboard.
pub const LEADERBOARD_LIMIT: usize = 10;

/// Result of a conditional progress merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The patch was applied atomically.
    Committed,
    /// No team exists under the given identifier.
    NotFound,
    /// The stored progress cursor no longer matches the expected phase.
    PhaseConflict,
}

/// Abstraction over the persistence layer for team records.
///
/// Implementations must provide per-record atomicity for
/// [`save_progress`](TeamStore::save_progress): the patch is applied only if
/// the stored `current_phase` still equals `expected_phase`, so concurrent
/// submissions for the same team serialize on the record and the loser
/// observes [`CommitOutcome::PhaseConflict`].
pub trait TeamStore: Send + Sync {
    /// Insert a new team; fails with a duplicate error when the id or the
    /// normalized name is already present.
    fn create_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a team by identifier; `Ok(None)` when absent.
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Case-insensitive lookup by team name; `Ok(None)` when absent.
    fn find_team_by_name(&self, name: String)
    -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Atomically merge `patch` into the stored record, gated on the
    /// expected progress cursor.
    fn save_progress(
        &self,
        id: Uuid,
        expected_phase: u8,
        patch: TeamPatch,
    ) -> BoxFuture<'static, StorageResult<CommitOutcome>>;
    /// Every registered team.
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    /// Teams that completed the final phase, oldest finish first, capped to `limit`.
    fn list_finishers(&self, limit: usize) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;
    /// Per-phase completion counts plus the total team count.
    fn phase_stats(&self) -> BoxFuture<'static, StorageResult<PhaseCompletionStats>>;
    /// Remove one team; `false` when it did not exist.
    fn delete_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Remove every team, returning how many were deleted.
    fn purge_teams(&self) -> BoxFuture<'static, StorageResult<u64>>;
    /// Ping the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}

/// Normalization applied to team names for storage and lookup.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
