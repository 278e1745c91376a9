//! Business logic powering the organizer-only REST routes.

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{PhaseStatsResponse, PurgeResponse},
        team::TeamSummary,
    },
    error::ServiceError,
    state::SharedState,
};

/// Every registered team, registration order.
pub async fn list_teams(state: &SharedState) -> Result<Vec<TeamSummary>, ServiceError> {
    let teams = state.store().list_teams().await?;
    Ok(teams.into_iter().map(Into::into).collect())
}

/// Per-phase completion counts for the organizer dashboard.
pub async fn phase_stats(state: &SharedState) -> Result<PhaseStatsResponse, ServiceError> {
    let stats = state.store().phase_stats().await?;
    Ok(stats.into())
}

/// Remove a single team record.
pub async fn delete_team(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    if !state.store().delete_team(id).await? {
        return Err(ServiceError::NotFound(format!("team `{id}` not found")));
    }
    info!(team = %id, "team deleted");
    Ok(())
}

/// Remove every team record. Destructive; reserved for event resets.
pub async fn purge_teams(state: &SharedState) -> Result<PurgeResponse, ServiceError> {
    let deleted = state.store().purge_teams().await?;
    warn!(deleted, "all team records purged");
    Ok(PurgeResponse { deleted })
}
