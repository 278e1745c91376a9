use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::models::PhaseCompletionStats;

/// Aggregate completion counts served to the organizers.
#[derive(Debug, Serialize, ToSchema)]
pub struct PhaseStatsResponse {
    /// Number of registered teams.
    pub total_teams: u64,
    /// Completion count per phase.
    pub phases: Vec<PhaseCount>,
}

/// Completion count for one phase.
#[derive(Debug, Serialize, ToSchema)]
pub struct PhaseCount {
    /// Phase number (1..=6).
    pub phase: u8,
    /// Teams that completed it.
    pub completed: u64,
}

impl From<PhaseCompletionStats> for PhaseStatsResponse {
    fn from(stats: PhaseCompletionStats) -> Self {
        Self {
            total_teams: stats.total_teams,
            phases: stats
                .completed
                .iter()
                .enumerate()
                .map(|(index, count)| PhaseCount {
                    phase: (index + 1) as u8,
                    completed: *count,
                })
                .collect(),
        }
    }
}

/// Result of the purge-all operation.
#[derive(Debug, Serialize, ToSchema)]
pub struct PurgeResponse {
    /// Number of team records removed.
    pub deleted: u64,
}
