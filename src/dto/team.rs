use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{PhaseLedger, TeamEntity, Theme},
    dto::{format_system_time, validation::validate_members},
};

/// Payload used to register a new team for the hunt.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterTeamRequest {
    /// Desired team name; normalized to trimmed lowercase and unique.
    #[validate(length(min = 1, max = 64))]
    pub team_name: String,
    /// Name of the team leader.
    #[validate(length(min = 1))]
    pub team_leader: String,
    /// Team member names, 3 to 4 entries.
    #[validate(custom(function = validate_members))]
    pub team_members: Vec<String>,
    /// Contact address for the team.
    #[validate(email)]
    pub email: String,
    /// Chosen hunt theme.
    pub theme: Theme,
}

/// Public projection of a team exposed to REST clients.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamSummary {
    /// Team identifier, used for phase submissions.
    pub id: Uuid,
    /// Normalized team name.
    pub name: String,
    /// Team leader name.
    pub leader: String,
    /// Team member names.
    pub members: Vec<String>,
    /// Contact address.
    pub email: String,
    /// Chosen theme.
    pub theme: Theme,
    /// Progress cursor (1..=6 active phase, 7 = hunt complete).
    pub current_phase: u8,
    /// Per-phase completion flags.
    pub progress: ProgressSummary,
    /// Registration time, RFC3339.
    pub registered_at: String,
    /// Last update time, RFC3339.
    pub updated_at: String,
}

/// Completion flags per phase, without the stored answers.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressSummary {
    /// Phase 1: image prompt submitted and accepted.
    pub prompt_completed: bool,
    /// Phase 2: quiz passed.
    pub quiz_completed: bool,
    /// Phase 3: code-reading quiz passed.
    pub code_quiz_completed: bool,
    /// Phase 4: debugging challenge solved.
    pub debug_completed: bool,
    /// Phase 5: all riddles solved.
    pub riddles_completed: bool,
    /// Phase 6: location proof recorded.
    pub location_completed: bool,
}

impl From<&PhaseLedger> for ProgressSummary {
    fn from(ledger: &PhaseLedger) -> Self {
        Self {
            prompt_completed: ledger.prompt.completed,
            quiz_completed: ledger.quiz.completed,
            code_quiz_completed: ledger.code_quiz.completed,
            debug_completed: ledger.debug.completed,
            riddles_completed: ledger.riddles.completed,
            location_completed: ledger.location.completed,
        }
    }
}

impl From<TeamEntity> for TeamSummary {
    fn from(team: TeamEntity) -> Self {
        Self {
            id: team.id,
            progress: (&team.progress).into(),
            name: team.name,
            leader: team.leader,
            members: team.members,
            email: team.email,
            theme: team.theme,
            current_phase: team.current_phase,
            registered_at: format_system_time(team.registered_at),
            updated_at: format_system_time(team.updated_at),
        }
    }
}

/// Leaderboard entry for a team that finished the hunt.
#[derive(Debug, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    /// Team identifier.
    pub team_id: Uuid,
    /// Team name.
    pub team_name: String,
    /// Team leader name.
    pub team_leader: String,
}

impl From<TeamEntity> for LeaderboardEntry {
    fn from(team: TeamEntity) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name,
            team_leader: team.leader,
        }
    }
}
