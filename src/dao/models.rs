use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed set of visual themes a team can register under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    /// Neon-drenched cityscape.
    NeonCity,
    /// Green futurism.
    SolarPunk,
    /// Interstellar exploration.
    DeepSpace,
    /// Forgotten-library mystery.
    LostArchives,
}

/// Outcome record for the image-prompt phase (phase 1).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptRecord {
    /// Whether the phase has been passed.
    pub completed: bool,
    /// The submitted generation prompt, kept for the jury.
    pub ai_prompt: Option<String>,
}

/// Outcome record for a scored multiple-choice phase (phases 2 and 3).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizRecord {
    /// Whether the phase has been passed.
    pub completed: bool,
    /// Number of correct answers in the passing submission.
    pub score: Option<u32>,
    /// Number of items in the question set.
    pub total: Option<u32>,
}

/// Outcome record for the debugging challenge (phase 4).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DebugRecord {
    /// Whether the phase has been passed.
    pub completed: bool,
    /// The accepted answer as submitted.
    pub answer: Option<String>,
}

/// Outcome record for the riddle phase (phase 5).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiddleRecord {
    /// Whether the phase has been passed.
    pub completed: bool,
    /// Recomputed number of correct riddle answers.
    pub score: Option<u32>,
    /// Number of riddles in the set.
    pub total: Option<u32>,
}

/// Outcome record for the final location proof (phase 6).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationRecord {
    /// Whether the phase has been passed.
    pub completed: bool,
    /// Free-text description of where the team ended up.
    pub answer: Option<String>,
}

/// Per-phase outcome records, one slot per hunt phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhaseLedger {
    /// Phase 1: image prompt submission.
    pub prompt: PromptRecord,
    /// Phase 2: general quiz.
    pub quiz: QuizRecord,
    /// Phase 3: code-reading quiz.
    pub code_quiz: QuizRecord,
    /// Phase 4: debugging challenge.
    pub debug: DebugRecord,
    /// Phase 5: riddles.
    pub riddles: RiddleRecord,
    /// Phase 6: final location proof.
    pub location: LocationRecord,
}

impl PhaseLedger {
    /// Completion flag for the given phase number (1..=6); false for anything else.
    pub fn completed(&self, phase: u8) -> bool {
        match phase {
            1 => self.prompt.completed,
            2 => self.quiz.completed,
            3 => self.code_quiz.completed,
            4 => self.debug.completed,
            5 => self.riddles.completed,
            6 => self.location.completed,
            _ => false,
        }
    }
}

/// Representation of a registered team stored in persistence and shared across layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamEntity {
    /// Stable identifier generated at registration.
    pub id: Uuid,
    /// Unique team name, trimmed and lowercased at registration.
    pub name: String,
    /// Name of the team leader.
    pub leader: String,
    /// Names of the team members (3 to 4 entries).
    pub members: Vec<String>,
    /// Contact address for the team.
    pub email: String,
    /// Chosen hunt theme.
    pub theme: Theme,
    /// Progress cursor: 1..=6 for the active phase, 7 once the hunt is finished.
    pub current_phase: u8,
    /// Per-phase outcome records.
    pub progress: PhaseLedger,
    /// Registration timestamp.
    pub registered_at: SystemTime,
    /// Last time this team was updated.
    pub updated_at: SystemTime,
}

impl TeamEntity {
    /// Create a fresh team record on phase 1 with an empty ledger.
    pub fn register(
        name: String,
        leader: String,
        members: Vec<String>,
        email: String,
        theme: Theme,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            id: Uuid::new_v4(),
            name,
            leader,
            members,
            email,
            theme,
            current_phase: 1,
            progress: PhaseLedger::default(),
            registered_at: now,
            updated_at: now,
        }
    }

    /// Whether the team has finished the whole hunt.
    pub fn is_finisher(&self) -> bool {
        self.progress.location.completed
    }
}

/// Partial update merged into a stored team by [`TeamStore::save_progress`].
///
/// Merge semantics are identical across backends: scalar fields replace,
/// each phase record is merged as a unit, untouched siblings are preserved,
/// arrays are replaced wholesale.
///
/// [`TeamStore::save_progress`]: crate::dao::team_store::TeamStore::save_progress
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamPatch {
    /// New progress cursor, if the submission advanced the team.
    pub current_phase: Option<u8>,
    /// Phase 1 outcome to record.
    pub prompt: Option<PromptRecord>,
    /// Phase 2 outcome to record.
    pub quiz: Option<QuizRecord>,
    /// Phase 3 outcome to record.
    pub code_quiz: Option<QuizRecord>,
    /// Phase 4 outcome to record.
    pub debug: Option<DebugRecord>,
    /// Phase 5 outcome to record.
    pub riddles: Option<RiddleRecord>,
    /// Phase 6 outcome to record.
    pub location: Option<LocationRecord>,
}

impl TeamPatch {
    /// True when the patch would not change anything.
    pub fn is_empty(&self) -> bool {
        self == &TeamPatch::default()
    }

    /// Merge this patch into `team` in place.
    pub fn apply_to(&self, team: &mut TeamEntity) {
        if let Some(phase) = self.current_phase {
            team.current_phase = phase;
        }
        if let Some(record) = &self.prompt {
            team.progress.prompt = record.clone();
        }
        if let Some(record) = &self.quiz {
            team.progress.quiz = record.clone();
        }
        if let Some(record) = &self.code_quiz {
            team.progress.code_quiz = record.clone();
        }
        if let Some(record) = &self.debug {
            team.progress.debug = record.clone();
        }
        if let Some(record) = &self.riddles {
            team.progress.riddles = record.clone();
        }
        if let Some(record) = &self.location {
            team.progress.location = record.clone();
        }
    }
}

/// Per-phase completion counts across all registered teams.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PhaseCompletionStats {
    /// Number of registered teams.
    pub total_teams: u64,
    /// Count of teams that completed each phase, indexed by phase - 1.
    pub completed: [u64; 6],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_team() -> TeamEntity {
        TeamEntity::register(
            "alpha".into(),
            "Lea".into(),
            vec!["Lea".into(), "Sam".into(), "Noor".into()],
            "alpha@example.org".into(),
            Theme::NeonCity,
        )
    }

    #[test]
    fn fresh_team_starts_on_phase_one_with_clean_ledger() {
        let team = sample_team();
        assert_eq!(team.current_phase, 1);
        for phase in 1..=6 {
            assert!(!team.progress.completed(phase));
        }
        assert!(!team.is_finisher());
    }

    #[test]
    fn patch_merges_without_clobbering_siblings() {
        let mut team = sample_team();
        team.progress.prompt = PromptRecord {
            completed: true,
            ai_prompt: Some("neon skyline VU2050".into()),
        };
        team.current_phase = 2;

        let patch = TeamPatch {
            current_phase: Some(3),
            quiz: Some(QuizRecord {
                completed: true,
                score: Some(5),
                total: Some(5),
            }),
            ..TeamPatch::default()
        };
        patch.apply_to(&mut team);

        assert_eq!(team.current_phase, 3);
        assert!(team.progress.quiz.completed);
        // Phase 1 record untouched by the phase 2 merge.
        assert!(team.progress.prompt.completed);
        assert_eq!(
            team.progress.prompt.ai_prompt.as_deref(),
            Some("neon skyline VU2050")
        );
        assert!(!team.progress.code_quiz.completed);
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(TeamPatch::default().is_empty());
        let patch = TeamPatch {
            current_phase: Some(2),
            ..TeamPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
