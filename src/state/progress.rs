//! The phase-progression state machine.
//!
//! State lives on the stored team record (`current_phase` plus the per-phase
//! completion flags); this module is the pure decision logic on top of it:
//! which submissions are admissible, what counts as a pass for each phase,
//! and what the next progress cursor is. Effects are committed by the
//! services through the store's conditional merge.

use std::collections::HashMap;

use thiserror::Error;

use crate::content::{ChoiceItem, RiddleItem};
use crate::dao::models::TeamEntity;

/// First phase a freshly registered team is on.
pub const FIRST_PHASE: u8 = 1;
/// Number of challenge phases in the hunt.
pub const PHASE_COUNT: u8 = 6;
/// Progress cursor value once the whole hunt is done.
pub const HUNT_COMPLETE: u8 = 7;
/// Minimum score required to pass the code-reading quiz.
pub const CODE_QUIZ_MIN_SCORE: u32 = 3;

/// Marker that must appear in a phase 1 image prompt, compared case-insensitively.
const PROMPT_MARKER: &str = "vu2050";

/// Where a given phase stands for a given team.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    /// The team has not reached this phase yet.
    Locked,
    /// The team is on this phase and may submit.
    Active,
    /// The phase has been passed; resubmission is refused.
    Completed,
    /// The whole hunt is finished.
    Done,
}

/// Error returned when a submission is not admissible in the team's current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionDenied {
    /// The team's cursor is on another phase.
    #[error("team is on phase {current}, submissions for phase {attempted} are not allowed")]
    WrongPhase {
        /// Phase the submission was for.
        attempted: u8,
        /// Phase the team is actually on.
        current: u8,
    },
    /// The phase was already passed; duplicate requests must not rescore.
    #[error("phase {phase} is already completed")]
    AlreadyCompleted {
        /// The phase that was attempted again.
        phase: u8,
    },
}

/// Classify `phase` for `team`.
pub fn phase_status(team: &TeamEntity, phase: u8) -> PhaseStatus {
    if team.current_phase >= HUNT_COMPLETE {
        return PhaseStatus::Done;
    }
    if team.progress.completed(phase) || team.current_phase > phase {
        return PhaseStatus::Completed;
    }
    if team.current_phase == phase {
        return PhaseStatus::Active;
    }
    PhaseStatus::Locked
}

/// Gate every submission handler runs before scoring: the phase must be the
/// team's active one and must not have been passed before.
pub fn clear_for_submission(team: &TeamEntity, phase: u8) -> Result<(), SubmissionDenied> {
    match phase_status(team, phase) {
        PhaseStatus::Active => Ok(()),
        PhaseStatus::Completed | PhaseStatus::Done => {
            Err(SubmissionDenied::AlreadyCompleted { phase })
        }
        PhaseStatus::Locked => Err(SubmissionDenied::WrongPhase {
            attempted: phase,
            current: team.current_phase,
        }),
    }
}

/// The cursor value after passing `current`; capped at the terminal value.
pub fn next_phase(current: u8) -> u8 {
    (current + 1).min(HUNT_COMPLETE)
}

/// Verdict for a single scored multiple-choice item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceVerdict {
    /// Item identifier.
    pub id: u32,
    /// The submitted option index, if one was given for this item.
    pub submitted: Option<usize>,
    /// Whether the submission matched the key.
    pub correct: bool,
}

/// Recomputed score for a multiple-choice phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceScore {
    /// Number of correct answers.
    pub score: u32,
    /// Number of items in the set.
    pub total: u32,
    /// Per-item breakdown, in question order.
    pub results: Vec<ChoiceVerdict>,
}

/// Verdict for a single riddle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiddleVerdict {
    /// Riddle identifier.
    pub id: &'static str,
    /// Whether the submitted answer was accepted.
    pub correct: bool,
}

/// Recomputed score for the riddle phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiddleScore {
    /// Number of accepted answers.
    pub score: u32,
    /// Number of riddles in the set.
    pub total: u32,
    /// Per-riddle breakdown, in set order.
    pub results: Vec<RiddleVerdict>,
}

/// Score a multiple-choice submission against the item set. Missing answers
/// count as wrong; extra answers beyond the set are ignored.
pub fn score_choices(items: &[ChoiceItem], answers: &[usize]) -> ChoiceScore {
    let results = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let submitted = answers.get(index).copied();
            ChoiceVerdict {
                id: item.id,
                submitted,
                correct: submitted.is_some_and(|answer| item.is_correct(answer)),
            }
        })
        .collect::<Vec<_>>();

    ChoiceScore {
        score: results.iter().filter(|verdict| verdict.correct).count() as u32,
        total: items.len() as u32,
        results,
    }
}

/// Score the riddle phase from the submitted per-riddle answer map. The map
/// is the only client input consulted; any client-computed score is ignored.
pub fn score_riddles(items: &[RiddleItem], answers: &HashMap<String, String>) -> RiddleScore {
    let results = items
        .iter()
        .map(|item| RiddleVerdict {
            id: item.id,
            correct: answers
                .get(item.id)
                .is_some_and(|answer| item.accepts(answer)),
        })
        .collect::<Vec<_>>();

    RiddleScore {
        score: results.iter().filter(|verdict| verdict.correct).count() as u32,
        total: items.len() as u32,
        results,
    }
}

/// Phase 1 pass rule: the prompt must name the event marker, any casing.
pub fn prompt_passes(prompt: &str) -> bool {
    prompt.to_lowercase().contains(PROMPT_MARKER)
}

/// Phase 2 pass rule: every quiz item answered correctly.
pub fn quiz_passes(score: &ChoiceScore) -> bool {
    score.score == score.total
}

/// Phase 3 pass rule: at least [`CODE_QUIZ_MIN_SCORE`] correct.
pub fn code_quiz_passes(score: &ChoiceScore) -> bool {
    score.score >= CODE_QUIZ_MIN_SCORE
}

/// Phase 5 pass rule: every riddle answered correctly.
pub fn riddles_pass(score: &RiddleScore) -> bool {
    score.score == score.total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content;
    use crate::dao::models::Theme;

    fn team_on_phase(phase: u8) -> TeamEntity {
        let mut team = TeamEntity::register(
            "testers".into(),
            "Io".into(),
            vec!["Io".into(), "Ada".into(), "Max".into()],
            "testers@example.org".into(),
            Theme::LostArchives,
        );
        team.current_phase = phase;
        for done in 1..phase.min(HUNT_COMPLETE) {
            match done {
                1 => team.progress.prompt.completed = true,
                2 => team.progress.quiz.completed = true,
                3 => team.progress.code_quiz.completed = true,
                4 => team.progress.debug.completed = true,
                5 => team.progress.riddles.completed = true,
                6 => team.progress.location.completed = true,
                _ => unreachable!(),
            }
        }
        team
    }

    #[test]
    fn fresh_team_is_active_on_phase_one_only() {
        let team = team_on_phase(1);
        assert_eq!(phase_status(&team, 1), PhaseStatus::Active);
        for phase in 2..=6 {
            assert_eq!(phase_status(&team, phase), PhaseStatus::Locked);
        }
    }

    #[test]
    fn gate_rejects_locked_phase_with_wrong_phase() {
        let team = team_on_phase(2);
        let err = clear_for_submission(&team, 4).unwrap_err();
        assert_eq!(
            err,
            SubmissionDenied::WrongPhase {
                attempted: 4,
                current: 2
            }
        );
    }

    #[test]
    fn gate_rejects_completed_phase_even_with_new_answers() {
        let team = team_on_phase(3);
        let err = clear_for_submission(&team, 2).unwrap_err();
        assert_eq!(err, SubmissionDenied::AlreadyCompleted { phase: 2 });
    }

    #[test]
    fn gate_admits_the_active_phase() {
        let team = team_on_phase(5);
        assert!(clear_for_submission(&team, 5).is_ok());
    }

    #[test]
    fn finished_team_cannot_submit_anywhere() {
        let team = team_on_phase(7);
        for phase in 1..=6 {
            assert_eq!(
                clear_for_submission(&team, phase),
                Err(SubmissionDenied::AlreadyCompleted { phase })
            );
        }
    }

    #[test]
    fn next_phase_is_monotonic_and_capped() {
        assert_eq!(next_phase(1), 2);
        assert_eq!(next_phase(6), HUNT_COMPLETE);
        assert_eq!(next_phase(HUNT_COMPLETE), HUNT_COMPLETE);
    }

    #[test]
    fn prompt_marker_is_case_insensitive() {
        assert!(prompt_passes("test VU2050 plan"));
        assert!(prompt_passes("vu2050 at dawn"));
        assert!(!prompt_passes("VU 2050 with a space"));
        assert!(!prompt_passes("no marker at all"));
    }

    #[test]
    fn quiz_requires_a_perfect_score() {
        let items = content::quiz_items();
        let perfect = items.iter().map(|item| item.correct).collect::<Vec<_>>();
        let mut one_off = perfect.clone();
        one_off[0] = (one_off[0] + 1) % items[0].options.len();

        assert!(quiz_passes(&score_choices(items, &perfect)));
        assert!(!quiz_passes(&score_choices(items, &one_off)));
    }

    #[test]
    fn code_quiz_boundary_three_passes_two_fails() {
        let items = content::code_quiz_items();
        let answers_with = |correct_count: usize| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    if index < correct_count {
                        item.correct
                    } else {
                        (item.correct + 1) % item.options.len()
                    }
                })
                .collect::<Vec<_>>()
        };

        let three = score_choices(items, &answers_with(3));
        assert_eq!(three.score, 3);
        assert!(code_quiz_passes(&three));

        let two = score_choices(items, &answers_with(2));
        assert_eq!(two.score, 2);
        assert!(!code_quiz_passes(&two));
    }

    #[test]
    fn missing_answers_score_as_wrong() {
        let items = content::quiz_items();
        let partial = vec![items[0].correct];
        let card = score_choices(items, &partial);
        assert_eq!(card.total, items.len() as u32);
        assert_eq!(card.score, 1);
        assert!(card.results[1].submitted.is_none());
        assert!(!card.results[1].correct);
    }

    #[test]
    fn riddle_score_is_recomputed_from_the_answer_map() {
        let items = content::riddle_items();
        let mut answers = HashMap::new();
        answers.insert("keys".to_string(), "KEYBOARD".to_string());
        answers.insert("cities".to_string(), " a map ".to_string());

        let card = score_riddles(items, &answers);
        assert_eq!(card.total, 4);
        assert_eq!(card.score, 2);
        assert!(!riddles_pass(&card));

        answers.insert("footsteps".to_string(), "footprints".to_string());
        answers.insert("echo".to_string(), "an echo".to_string());
        let card = score_riddles(items, &answers);
        assert_eq!(card.score, 4);
        assert!(riddles_pass(&card));
    }
}
