//! Business logic for the six phase-submission flows.
//!
//! Every flow follows the same order: validate the payload shape, resolve
//! the team, gate on the persisted progress cursor and completion flag,
//! recompute the score server-side, then commit the outcome as one
//! conditional merge. Failing submissions never touch storage.

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    content,
    dao::{
        models::{
            DebugRecord, LocationRecord, PromptRecord, QuizRecord, RiddleRecord, TeamEntity,
            TeamPatch,
        },
        team_store::CommitOutcome,
    },
    dto::phase::{
        AnsweredQuestion, CheckAnswerResponse, ChoiceSubmitRequest, Phase1SubmitRequest,
        Phase1SubmitResponse, Phase2CheckRequest, Phase2SubmitResponse, Phase3SubmitResponse,
        Phase4SubmitRequest, Phase4SubmitResponse, Phase5AnswerRequest, Phase5CompleteRequest,
        Phase5CompleteResponse, Phase6SubmitRequest, Phase6SubmitResponse, PhaseContentItem,
    },
    error::ServiceError,
    state::{
        SharedState,
        progress::{self, SubmissionDenied},
    },
};

/// Public content for a phase, answer keys stripped. Phases 2 to 5 publish
/// content; phase 1 and 6 are pure submission screens.
pub fn phase_content(phase: u8) -> Result<Vec<PhaseContentItem>, ServiceError> {
    match phase {
        2 => Ok(content::quiz_items()
            .iter()
            .map(|item| PhaseContentItem::Choice(item.into()))
            .collect()),
        3 => Ok(content::code_quiz_items()
            .iter()
            .map(|item| PhaseContentItem::Choice(item.into()))
            .collect()),
        4 => Ok(vec![PhaseContentItem::Debug(
            content::debug_challenge().into(),
        )]),
        5 => Ok(content::riddle_items()
            .iter()
            .map(|item| PhaseContentItem::Riddle(item.into()))
            .collect()),
        _ => Err(ServiceError::NotFound(format!(
            "phase {phase} has no published content"
        ))),
    }
}

/// Phase 1: record the image-generation prompt if it names the event marker.
pub async fn submit_prompt(
    state: &SharedState,
    request: Phase1SubmitRequest,
) -> Result<Phase1SubmitResponse, ServiceError> {
    validate(&request)?;
    let team = resolve_team(state, request.team_id).await?;
    progress::clear_for_submission(&team, 1)?;

    if !progress::prompt_passes(&request.ai_prompt) {
        return Ok(Phase1SubmitResponse {
            completed: false,
            current_phase: team.current_phase,
        });
    }

    let next = progress::next_phase(1);
    let patch = TeamPatch {
        current_phase: Some(next),
        prompt: Some(PromptRecord {
            completed: true,
            ai_prompt: Some(request.ai_prompt),
        }),
        ..TeamPatch::default()
    };
    commit(state, &team, 1, patch).await?;

    Ok(Phase1SubmitResponse {
        completed: true,
        current_phase: next,
    })
}

/// Phase 2 per-question feedback; stateless, no team involved.
pub fn check_quiz_answer(request: Phase2CheckRequest) -> Result<CheckAnswerResponse, ServiceError> {
    let correct = content::check_quiz_answer(request.question_index, request.answer).ok_or_else(
        || ServiceError::NotFound(format!("no quiz question at index {}", request.question_index)),
    )?;
    Ok(CheckAnswerResponse { correct })
}

/// Phase 2: the whole quiz must be answered correctly to advance.
pub async fn submit_quiz(
    state: &SharedState,
    request: ChoiceSubmitRequest,
) -> Result<Phase2SubmitResponse, ServiceError> {
    let items = content::quiz_items();
    ensure_answer_count(request.answers.len(), items.len())?;
    let team = resolve_team(state, request.team_id).await?;
    progress::clear_for_submission(&team, 2)?;

    let score = progress::score_choices(items, &request.answers);
    if !progress::quiz_passes(&score) {
        return Ok(Phase2SubmitResponse::from_score(
            score,
            false,
            team.current_phase,
        ));
    }

    let next = progress::next_phase(2);
    let patch = TeamPatch {
        current_phase: Some(next),
        quiz: Some(QuizRecord {
            completed: true,
            score: Some(score.score),
            total: Some(score.total),
        }),
        ..TeamPatch::default()
    };
    commit(state, &team, 2, patch).await?;
    info!(team = %team.name, "quiz cleared");

    Ok(Phase2SubmitResponse::from_score(score, true, next))
}

/// Phase 3: three of five code-reading questions clears the phase. The
/// question set is echoed with its answers on pass and fail alike.
pub async fn submit_code_quiz(
    state: &SharedState,
    request: ChoiceSubmitRequest,
) -> Result<Phase3SubmitResponse, ServiceError> {
    let items = content::code_quiz_items();
    ensure_answer_count(request.answers.len(), items.len())?;
    let team = resolve_team(state, request.team_id).await?;
    progress::clear_for_submission(&team, 3)?;

    let score = progress::score_choices(items, &request.answers);
    let questions: Vec<AnsweredQuestion> = items.iter().map(Into::into).collect();

    if !progress::code_quiz_passes(&score) {
        return Ok(Phase3SubmitResponse::from_score(
            score,
            false,
            questions,
            team.current_phase,
        ));
    }

    let next = progress::next_phase(3);
    let patch = TeamPatch {
        current_phase: Some(next),
        code_quiz: Some(QuizRecord {
            completed: true,
            score: Some(score.score),
            total: Some(score.total),
        }),
        ..TeamPatch::default()
    };
    commit(state, &team, 3, patch).await?;
    info!(team = %team.name, score = score.score, "code quiz cleared");

    Ok(Phase3SubmitResponse::from_score(score, true, questions, next))
}

/// Phase 4: the debugging answer, canonical phrase or numeric alias.
pub async fn submit_debug_answer(
    state: &SharedState,
    request: Phase4SubmitRequest,
) -> Result<Phase4SubmitResponse, ServiceError> {
    validate(&request)?;
    let team = resolve_team(state, request.team_id).await?;
    progress::clear_for_submission(&team, 4)?;

    if !content::debug_challenge().accepts(&request.answer) {
        return Ok(Phase4SubmitResponse {
            correct: false,
            message: "Not quite. Trace the loop one step at a time.".into(),
            current_phase: team.current_phase,
        });
    }

    let next = progress::next_phase(4);
    let patch = TeamPatch {
        current_phase: Some(next),
        debug: Some(DebugRecord {
            completed: true,
            answer: Some(request.answer),
        }),
        ..TeamPatch::default()
    };
    commit(state, &team, 4, patch).await?;
    info!(team = %team.name, "debugging challenge cleared");

    Ok(Phase4SubmitResponse {
        correct: true,
        message: "Correct! The stray increment gave it away. On to the riddles.".into(),
        current_phase: next,
    })
}

/// Phase 5 per-riddle feedback. Gated like every team-scoped handler, but
/// performs no mutation.
pub async fn answer_riddle(
    state: &SharedState,
    request: Phase5AnswerRequest,
) -> Result<CheckAnswerResponse, ServiceError> {
    let team = resolve_team(state, request.team_id).await?;
    progress::clear_for_submission(&team, 5)?;

    let correct = content::check_riddle_answer(&request.riddle_id, &request.answer)
        .ok_or_else(|| ServiceError::NotFound(format!("unknown riddle `{}`", request.riddle_id)))?;
    Ok(CheckAnswerResponse { correct })
}

/// Phase 5 completion: the score is recomputed from the submitted answer
/// map; every riddle must be solved to advance.
pub async fn complete_riddles(
    state: &SharedState,
    request: Phase5CompleteRequest,
) -> Result<Phase5CompleteResponse, ServiceError> {
    let team = resolve_team(state, request.team_id).await?;
    progress::clear_for_submission(&team, 5)?;

    let answers = request
        .answers
        .into_iter()
        .map(|(id, input)| (id, input.answer))
        .collect();
    let score = progress::score_riddles(content::riddle_items(), &answers);

    if !progress::riddles_pass(&score) {
        let message = format!("{} of {} riddles solved. Keep puzzling!", score.score, score.total);
        return Ok(Phase5CompleteResponse::from_score(
            score,
            false,
            message,
            team.current_phase,
        ));
    }

    let next = progress::next_phase(5);
    let patch = TeamPatch {
        current_phase: Some(next),
        riddles: Some(RiddleRecord {
            completed: true,
            score: Some(score.score),
            total: Some(score.total),
        }),
        ..TeamPatch::default()
    };
    commit(state, &team, 5, patch).await?;
    info!(team = %team.name, "riddles cleared");

    Ok(Phase5CompleteResponse::from_score(
        score,
        true,
        "All riddles solved. One final dash to the finish!".into(),
        next,
    ))
}

/// Phase 6: record the location proof; always passes, terminal phase.
pub async fn submit_location(
    state: &SharedState,
    request: Phase6SubmitRequest,
) -> Result<Phase6SubmitResponse, ServiceError> {
    validate(&request)?;
    let team = resolve_team(state, request.team_id).await?;
    progress::clear_for_submission(&team, 6)?;

    let patch = TeamPatch {
        current_phase: Some(progress::next_phase(6)),
        location: Some(LocationRecord {
            completed: true,
            answer: Some(request.location_answer),
        }),
        ..TeamPatch::default()
    };
    commit(state, &team, 6, patch).await?;
    info!(team = %team.name, "hunt finished");

    Ok(Phase6SubmitResponse {
        success: true,
        team_name: team.name,
        team_leader: team.leader,
    })
}

fn validate(request: &impl Validate) -> Result<(), ServiceError> {
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))
}

fn ensure_answer_count(got: usize, expected: usize) -> Result<(), ServiceError> {
    if got != expected {
        return Err(ServiceError::InvalidInput(format!(
            "expected {expected} answers, got {got}"
        )));
    }
    Ok(())
}

async fn resolve_team(state: &SharedState, id: Uuid) -> Result<TeamEntity, ServiceError> {
    state
        .store()
        .find_team(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{id}` not found")))
}

/// Persist a passing outcome. The store re-checks the progress cursor inside
/// the merge, so a submission that lost a race surfaces as a conflict here
/// instead of granting double credit.
async fn commit(
    state: &SharedState,
    team: &TeamEntity,
    phase: u8,
    patch: TeamPatch,
) -> Result<(), ServiceError> {
    match state.store().save_progress(team.id, phase, patch).await? {
        CommitOutcome::Committed => Ok(()),
        CommitOutcome::NotFound => Err(ServiceError::NotFound(format!(
            "team `{}` not found",
            team.id
        ))),
        CommitOutcome::PhaseConflict => Err(SubmissionDenied::AlreadyCompleted { phase }.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::{models::Theme, team_store::memory::MemoryTeamStore},
        dto::{
            phase::RiddleAnswerInput,
            team::{RegisterTeamRequest, TeamSummary},
        },
        services::team_service,
        state::AppState,
    };

    fn test_state() -> SharedState {
        AppState::new(Arc::new(MemoryTeamStore::new()), None)
    }

    async fn register(state: &SharedState, name: &str) -> TeamSummary {
        team_service::register(
            state,
            RegisterTeamRequest {
                team_name: name.into(),
                team_leader: "Lea".into(),
                team_members: vec!["Lea".into(), "Sam".into(), "Noor".into()],
                email: "team@example.org".into(),
                theme: Theme::NeonCity,
            },
        )
        .await
        .unwrap()
    }

    fn correct_quiz_answers() -> Vec<usize> {
        content::quiz_items()
            .iter()
            .map(|item| item.correct_answer())
            .collect()
    }

    fn correct_code_answers() -> Vec<usize> {
        content::code_quiz_items()
            .iter()
            .map(|item| item.correct_answer())
            .collect()
    }

    fn full_riddle_answers() -> HashMap<String, RiddleAnswerInput> {
        content::riddle_items()
            .iter()
            .map(|item| {
                (
                    item.id.to_string(),
                    RiddleAnswerInput {
                        answer: item.accepted[0].to_string(),
                    },
                )
            })
            .collect()
    }

    async fn current_phase(state: &SharedState, id: Uuid) -> u8 {
        state
            .store()
            .find_team(id)
            .await
            .unwrap()
            .unwrap()
            .current_phase
    }

    /// Walk a team through every phase up to (but not including) `phase`.
    async fn advance_to(state: &SharedState, id: Uuid, phase: u8) {
        for step in 1..phase {
            match step {
                1 => {
                    submit_prompt(
                        state,
                        Phase1SubmitRequest {
                            team_id: id,
                            ai_prompt: "poster of the vu2050 finish line".into(),
                        },
                    )
                    .await
                    .unwrap();
                }
                2 => {
                    submit_quiz(
                        state,
                        ChoiceSubmitRequest {
                            team_id: id,
                            answers: correct_quiz_answers(),
                        },
                    )
                    .await
                    .unwrap();
                }
                3 => {
                    submit_code_quiz(
                        state,
                        ChoiceSubmitRequest {
                            team_id: id,
                            answers: correct_code_answers(),
                        },
                    )
                    .await
                    .unwrap();
                }
                4 => {
                    submit_debug_answer(
                        state,
                        Phase4SubmitRequest {
                            team_id: id,
                            answer: "25".into(),
                        },
                    )
                    .await
                    .unwrap();
                }
                5 => {
                    complete_riddles(
                        state,
                        Phase5CompleteRequest {
                            team_id: id,
                            answers: full_riddle_answers(),
                        },
                    )
                    .await
                    .unwrap();
                }
                _ => unreachable!("no phase beyond 5 to advance through"),
            }
        }
    }

    #[tokio::test]
    async fn end_to_end_prompt_pass_then_replay_conflict() {
        let state = test_state();
        let team = register(&state, "Alpha").await;
        assert_eq!(team.current_phase, 1);

        let outcome = submit_prompt(
            &state,
            Phase1SubmitRequest {
                team_id: team.id,
                ai_prompt: "test VU2050 plan".into(),
            },
        )
        .await
        .unwrap();
        assert!(outcome.completed);
        assert_eq!(outcome.current_phase, 2);
        assert_eq!(current_phase(&state, team.id).await, 2);

        let err = submit_prompt(
            &state,
            Phase1SubmitRequest {
                team_id: team.id,
                ai_prompt: "another VU2050 prompt".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(current_phase(&state, team.id).await, 2);
    }

    #[tokio::test]
    async fn prompt_without_marker_does_not_advance() {
        let state = test_state();
        let team = register(&state, "markerless").await;

        let outcome = submit_prompt(
            &state,
            Phase1SubmitRequest {
                team_id: team.id,
                ai_prompt: "a beautiful campus at dusk".into(),
            },
        )
        .await
        .unwrap();
        assert!(!outcome.completed);
        assert_eq!(current_phase(&state, team.id).await, 1);
    }

    #[tokio::test]
    async fn quiz_partial_score_never_advances() {
        let state = test_state();
        let team = register(&state, "quizzers").await;
        advance_to(&state, team.id, 2).await;

        let mut answers = correct_quiz_answers();
        answers[0] += 1;
        let outcome = submit_quiz(
            &state,
            ChoiceSubmitRequest {
                team_id: team.id,
                answers,
            },
        )
        .await
        .unwrap();

        assert!(!outcome.passed);
        assert_eq!(outcome.score, outcome.total - 1);
        assert_eq!(outcome.results.len(), outcome.total as usize);
        let stored = state.store().find_team(team.id).await.unwrap().unwrap();
        assert_eq!(stored.current_phase, 2);
        assert!(!stored.progress.quiz.completed);
    }

    #[tokio::test]
    async fn code_quiz_three_of_five_passes_two_fails() {
        let state = test_state();
        let team = register(&state, "readers").await;
        advance_to(&state, team.id, 3).await;

        let answers_with = |correct_count: usize| -> Vec<usize> {
            content::code_quiz_items()
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    if index < correct_count {
                        item.correct_answer()
                    } else {
                        item.correct_answer() + 1
                    }
                })
                .collect()
        };

        let two = submit_code_quiz(
            &state,
            ChoiceSubmitRequest {
                team_id: team.id,
                answers: answers_with(2),
            },
        )
        .await
        .unwrap();
        assert!(!two.passed);
        assert_eq!(two.score, 2);
        // Review echo carries the keys regardless of the verdict.
        assert_eq!(two.questions.len(), 5);
        assert_eq!(current_phase(&state, team.id).await, 3);

        let three = submit_code_quiz(
            &state,
            ChoiceSubmitRequest {
                team_id: team.id,
                answers: answers_with(3),
            },
        )
        .await
        .unwrap();
        assert!(three.passed);
        assert_eq!(three.score, 3);
        assert_eq!(current_phase(&state, team.id).await, 4);
    }

    #[tokio::test]
    async fn submitting_a_locked_phase_is_a_conflict_without_mutation() {
        let state = test_state();
        let team = register(&state, "eager").await;

        let err = submit_quiz(
            &state,
            ChoiceSubmitRequest {
                team_id: team.id,
                answers: correct_quiz_answers(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let stored = state.store().find_team(team.id).await.unwrap().unwrap();
        assert_eq!(stored.current_phase, 1);
        assert!(!stored.progress.quiz.completed);
    }

    #[tokio::test]
    async fn debug_answer_accepts_canonical_and_alias_rejects_rest() {
        let state = test_state();
        let team = register(&state, "debuggers").await;
        advance_to(&state, team.id, 4).await;

        let wrong = submit_debug_answer(
            &state,
            Phase4SubmitRequest {
                team_id: team.id,
                answer: "55".into(),
            },
        )
        .await
        .unwrap();
        assert!(!wrong.correct);
        assert_eq!(current_phase(&state, team.id).await, 4);

        let pass = submit_debug_answer(
            &state,
            Phase4SubmitRequest {
                team_id: team.id,
                answer: "  Twenty Five ".into(),
            },
        )
        .await
        .unwrap();
        assert!(pass.correct);
        assert_eq!(current_phase(&state, team.id).await, 5);
    }

    #[tokio::test]
    async fn riddle_score_is_recomputed_and_forged_scores_are_ignored() {
        let state = test_state();
        let team = register(&state, "forgers").await;
        advance_to(&state, team.id, 5).await;

        // A client may attach a flattering `score` field; the payload shape
        // has no slot for it, so only the raw answers are ever read.
        let payload = serde_json::json!({
            "team_id": team.id,
            "score": 4,
            "answers": { "keys": { "answer": "wrong guess" } },
        });
        let request: Phase5CompleteRequest = serde_json::from_value(payload).unwrap();

        let outcome = complete_riddles(&state, request).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.total, 4);
        assert_eq!(current_phase(&state, team.id).await, 5);
    }

    #[tokio::test]
    async fn full_riddle_map_completes_the_phase() {
        let state = test_state();
        let team = register(&state, "solvers").await;
        advance_to(&state, team.id, 5).await;

        let feedback = answer_riddle(
            &state,
            Phase5AnswerRequest {
                team_id: team.id,
                riddle_id: "keys".into(),
                answer: "Keyboard".into(),
            },
        )
        .await
        .unwrap();
        assert!(feedback.correct);

        let outcome = complete_riddles(
            &state,
            Phase5CompleteRequest {
                team_id: team.id,
                answers: full_riddle_answers(),
            },
        )
        .await
        .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.score, outcome.total);
        assert_eq!(current_phase(&state, team.id).await, 6);
    }

    #[tokio::test]
    async fn location_proof_finishes_the_hunt_and_feeds_the_leaderboard() {
        let state = test_state();
        let team = register(&state, "finishers").await;
        advance_to(&state, team.id, 6).await;

        let outcome = submit_location(
            &state,
            Phase6SubmitRequest {
                team_id: team.id,
                location_answer: "rooftop garden above the atrium".into(),
            },
        )
        .await
        .unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.team_name, "finishers");
        assert_eq!(current_phase(&state, team.id).await, 7);

        let board = team_service::leaderboard(&state).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].team_name, "finishers");

        // Terminal state: nothing more can be submitted.
        let err = submit_location(
            &state,
            Phase6SubmitRequest {
                team_id: team.id,
                location_answer: "again".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn unknown_team_is_not_found() {
        let state = test_state();
        let err = submit_prompt(
            &state,
            Phase1SubmitRequest {
                team_id: Uuid::new_v4(),
                ai_prompt: "vu2050".into(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn content_is_published_with_keys_stripped() {
        for phase in 2..=5u8 {
            let items = phase_content(phase).unwrap();
            assert!(!items.is_empty());
            let serialized = serde_json::to_string(&items).unwrap();
            assert!(!serialized.contains("correct"));
            assert!(!serialized.contains("accepted"));
        }
        assert!(phase_content(1).is_err());
        assert!(phase_content(6).is_err());
    }
}
