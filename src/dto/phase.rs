use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    content::{ChoiceItem, DebugChallenge, RiddleItem},
    state::progress::{ChoiceScore, ChoiceVerdict, RiddleScore, RiddleVerdict},
};

/// One public content item served by `GET /phases/{phase}/content`.
///
/// Correctness keys are stripped before anything reaches this type.
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum PhaseContentItem {
    /// A multiple-choice question, optionally with a code snippet.
    Choice(PublicChoiceItem),
    /// The debugging challenge.
    Debug(PublicDebugChallenge),
    /// A free-text riddle.
    Riddle(PublicRiddle),
}

/// Multiple-choice question without its answer key.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicChoiceItem {
    /// Item identifier.
    pub id: u32,
    /// Code snippet to read, when the question has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Question text.
    pub question: String,
    /// Answer options, indexed from zero.
    pub options: Vec<String>,
}

impl From<&ChoiceItem> for PublicChoiceItem {
    fn from(item: &ChoiceItem) -> Self {
        Self {
            id: item.id,
            code: item.code.map(str::to_owned),
            question: item.question.to_owned(),
            options: item.options.iter().map(|option| option.to_string()).collect(),
        }
    }
}

/// Debugging challenge without its accepted answers.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicDebugChallenge {
    /// Item identifier.
    pub id: u32,
    /// The buggy snippet.
    pub code: String,
    /// Question text.
    pub question: String,
}

impl From<&DebugChallenge> for PublicDebugChallenge {
    fn from(challenge: &DebugChallenge) -> Self {
        Self {
            id: challenge.id,
            code: challenge.code.to_owned(),
            question: challenge.question.to_owned(),
        }
    }
}

/// Riddle without its accepted-answer set.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicRiddle {
    /// Riddle identifier, used as the key in the completion answer map.
    pub id: String,
    /// Riddle text.
    pub riddle: String,
}

impl From<&RiddleItem> for PublicRiddle {
    fn from(item: &RiddleItem) -> Self {
        Self {
            id: item.id.to_owned(),
            riddle: item.riddle.to_owned(),
        }
    }
}

/// Phase 1 submission: the team's image-generation prompt.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct Phase1SubmitRequest {
    /// Submitting team.
    pub team_id: Uuid,
    /// The prompt handed to the image generator.
    #[validate(length(min = 1))]
    pub ai_prompt: String,
}

/// Outcome of a phase 1 submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct Phase1SubmitResponse {
    /// Whether the prompt was accepted.
    pub completed: bool,
    /// The team's progress cursor after the submission.
    pub current_phase: u8,
}

/// Stateless per-question check used by the phase 2 quiz screen.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Phase2CheckRequest {
    /// Zero-based question index.
    pub question_index: usize,
    /// Chosen option index.
    pub answer: usize,
}

/// Feedback for a single checked answer.
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckAnswerResponse {
    /// Whether the submitted answer matches the key.
    pub correct: bool,
}

/// Full answer set for a multiple-choice phase (phases 2 and 3).
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChoiceSubmitRequest {
    /// Submitting team.
    pub team_id: Uuid,
    /// Chosen option index per question, in question order.
    pub answers: Vec<usize>,
}

/// Per-item correctness in a scored response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ChoiceVerdictDto {
    /// Item identifier.
    pub id: u32,
    /// The submitted option index, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<usize>,
    /// Whether it matched the key.
    pub correct: bool,
}

impl From<ChoiceVerdict> for ChoiceVerdictDto {
    fn from(verdict: ChoiceVerdict) -> Self {
        Self {
            id: verdict.id,
            submitted: verdict.submitted,
            correct: verdict.correct,
        }
    }
}

/// Outcome of a phase 2 quiz submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct Phase2SubmitResponse {
    /// Recomputed number of correct answers.
    pub score: u32,
    /// Number of questions.
    pub total: u32,
    /// Whether the phase was passed.
    pub passed: bool,
    /// Per-question breakdown for the retry screen.
    pub results: Vec<ChoiceVerdictDto>,
    /// The team's progress cursor after the submission.
    pub current_phase: u8,
}

/// A question echoed back with its answer key (phase 3 review).
#[derive(Debug, Serialize, ToSchema)]
pub struct AnsweredQuestion {
    /// Item identifier.
    pub id: u32,
    /// Code snippet, when the question has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Question text.
    pub question: String,
    /// Answer options.
    pub options: Vec<String>,
    /// Index of the correct option.
    pub correct_answer: usize,
}

impl From<&ChoiceItem> for AnsweredQuestion {
    fn from(item: &ChoiceItem) -> Self {
        Self {
            id: item.id,
            code: item.code.map(str::to_owned),
            question: item.question.to_owned(),
            options: item.options.iter().map(|option| option.to_string()).collect(),
            correct_answer: item.correct_answer(),
        }
    }
}

/// Outcome of a phase 3 submission. The full question set, answers included,
/// is echoed on pass and fail alike so the screen can show a review.
#[derive(Debug, Serialize, ToSchema)]
pub struct Phase3SubmitResponse {
    /// Recomputed number of correct answers.
    pub score: u32,
    /// Number of questions.
    pub total: u32,
    /// Whether the phase was passed.
    pub passed: bool,
    /// Per-question breakdown.
    pub results: Vec<ChoiceVerdictDto>,
    /// The question set with correct answers, for review.
    pub questions: Vec<AnsweredQuestion>,
    /// The team's progress cursor after the submission.
    pub current_phase: u8,
}

/// Phase 4 submission: the free-text debugging answer.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct Phase4SubmitRequest {
    /// Submitting team.
    pub team_id: Uuid,
    /// Free-text answer.
    #[validate(length(min = 1))]
    pub answer: String,
}

/// Outcome of a phase 4 submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct Phase4SubmitResponse {
    /// Whether the answer was accepted.
    pub correct: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// The team's progress cursor after the submission.
    pub current_phase: u8,
}

/// Per-riddle feedback request while the team is working through phase 5.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Phase5AnswerRequest {
    /// Submitting team.
    pub team_id: Uuid,
    /// Riddle being answered.
    pub riddle_id: String,
    /// Free-text answer.
    pub answer: String,
}

/// One submitted riddle answer inside the completion map.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RiddleAnswerInput {
    /// Free-text answer.
    pub answer: String,
}

/// Phase 5 completion: the full per-riddle answer map. The score is always
/// recomputed from this map; any client-computed score field is ignored.
#[derive(Debug, Deserialize, ToSchema)]
pub struct Phase5CompleteRequest {
    /// Submitting team.
    pub team_id: Uuid,
    /// Submitted answer per riddle id.
    pub answers: HashMap<String, RiddleAnswerInput>,
}

/// Per-riddle correctness in the completion response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RiddleVerdictDto {
    /// Riddle identifier.
    pub id: String,
    /// Whether the submitted answer was accepted.
    pub correct: bool,
}

impl From<RiddleVerdict> for RiddleVerdictDto {
    fn from(verdict: RiddleVerdict) -> Self {
        Self {
            id: verdict.id.to_owned(),
            correct: verdict.correct,
        }
    }
}

/// Outcome of a phase 5 completion attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct Phase5CompleteResponse {
    /// Whether the phase was passed.
    pub success: bool,
    /// Recomputed number of accepted answers.
    pub score: u32,
    /// Number of riddles.
    pub total: u32,
    /// Human-readable outcome message.
    pub message: String,
    /// Per-riddle breakdown for the retry screen.
    pub results: Vec<RiddleVerdictDto>,
    /// The team's progress cursor after the submission.
    pub current_phase: u8,
}

/// Phase 6 submission: the final location proof.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct Phase6SubmitRequest {
    /// Submitting team.
    pub team_id: Uuid,
    /// Free-text description of the final location.
    #[validate(length(min = 1))]
    pub location_answer: String,
}

/// Confirmation that the hunt is complete.
#[derive(Debug, Serialize, ToSchema)]
pub struct Phase6SubmitResponse {
    /// Always true; phase 6 records the answer without checking it.
    pub success: bool,
    /// Team name, for the finish screen.
    pub team_name: String,
    /// Team leader, for the finish screen.
    pub team_leader: String,
}

impl Phase2SubmitResponse {
    /// Build the response from a scorecard and the resulting cursor.
    pub fn from_score(score: ChoiceScore, passed: bool, current_phase: u8) -> Self {
        Self {
            score: score.score,
            total: score.total,
            passed,
            results: score.results.into_iter().map(Into::into).collect(),
            current_phase,
        }
    }
}

impl Phase3SubmitResponse {
    /// Build the response from a scorecard, the echoed question set and the
    /// resulting cursor.
    pub fn from_score(
        score: ChoiceScore,
        passed: bool,
        questions: Vec<AnsweredQuestion>,
        current_phase: u8,
    ) -> Self {
        Self {
            score: score.score,
            total: score.total,
            passed,
            results: score.results.into_iter().map(Into::into).collect(),
            questions,
            current_phase,
        }
    }
}

impl Phase5CompleteResponse {
    /// Build the response from a recomputed riddle scorecard.
    pub fn from_score(
        score: RiddleScore,
        success: bool,
        message: String,
        current_phase: u8,
    ) -> Self {
        Self {
            success,
            score: score.score,
            total: score.total,
            message,
            results: score.results.into_iter().map(Into::into).collect(),
            current_phase,
        }
    }
}
