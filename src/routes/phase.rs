use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::phase::{
        CheckAnswerResponse, ChoiceSubmitRequest, Phase1SubmitRequest, Phase1SubmitResponse,
        Phase2CheckRequest, Phase2SubmitResponse, Phase3SubmitResponse, Phase4SubmitRequest,
        Phase4SubmitResponse, Phase5AnswerRequest, Phase5CompleteRequest, Phase5CompleteResponse,
        Phase6SubmitRequest, Phase6SubmitResponse, PhaseContentItem,
    },
    error::AppError,
    services::phase_service,
    state::SharedState,
};

/// Routes serving phase content and accepting phase submissions.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/phases/{phase}/content", get(phase_content))
        .route("/phases/1/submit", post(submit_prompt))
        .route("/phases/2/check", post(check_quiz_answer))
        .route("/phases/2/submit", post(submit_quiz))
        .route("/phases/3/submit", post(submit_code_quiz))
        .route("/phases/4/submit", post(submit_debug_answer))
        .route("/phases/5/answer", post(answer_riddle))
        .route("/phases/5/complete", post(complete_riddles))
        .route("/phases/6/submit", post(submit_location))
}

/// Public content for a phase, answer keys stripped.
#[utoipa::path(
    get,
    path = "/phases/{phase}/content",
    tag = "phase",
    params(("phase" = u8, Path, description = "Phase number, 2 to 5")),
    responses(
        (status = 200, description = "Ordered content items", body = [PhaseContentItem]),
        (status = 404, description = "Phase has no published content")
    )
)]
pub async fn phase_content(
    Path(phase): Path<u8>,
) -> Result<Json<Vec<PhaseContentItem>>, AppError> {
    let items = phase_service::phase_content(phase)?;
    Ok(Json(items))
}

/// Submit the phase 1 image-generation prompt.
#[utoipa::path(
    post,
    path = "/phases/1/submit",
    tag = "phase",
    request_body = Phase1SubmitRequest,
    responses(
        (status = 200, description = "Submission evaluated", body = Phase1SubmitResponse),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Wrong phase or already completed")
    )
)]
pub async fn submit_prompt(
    State(state): State<SharedState>,
    Json(payload): Json<Phase1SubmitRequest>,
) -> Result<Json<Phase1SubmitResponse>, AppError> {
    let outcome = phase_service::submit_prompt(&state, payload).await?;
    Ok(Json(outcome))
}

/// Check a single quiz answer without affecting progress.
#[utoipa::path(
    post,
    path = "/phases/2/check",
    tag = "phase",
    request_body = Phase2CheckRequest,
    responses(
        (status = 200, description = "Answer checked", body = CheckAnswerResponse),
        (status = 404, description = "Unknown question index")
    )
)]
pub async fn check_quiz_answer(
    Json(payload): Json<Phase2CheckRequest>,
) -> Result<Json<CheckAnswerResponse>, AppError> {
    let outcome = phase_service::check_quiz_answer(payload)?;
    Ok(Json(outcome))
}

/// Submit the full phase 2 quiz answer set.
#[utoipa::path(
    post,
    path = "/phases/2/submit",
    tag = "phase",
    request_body = ChoiceSubmitRequest,
    responses(
        (status = 200, description = "Submission scored", body = Phase2SubmitResponse),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Wrong phase or already completed")
    )
)]
pub async fn submit_quiz(
    State(state): State<SharedState>,
    Json(payload): Json<ChoiceSubmitRequest>,
) -> Result<Json<Phase2SubmitResponse>, AppError> {
    let outcome = phase_service::submit_quiz(&state, payload).await?;
    Ok(Json(outcome))
}

/// Submit the full phase 3 code-reading answer set.
#[utoipa::path(
    post,
    path = "/phases/3/submit",
    tag = "phase",
    request_body = ChoiceSubmitRequest,
    responses(
        (status = 200, description = "Submission scored", body = Phase3SubmitResponse),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Wrong phase or already completed")
    )
)]
pub async fn submit_code_quiz(
    State(state): State<SharedState>,
    Json(payload): Json<ChoiceSubmitRequest>,
) -> Result<Json<Phase3SubmitResponse>, AppError> {
    let outcome = phase_service::submit_code_quiz(&state, payload).await?;
    Ok(Json(outcome))
}

/// Submit the phase 4 debugging answer.
#[utoipa::path(
    post,
    path = "/phases/4/submit",
    tag = "phase",
    request_body = Phase4SubmitRequest,
    responses(
        (status = 200, description = "Submission evaluated", body = Phase4SubmitResponse),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Wrong phase or already completed")
    )
)]
pub async fn submit_debug_answer(
    State(state): State<SharedState>,
    Json(payload): Json<Phase4SubmitRequest>,
) -> Result<Json<Phase4SubmitResponse>, AppError> {
    let outcome = phase_service::submit_debug_answer(&state, payload).await?;
    Ok(Json(outcome))
}

/// Check a single riddle answer without affecting progress.
#[utoipa::path(
    post,
    path = "/phases/5/answer",
    tag = "phase",
    request_body = Phase5AnswerRequest,
    responses(
        (status = 200, description = "Answer checked", body = CheckAnswerResponse),
        (status = 404, description = "Unknown team or riddle"),
        (status = 409, description = "Wrong phase or already completed")
    )
)]
pub async fn answer_riddle(
    State(state): State<SharedState>,
    Json(payload): Json<Phase5AnswerRequest>,
) -> Result<Json<CheckAnswerResponse>, AppError> {
    let outcome = phase_service::answer_riddle(&state, payload).await?;
    Ok(Json(outcome))
}

/// Submit the full phase 5 riddle answer map.
#[utoipa::path(
    post,
    path = "/phases/5/complete",
    tag = "phase",
    request_body = Phase5CompleteRequest,
    responses(
        (status = 200, description = "Submission scored", body = Phase5CompleteResponse),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Wrong phase or already completed")
    )
)]
pub async fn complete_riddles(
    State(state): State<SharedState>,
    Json(payload): Json<Phase5CompleteRequest>,
) -> Result<Json<Phase5CompleteResponse>, AppError> {
    let outcome = phase_service::complete_riddles(&state, payload).await?;
    Ok(Json(outcome))
}

/// Submit the phase 6 location proof and finish the hunt.
#[utoipa::path(
    post,
    path = "/phases/6/submit",
    tag = "phase",
    request_body = Phase6SubmitRequest,
    responses(
        (status = 200, description = "Hunt finished", body = Phase6SubmitResponse),
        (status = 404, description = "Unknown team"),
        (status = 409, description = "Wrong phase or already completed")
    )
)]
pub async fn submit_location(
    State(state): State<SharedState>,
    Json(payload): Json<Phase6SubmitRequest>,
) -> Result<Json<Phase6SubmitResponse>, AppError> {
    let outcome = phase_service::submit_location(&state, payload).await?;
    Ok(Json(outcome))
}
