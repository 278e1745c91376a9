use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::team::{LeaderboardEntry, RegisterTeamRequest, TeamSummary},
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Routes handling team registration, lookup and the leaderboard.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/teams", post(register_team))
        .route("/teams/{name}", get(get_team))
        .route("/leaderboard", get(leaderboard))
}

/// Register a new team for the hunt.
#[utoipa::path(
    post,
    path = "/teams",
    tag = "team",
    request_body = RegisterTeamRequest,
    responses(
        (status = 200, description = "Team registered", body = TeamSummary),
        (status = 400, description = "Malformed registration payload"),
        (status = 409, description = "Team name already registered")
    )
)]
pub async fn register_team(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterTeamRequest>,
) -> Result<Json<TeamSummary>, AppError> {
    let summary = team_service::register(&state, payload).await?;
    Ok(Json(summary))
}

/// Look up a team by its name (case-insensitive).
#[utoipa::path(
    get,
    path = "/teams/{name}",
    tag = "team",
    params(("name" = String, Path, description = "Team name, any casing")),
    responses(
        (status = 200, description = "Team found", body = TeamSummary),
        (status = 404, description = "No team under this name")
    )
)]
pub async fn get_team(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<TeamSummary>, AppError> {
    let summary = team_service::get_team_by_name(&state, name).await?;
    Ok(Json(summary))
}

/// Teams that finished the hunt, capped to ten entries.
#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "team",
    responses((status = 200, description = "Finisher list", body = [LeaderboardEntry]))
)]
pub async fn leaderboard(
    State(state): State<SharedState>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let entries = team_service::leaderboard(&state).await?;
    Ok(Json(entries))
}
