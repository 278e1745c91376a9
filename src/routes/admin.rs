use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::{
        admin::{PhaseStatsResponse, PurgeResponse},
        team::TeamSummary,
    },
    error::AppError,
    services::admin_service,
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Organizer-only endpoints. When an admin token is configured the whole
/// subtree requires it; without one the routes are open, matching the
/// event's historically unguarded tooling.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/admin/teams", get(list_teams).delete(purge_teams))
        .route("/admin/teams/{id}", delete(delete_team))
        .route("/admin/stats", get(phase_stats))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

async fn require_admin_token(
    State(state): State<SharedState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.admin_token() else {
        return Ok(next.run(request).await);
    };

    let provided = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided == Some(expected) {
        Ok(next.run(request).await)
    } else {
        Err(AppError::Unauthorized(
            "missing or invalid admin token".into(),
        ))
    }
}

/// Retrieve every registered team for administration purposes.
#[utoipa::path(
    get,
    path = "/admin/teams",
    tag = "admin",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, when configured")),
    responses((status = 200, description = "All registered teams", body = [TeamSummary]))
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamSummary>>, AppError> {
    Ok(Json(admin_service::list_teams(&state).await?))
}

/// Per-phase completion counts.
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, when configured")),
    responses((status = 200, description = "Aggregate statistics", body = PhaseStatsResponse))
)]
pub async fn phase_stats(
    State(state): State<SharedState>,
) -> Result<Json<PhaseStatsResponse>, AppError> {
    Ok(Json(admin_service::phase_stats(&state).await?))
}

/// Delete a single team record.
#[utoipa::path(
    delete,
    path = "/admin/teams/{id}",
    tag = "admin",
    params(
        ("X-Admin-Token" = Option<String>, Header, description = "Admin token, when configured"),
        ("id" = Uuid, Path, description = "Identifier of the team to delete")
    ),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 404, description = "Unknown team")
    )
)]
pub async fn delete_team(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    admin_service::delete_team(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove every team record.
#[utoipa::path(
    delete,
    path = "/admin/teams",
    tag = "admin",
    params(("X-Admin-Token" = Option<String>, Header, description = "Admin token, when configured")),
    responses((status = 200, description = "All teams purged", body = PurgeResponse))
)]
pub async fn purge_teams(State(state): State<SharedState>) -> Result<Json<PurgeResponse>, AppError> {
    Ok(Json(admin_service::purge_teams(&state).await?))
}
