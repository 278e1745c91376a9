//! Registration, lookup and leaderboard logic.

use tracing::info;
use validator::Validate;

use crate::{
    dao::{
        models::TeamEntity,
        team_store::{LEADERBOARD_LIMIT, normalize_name},
    },
    dto::team::{LeaderboardEntry, RegisterTeamRequest, TeamSummary},
    error::ServiceError,
    state::SharedState,
};

/// Register a new team. The name is normalized before the uniqueness check;
/// the store's unique index backs the check up under concurrency.
pub async fn register(
    state: &SharedState,
    request: RegisterTeamRequest,
) -> Result<TeamSummary, ServiceError> {
    request
        .validate()
        .map_err(|err| ServiceError::InvalidInput(format!("validation failed: {err}")))?;

    let name = normalize_name(&request.team_name);
    if name.is_empty() {
        return Err(ServiceError::InvalidInput(
            "team name must not be blank".into(),
        ));
    }

    let store = state.store();
    if store.find_team_by_name(name.clone()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "team name `{name}` is already registered"
        )));
    }

    let team = TeamEntity::register(
        name,
        request.team_leader.trim().to_owned(),
        request
            .team_members
            .into_iter()
            .map(|member| member.trim().to_owned())
            .collect(),
        request.email.trim().to_owned(),
        request.theme,
    );

    store.create_team(team.clone()).await?;
    info!(team = %team.name, id = %team.id, "team registered");

    Ok(team.into())
}

/// Look up a team by its (case-insensitive) name.
pub async fn get_team_by_name(
    state: &SharedState,
    name: String,
) -> Result<TeamSummary, ServiceError> {
    let team = state
        .store()
        .find_team_by_name(name.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{name}` not found")))?;

    Ok(team.into())
}

/// Teams that finished the hunt, oldest finish first, capped for display.
pub async fn leaderboard(state: &SharedState) -> Result<Vec<LeaderboardEntry>, ServiceError> {
    let finishers = state.store().list_finishers(LEADERBOARD_LIMIT).await?;
    Ok(finishers.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dao::{models::Theme, team_store::memory::MemoryTeamStore},
        state::AppState,
    };

    fn test_state() -> SharedState {
        AppState::new(Arc::new(MemoryTeamStore::new()), None)
    }

    fn request(name: &str) -> RegisterTeamRequest {
        RegisterTeamRequest {
            team_name: name.into(),
            team_leader: "Lea".into(),
            team_members: vec!["Lea".into(), "Sam".into(), "Noor".into()],
            email: "team@example.org".into(),
            theme: Theme::SolarPunk,
        }
    }

    #[tokio::test]
    async fn fresh_registration_starts_on_phase_one() {
        let state = test_state();
        let summary = register(&state, request("Alpha")).await.unwrap();

        assert_eq!(summary.current_phase, 1);
        assert!(!summary.progress.prompt_completed);
        assert!(!summary.progress.quiz_completed);
        assert!(!summary.progress.code_quiz_completed);
        assert!(!summary.progress.debug_completed);
        assert!(!summary.progress.riddles_completed);
        assert!(!summary.progress.location_completed);
    }

    #[tokio::test]
    async fn names_are_normalized_and_unique_up_to_case() {
        let state = test_state();
        let summary = register(&state, request("  Rocket Owls ")).await.unwrap();
        assert_eq!(summary.name, "rocket owls");

        let err = register(&state, request("ROCKET OWLS")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let found = get_team_by_name(&state, "Rocket OWLS".into()).await.unwrap();
        assert_eq!(found.id, summary.id);
    }

    #[tokio::test]
    async fn malformed_registrations_are_rejected() {
        let state = test_state();

        let mut two_members = request("duo");
        two_members.team_members.truncate(2);
        assert!(matches!(
            register(&state, two_members).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));

        let mut five_members = request("crowd");
        five_members.team_members.push("Kim".into());
        five_members.team_members.push("Ada".into());
        assert!(matches!(
            register(&state, five_members).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));

        let mut bad_email = request("unreachable");
        bad_email.email = "not-an-address".into();
        assert!(matches!(
            register(&state, bad_email).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));

        let mut blank_name = request("   ");
        blank_name.team_name = "   ".into();
        assert!(matches!(
            register(&state, blank_name).await.unwrap_err(),
            ServiceError::InvalidInput(_)
        ));
    }

    #[tokio::test]
    async fn unknown_team_lookup_is_not_found() {
        let state = test_state();
        let err = get_team_by_name(&state, "ghost".into()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
