use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the VU2050 hunt backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::team::register_team,
        crate::routes::team::get_team,
        crate::routes::team::leaderboard,
        crate::routes::phase::phase_content,
        crate::routes::phase::submit_prompt,
        crate::routes::phase::check_quiz_answer,
        crate::routes::phase::submit_quiz,
        crate::routes::phase::submit_code_quiz,
        crate::routes::phase::submit_debug_answer,
        crate::routes::phase::answer_riddle,
        crate::routes::phase::complete_riddles,
        crate::routes::phase::submit_location,
        crate::routes::admin::list_teams,
        crate::routes::admin::phase_stats,
        crate::routes::admin::delete_team,
        crate::routes::admin::purge_teams,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::team::RegisterTeamRequest,
            crate::dto::team::TeamSummary,
            crate::dto::team::ProgressSummary,
            crate::dto::team::LeaderboardEntry,
            crate::dto::phase::PhaseContentItem,
            crate::dto::phase::PublicChoiceItem,
            crate::dto::phase::PublicDebugChallenge,
            crate::dto::phase::PublicRiddle,
            crate::dto::phase::ChoiceVerdictDto,
            crate::dto::phase::AnsweredQuestion,
            crate::dto::phase::RiddleAnswerInput,
            crate::dto::phase::RiddleVerdictDto,
            crate::dto::phase::Phase1SubmitRequest,
            crate::dto::phase::Phase1SubmitResponse,
            crate::dto::phase::Phase2CheckRequest,
            crate::dto::phase::CheckAnswerResponse,
            crate::dto::phase::ChoiceSubmitRequest,
            crate::dto::phase::Phase2SubmitResponse,
            crate::dto::phase::Phase3SubmitResponse,
            crate::dto::phase::Phase4SubmitRequest,
            crate::dto::phase::Phase4SubmitResponse,
            crate::dto::phase::Phase5AnswerRequest,
            crate::dto::phase::Phase5CompleteRequest,
            crate::dto::phase::Phase5CompleteResponse,
            crate::dto::phase::Phase6SubmitRequest,
            crate::dto::phase::Phase6SubmitResponse,
            crate::dto::admin::PhaseStatsResponse,
            crate::dto::admin::PhaseCount,
            crate::dto::admin::PurgeResponse,
            crate::dao::models::Theme,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "team", description = "Registration, lookup and leaderboard"),
        (name = "phase", description = "Phase content and submissions"),
        (name = "admin", description = "Organizer-only management endpoints"),
    )
)]
pub struct ApiDoc;
