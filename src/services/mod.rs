/// Organizer-facing listings, statistics and purge operations.
pub mod admin_service;
/// OpenAPI document assembly.
pub mod documentation;
/// Health reporting.
pub mod health_service;
/// Phase submission flows.
pub mod phase_service;
/// Registration, lookup and leaderboard.
pub mod team_service;
