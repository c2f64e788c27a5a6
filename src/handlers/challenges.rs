//! Challenge read handlers
//!
//! The judge-facing, read-only view of challenges. Private test cases and
//! the reference solution are never exposed here; challenge CRUD belongs
//! to a different service.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    handlers::{leaderboard, submissions},
    models::Challenge,
    state::AppState,
};

/// Public view of a challenge
#[derive(Debug, Serialize)]
pub struct ChallengeResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub language: String,
    pub time_limit_seconds: u64,
    pub memory_limit_mb: u64,
    pub test_case_count: usize,
    pub public_test_cases: Vec<PublicTestCase>,
}

/// A test case the submitter is allowed to see
#[derive(Debug, Serialize)]
pub struct PublicTestCase {
    pub index: usize,
    pub input: String,
    pub expected_output: String,
}

impl ChallengeResponse {
    pub fn from_challenge(challenge: &Challenge) -> Self {
        Self {
            id: challenge.id,
            title: challenge.title.clone(),
            description: challenge.description.clone(),
            language: challenge.language.clone(),
            time_limit_seconds: challenge.time_limit_seconds,
            memory_limit_mb: challenge.memory_limit_mb,
            test_case_count: challenge.test_cases.len(),
            public_test_cases: challenge
                .public_test_cases()
                .map(|(index, tc)| PublicTestCase {
                    index,
                    input: tc.input.clone(),
                    expected_output: tc.expected_output.clone(),
                })
                .collect(),
        }
    }
}

/// List challenges
async fn list_challenges(State(state): State<AppState>) -> AppResult<Json<Vec<ChallengeResponse>>> {
    let challenges = state.challenges().list().await?;
    Ok(Json(
        challenges.iter().map(ChallengeResponse::from_challenge).collect(),
    ))
}

/// Get one challenge
async fn get_challenge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ChallengeResponse>> {
    let challenge = state
        .challenges()
        .get(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;
    Ok(Json(ChallengeResponse::from_challenge(&challenge)))
}

/// Challenge routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_challenges))
        .route("/{id}", get(get_challenge))
        .route("/{id}/submissions", post(submissions::submit))
        .route("/{id}/leaderboard", get(leaderboard::get_leaderboard))
}
