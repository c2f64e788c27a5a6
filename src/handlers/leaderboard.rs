//! Leaderboard handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::AppResult, models::LeaderboardEntry, services::LeaderboardService, state::AppState,
};

/// Ranked leaderboard for one challenge
#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub challenge_id: Uuid,
    pub entries: Vec<LeaderboardEntry>,
}

/// Get the leaderboard for a challenge
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(challenge_id): Path<Uuid>,
) -> AppResult<Json<LeaderboardResponse>> {
    let entries =
        LeaderboardService::rank(state.challenges(), state.submissions(), &challenge_id).await?;
    Ok(Json(LeaderboardResponse {
        challenge_id,
        entries,
    }))
}
