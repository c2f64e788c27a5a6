//! Leaderboard model

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One row of a challenge leaderboard.
///
/// Derived from passed submissions only: one entry per user (their best
/// submission), ordered ascending by execution time with ties broken by
/// earliest submission time.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: Uuid,
    pub execution_time_ms: u64,
    pub memory_used_mb: Option<u64>,
    pub submitted_at: DateTime<Utc>,
}
