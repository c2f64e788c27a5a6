//! Leaderboard service
//!
//! Derives a stable ranking from stored passed submissions: one entry per
//! user (their best submission by execution time, ties broken by earliest
//! submission), ordered ascending by time then submission instant, capped
//! at a fixed size.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    constants::LEADERBOARD_MAX_ENTRIES,
    error::{AppError, AppResult},
    models::{LeaderboardEntry, Submission},
    store::{ChallengeRepository, SubmissionStore},
};

/// Leaderboard service for business logic
pub struct LeaderboardService;

impl LeaderboardService {
    /// Rank the passed submissions for a challenge
    pub async fn rank(
        challenges: &dyn ChallengeRepository,
        submissions: &dyn SubmissionStore,
        challenge_id: &Uuid,
    ) -> AppResult<Vec<LeaderboardEntry>> {
        if challenges.get(challenge_id).await?.is_none() {
            return Err(AppError::NotFound("Challenge not found".to_string()));
        }

        let passed = submissions.list_passed(challenge_id).await?;
        Ok(Self::rank_submissions(passed))
    }

    fn rank_submissions(passed: Vec<Submission>) -> Vec<LeaderboardEntry> {
        // Best submission per user: lowest time, then earliest submission
        let mut best: HashMap<Uuid, Submission> = HashMap::new();
        for submission in passed {
            match best.get(&submission.user_id) {
                Some(current) if Self::sort_key(current) <= Self::sort_key(&submission) => {}
                _ => {
                    best.insert(submission.user_id, submission);
                }
            }
        }

        let mut ranked: Vec<Submission> = best.into_values().collect();
        ranked.sort_by_key(|s| Self::sort_key(s));
        ranked.truncate(LEADERBOARD_MAX_ENTRIES);

        ranked
            .into_iter()
            .enumerate()
            .map(|(index, s)| LeaderboardEntry {
                rank: index + 1,
                user_id: s.user_id,
                execution_time_ms: s.execution_time_ms.unwrap_or(u64::MAX),
                memory_used_mb: s.memory_used_mb,
                submitted_at: s.submitted_at,
            })
            .collect()
    }

    fn sort_key(s: &Submission) -> (u64, chrono::DateTime<chrono::Utc>) {
        (s.execution_time_ms.unwrap_or(u64::MAX), s.submitted_at)
    }
}
