//! Submission store contract
//!
//! The sole durable record of judging outcomes. Status moves from
//! non-terminal to terminal exactly once; the worker owning a job is the
//! single writer for that submission's judging fields.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Submission, SubmissionStatus, TestResult},
};

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a freshly admitted submission (status must be non-terminal)
    async fn create(&self, submission: Submission) -> AppResult<()>;

    async fn get(&self, id: &Uuid) -> AppResult<Option<Submission>>;

    /// Transition a queued submission to running
    async fn mark_running(&self, id: &Uuid) -> AppResult<()>;

    /// Atomically apply the terminal outcome. If the submission already
    /// reached a terminal status (e.g. a cancellation raced completion),
    /// the stored record wins and is returned unchanged.
    async fn finalize(
        &self,
        id: &Uuid,
        status: SubmissionStatus,
        test_results: Vec<TestResult>,
        execution_time_ms: u64,
        memory_used_mb: u64,
    ) -> AppResult<Submission>;

    /// All passed submissions for a challenge (leaderboard input set)
    async fn list_passed(&self, challenge_id: &Uuid) -> AppResult<Vec<Submission>>;
}

/// In-memory submission store
#[derive(Default)]
pub struct InMemorySubmissions {
    submissions: RwLock<HashMap<Uuid, Submission>>,
}

impl InMemorySubmissions {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissions {
    async fn create(&self, submission: Submission) -> AppResult<()> {
        if submission.status.is_terminal() {
            return Err(AppError::InvalidInput(
                "Submissions are created with a non-terminal status".to_string(),
            ));
        }
        self.submissions
            .write()
            .await
            .insert(submission.id, submission);
        Ok(())
    }

    async fn get(&self, id: &Uuid) -> AppResult<Option<Submission>> {
        Ok(self.submissions.read().await.get(id).cloned())
    }

    async fn mark_running(&self, id: &Uuid) -> AppResult<()> {
        let mut guard = self.submissions.write().await;
        let submission = guard
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;
        if !submission.status.is_terminal() {
            submission.status = SubmissionStatus::Running;
        }
        Ok(())
    }

    async fn finalize(
        &self,
        id: &Uuid,
        status: SubmissionStatus,
        test_results: Vec<TestResult>,
        execution_time_ms: u64,
        memory_used_mb: u64,
    ) -> AppResult<Submission> {
        if !status.is_terminal() {
            return Err(AppError::InvalidInput(format!(
                "{} is not a terminal status",
                status
            )));
        }

        let mut guard = self.submissions.write().await;
        let submission = guard
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

        // First terminal write wins; later writes are no-ops
        if submission.status.is_terminal() {
            return Ok(submission.clone());
        }

        submission.status = status;
        submission.test_results = test_results;
        submission.execution_time_ms = Some(execution_time_ms);
        submission.memory_used_mb = Some(memory_used_mb);
        submission.judged_at = Some(Utc::now());
        Ok(submission.clone())
    }

    async fn list_passed(&self, challenge_id: &Uuid) -> AppResult<Vec<Submission>> {
        Ok(self
            .submissions
            .read()
            .await
            .values()
            .filter(|s| s.challenge_id == *challenge_id && s.status.is_passed())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(challenge_id: Uuid) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            challenge_id,
            user_id: Uuid::new_v4(),
            code: "def f(): pass".to_string(),
            language: "python".to_string(),
            status: SubmissionStatus::Queued,
            execution_time_ms: None,
            memory_used_mb: None,
            test_results: vec![],
            submitted_at: Utc::now(),
            judged_at: None,
        }
    }

    #[tokio::test]
    async fn test_terminal_status_is_written_once() {
        let store = InMemorySubmissions::new();
        let submission = pending(Uuid::new_v4());
        let id = submission.id;
        store.create(submission).await.unwrap();

        let first = store
            .finalize(&id, SubmissionStatus::Passed, vec![], 100, 32)
            .await
            .unwrap();
        assert_eq!(first.status, SubmissionStatus::Passed);

        // A racing cancellation must not overwrite the verdict
        let second = store
            .finalize(&id, SubmissionStatus::Cancelled, vec![], 0, 0)
            .await
            .unwrap();
        assert_eq!(second.status, SubmissionStatus::Passed);
        assert_eq!(second.execution_time_ms, Some(100));
    }

    #[tokio::test]
    async fn test_finalize_rejects_non_terminal_status() {
        let store = InMemorySubmissions::new();
        let submission = pending(Uuid::new_v4());
        let id = submission.id;
        store.create(submission).await.unwrap();

        assert!(
            store
                .finalize(&id, SubmissionStatus::Running, vec![], 0, 0)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_list_passed_filters_by_challenge_and_status() {
        let store = InMemorySubmissions::new();
        let challenge_id = Uuid::new_v4();

        let passed = pending(challenge_id);
        let passed_id = passed.id;
        store.create(passed).await.unwrap();
        store
            .finalize(&passed_id, SubmissionStatus::Passed, vec![], 10, 8)
            .await
            .unwrap();

        let failed = pending(challenge_id);
        let failed_id = failed.id;
        store.create(failed).await.unwrap();
        store
            .finalize(&failed_id, SubmissionStatus::Failed, vec![], 10, 8)
            .await
            .unwrap();

        let other = pending(Uuid::new_v4());
        let other_id = other.id;
        store.create(other).await.unwrap();
        store
            .finalize(&other_id, SubmissionStatus::Passed, vec![], 10, 8)
            .await
            .unwrap();

        let listed = store.list_passed(&challenge_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, passed_id);
    }
}
