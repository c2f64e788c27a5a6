//! Judge service
//!
//! Orchestrates the §6 caller-facing contract: validate, admit to the
//! executor pool, wait for the verdict. Validation failures are surfaced
//! before any submission record exists.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    judge::{
        pool::{ExecutorPool, JudgeJob},
        validator, verdict,
    },
    models::Submission,
    store::{ChallengeRepository, SubmissionStore},
};

/// Judge service for business logic
pub struct JudgeService;

impl JudgeService {
    /// Submit code for a challenge and wait for the terminal verdict.
    ///
    /// Returns the judged submission plus a human-readable message. Fails
    /// with `Validation` before admission, `NotFound` for an unknown
    /// challenge and `Backpressure` when the pool queue is full.
    pub async fn submit(
        challenges: &dyn ChallengeRepository,
        pool: &ExecutorPool,
        challenge_id: Uuid,
        user_id: Uuid,
        code: String,
        language: String,
    ) -> AppResult<(Submission, &'static str)> {
        validator::validate(&code, &language)?;

        let challenge = challenges
            .get(&challenge_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Challenge not found".to_string()))?;

        let ticket = pool
            .submit(JudgeJob {
                submission_id: Uuid::new_v4(),
                challenge,
                user_id,
                code,
                language,
            })
            .await?;

        let submission = ticket.wait().await?;
        let message = verdict::message_for(submission.status);
        Ok((submission, message))
    }

    /// Fetch a submission for polling
    pub async fn get_submission(
        submissions: &dyn SubmissionStore,
        id: &Uuid,
    ) -> AppResult<Submission> {
        submissions
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))
    }

    /// Request cancellation of an in-flight submission (e.g. its challenge
    /// was deleted). Returns false when nothing was in flight.
    pub fn cancel(pool: &ExecutorPool, submission_id: &Uuid) -> bool {
        pool.cancel(submission_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JudgeConfig;
    use crate::judge::sandbox::scripted::ScriptedSandbox;
    use crate::models::{Challenge, SubmissionStatus, TestCase};
    use crate::store::notify::recording::RecordingSink;
    use crate::store::{InMemoryChallenges, InMemorySubmissions};
    use chrono::Utc;
    use std::sync::Arc;

    struct Fixture {
        challenges: Arc<InMemoryChallenges>,
        submissions: Arc<InMemorySubmissions>,
        pool: ExecutorPool,
    }

    fn fixture(sandbox: ScriptedSandbox) -> Fixture {
        let challenges = Arc::new(InMemoryChallenges::new());
        let submissions: Arc<InMemorySubmissions> = Arc::new(InMemorySubmissions::new());
        let pool = ExecutorPool::start(
            Arc::new(sandbox),
            submissions.clone(),
            Arc::new(RecordingSink::default()),
            JudgeConfig::default(),
        );
        Fixture {
            challenges,
            submissions,
            pool,
        }
    }

    fn reverse_challenge() -> Challenge {
        Challenge {
            id: Uuid::new_v4(),
            title: "Reverse a string".to_string(),
            description: "Print the reversed input".to_string(),
            language: "python".to_string(),
            test_cases: vec![
                TestCase {
                    input: "abc".to_string(),
                    expected_output: "cba".to_string(),
                    is_public: true,
                },
                TestCase {
                    input: "hello".to_string(),
                    expected_output: "olleh".to_string(),
                    is_public: true,
                },
                TestCase {
                    input: "racecar".to_string(),
                    expected_output: "racecar".to_string(),
                    is_public: false,
                },
            ],
            time_limit_seconds: 30,
            memory_limit_mb: 256,
            solution: Some("def reverse(s):\n    return s[::-1]\n".to_string()),
            created_at: Utc::now(),
        }
    }

    const VALID_CODE: &str = "def solve(s):\n    return s[::-1]\n";

    #[tokio::test]
    async fn test_correct_solution_passes_all_cases() {
        // Scripted outputs match all three expected outputs
        let fx = fixture(ScriptedSandbox::new(vec![
            ScriptedSandbox::ok("cba\n", 10),
            ScriptedSandbox::ok("olleh\n", 12),
            ScriptedSandbox::ok("racecar\n", 9),
        ]));
        let challenge = reverse_challenge();
        fx.challenges.insert(challenge.clone()).await;

        let (submission, message) = JudgeService::submit(
            fx.challenges.as_ref(),
            &fx.pool,
            challenge.id,
            Uuid::new_v4(),
            VALID_CODE.to_string(),
            "python".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Passed);
        assert_eq!(submission.test_results.len(), 3);
        assert!(submission.test_results.iter().all(|r| r.passed));
        assert_eq!(submission.execution_time_ms, Some(31));
        assert_eq!(message, "All tests passed!");
    }

    #[tokio::test]
    async fn test_banned_construct_rejected_before_any_record() {
        let fx = fixture(ScriptedSandbox::echoing());
        let challenge = reverse_challenge();
        let challenge_id = challenge.id;
        fx.challenges.insert(challenge).await;

        let result = JudgeService::submit(
            fx.challenges.as_ref(),
            &fx.pool,
            challenge_id,
            Uuid::new_v4(),
            "def solve():\n    subprocess.run(['rm'])\n".to_string(),
            "python".to_string(),
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        // No submission row with execution data was created
        assert!(
            fx.submissions
                .list_passed(&challenge_id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_unknown_challenge_is_not_found() {
        let fx = fixture(ScriptedSandbox::echoing());
        let result = JudgeService::submit(
            fx.challenges.as_ref(),
            &fx.pool,
            Uuid::new_v4(),
            Uuid::new_v4(),
            VALID_CODE.to_string(),
            "python".to_string(),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_polling_returns_the_stored_record() {
        let fx = fixture(ScriptedSandbox::new(vec![
            ScriptedSandbox::ok("cba", 10),
            ScriptedSandbox::ok("wrong", 10),
            ScriptedSandbox::ok("racecar", 10),
        ]));
        let challenge = reverse_challenge();
        fx.challenges.insert(challenge.clone()).await;

        let (submission, message) = JudgeService::submit(
            fx.challenges.as_ref(),
            &fx.pool,
            challenge.id,
            Uuid::new_v4(),
            VALID_CODE.to_string(),
            "python".to_string(),
        )
        .await
        .unwrap();

        assert_eq!(submission.status, SubmissionStatus::Failed);
        assert_eq!(message, "Some tests failed. Try again!");

        let polled = JudgeService::get_submission(fx.submissions.as_ref(), &submission.id)
            .await
            .unwrap();
        assert_eq!(polled.status, SubmissionStatus::Failed);
        assert_eq!(polled.test_results.len(), 3);
    }

    #[tokio::test]
    async fn test_rerunning_the_same_code_is_deterministic() {
        // Same scripted outputs twice: identical per-test pass/fail values
        let outputs = || {
            vec![
                ScriptedSandbox::ok("cba", 10),
                ScriptedSandbox::ok("wrong", 20),
                ScriptedSandbox::ok("racecar", 30),
            ]
        };
        let challenge = reverse_challenge();

        let mut verdicts = Vec::new();
        for _ in 0..2 {
            let fx = fixture(ScriptedSandbox::new(outputs()));
            fx.challenges.insert(challenge.clone()).await;
            let (submission, _) = JudgeService::submit(
                fx.challenges.as_ref(),
                &fx.pool,
                challenge.id,
                Uuid::new_v4(),
                VALID_CODE.to_string(),
                "python".to_string(),
            )
            .await
            .unwrap();
            verdicts.push((
                submission.status,
                submission
                    .test_results
                    .iter()
                    .map(|r| r.passed)
                    .collect::<Vec<_>>(),
            ));
        }
        assert_eq!(verdicts[0], verdicts[1]);
    }
}
