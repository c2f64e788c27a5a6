//! Submission response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Submission, SubmissionStatus, TestResult};

/// Response for a submit request
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub submission: SubmissionView,
    pub message: &'static str,
}

/// User-facing view of a submission.
///
/// Per-test outputs are carried only for public test cases; a private
/// case keeps its pass/fail flag and telemetry but nothing that would
/// reveal its input or expected output.
#[derive(Debug, Serialize)]
pub struct SubmissionView {
    pub id: Uuid,
    pub challenge_id: Uuid,
    pub user_id: Uuid,
    pub language: String,
    pub status: SubmissionStatus,
    pub execution_time_ms: Option<u64>,
    pub memory_used_mb: Option<u64>,
    pub test_results: Vec<TestResultView>,
    pub submitted_at: DateTime<Utc>,
    pub judged_at: Option<DateTime<Utc>>,
}

/// User-facing view of one test case result
#[derive(Debug, Serialize)]
pub struct TestResultView {
    pub test_case_index: usize,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub execution_time_ms: u64,
    pub memory_used_mb: u64,
}

impl SubmissionView {
    /// Build a view, redacting outputs for test cases not marked public in
    /// `public_flags`. Indices past the end of the slice are treated as
    /// private.
    pub fn from_submission(submission: &Submission, public_flags: &[bool]) -> Self {
        Self {
            id: submission.id,
            challenge_id: submission.challenge_id,
            user_id: submission.user_id,
            language: submission.language.clone(),
            status: submission.status,
            execution_time_ms: submission.execution_time_ms,
            memory_used_mb: submission.memory_used_mb,
            test_results: submission
                .test_results
                .iter()
                .map(|r| TestResultView::from_result(r, public_flags))
                .collect(),
            submitted_at: submission.submitted_at,
            judged_at: submission.judged_at,
        }
    }
}

impl TestResultView {
    fn from_result(result: &TestResult, public_flags: &[bool]) -> Self {
        let is_public = public_flags
            .get(result.test_case_index)
            .copied()
            .unwrap_or(false);
        Self {
            test_case_index: result.test_case_index,
            passed: result.passed,
            actual_output: if is_public {
                result.actual_output.clone()
            } else {
                None
            },
            error: if is_public { result.error.clone() } else { None },
            execution_time_ms: result.execution_time_ms,
            memory_used_mb: result.memory_used_mb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission_with_results(results: Vec<TestResult>) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            challenge_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            code: "print(input())".to_string(),
            language: "python".to_string(),
            status: SubmissionStatus::Failed,
            execution_time_ms: Some(20),
            memory_used_mb: Some(8),
            test_results: results,
            submitted_at: Utc::now(),
            judged_at: Some(Utc::now()),
        }
    }

    fn result(index: usize, output: &str) -> TestResult {
        TestResult {
            test_case_index: index,
            passed: false,
            actual_output: Some(output.to_string()),
            error: Some("wrong answer".to_string()),
            execution_time_ms: 10,
            memory_used_mb: 8,
        }
    }

    #[test]
    fn test_private_case_outputs_are_redacted() {
        let submission =
            submission_with_results(vec![result(0, "visible"), result(1, "hidden output")]);

        let view = SubmissionView::from_submission(&submission, &[true, false]);

        assert_eq!(view.test_results[0].actual_output.as_deref(), Some("visible"));
        assert!(view.test_results[1].actual_output.is_none());
        assert!(view.test_results[1].error.is_none());
        // Pass/fail and telemetry survive redaction
        assert!(!view.test_results[1].passed);
        assert_eq!(view.test_results[1].execution_time_ms, 10);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("hidden output"));
        // Submitted code never appears in the view
        assert!(!json.contains("print(input())"));
    }

    #[test]
    fn test_missing_flags_default_to_private() {
        let submission = submission_with_results(vec![result(0, "a"), result(1, "b")]);
        let view = SubmissionView::from_submission(&submission, &[]);
        assert!(view.test_results.iter().all(|r| r.actual_output.is_none()));
    }
}
