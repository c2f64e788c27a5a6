//! Submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A judged (or in-flight) submission.
///
/// Created once with a transient status, mutated only by the judging
/// pipeline while the status is non-terminal, immutable after a terminal
/// status is reached. The worker that owns the job is the single writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub challenge_id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub code: String,
    pub language: String,
    pub status: SubmissionStatus,
    /// Sum of per-test wall times, in milliseconds
    pub execution_time_ms: Option<u64>,
    /// Maximum per-test peak memory, in megabytes
    pub memory_used_mb: Option<u64>,
    /// One entry per executed test case, in challenge order. May be shorter
    /// than the challenge's test case list only for errored, timed_out and
    /// cancelled submissions.
    pub test_results: Vec<TestResult>,
    pub submitted_at: DateTime<Utc>,
    pub judged_at: Option<DateTime<Utc>>,
}

/// Result of running one test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Position of the test case in the challenge's ordered sequence
    pub test_case_index: usize,
    pub passed: bool,
    /// Output as produced by the program; redacted for private cases in
    /// user-facing views
    pub actual_output: Option<String>,
    pub error: Option<String>,
    pub execution_time_ms: u64,
    pub memory_used_mb: u64,
}

/// Submission status state machine.
///
/// `Queued → Running → {Passed, Failed, Errored, TimedOut}`, with
/// `Cancelled` reachable from either transient state via an explicit
/// external cancellation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Queued,
    Running,
    Passed,
    Failed,
    Errored,
    TimedOut,
    Cancelled,
}

impl SubmissionStatus {
    /// Get status as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Errored => "errored",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse status from string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "queued" => Some(Self::Queued),
            "running" => Some(Self::Running),
            "passed" => Some(Self::Passed),
            "failed" => Some(Self::Failed),
            "errored" => Some(Self::Errored),
            "timed_out" => Some(Self::TimedOut),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Check if this is a terminal status (judging complete)
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Queued | Self::Running)
    }

    /// Check if this status means every test case passed
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in [
            SubmissionStatus::Queued,
            SubmissionStatus::Running,
            SubmissionStatus::Passed,
            SubmissionStatus::Failed,
            SubmissionStatus::Errored,
            SubmissionStatus::TimedOut,
            SubmissionStatus::Cancelled,
        ] {
            assert_eq!(SubmissionStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(SubmissionStatus::parse("accepted"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!SubmissionStatus::Queued.is_terminal());
        assert!(!SubmissionStatus::Running.is_terminal());
        assert!(SubmissionStatus::Passed.is_terminal());
        assert!(SubmissionStatus::Failed.is_terminal());
        assert!(SubmissionStatus::Errored.is_terminal());
        assert!(SubmissionStatus::TimedOut.is_terminal());
        assert!(SubmissionStatus::Cancelled.is_terminal());
    }
}
