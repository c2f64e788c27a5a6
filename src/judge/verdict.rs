//! Verdict aggregation
//!
//! Reduces a per-test outcome into one submission-level status and the
//! derived telemetry used for ranking. Aggregated execution time is the
//! sum of per-test wall times (ranking fairness across multi-test
//! challenges); aggregated memory is the maximum per-test peak.

use crate::models::SubmissionStatus;

use super::runner::{Interruption, JudgeOutcome};

/// Submission-level verdict with derived telemetry
#[derive(Debug, Clone)]
pub struct Verdict {
    pub status: SubmissionStatus,
    pub execution_time_ms: u64,
    pub memory_used_mb: u64,
}

/// Reduce a judging outcome to a terminal status.
///
/// `Passed` iff every result passed and nothing interrupted the run;
/// `Failed` iff at least one case ran and failed without any fatal fault;
/// `TimedOut` for a resource-limit interruption; `Errored` for a fatal
/// sandbox fault; `Cancelled` for an observed cancellation request.
pub fn aggregate(outcome: &JudgeOutcome) -> Verdict {
    let status = match &outcome.interruption {
        Some(Interruption::Fatal(_)) => SubmissionStatus::Errored,
        Some(Interruption::ResourceExceeded(_)) => SubmissionStatus::TimedOut,
        Some(Interruption::Cancelled) => SubmissionStatus::Cancelled,
        None => {
            if outcome.results.iter().all(|r| r.passed) {
                SubmissionStatus::Passed
            } else {
                SubmissionStatus::Failed
            }
        }
    };

    Verdict {
        status,
        execution_time_ms: outcome.results.iter().map(|r| r.execution_time_ms).sum(),
        memory_used_mb: outcome
            .results
            .iter()
            .map(|r| r.memory_used_mb)
            .max()
            .unwrap_or(0),
    }
}

/// Human-readable message for a terminal status
pub fn message_for(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::Passed => "All tests passed!",
        SubmissionStatus::Failed => "Some tests failed. Try again!",
        SubmissionStatus::TimedOut => "A test case exceeded its resource limit.",
        SubmissionStatus::Errored => "An execution error interrupted judging.",
        SubmissionStatus::Cancelled => "Judging was cancelled.",
        SubmissionStatus::Queued | SubmissionStatus::Running => "Judging in progress.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::runner::LimitKind;
    use crate::models::TestResult;

    fn result(index: usize, passed: bool, time: u64, memory: u64) -> TestResult {
        TestResult {
            test_case_index: index,
            passed,
            actual_output: None,
            error: None,
            execution_time_ms: time,
            memory_used_mb: memory,
        }
    }

    #[test]
    fn test_passed_iff_every_result_passed() {
        let outcome = JudgeOutcome {
            results: vec![result(0, true, 10, 5), result(1, true, 20, 9)],
            interruption: None,
        };
        assert_eq!(aggregate(&outcome).status, SubmissionStatus::Passed);

        let outcome = JudgeOutcome {
            results: vec![result(0, true, 10, 5), result(1, false, 20, 9)],
            interruption: None,
        };
        assert_eq!(aggregate(&outcome).status, SubmissionStatus::Failed);
    }

    #[test]
    fn test_empty_run_without_interruption_is_passed_vacuously() {
        // A challenge with zero test cases has nothing to fail
        let outcome = JudgeOutcome {
            results: vec![],
            interruption: None,
        };
        assert_eq!(aggregate(&outcome).status, SubmissionStatus::Passed);
    }

    #[test]
    fn test_interruptions_take_precedence() {
        let outcome = JudgeOutcome {
            results: vec![result(0, true, 10, 5)],
            interruption: Some(Interruption::Fatal("daemon gone".to_string())),
        };
        assert_eq!(aggregate(&outcome).status, SubmissionStatus::Errored);

        let outcome = JudgeOutcome {
            results: vec![result(0, false, 30_000, 0)],
            interruption: Some(Interruption::ResourceExceeded(LimitKind::Time)),
        };
        assert_eq!(aggregate(&outcome).status, SubmissionStatus::TimedOut);

        let outcome = JudgeOutcome {
            results: vec![],
            interruption: Some(Interruption::Cancelled),
        };
        assert_eq!(aggregate(&outcome).status, SubmissionStatus::Cancelled);
    }

    #[test]
    fn test_time_is_summed_and_memory_is_maxed() {
        let outcome = JudgeOutcome {
            results: vec![
                result(0, true, 10, 5),
                result(1, true, 25, 40),
                result(2, true, 5, 12),
            ],
            interruption: None,
        };
        let verdict = aggregate(&outcome);
        assert_eq!(verdict.execution_time_ms, 40);
        assert_eq!(verdict.memory_used_mb, 40);
    }
}
