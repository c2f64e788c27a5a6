//! Test case runner
//!
//! Drives the sandbox runtime once per test case, strictly in the
//! challenge's declared order, producing one `TestResult` per invocation.
//! Wrong answers and non-zero exits never stop the run (the submitter gets
//! full feedback); a resource-limit hit or a fatal sandbox fault does, and
//! the remaining cases are recorded as not-run.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::{
    config::JudgeConfig,
    models::{Challenge, TestResult},
};

use super::{
    languages::LanguageProfile,
    sandbox::{ResourceLimits, SandboxFailure, SandboxRuntime},
};

/// Which resource ceiling was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Time,
    Memory,
}

/// Why a run ended before every test case executed
#[derive(Debug, Clone)]
pub enum Interruption {
    /// A test case hit the wall-clock or memory ceiling
    ResourceExceeded(LimitKind),
    /// Fatal sandbox fault (not a normal non-zero exit)
    Fatal(String),
    /// External cancellation request observed between test cases
    Cancelled,
}

/// Everything the verdict aggregator needs about one judging run
#[derive(Debug, Clone)]
pub struct JudgeOutcome {
    /// One entry per executed test case, in declared order
    pub results: Vec<TestResult>,
    pub interruption: Option<Interruption>,
}

/// Normalize program output for exact comparison: CRLF to LF, then trim
/// trailing whitespace and newlines. No fuzzy matching beyond this.
pub fn normalize_output(s: &str) -> String {
    s.replace("\r\n", "\n").trim_end().to_string()
}

/// Runs a validated submission against a challenge's ordered test cases
pub struct TestCaseRunner {
    sandbox: Arc<dyn SandboxRuntime>,
    config: JudgeConfig,
}

impl TestCaseRunner {
    pub fn new(sandbox: Arc<dyn SandboxRuntime>, config: JudgeConfig) -> Self {
        Self { sandbox, config }
    }

    /// Run all test cases in order. A cancellation request aborts an
    /// in-flight sandbox run immediately; the abandoned container is
    /// force-removed by the sandbox layer.
    pub async fn run_all(
        &self,
        profile: &LanguageProfile,
        code: &str,
        challenge: &Challenge,
        cancel: &watch::Receiver<bool>,
    ) -> JudgeOutcome {
        let limits = ResourceLimits {
            time_limit: Duration::from_secs(challenge.time_limit_seconds),
            memory_limit_mb: challenge.memory_limit_mb,
        };

        let mut results = Vec::with_capacity(challenge.test_cases.len());
        let mut interruption = None;
        let mut cancel = cancel.clone();

        for (index, test_case) in challenge.test_cases.iter().enumerate() {
            if *cancel.borrow() {
                interruption = Some(Interruption::Cancelled);
                break;
            }

            let run_result = tokio::select! {
                result = self.run_with_retry(profile, code, &test_case.input, limits) => result,
                _ = cancel_requested(&mut cancel) => {
                    interruption = Some(Interruption::Cancelled);
                    break;
                }
            };

            match run_result {
                Ok(run) => {
                    let passed = run.exit_code == 0
                        && normalize_output(&run.stdout)
                            == normalize_output(&test_case.expected_output);
                    let error = if run.exit_code != 0 {
                        Some(if run.stderr.trim().is_empty() {
                            format!("Program exited with status {}", run.exit_code)
                        } else {
                            run.stderr.trim_end().to_string()
                        })
                    } else {
                        None
                    };

                    results.push(TestResult {
                        test_case_index: index,
                        passed,
                        actual_output: Some(run.stdout),
                        error,
                        execution_time_ms: run.wall_time_ms,
                        memory_used_mb: run.peak_memory_mb,
                    });
                }
                Err(SandboxFailure::Timeout { wall_time_ms }) => {
                    results.push(TestResult {
                        test_case_index: index,
                        passed: false,
                        actual_output: None,
                        error: Some("Time limit exceeded".to_string()),
                        execution_time_ms: wall_time_ms,
                        memory_used_mb: 0,
                    });
                    interruption = Some(Interruption::ResourceExceeded(LimitKind::Time));
                    break;
                }
                Err(SandboxFailure::OutOfMemory) => {
                    results.push(TestResult {
                        test_case_index: index,
                        passed: false,
                        actual_output: None,
                        error: Some("Memory limit exceeded".to_string()),
                        execution_time_ms: 0,
                        memory_used_mb: challenge.memory_limit_mb,
                    });
                    interruption = Some(Interruption::ResourceExceeded(LimitKind::Memory));
                    break;
                }
                Err(failure) => {
                    // Fatal sandbox fault: stop, remaining cases are not-run
                    interruption = Some(Interruption::Fatal(failure.to_string()));
                    break;
                }
            }
        }

        JudgeOutcome {
            results,
            interruption,
        }
    }

    /// Run one test case, retrying transient sandbox-start failures up to
    /// the configured attempt budget with doubling backoff. Logical
    /// failures are never retried.
    async fn run_with_retry(
        &self,
        profile: &LanguageProfile,
        code: &str,
        input: &str,
        limits: ResourceLimits,
    ) -> Result<super::sandbox::SandboxRun, SandboxFailure> {
        let attempts = self.config.sandbox_start_attempts.max(1);
        let mut backoff = Duration::from_millis(self.config.sandbox_retry_backoff_ms);

        for attempt in 1..=attempts {
            match self.sandbox.run(profile, code, input, limits).await {
                Err(failure) if failure.is_retryable() && attempt < attempts => {
                    tracing::warn!(
                        attempt,
                        "Sandbox unavailable, retrying in {:?}: {}",
                        backoff,
                        failure
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                other => return other,
            }
        }
        unreachable!("retry loop always returns on the last attempt")
    }
}

/// Resolves once a cancellation request is observed. An abandoned cancel
/// handle is not a cancellation, so a closed channel never resolves.
async fn cancel_requested(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
