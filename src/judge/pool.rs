//! Executor pool
//!
//! A fixed-size set of workers draining a bounded FIFO queue. Admission is
//! non-blocking: when the queue is at capacity `submit` fails immediately
//! with `Backpressure` and the caller surfaces "system busy". Each worker
//! processes exactly one job to completion before claiming another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use chrono::Utc;
use tokio::sync::{Mutex, mpsc, oneshot, watch};
use uuid::Uuid;

use crate::{
    config::JudgeConfig,
    error::{AppError, AppResult},
    judge::{
        languages::LanguageProfile,
        runner::TestCaseRunner,
        sandbox::SandboxRuntime,
        verdict,
    },
    models::{Challenge, Submission, SubmissionStatus},
    store::{NotificationSink, SubmissionStore},
};

/// One unit of judging work: run a submission against a challenge's tests
#[derive(Debug, Clone)]
pub struct JudgeJob {
    pub submission_id: Uuid,
    pub challenge: Challenge,
    pub user_id: Uuid,
    pub code: String,
    pub language: String,
}

struct QueuedJob {
    job: JudgeJob,
    cancel_rx: watch::Receiver<bool>,
    done: oneshot::Sender<AppResult<Submission>>,
}

/// Handle returned by `submit`; resolves when judging reaches a terminal
/// status.
pub struct Ticket {
    pub submission_id: Uuid,
    completion: oneshot::Receiver<AppResult<Submission>>,
}

impl Ticket {
    /// Wait for the terminal submission record
    pub async fn wait(self) -> AppResult<Submission> {
        match self.completion.await {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("judging worker dropped the job").into()),
        }
    }
}

/// Bounded pool of judging workers
pub struct ExecutorPool {
    tx: mpsc::Sender<QueuedJob>,
    cancels: Arc<StdMutex<HashMap<Uuid, watch::Sender<bool>>>>,
    submissions: Arc<dyn SubmissionStore>,
}

/// Shared per-worker context
struct WorkerContext {
    runner: TestCaseRunner,
    submissions: Arc<dyn SubmissionStore>,
    notifier: Arc<dyn NotificationSink>,
    cancels: Arc<StdMutex<HashMap<Uuid, watch::Sender<bool>>>>,
}

impl ExecutorPool {
    /// Start `config.worker_count` workers over a queue of
    /// `config.queue_capacity` pending jobs.
    pub fn start(
        sandbox: Arc<dyn SandboxRuntime>,
        submissions: Arc<dyn SubmissionStore>,
        notifier: Arc<dyn NotificationSink>,
        config: JudgeConfig,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<QueuedJob>(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));
        let cancels = Arc::new(StdMutex::new(HashMap::new()));

        let context = Arc::new(WorkerContext {
            runner: TestCaseRunner::new(sandbox, config.clone()),
            submissions: submissions.clone(),
            notifier,
            cancels: cancels.clone(),
        });

        for worker_id in 0..config.worker_count.max(1) {
            let rx = rx.clone();
            let context = context.clone();
            tokio::spawn(async move {
                tracing::debug!(worker_id, "Judge worker started");
                loop {
                    // Lock only to claim; FIFO order is the channel's order
                    let claimed = { rx.lock().await.recv().await };
                    match claimed {
                        Some(queued) => process(&context, queued).await,
                        None => break,
                    }
                }
                tracing::debug!(worker_id, "Judge worker stopped");
            });
        }

        Self {
            tx,
            cancels,
            submissions,
        }
    }

    /// Admit a job. Reserves a queue slot first: if the queue is full the
    /// call fails with `Backpressure` and no submission record is created.
    pub async fn submit(&self, job: JudgeJob) -> AppResult<Ticket> {
        let permit = match self.tx.try_reserve() {
            Ok(permit) => permit,
            Err(mpsc::error::TrySendError::Full(())) => return Err(AppError::Backpressure),
            Err(mpsc::error::TrySendError::Closed(())) => {
                return Err(anyhow::anyhow!("executor pool is shut down").into());
            }
        };

        let submission_id = job.submission_id;
        self.submissions
            .create(Submission {
                id: submission_id,
                challenge_id: job.challenge.id,
                user_id: job.user_id,
                code: job.code.clone(),
                language: job.language.clone(),
                status: SubmissionStatus::Queued,
                execution_time_ms: None,
                memory_used_mb: None,
                test_results: vec![],
                submitted_at: Utc::now(),
                judged_at: None,
            })
            .await?;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.cancels
            .lock()
            .expect("cancel registry poisoned")
            .insert(submission_id, cancel_tx);

        let (done_tx, done_rx) = oneshot::channel();
        permit.send(QueuedJob {
            job,
            cancel_rx,
            done: done_tx,
        });

        Ok(Ticket {
            submission_id,
            completion: done_rx,
        })
    }

    /// Request cancellation of a queued or running job. Returns false when
    /// the job is unknown or already terminal.
    pub fn cancel(&self, submission_id: &Uuid) -> bool {
        let cancels = self.cancels.lock().expect("cancel registry poisoned");
        match cancels.get(submission_id) {
            Some(cancel_tx) => cancel_tx.send(true).is_ok(),
            None => false,
        }
    }
}

async fn process(context: &WorkerContext, queued: QueuedJob) {
    let QueuedJob {
        job,
        cancel_rx,
        done,
    } = queued;
    let submission_id = job.submission_id;

    let result = judge_one(context, &job, &cancel_rx).await;

    context
        .cancels
        .lock()
        .expect("cancel registry poisoned")
        .remove(&submission_id);

    if let Ok(submission) = &result {
        // Fire-and-forget feedback; explicitly cancelled jobs produce none
        if submission.status != SubmissionStatus::Cancelled {
            let notifier = context.notifier.clone();
            let user_id = submission.user_id;
            let challenge_id = submission.challenge_id;
            let passed = submission.status.is_passed();
            tokio::spawn(async move {
                if let Err(e) = notifier.notify(user_id, challenge_id, passed).await {
                    tracing::warn!(%user_id, %challenge_id, "Notification failed: {}", e);
                }
            });
        }
    } else if let Err(e) = &result {
        tracing::error!(%submission_id, "Judging failed: {}", e);
    }

    // The submitter may have stopped waiting; that is fine
    let _ = done.send(result);
}

async fn judge_one(
    context: &WorkerContext,
    job: &JudgeJob,
    cancel_rx: &watch::Receiver<bool>,
) -> AppResult<Submission> {
    // A cancellation that lands while the job is still queued takes effect
    // at claim time, before any sandbox resources are spent.
    if *cancel_rx.borrow() {
        return context
            .submissions
            .finalize(
                &job.submission_id,
                SubmissionStatus::Cancelled,
                vec![],
                0,
                0,
            )
            .await;
    }

    context.submissions.mark_running(&job.submission_id).await?;
    tracing::info!(submission_id = %job.submission_id, "Judging submission");

    let profile = LanguageProfile::for_language(&job.language)?;
    let outcome = context
        .runner
        .run_all(profile, &job.code, &job.challenge, cancel_rx)
        .await;
    let verdict = verdict::aggregate(&outcome);

    tracing::info!(
        submission_id = %job.submission_id,
        status = %verdict.status,
        execution_time_ms = verdict.execution_time_ms,
        "Judging complete"
    );

    context
        .submissions
        .finalize(
            &job.submission_id,
            verdict.status,
            outcome.results,
            verdict.execution_time_ms,
            verdict.memory_used_mb,
        )
        .await
}
