//! Application state management
//!
//! Shared state passed to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{
    config::Config,
    judge::pool::ExecutorPool,
    store::{ChallengeRepository, SubmissionStore},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Challenge read access
    challenges: Arc<dyn ChallengeRepository>,

    /// Durable record of judging outcomes
    submissions: Arc<dyn SubmissionStore>,

    /// Bounded judging pool
    pool: ExecutorPool,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        challenges: Arc<dyn ChallengeRepository>,
        submissions: Arc<dyn SubmissionStore>,
        pool: ExecutorPool,
        config: Config,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                challenges,
                submissions,
                pool,
                config,
            }),
        }
    }

    /// Get the challenge repository
    pub fn challenges(&self) -> &dyn ChallengeRepository {
        self.inner.challenges.as_ref()
    }

    /// Get the submission store
    pub fn submissions(&self) -> &dyn SubmissionStore {
        self.inner.submissions.as_ref()
    }

    /// Get the executor pool
    pub fn pool(&self) -> &ExecutorPool {
        &self.inner.pool
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
