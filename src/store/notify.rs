//! Notification sink contract
//!
//! Fire-and-forget, best-effort: a failure to notify never rolls back or
//! blocks a judging result.

use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, user_id: Uuid, challenge_id: Uuid, passed: bool) -> anyhow::Result<()>;
}

/// Default sink: emits a structured log line per verdict
#[derive(Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for TracingNotifier {
    async fn notify(&self, user_id: Uuid, challenge_id: Uuid, passed: bool) -> anyhow::Result<()> {
        tracing::info!(%user_id, %challenge_id, passed, "Submission feedback");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use std::sync::Mutex;

    use super::*;

    /// Records every notification for assertions; optionally fails to
    /// exercise the best-effort contract.
    #[derive(Default)]
    pub struct RecordingSink {
        pub notifications: Mutex<Vec<(Uuid, Uuid, bool)>>,
        pub fail: bool,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn notify(
            &self,
            user_id: Uuid,
            challenge_id: Uuid,
            passed: bool,
        ) -> anyhow::Result<()> {
            self.notifications
                .lock()
                .unwrap()
                .push((user_id, challenge_id, passed));
            if self.fail {
                anyhow::bail!("sink offline");
            }
            Ok(())
        }
    }
}
