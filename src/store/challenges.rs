//! Challenge repository contract

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::AppResult, models::Challenge};

/// Read-only access to challenge data. The judge never mutates challenges.
#[async_trait]
pub trait ChallengeRepository: Send + Sync {
    async fn get(&self, id: &Uuid) -> AppResult<Option<Challenge>>;
    async fn list(&self) -> AppResult<Vec<Challenge>>;
}

/// In-memory challenge repository
#[derive(Default)]
pub struct InMemoryChallenges {
    challenges: RwLock<HashMap<Uuid, Challenge>>,
}

impl InMemoryChallenges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a challenge (setup path, not part of the judging contract)
    pub async fn insert(&self, challenge: Challenge) {
        self.challenges
            .write()
            .await
            .insert(challenge.id, challenge);
    }
}

#[async_trait]
impl ChallengeRepository for InMemoryChallenges {
    async fn get(&self, id: &Uuid) -> AppResult<Option<Challenge>> {
        Ok(self.challenges.read().await.get(id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Challenge>> {
        let mut all: Vec<Challenge> = self.challenges.read().await.values().cloned().collect();
        all.sort_by_key(|c| c.created_at);
        Ok(all)
    }
}
