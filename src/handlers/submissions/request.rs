//! Submission request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Submit code for a challenge
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    /// Submitting user
    pub user_id: Uuid,

    /// Programming language
    #[validate(length(min = 1, max = 20))]
    pub language: String,

    /// Source code
    #[validate(length(min = 1, max = 65536))] // 64KB max
    pub code: String,
}
