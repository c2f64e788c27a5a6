//! Challenge model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A coding challenge.
///
/// The fields the judge depends on are immutable for the lifetime of a
/// judging run: the ordered test cases, the resource limits and the
/// reference language. Test case identity is positional; the declared
/// order is significant and preserved everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Reference language for validation and execution
    pub language: String,
    /// Ordered sequence of test cases; insertion order is significant
    pub test_cases: Vec<TestCase>,
    pub time_limit_seconds: u64,
    pub memory_limit_mb: u64,
    /// Reference solution. Never exposed to the runner or to callers.
    #[serde(skip_serializing)]
    pub solution: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A single test case within a challenge.
///
/// Identity is the position in the challenge's ordered sequence. Public
/// test cases may be shown to users; private ones never are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    pub is_public: bool,
}

impl Challenge {
    /// Test cases visible to end users
    pub fn public_test_cases(&self) -> impl Iterator<Item = (usize, &TestCase)> {
        self.test_cases
            .iter()
            .enumerate()
            .filter(|(_, tc)| tc.is_public)
    }
}
