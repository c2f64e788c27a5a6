//! Domain models

pub mod challenge;
pub mod leaderboard;
pub mod submission;

pub use challenge::{Challenge, TestCase};
pub use leaderboard::LeaderboardEntry;
pub use submission::{Submission, SubmissionStatus, TestResult};
