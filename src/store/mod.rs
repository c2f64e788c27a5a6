//! Collaborator contracts
//!
//! The judge reads challenges, writes submission outcomes and emits
//! notifications through these traits. Persistence mechanics are outside
//! the judging core; the in-memory implementations here are the default
//! backing for a single-process deployment and for tests.

pub mod challenges;
pub mod notify;
pub mod submissions;

pub use challenges::{ChallengeRepository, InMemoryChallenges};
pub use notify::{NotificationSink, TracingNotifier};
pub use submissions::{InMemorySubmissions, SubmissionStore};
