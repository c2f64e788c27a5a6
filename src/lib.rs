//! Challenge Judge - Submission Judging Engine
//!
//! This library provides the core functionality for a coding-challenge
//! judge: untrusted submissions are validated, executed against ordered
//! test cases inside resource-bounded Docker sandboxes, and aggregated
//! into deterministic verdicts with execution telemetry.
//!
//! # Features
//!
//! - Multi-language support (Python, JavaScript)
//! - Isolated Docker container execution with time/memory/process limits
//! - Bounded executor pool with backpressure and cancellation
//! - Deterministic verdicts and per-test telemetry
//! - Per-challenge leaderboards over passed submissions
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic
//! - **Judge**: Validation, sandbox, runner, verdict, executor pool
//! - **Store**: Challenge/submission storage and notification traits
//! - **Models**: Domain models and DTOs

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod judge;
pub mod models;
pub mod services;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
