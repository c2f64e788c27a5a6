//! Application-wide constants
//!
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// JUDGE DEFAULTS
// =============================================================================

/// Default number of concurrent execution workers
pub const DEFAULT_WORKER_COUNT: usize = 4;

/// Default capacity of the pending-job queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Default time limit per test case, in seconds
pub const DEFAULT_TIME_LIMIT_SECONDS: u64 = 10;

/// Default memory limit per test case, in megabytes
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 256;

/// Total sandbox-start attempts for one test run (first try + retries)
pub const SANDBOX_START_ATTEMPTS: u32 = 3;

/// Initial backoff between sandbox-start retries, in milliseconds; doubles
/// per attempt
pub const SANDBOX_RETRY_BACKOFF_MS: u64 = 100;

/// Maximum number of processes a sandboxed run may spawn
pub const SANDBOX_PIDS_LIMIT: i64 = 64;

/// Maximum source code size in bytes (64 KB)
pub const MAX_SOURCE_CODE_SIZE: usize = 65536;

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const PYTHON: &str = "python";
    pub const JAVASCRIPT: &str = "javascript";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[PYTHON, JAVASCRIPT];
}

/// Container images for each language
pub mod container_images {
    pub const PYTHON: &str = "challenge-judge/python:latest";
    pub const JAVASCRIPT: &str = "challenge-judge/javascript:latest";
}

// =============================================================================
// LEADERBOARD
// =============================================================================

/// Maximum number of leaderboard entries returned for a challenge
pub const LEADERBOARD_MAX_ENTRIES: usize = 100;

// =============================================================================
// API VERSIONING
// =============================================================================

/// API base path
pub const API_BASE_PATH: &str = "/api/v1";
