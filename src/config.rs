//! Application configuration management
//!
//! This module handles loading and validating configuration from environment
//! variables. All configuration is loaded at startup and validated before the
//! application runs.

use std::env;
use std::sync::LazyLock;

use crate::constants::{
    DEFAULT_MEMORY_LIMIT_MB, DEFAULT_QUEUE_CAPACITY, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_TIME_LIMIT_SECONDS, DEFAULT_WORKER_COUNT, SANDBOX_RETRY_BACKOFF_MS,
    SANDBOX_START_ATTEMPTS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub docker: DockerConfig,
    pub judge: JudgeConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Docker configuration for sandbox containers
#[derive(Debug, Clone)]
pub struct DockerConfig {
    pub socket_path: String,
}

/// Judging configuration
#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Number of concurrent execution workers
    pub worker_count: usize,
    /// Capacity of the pending-job queue; admission fails beyond this
    pub queue_capacity: usize,
    /// Default time limit per test case, in seconds
    pub default_time_limit_seconds: u64,
    /// Default memory limit per test case, in megabytes
    pub default_memory_limit_mb: u64,
    /// Total sandbox-start attempts per test run
    pub sandbox_start_attempts: u32,
    /// Initial backoff between sandbox-start retries, in milliseconds
    pub sandbox_retry_backoff_ms: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            docker: DockerConfig::from_env()?,
            judge: JudgeConfig::from_env()?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| DEFAULT_SERVER_PORT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DockerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            socket_path: env::var("DOCKER_SOCKET")
                .unwrap_or_else(|_| "/var/run/docker.sock".to_string()),
        })
    }
}

impl JudgeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            worker_count: env::var("JUDGE_WORKER_COUNT")
                .unwrap_or_else(|_| DEFAULT_WORKER_COUNT.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_WORKER_COUNT".to_string()))?,
            queue_capacity: env::var("JUDGE_QUEUE_CAPACITY")
                .unwrap_or_else(|_| DEFAULT_QUEUE_CAPACITY.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JUDGE_QUEUE_CAPACITY".to_string()))?,
            default_time_limit_seconds: env::var("DEFAULT_TIME_LIMIT_SECONDS")
                .unwrap_or_else(|_| DEFAULT_TIME_LIMIT_SECONDS.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEFAULT_TIME_LIMIT_SECONDS".to_string()))?,
            default_memory_limit_mb: env::var("DEFAULT_MEMORY_LIMIT_MB")
                .unwrap_or_else(|_| DEFAULT_MEMORY_LIMIT_MB.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DEFAULT_MEMORY_LIMIT_MB".to_string()))?,
            sandbox_start_attempts: SANDBOX_START_ATTEMPTS,
            sandbox_retry_backoff_ms: SANDBOX_RETRY_BACKOFF_MS,
        })
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            default_time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            default_memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
            sandbox_start_attempts: SANDBOX_START_ATTEMPTS,
            sandbox_retry_backoff_ms: SANDBOX_RETRY_BACKOFF_MS,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
