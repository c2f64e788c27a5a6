//! Judging core
//!
//! Validation, sandboxed execution, per-test running, verdict aggregation
//! and the bounded executor pool that schedules it all.

pub mod languages;
pub mod pool;
pub mod runner;
pub mod sandbox;
pub mod validator;
pub mod verdict;
