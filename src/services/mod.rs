//! Business logic services

pub mod judge_service;
pub mod leaderboard_service;

pub use judge_service::JudgeService;
pub use leaderboard_service::LeaderboardService;
