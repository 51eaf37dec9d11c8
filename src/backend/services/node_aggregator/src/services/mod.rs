pub mod aggregation_service;
pub mod delegation;
pub mod leaderboard_service;
