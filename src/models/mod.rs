pub mod body_stats;
pub mod daily_summary;
pub mod food;
pub mod food_log;
pub mod goal;
pub mod user;
