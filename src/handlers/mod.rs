pub mod body_stats;
pub mod food_logs;
pub mod goals;
pub mod health;
pub mod profile;
pub mod summaries;
