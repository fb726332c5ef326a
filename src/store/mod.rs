//! Persistence seam for the nutrition core.
//!
//! Every method that mutates a food log also moves the daily summary in the
//! same atomic unit: either both changes land or neither does.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::body_stats::UserStats;
use crate::models::daily_summary::DailySummary;
use crate::models::food::Food;
use crate::models::food_log::{FoodLogEntry, NewFoodLog};
use crate::models::goal::UserGoal;
use crate::models::user::{UpdateProfileRequest, User};
use crate::nutrition::goals::MacroRatios;
use crate::nutrition::NutritionDelta;

mod postgres;
#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

/// Deleted entries stay restorable this long; older trash is purged on the
/// owner's next delete.
pub const TRASH_RETENTION_DAYS: i32 = 30;

#[async_trait]
pub trait NutritionStore: Send + Sync {
    async fn ping(&self) -> AppResult<()>;

    async fn find_food(&self, food_id: Uuid) -> AppResult<Option<Food>>;

    async fn find_log(&self, user_id: Uuid, log_id: Uuid) -> AppResult<Option<FoodLogEntry>>;
    async fn find_trashed_log(&self, user_id: Uuid, log_id: Uuid)
        -> AppResult<Option<FoodLogEntry>>;
    async fn list_logs(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<FoodLogEntry>>;

    /// Insert the entry and add `delta` to its day's summary.
    async fn insert_log(&self, new: NewFoodLog, delta: NutritionDelta) -> AppResult<FoodLogEntry>;

    /// Move the entry to the trash and subtract `delta` (floored at zero),
    /// purging the caller's trash older than [`TRASH_RETENTION_DAYS`].
    /// Returns `false` when the caller owns no such live entry.
    async fn delete_log(&self, user_id: Uuid, log_id: Uuid, delta: NutritionDelta)
        -> AppResult<bool>;

    /// Move a trashed entry back and add `delta` again.
    /// Returns `None` when the caller's trash has no such entry, or it has expired.
    async fn restore_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        delta: NutritionDelta,
    ) -> AppResult<Option<FoodLogEntry>>;

    async fn daily_summary(&self, user_id: Uuid, date: NaiveDate)
        -> AppResult<Option<DailySummary>>;

    async fn find_user(&self, user_id: Uuid) -> AppResult<Option<User>>;
    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> AppResult<Option<User>>;

    async fn current_goal(&self, user_id: Uuid) -> AppResult<Option<UserGoal>>;
    /// Append a new active goal, deactivating any previous one.
    async fn insert_goal(
        &self,
        user_id: Uuid,
        goal_weight: f64,
        weekly_rate_kg: f64,
    ) -> AppResult<UserGoal>;
    async fn update_goal_rate(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        weekly_rate_kg: f64,
    ) -> AppResult<Option<UserGoal>>;

    async fn macro_preference(&self, user_id: Uuid) -> AppResult<Option<MacroRatios>>;
    async fn upsert_macro_preference(
        &self,
        user_id: Uuid,
        ratios: MacroRatios,
    ) -> AppResult<MacroRatios>;

    /// Set the profile weight and append a stats row together.
    async fn record_body_stats(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        bmi: Option<f64>,
        body_fat: Option<f64>,
    ) -> AppResult<UserStats>;
    async fn list_body_stats(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<UserStats>>;
}
