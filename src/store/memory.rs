//! In-process store for tests. One mutex guards every table, so each call is
//! atomic the way a single transaction is.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{NutritionStore, TRASH_RETENTION_DAYS};
use crate::error::AppResult;
use crate::models::body_stats::UserStats;
use crate::models::daily_summary::DailySummary;
use crate::models::food::Food;
use crate::models::food_log::{FoodLogEntry, NewFoodLog};
use crate::models::goal::UserGoal;
use crate::models::user::{Sex, UpdateProfileRequest, User};
use crate::nutrition::goals::MacroRatios;
use crate::nutrition::NutritionDelta;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    foods: HashMap<Uuid, Food>,
    logs: HashMap<Uuid, FoodLogEntry>,
    trash: HashMap<Uuid, (FoodLogEntry, DateTime<Utc>)>,
    summaries: HashMap<(Uuid, NaiveDate), DailySummary>,
    goals: Vec<UserGoal>,
    stats: Vec<UserStats>,
    macros: HashMap<Uuid, MacroRatios>,
}

impl Tables {
    fn apply_delta(&mut self, user_id: Uuid, date: NaiveDate, delta: NutritionDelta) {
        let row = self
            .summaries
            .entry((user_id, date))
            .or_insert_with(|| DailySummary::empty(user_id, date));
        write_totals(row, delta.added_to(row.totals()));
    }

    fn reverse_delta(&mut self, user_id: Uuid, date: NaiveDate, delta: NutritionDelta) {
        if let Some(row) = self.summaries.get_mut(&(user_id, date)) {
            write_totals(row, delta.subtracted_from(row.totals()));
        }
    }
}

fn trash_cutoff() -> DateTime<Utc> {
    Utc::now() - Duration::days(i64::from(TRASH_RETENTION_DAYS))
}

fn write_totals(row: &mut DailySummary, totals: NutritionDelta) {
    row.calories = totals.calories;
    row.protein_g = totals.protein_g;
    row.carbs_g = totals.carbs_g;
    row.fat_g = totals.fat_g;
    row.updated_at = Some(Utc::now());
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_user(&self, user: User) {
        self.tables.lock().await.users.insert(user.id, user);
    }

    pub async fn insert_food(&self, food: Food) {
        self.tables.lock().await.foods.insert(food.id, food);
    }

    pub async fn log_count(&self, user_id: Uuid) -> usize {
        let tables = self.tables.lock().await;
        tables.logs.values().filter(|l| l.user_id == user_id).count()
    }

    /// Backdates a trashed entry's deletion time.
    pub async fn age_trash(&self, log_id: Uuid, days: i64) {
        if let Some((_, deleted_at)) = self.tables.lock().await.trash.get_mut(&log_id) {
            *deleted_at -= Duration::days(days);
        }
    }

    pub async fn trash_count(&self, user_id: Uuid) -> usize {
        let tables = self.tables.lock().await;
        tables.trash.values().filter(|(l, _)| l.user_id == user_id).count()
    }

    pub async fn goal_history(&self, user_id: Uuid) -> Vec<UserGoal> {
        let tables = self.tables.lock().await;
        tables
            .goals
            .iter()
            .filter(|g| g.user_id == user_id)
            .cloned()
            .collect()
    }
}

/// A user with every biometric the energy summary needs:
/// male, 70 kg, 175 cm, sedentary.
pub fn sample_user(id: Uuid, birthday: NaiveDate) -> User {
    let now = Utc::now();
    User {
        id,
        email: Some(format!("{id}@example.com")),
        name: "Sample".into(),
        sex: Some(Sex::Male),
        birthday: Some(birthday),
        height_cm: Some(175.0),
        weight_kg: Some(70.0),
        activity_level_id: Some(1),
        physiological_state: None,
        neck_cm: None,
        waist_cm: None,
        hip_cm: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_food(nutrients: serde_json::Value, serving_size_g: Option<f64>) -> Food {
    Food {
        id: Uuid::new_v4(),
        name: "Sample food".into(),
        serving_size_g,
        nutrients,
        created_at: Utc::now(),
    }
}

#[async_trait]
impl NutritionStore for MemoryStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn find_food(&self, food_id: Uuid) -> AppResult<Option<Food>> {
        Ok(self.tables.lock().await.foods.get(&food_id).cloned())
    }

    async fn find_log(&self, user_id: Uuid, log_id: Uuid) -> AppResult<Option<FoodLogEntry>> {
        let tables = self.tables.lock().await;
        Ok(tables.logs.get(&log_id).filter(|l| l.user_id == user_id).cloned())
    }

    async fn find_trashed_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
    ) -> AppResult<Option<FoodLogEntry>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .trash
            .get(&log_id)
            .filter(|(l, deleted_at)| l.user_id == user_id && *deleted_at > trash_cutoff())
            .map(|(l, _)| l.clone()))
    }

    async fn list_logs(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<FoodLogEntry>> {
        let tables = self.tables.lock().await;
        let mut entries: Vec<FoodLogEntry> = tables
            .logs
            .values()
            .filter(|l| l.user_id == user_id && l.log_date == date)
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(entries)
    }

    async fn insert_log(&self, new: NewFoodLog, delta: NutritionDelta) -> AppResult<FoodLogEntry> {
        let mut tables = self.tables.lock().await;
        let entry = FoodLogEntry {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            food_id: new.food_id,
            quantity: new.quantity,
            unit: new.unit,
            log_date: new.log_date,
            meal_type: new.meal_type,
            created_at: Utc::now(),
        };
        tables.logs.insert(entry.id, entry.clone());
        tables.apply_delta(entry.user_id, entry.log_date, delta);
        Ok(entry)
    }

    async fn delete_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        delta: NutritionDelta,
    ) -> AppResult<bool> {
        let mut tables = self.tables.lock().await;
        let owned = tables.logs.get(&log_id).is_some_and(|l| l.user_id == user_id);
        let Some(entry) = owned.then(|| tables.logs.remove(&log_id)).flatten() else {
            return Ok(false);
        };
        tables.reverse_delta(entry.user_id, entry.log_date, delta);
        let cutoff = trash_cutoff();
        tables
            .trash
            .retain(|_, (l, deleted_at)| l.user_id != user_id || *deleted_at > cutoff);
        tables.trash.insert(entry.id, (entry, Utc::now()));
        Ok(true)
    }

    async fn restore_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        delta: NutritionDelta,
    ) -> AppResult<Option<FoodLogEntry>> {
        let mut tables = self.tables.lock().await;
        let restorable = tables
            .trash
            .get(&log_id)
            .is_some_and(|(l, deleted_at)| l.user_id == user_id && *deleted_at > trash_cutoff());
        let Some((entry, _)) = restorable.then(|| tables.trash.remove(&log_id)).flatten() else {
            return Ok(None);
        };
        tables.apply_delta(entry.user_id, entry.log_date, delta);
        tables.logs.insert(entry.id, entry.clone());
        Ok(Some(entry))
    }

    async fn daily_summary(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailySummary>> {
        Ok(self.tables.lock().await.summaries.get(&(user_id, date)).cloned())
    }

    async fn find_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> AppResult<Option<User>> {
        let mut tables = self.tables.lock().await;
        let Some(user) = tables.users.get_mut(&user_id) else {
            return Ok(None);
        };
        user.sex = changes.sex.or(user.sex);
        user.physiological_state = changes.physiological_state.or(user.physiological_state);
        user.height_cm = changes.height_cm.or(user.height_cm);
        user.weight_kg = changes.weight_kg.or(user.weight_kg);
        user.birthday = changes.birthday.or(user.birthday);
        user.activity_level_id = changes.activity_level_id.or(user.activity_level_id);
        user.neck_cm = changes.neck_cm.or(user.neck_cm);
        user.waist_cm = changes.waist_cm.or(user.waist_cm);
        user.hip_cm = changes.hip_cm.or(user.hip_cm);
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn current_goal(&self, user_id: Uuid) -> AppResult<Option<UserGoal>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .goals
            .iter()
            .filter(|g| g.user_id == user_id && g.is_active)
            .max_by_key(|g| g.created_at)
            .cloned())
    }

    async fn insert_goal(
        &self,
        user_id: Uuid,
        goal_weight: f64,
        weekly_rate_kg: f64,
    ) -> AppResult<UserGoal> {
        let mut tables = self.tables.lock().await;
        for goal in tables.goals.iter_mut().filter(|g| g.user_id == user_id) {
            goal.is_active = false;
        }
        let goal = UserGoal {
            id: Uuid::new_v4(),
            user_id,
            goal_weight,
            weekly_rate_kg,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.goals.push(goal.clone());
        Ok(goal)
    }

    async fn update_goal_rate(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        weekly_rate_kg: f64,
    ) -> AppResult<Option<UserGoal>> {
        let mut tables = self.tables.lock().await;
        let goal = tables
            .goals
            .iter_mut()
            .find(|g| g.id == goal_id && g.user_id == user_id);
        Ok(goal.map(|g| {
            g.weekly_rate_kg = weekly_rate_kg;
            g.clone()
        }))
    }

    async fn macro_preference(&self, user_id: Uuid) -> AppResult<Option<MacroRatios>> {
        Ok(self.tables.lock().await.macros.get(&user_id).copied())
    }

    async fn upsert_macro_preference(
        &self,
        user_id: Uuid,
        ratios: MacroRatios,
    ) -> AppResult<MacroRatios> {
        self.tables.lock().await.macros.insert(user_id, ratios);
        Ok(ratios)
    }

    async fn record_body_stats(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        bmi: Option<f64>,
        body_fat: Option<f64>,
    ) -> AppResult<UserStats> {
        let mut tables = self.tables.lock().await;
        if let Some(user) = tables.users.get_mut(&user_id) {
            user.weight_kg = Some(weight_kg);
            user.updated_at = Utc::now();
        }
        let stats = UserStats {
            id: Uuid::new_v4(),
            user_id,
            weight_kg,
            bmi,
            body_fat,
            created_at: Utc::now(),
        };
        tables.stats.push(stats.clone());
        Ok(stats)
    }

    async fn list_body_stats(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<UserStats>> {
        let tables = self.tables.lock().await;
        // Push order is creation order; newest first.
        Ok(tables
            .stats
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }
}
