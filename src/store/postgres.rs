use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{NutritionStore, TRASH_RETENTION_DAYS};
use crate::error::AppResult;
use crate::models::body_stats::UserStats;
use crate::models::daily_summary::DailySummary;
use crate::models::food::Food;
use crate::models::food_log::{FoodLogEntry, NewFoodLog};
use crate::models::goal::UserGoal;
use crate::models::user::{UpdateProfileRequest, User};
use crate::nutrition::goals::MacroRatios;
use crate::nutrition::NutritionDelta;

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Insert-or-add on the (user, day) key. One statement, so concurrent callers
/// for the same key serialise on the row instead of losing updates.
async fn apply_delta(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    date: NaiveDate,
    delta: NutritionDelta,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO daily_summaries (user_id, summary_date, calories, protein_g, carbs_g, fat_g)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, summary_date) DO UPDATE SET
            calories = daily_summaries.calories + EXCLUDED.calories,
            protein_g = daily_summaries.protein_g + EXCLUDED.protein_g,
            carbs_g = daily_summaries.carbs_g + EXCLUDED.carbs_g,
            fat_g = daily_summaries.fat_g + EXCLUDED.fat_g,
            updated_at = NOW()
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(delta.calories)
    .bind(delta.protein_g)
    .bind(delta.carbs_g)
    .bind(delta.fat_g)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

async fn reverse_delta(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    date: NaiveDate,
    delta: NutritionDelta,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE daily_summaries SET
            calories = GREATEST(calories - $3, 0),
            protein_g = GREATEST(protein_g - $4, 0),
            carbs_g = GREATEST(carbs_g - $5, 0),
            fat_g = GREATEST(fat_g - $6, 0),
            updated_at = NOW()
        WHERE user_id = $1 AND summary_date = $2
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(delta.calories)
    .bind(delta.protein_g)
    .bind(delta.carbs_g)
    .bind(delta.fat_g)
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl NutritionStore for PgStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await?;
        Ok(())
    }

    async fn find_food(&self, food_id: Uuid) -> AppResult<Option<Food>> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            SELECT id, name, serving_size_g, COALESCE(nutrients, 'null'::jsonb) AS nutrients, created_at
            FROM foods
            WHERE id = $1
            "#,
        )
        .bind(food_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(food)
    }

    async fn find_log(&self, user_id: Uuid, log_id: Uuid) -> AppResult<Option<FoodLogEntry>> {
        let entry = sqlx::query_as::<_, FoodLogEntry>(
            "SELECT * FROM food_logs WHERE id = $1 AND user_id = $2",
        )
        .bind(log_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn find_trashed_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
    ) -> AppResult<Option<FoodLogEntry>> {
        let entry = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            SELECT id, user_id, food_id, quantity, unit, log_date, meal_type, created_at
            FROM food_log_trash
            WHERE id = $1 AND user_id = $2
              AND deleted_at > NOW() - make_interval(days => $3)
            "#,
        )
        .bind(log_id)
        .bind(user_id)
        .bind(TRASH_RETENTION_DAYS)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn list_logs(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Vec<FoodLogEntry>> {
        let entries = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            SELECT * FROM food_logs
            WHERE user_id = $1 AND log_date = $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn insert_log(&self, new: NewFoodLog, delta: NutritionDelta) -> AppResult<FoodLogEntry> {
        let mut tx = self.db.begin().await?;

        let entry = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            INSERT INTO food_logs (id, user_id, food_id, quantity, unit, log_date, meal_type)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.food_id)
        .bind(new.quantity)
        .bind(&new.unit)
        .bind(new.log_date)
        .bind(new.meal_type)
        .fetch_one(&mut *tx)
        .await?;

        apply_delta(&mut tx, entry.user_id, entry.log_date, delta).await?;

        tx.commit().await?;
        Ok(entry)
    }

    async fn delete_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        delta: NutritionDelta,
    ) -> AppResult<bool> {
        let mut tx = self.db.begin().await?;

        // Row lock from the DELETE makes a racing second delete see nothing.
        let removed = sqlx::query_as::<_, FoodLogEntry>(
            "DELETE FROM food_logs WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(log_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(entry) = removed else {
            return Ok(false);
        };

        sqlx::query(
            r#"
            DELETE FROM food_log_trash
            WHERE user_id = $1 AND deleted_at <= NOW() - make_interval(days => $2)
            "#,
        )
        .bind(user_id)
        .bind(TRASH_RETENTION_DAYS)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO food_log_trash
                (id, user_id, food_id, quantity, unit, log_date, meal_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.food_id)
        .bind(entry.quantity)
        .bind(&entry.unit)
        .bind(entry.log_date)
        .bind(entry.meal_type)
        .bind(entry.created_at)
        .execute(&mut *tx)
        .await?;

        reverse_delta(&mut tx, entry.user_id, entry.log_date, delta).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn restore_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        delta: NutritionDelta,
    ) -> AppResult<Option<FoodLogEntry>> {
        let mut tx = self.db.begin().await?;

        let trashed = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            DELETE FROM food_log_trash
            WHERE id = $1 AND user_id = $2
              AND deleted_at > NOW() - make_interval(days => $3)
            RETURNING id, user_id, food_id, quantity, unit, log_date, meal_type, created_at
            "#,
        )
        .bind(log_id)
        .bind(user_id)
        .bind(TRASH_RETENTION_DAYS)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(trashed) = trashed else {
            return Ok(None);
        };

        let entry = sqlx::query_as::<_, FoodLogEntry>(
            r#"
            INSERT INTO food_logs (id, user_id, food_id, quantity, unit, log_date, meal_type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(trashed.id)
        .bind(trashed.user_id)
        .bind(trashed.food_id)
        .bind(trashed.quantity)
        .bind(&trashed.unit)
        .bind(trashed.log_date)
        .bind(trashed.meal_type)
        .bind(trashed.created_at)
        .fetch_one(&mut *tx)
        .await?;

        apply_delta(&mut tx, entry.user_id, entry.log_date, delta).await?;

        tx.commit().await?;
        Ok(Some(entry))
    }

    async fn daily_summary(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<Option<DailySummary>> {
        let summary = sqlx::query_as::<_, DailySummary>(
            r#"
            SELECT user_id, summary_date, calories, protein_g, carbs_g, fat_g, updated_at
            FROM daily_summaries
            WHERE user_id = $1 AND summary_date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(summary)
    }

    async fn find_user(&self, user_id: Uuid) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        changes: &UpdateProfileRequest,
    ) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                sex = COALESCE($2, sex),
                physiological_state = COALESCE($3, physiological_state),
                height_cm = COALESCE($4, height_cm),
                weight_kg = COALESCE($5, weight_kg),
                birthday = COALESCE($6, birthday),
                activity_level_id = COALESCE($7, activity_level_id),
                neck_cm = COALESCE($8, neck_cm),
                waist_cm = COALESCE($9, waist_cm),
                hip_cm = COALESCE($10, hip_cm),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(changes.sex)
        .bind(changes.physiological_state)
        .bind(changes.height_cm)
        .bind(changes.weight_kg)
        .bind(changes.birthday)
        .bind(changes.activity_level_id)
        .bind(changes.neck_cm)
        .bind(changes.waist_cm)
        .bind(changes.hip_cm)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    async fn current_goal(&self, user_id: Uuid) -> AppResult<Option<UserGoal>> {
        let goal = sqlx::query_as::<_, UserGoal>(
            r#"
            SELECT * FROM user_goals
            WHERE user_id = $1 AND is_active
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(goal)
    }

    async fn insert_goal(
        &self,
        user_id: Uuid,
        goal_weight: f64,
        weekly_rate_kg: f64,
    ) -> AppResult<UserGoal> {
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE user_goals SET is_active = false WHERE user_id = $1 AND is_active")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let goal = sqlx::query_as::<_, UserGoal>(
            r#"
            INSERT INTO user_goals (id, user_id, goal_weight, weekly_rate_kg, is_active)
            VALUES ($1, $2, $3, $4, true)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(goal_weight)
        .bind(weekly_rate_kg)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(goal)
    }

    async fn update_goal_rate(
        &self,
        user_id: Uuid,
        goal_id: Uuid,
        weekly_rate_kg: f64,
    ) -> AppResult<Option<UserGoal>> {
        let goal = sqlx::query_as::<_, UserGoal>(
            r#"
            UPDATE user_goals SET weekly_rate_kg = $3
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(goal_id)
        .bind(user_id)
        .bind(weekly_rate_kg)
        .fetch_optional(&self.db)
        .await?;

        Ok(goal)
    }

    async fn macro_preference(&self, user_id: Uuid) -> AppResult<Option<MacroRatios>> {
        let row = sqlx::query_as::<_, (f64, f64, f64)>(
            "SELECT protein_ratio, fat_ratio, carb_ratio FROM user_macros WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(|(protein_ratio, fat_ratio, carb_ratio)| MacroRatios {
            protein_ratio,
            fat_ratio,
            carb_ratio,
        }))
    }

    async fn upsert_macro_preference(
        &self,
        user_id: Uuid,
        ratios: MacroRatios,
    ) -> AppResult<MacroRatios> {
        sqlx::query(
            r#"
            INSERT INTO user_macros (user_id, protein_ratio, fat_ratio, carb_ratio)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                protein_ratio = EXCLUDED.protein_ratio,
                fat_ratio = EXCLUDED.fat_ratio,
                carb_ratio = EXCLUDED.carb_ratio,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(ratios.protein_ratio)
        .bind(ratios.fat_ratio)
        .bind(ratios.carb_ratio)
        .execute(&self.db)
        .await?;

        Ok(ratios)
    }

    async fn record_body_stats(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        bmi: Option<f64>,
        body_fat: Option<f64>,
    ) -> AppResult<UserStats> {
        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE users SET weight_kg = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(weight_kg)
            .execute(&mut *tx)
            .await?;

        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            INSERT INTO user_stats (id, user_id, weight_kg, bmi, body_fat)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(weight_kg)
        .bind(bmi)
        .bind(body_fat)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stats)
    }

    async fn list_body_stats(&self, user_id: Uuid, limit: i64) -> AppResult<Vec<UserStats>> {
        let stats = sqlx::query_as::<_, UserStats>(
            r#"
            SELECT * FROM user_stats
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(stats)
    }
}
