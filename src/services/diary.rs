//! Food diary: logging, deletion and restore, and the daily aggregates.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::daily_summary::{DailySummary, NutrientBreakdown};
use crate::models::food::Food;
use crate::models::food_log::{CreateFoodLogRequest, FoodLogEntry, FoodLogView, NewFoodLog};
use crate::nutrition::nutrients::{accumulate, scale_all};
use crate::nutrition::units::{resolve_grams, serving_multiplier};
use crate::nutrition::{entry_contribution, NutritionDelta};
use crate::store::NutritionStore;

/// Contribution of an already-stored entry. Stored entries can't be rejected
/// any more, so a unit that no longer resolves counts as zero.
fn stored_contribution(entry: &FoodLogEntry, food: Option<&Food>) -> NutritionDelta {
    let Some(food) = food else {
        warn!(log_id = %entry.id, food_id = %entry.food_id, "Food missing for logged entry");
        return NutritionDelta::default();
    };
    match entry_contribution(
        entry.quantity,
        &entry.unit,
        food.serving_size_g,
        &food.nutrient_table(),
    ) {
        Ok(delta) => delta,
        Err(e) => {
            warn!(log_id = %entry.id, error = %e, "Unresolvable unit on logged entry");
            NutritionDelta::default()
        }
    }
}

fn view(entry: FoodLogEntry, food: Option<&Food>, delta: NutritionDelta) -> FoodLogView {
    FoodLogView {
        food_name: food.map(|f| f.name.clone()).unwrap_or_default(),
        calories: delta.calories,
        protein_g: delta.protein_g,
        carbs_g: delta.carbs_g,
        fat_g: delta.fat_g,
        entry,
    }
}

#[instrument(skip(store, req), fields(food_id = %req.food_id))]
pub async fn log_food(
    store: &dyn NutritionStore,
    user_id: Uuid,
    req: CreateFoodLogRequest,
    today: NaiveDate,
) -> AppResult<FoodLogView> {
    req.validate()?;
    if !req.quantity.is_finite() || req.quantity <= 0.0 {
        return Err(AppError::Validation("Quantity must be a positive number".into()));
    }

    let food = store
        .find_food(req.food_id)
        .await?
        .ok_or(AppError::NotFound("Food not found".into()))?;

    let nutrients = food.nutrient_table();
    if nutrients.is_unparseable() {
        warn!(food_id = %food.id, "Unparseable nutrient table, logging with zero nutrients");
    }
    // Everything that can reject the request runs before the write.
    let delta = entry_contribution(req.quantity, &req.unit, food.serving_size_g, &nutrients)?;

    let entry = store
        .insert_log(
            NewFoodLog {
                user_id,
                food_id: food.id,
                quantity: req.quantity,
                unit: req.unit,
                log_date: req.date.unwrap_or(today),
                meal_type: req.meal_type,
            },
            delta,
        )
        .await?;

    info!(log_id = %entry.id, date = %entry.log_date, calories = delta.calories, "Food logged");
    Ok(view(entry, Some(&food), delta))
}

/// Loads each distinct food of `entries` once.
async fn foods_for(
    store: &dyn NutritionStore,
    entries: &[FoodLogEntry],
) -> AppResult<HashMap<Uuid, Food>> {
    let mut foods = HashMap::new();
    for entry in entries {
        if foods.contains_key(&entry.food_id) {
            continue;
        }
        if let Some(food) = store.find_food(entry.food_id).await? {
            foods.insert(food.id, food);
        }
    }
    Ok(foods)
}

#[instrument(skip(store))]
pub async fn list_food_logs(
    store: &dyn NutritionStore,
    user_id: Uuid,
    date: NaiveDate,
) -> AppResult<Vec<FoodLogView>> {
    let entries = store.list_logs(user_id, date).await?;
    let foods = foods_for(store, &entries).await?;

    Ok(entries
        .into_iter()
        .map(|entry| {
            let food = foods.get(&entry.food_id);
            let delta = stored_contribution(&entry, food);
            view(entry, food, delta)
        })
        .collect())
}

#[instrument(skip(store))]
pub async fn delete_food_log(
    store: &dyn NutritionStore,
    user_id: Uuid,
    log_id: Uuid,
) -> AppResult<()> {
    let entry = store
        .find_log(user_id, log_id)
        .await?
        .ok_or(AppError::NotFound("Food log not found".into()))?;
    let food = store.find_food(entry.food_id).await?;
    let delta = stored_contribution(&entry, food.as_ref());

    // A concurrent delete may have won since the read above.
    if !store.delete_log(user_id, log_id, delta).await? {
        return Err(AppError::NotFound("Food log not found".into()));
    }

    info!(%log_id, date = %entry.log_date, calories = delta.calories, "Food log deleted");
    Ok(())
}

#[instrument(skip(store))]
pub async fn restore_food_log(
    store: &dyn NutritionStore,
    user_id: Uuid,
    log_id: Uuid,
) -> AppResult<FoodLogView> {
    let trashed = store
        .find_trashed_log(user_id, log_id)
        .await?
        .ok_or(AppError::NotFound("Deleted food log not found".into()))?;
    let food = store.find_food(trashed.food_id).await?;
    let delta = stored_contribution(&trashed, food.as_ref());

    let entry = store
        .restore_log(user_id, log_id, delta)
        .await?
        .ok_or(AppError::NotFound("Deleted food log not found".into()))?;

    info!(%log_id, date = %entry.log_date, "Food log restored");
    Ok(view(entry, food.as_ref(), delta))
}

/// Never 404: a day without entries is a zero summary.
#[instrument(skip(store))]
pub async fn get_daily_summary(
    store: &dyn NutritionStore,
    user_id: Uuid,
    date: NaiveDate,
) -> AppResult<DailySummary> {
    Ok(store
        .daily_summary(user_id, date)
        .await?
        .unwrap_or_else(|| DailySummary::empty(user_id, date)))
}

/// Every nutrient summed over the day's entries, recomputed from the log rows.
#[instrument(skip(store))]
pub async fn get_nutrient_breakdown(
    store: &dyn NutritionStore,
    user_id: Uuid,
    date: NaiveDate,
) -> AppResult<NutrientBreakdown> {
    let entries = store.list_logs(user_id, date).await?;
    let foods = foods_for(store, &entries).await?;

    let mut nutrients = BTreeMap::new();
    let mut skipped_entries = 0;
    for entry in &entries {
        let Some(food) = foods.get(&entry.food_id) else {
            skipped_entries += 1;
            continue;
        };
        match resolve_grams(entry.quantity, &entry.unit) {
            Ok(grams) => {
                let multiplier = serving_multiplier(grams, food.serving_size_g);
                accumulate(&mut nutrients, scale_all(&food.nutrient_table(), multiplier));
            }
            Err(e) => {
                warn!(log_id = %entry.id, error = %e, "Skipping entry in nutrient breakdown");
                skipped_entries += 1;
            }
        }
    }

    Ok(NutrientBreakdown {
        date,
        nutrients,
        entries: entries.len(),
        skipped_entries,
    })
}
