//! Goal weight and pacing, the energy summary, and macro preferences.

use chrono::NaiveDate;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::goal::{EnergySummary, GoalResponse, SetGoalWeightRequest, SetWeeklyRateRequest};
use crate::models::user::{ActivityLevel, User};
use crate::nutrition::energy::{age_on, compute_bmr, compute_tdee};
use crate::nutrition::goals::{
    derive_goal_type, effective_rate, energy_target, forecast_date, macro_targets, validate_rate,
    GoalType, MacroRatios, MACRO_PRESETS,
};
use crate::store::NutritionStore;

pub(crate) async fn load_user(store: &dyn NutritionStore, user_id: Uuid) -> AppResult<User> {
    store
        .find_user(user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))
}

fn current_weight(user: &User) -> AppResult<f64> {
    user.weight_kg
        .ok_or(AppError::Validation("Set your current weight before setting a goal".into()))
}

#[instrument(skip(store, req), fields(goal_weight = req.goal_weight))]
pub async fn set_goal_weight(
    store: &dyn NutritionStore,
    user_id: Uuid,
    req: SetGoalWeightRequest,
) -> AppResult<GoalResponse> {
    req.validate()?;
    let user = load_user(store, user_id).await?;
    let current = current_weight(&user)?;

    let goal_type = derive_goal_type(req.goal_weight, current);
    let rate = match store.current_goal(user_id).await? {
        Some(previous) => effective_rate(goal_type, previous.weekly_rate_kg),
        None => goal_type.default_rate(),
    };

    let goal = store.insert_goal(user_id, req.goal_weight, rate).await?;
    info!(goal_id = %goal.id, %goal_type, weekly_rate_kg = rate, "Goal weight set");
    Ok(GoalResponse::new(&goal, current))
}

#[instrument(skip(store, req), fields(weekly_rate_kg = req.weekly_rate_kg))]
pub async fn set_weekly_rate(
    store: &dyn NutritionStore,
    user_id: Uuid,
    req: SetWeeklyRateRequest,
) -> AppResult<GoalResponse> {
    if !req.weekly_rate_kg.is_finite() {
        return Err(AppError::Validation("Weekly rate must be a number".into()));
    }
    let user = load_user(store, user_id).await?;
    let current = current_weight(&user)?;
    let goal = store
        .current_goal(user_id)
        .await?
        .ok_or(AppError::NotFound("No goal set".into()))?;

    if goal.weekly_rate_kg == req.weekly_rate_kg {
        return Ok(GoalResponse::new(&goal, current));
    }
    validate_rate(goal.goal_type(current), req.weekly_rate_kg)?;

    let goal = store
        .update_goal_rate(user_id, goal.id, req.weekly_rate_kg)
        .await?
        .ok_or(AppError::NotFound("No goal set".into()))?;

    info!(goal_id = %goal.id, "Weekly rate updated");
    Ok(GoalResponse::new(&goal, current))
}

#[instrument(skip(store))]
pub async fn get_goal(store: &dyn NutritionStore, user_id: Uuid) -> AppResult<GoalResponse> {
    let user = load_user(store, user_id).await?;
    let current = current_weight(&user)?;
    let goal = store
        .current_goal(user_id)
        .await?
        .ok_or(AppError::NotFound("No goal set".into()))?;

    Ok(GoalResponse::new(&goal, current))
}

#[instrument(skip(store))]
pub async fn get_energy_summary(
    store: &dyn NutritionStore,
    user_id: Uuid,
    today: NaiveDate,
) -> AppResult<EnergySummary> {
    let user = load_user(store, user_id).await?;
    let activity = user.activity_level_id.and_then(ActivityLevel::from_id);

    let (Some(sex), Some(birthday), Some(height), Some(weight), Some(activity)) =
        (user.sex, user.birthday, user.height_cm, user.weight_kg, activity)
    else {
        let missing: Vec<&str> = [
            ("sex", user.sex.is_none()),
            ("birthday", user.birthday.is_none()),
            ("height_cm", user.height_cm.is_none()),
            ("weight_kg", user.weight_kg.is_none()),
            ("activity_level", activity.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();
        return Err(AppError::Validation(format!(
            "Profile is missing: {}",
            missing.join(", ")
        )));
    };

    let bmr = compute_bmr(sex, weight, height, age_on(birthday, today));
    let tdee = compute_tdee(bmr, activity.multiplier());

    // Without a goal the target is maintenance.
    let (goal_type, weekly_rate_kg, forecast) = match store.current_goal(user_id).await? {
        Some(goal) => {
            let goal_type = goal.goal_type(weight);
            let rate = effective_rate(goal_type, goal.weekly_rate_kg);
            let forecast = forecast_date(goal_type, weight, goal.goal_weight, rate, goal.created_at);
            (goal_type, rate, forecast)
        }
        None => (GoalType::Maintenance, 0.0, None),
    };

    let target = energy_target(tdee, weekly_rate_kg);

    let mut macro_options: Vec<_> = MACRO_PRESETS
        .iter()
        .map(|(name, ratios)| macro_targets(name, target.energy_target, ratios))
        .collect();
    if let Some(custom) = store.macro_preference(user_id).await? {
        macro_options.push(macro_targets("custom", target.energy_target, &custom));
    }

    Ok(EnergySummary {
        bmr,
        tdee,
        energy_target: target.energy_target,
        energy_deficit: target.energy_deficit,
        goal_type,
        weekly_rate_kg,
        forecast_date: forecast,
        macro_options,
    })
}

#[instrument(skip(store))]
pub async fn get_macro_preference(
    store: &dyn NutritionStore,
    user_id: Uuid,
) -> AppResult<MacroRatios> {
    store
        .macro_preference(user_id)
        .await?
        .ok_or(AppError::NotFound("No macro preference set".into()))
}

#[instrument(skip(store))]
pub async fn update_macro_preference(
    store: &dyn NutritionStore,
    user_id: Uuid,
    ratios: MacroRatios,
) -> AppResult<MacroRatios> {
    if !ratios.is_valid() {
        return Err(AppError::Validation(
            "Macro ratios must each be between 0 and 1 and sum to 1".into(),
        ));
    }
    load_user(store, user_id).await?;

    let saved = store.upsert_macro_preference(user_id, ratios).await?;
    info!("Macro preference saved");
    Ok(saved)
}
