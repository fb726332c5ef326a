use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::goal::{EnergySummary, GoalResponse, SetGoalWeightRequest, SetWeeklyRateRequest};
use crate::nutrition::goals::MacroRatios;
use crate::services::goals;
use crate::AppState;

pub async fn get_goal(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<GoalResponse>> {
    let goal = goals::get_goal(state.store.as_ref(), auth_user.id).await?;
    Ok(Json(goal))
}

pub async fn set_goal_weight(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SetGoalWeightRequest>,
) -> AppResult<Json<GoalResponse>> {
    let goal = goals::set_goal_weight(state.store.as_ref(), auth_user.id, body).await?;
    Ok(Json(goal))
}

pub async fn set_weekly_rate(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<SetWeeklyRateRequest>,
) -> AppResult<Json<GoalResponse>> {
    let goal = goals::set_weekly_rate(state.store.as_ref(), auth_user.id, body).await?;
    Ok(Json(goal))
}

pub async fn get_energy_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<EnergySummary>> {
    let summary =
        goals::get_energy_summary(state.store.as_ref(), auth_user.id, Utc::now().date_naive())
            .await?;
    Ok(Json(summary))
}

pub async fn get_macros(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MacroRatios>> {
    let ratios = goals::get_macro_preference(state.store.as_ref(), auth_user.id).await?;
    Ok(Json(ratios))
}

pub async fn update_macros(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<MacroRatios>,
) -> AppResult<Json<MacroRatios>> {
    let ratios = goals::update_macro_preference(state.store.as_ref(), auth_user.id, body).await?;
    Ok(Json(ratios))
}
