use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::daily_summary::{DailySummary, NutrientBreakdown, SummaryQuery};
use crate::services::diary;
use crate::AppState;

pub async fn get_daily_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<DailySummary>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let summary = diary::get_daily_summary(state.store.as_ref(), auth_user.id, date).await?;
    Ok(Json(summary))
}

pub async fn get_nutrient_breakdown(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<NutrientBreakdown>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let breakdown = diary::get_nutrient_breakdown(state.store.as_ref(), auth_user.id, date).await?;
    Ok(Json(breakdown))
}
