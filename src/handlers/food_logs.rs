use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::food_log::{CreateFoodLogRequest, FoodLogQuery, FoodLogView};
use crate::services::diary;
use crate::AppState;

pub async fn create_food_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateFoodLogRequest>,
) -> AppResult<Json<FoodLogView>> {
    let view = diary::log_food(
        state.store.as_ref(),
        auth_user.id,
        body,
        Utc::now().date_naive(),
    )
    .await?;
    Ok(Json(view))
}

pub async fn list_food_logs(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<FoodLogQuery>,
) -> AppResult<Json<Vec<FoodLogView>>> {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let logs = diary::list_food_logs(state.store.as_ref(), auth_user.id, date).await?;
    Ok(Json(logs))
}

pub async fn delete_food_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(log_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    diary::delete_food_log(state.store.as_ref(), auth_user.id, log_id).await?;
    Ok(Json(json!({ "deleted": true })))
}

pub async fn restore_food_log(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(log_id): Path<Uuid>,
) -> AppResult<Json<FoodLogView>> {
    let view = diary::restore_food_log(state.store.as_ref(), auth_user.id, log_id).await?;
    Ok(Json(view))
}
