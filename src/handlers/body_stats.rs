use axum::{
    extract::{Query, State},
    Extension, Json,
};

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::models::body_stats::{BodyMetricsResponse, RecordBodyMetricsRequest, StatsQuery, UserStats};
use crate::services::body;
use crate::AppState;

pub async fn record_body_metrics(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(req): Json<RecordBodyMetricsRequest>,
) -> AppResult<Json<BodyMetricsResponse>> {
    let resp = body::record_body_metrics(state.store.as_ref(), auth_user.id, req).await?;
    Ok(Json(resp))
}

pub async fn list_body_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<Vec<UserStats>>> {
    let stats = body::list_body_stats(state.store.as_ref(), auth_user.id, query.limit).await?;
    Ok(Json(stats))
}
