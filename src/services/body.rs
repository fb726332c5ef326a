use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::goals::load_user;
use crate::error::{AppError, AppResult};
use crate::models::body_stats::{BodyMetricsResponse, RecordBodyMetricsRequest, UserStats};
use crate::nutrition::body::{bmi, navy_body_fat, round1, Circumferences};
use crate::store::NutritionStore;

pub const DEFAULT_STATS_LIMIT: i64 = 30;
pub const MAX_STATS_LIMIT: i64 = 365;

/// Records a weigh-in. Body fat comes from the override when given, otherwise
/// from the profile's circumferences if they are complete.
#[instrument(skip(store, req), fields(weight_kg = req.weight_kg))]
pub async fn record_body_metrics(
    store: &dyn NutritionStore,
    user_id: Uuid,
    req: RecordBodyMetricsRequest,
) -> AppResult<BodyMetricsResponse> {
    req.validate()?;
    let user = load_user(store, user_id).await?;
    let height = user.height_cm.ok_or(AppError::Validation(
        "Set your height before recording body metrics".into(),
    ))?;
    let bmi = bmi(req.weight_kg, height)
        .ok_or(AppError::Validation("Height must be greater than zero".into()))?;

    let body_fat = req.body_fat_override.or_else(|| {
        let circumferences = Circumferences {
            neck_cm: user.neck_cm,
            waist_cm: user.waist_cm,
            hip_cm: user.hip_cm,
        };
        user.sex.and_then(|sex| navy_body_fat(sex, height, circumferences))
    });

    let stats = store
        .record_body_stats(user_id, req.weight_kg, Some(bmi), body_fat)
        .await?;

    info!(stats_id = %stats.id, bmi, "Body metrics recorded");
    Ok(BodyMetricsResponse {
        bmi: round1(bmi),
        body_fat: body_fat.map(round1),
        recorded_at: stats.created_at,
    })
}

#[instrument(skip(store))]
pub async fn list_body_stats(
    store: &dyn NutritionStore,
    user_id: Uuid,
    limit: Option<i64>,
) -> AppResult<Vec<UserStats>> {
    let limit = limit.unwrap_or(DEFAULT_STATS_LIMIT).clamp(1, MAX_STATS_LIMIT);
    store.list_body_stats(user_id, limit).await
}
