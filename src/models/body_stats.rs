use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Append-only measurement history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserStats {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight_kg: f64,
    pub bmi: Option<f64>,
    pub body_fat: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordBodyMetricsRequest {
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be 20-500 kg"))]
    pub weight_kg: f64,
    #[validate(range(min = 2.0, max = 75.0, message = "Body fat must be 2-75%"))]
    pub body_fat_override: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct BodyMetricsResponse {
    pub bmi: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub limit: Option<i64>,
}
