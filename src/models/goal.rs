use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::nutrition::goals::{derive_goal_type, GoalType, MacroOption};

/// One row of goal history. The current goal is the active one.
///
/// Goal type is not stored: it is derived from `goal_weight` and the user's
/// current weight on every read.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserGoal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub goal_weight: f64,
    pub weekly_rate_kg: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserGoal {
    pub fn goal_type(&self, current_weight: f64) -> GoalType {
        derive_goal_type(self.goal_weight, current_weight)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetGoalWeightRequest {
    #[validate(range(min = 20.0, max = 500.0, message = "Goal weight must be 20-500 kg"))]
    pub goal_weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct SetWeeklyRateRequest {
    pub weekly_rate_kg: f64,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub goal_type: GoalType,
    pub goal_weight: f64,
    pub weekly_rate_kg: f64,
    pub current_weight: f64,
    pub created_at: DateTime<Utc>,
}

impl GoalResponse {
    pub fn new(goal: &UserGoal, current_weight: f64) -> Self {
        Self {
            goal_type: goal.goal_type(current_weight),
            goal_weight: goal.goal_weight,
            weekly_rate_kg: goal.weekly_rate_kg,
            current_weight,
            created_at: goal.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EnergySummary {
    pub bmr: f64,
    pub tdee: f64,
    pub energy_target: f64,
    pub energy_deficit: f64,
    pub goal_type: GoalType,
    /// Rate used for pacing; may differ from the stored one if the goal type
    /// changed since it was set.
    pub weekly_rate_kg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_date: Option<NaiveDate>,
    pub macro_options: Vec<MacroOption>,
}
