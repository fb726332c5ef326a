use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FoodLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub log_date: NaiveDate,
    pub meal_type: MealType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "meal_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Validated input for a new entry; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewFoodLog {
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub quantity: f64,
    pub unit: String,
    pub log_date: NaiveDate,
    pub meal_type: MealType,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFoodLogRequest {
    pub food_id: Uuid,
    #[validate(range(max = 10000.0, message = "Quantity must be at most 10000"))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 32, message = "Unit must be 1-32 characters"))]
    pub unit: String,
    pub date: Option<NaiveDate>,
    pub meal_type: MealType,
}

#[derive(Debug, Deserialize)]
pub struct FoodLogQuery {
    pub date: Option<NaiveDate>,
}

/// One entry of a day's listing with its own contribution.
#[derive(Debug, Serialize)]
pub struct FoodLogView {
    #[serde(flatten)]
    pub entry: FoodLogEntry,
    pub food_name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserializes() {
        let json = r#"{
            "food_id": "7f1a3c9e-4b2d-4e8f-9a6b-1c2d3e4f5a6b",
            "quantity": 1.5,
            "unit": "100 g",
            "meal_type": "lunch"
        }"#;
        let req: CreateFoodLogRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.meal_type, MealType::Lunch);
        assert!(req.date.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_unknown_meal_type_fails() {
        let json = r#"{
            "food_id": "7f1a3c9e-4b2d-4e8f-9a6b-1c2d3e4f5a6b",
            "quantity": 1, "unit": "1 g", "meal_type": "brunch"
        }"#;
        assert!(serde_json::from_str::<CreateFoodLogRequest>(json).is_err());
    }

    #[test]
    fn test_view_flattens_entry() {
        let view = FoodLogView {
            entry: FoodLogEntry {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                food_id: Uuid::new_v4(),
                quantity: 2.0,
                unit: "100 g".into(),
                log_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
                meal_type: MealType::Dinner,
                created_at: Utc::now(),
            },
            food_name: "Oats".into(),
            calories: 330.0,
            protein_g: 40.0,
            carbs_g: 20.0,
            fat_g: 10.0,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["unit"], "100 g");
        assert_eq!(json["meal_type"], "dinner");
        assert_eq!(json["food_name"], "Oats");
        assert_eq!(json["calories"], 330.0);
    }
}
