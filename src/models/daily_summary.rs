use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::nutrition::nutrients::NutrientAmount;
use crate::nutrition::NutritionDelta;

/// Running nutrition total for one (user, day). Maintained incrementally by
/// food-log inserts and deletes; never edited directly.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct DailySummary {
    pub user_id: Uuid,
    pub summary_date: NaiveDate,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl DailySummary {
    /// An empty day is a valid day.
    pub fn empty(user_id: Uuid, summary_date: NaiveDate) -> Self {
        Self {
            user_id,
            summary_date,
            calories: 0.0,
            protein_g: 0.0,
            carbs_g: 0.0,
            fat_g: 0.0,
            updated_at: None,
        }
    }

    pub fn totals(&self) -> NutritionDelta {
        NutritionDelta {
            calories: self.calories,
            protein_g: self.protein_g,
            carbs_g: self.carbs_g,
            fat_g: self.fat_g,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub date: Option<NaiveDate>,
}

/// Full per-nutrient totals for a day, not just the macros.
#[derive(Debug, Serialize)]
pub struct NutrientBreakdown {
    pub date: NaiveDate,
    pub nutrients: BTreeMap<String, NutrientAmount>,
    pub entries: usize,
    /// Entries whose unit could not be resolved and were left out.
    pub skipped_entries: usize,
}
