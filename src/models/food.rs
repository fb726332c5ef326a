use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::nutrition::NutrientTable;

/// Catalog food. Read-only here; the catalog importer owns these rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub serving_size_g: Option<f64>,
    /// Name → `{value, unit}` per serving. Legacy rows may be a JSON string.
    pub nutrients: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl Food {
    pub fn nutrient_table(&self) -> NutrientTable {
        NutrientTable::from_json(&self.nutrients)
    }
}
