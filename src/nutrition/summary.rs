//! Per-entry contributions and the arithmetic of the daily aggregate.
//!
//! The aggregate itself lives in the store; these are the rules both store
//! implementations follow: additive upsert, and subtraction floored at zero.

use serde::Serialize;

use super::energy::calories_from_macros;
use super::nutrients::{extract_macros, Macros, NutrientTable};
use super::units::{resolve_grams, serving_multiplier, UnitError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionDelta {
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

impl NutritionDelta {
    pub fn from_macros(m: Macros) -> Self {
        Self {
            calories: calories_from_macros(m.protein_g, m.carbs_g, m.fat_g),
            protein_g: m.protein_g,
            carbs_g: m.carbs_g,
            fat_g: m.fat_g,
        }
    }

    /// `applyDelta` on an existing row.
    pub fn added_to(self, current: NutritionDelta) -> NutritionDelta {
        NutritionDelta {
            calories: current.calories + self.calories,
            protein_g: current.protein_g + self.protein_g,
            carbs_g: current.carbs_g + self.carbs_g,
            fat_g: current.fat_g + self.fat_g,
        }
    }

    /// `reverseDelta`: componentwise `max(current - self, 0)`.
    pub fn subtracted_from(self, current: NutritionDelta) -> NutritionDelta {
        NutritionDelta {
            calories: (current.calories - self.calories).max(0.0),
            protein_g: (current.protein_g - self.protein_g).max(0.0),
            carbs_g: (current.carbs_g - self.carbs_g).max(0.0),
            fat_g: (current.fat_g - self.fat_g).max(0.0),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.calories.is_finite()
            && self.protein_g.is_finite()
            && self.carbs_g.is_finite()
            && self.fat_g.is_finite()
    }
}

/// Contribution of one logged entry: resolve grams, scale by serving, extract, price.
pub fn entry_contribution(
    quantity: f64,
    unit: &str,
    serving_size_g: Option<f64>,
    nutrients: &NutrientTable,
) -> Result<NutritionDelta, UnitError> {
    let total_grams = resolve_grams(quantity, unit)?;
    let multiplier = serving_multiplier(total_grams, serving_size_g);
    let delta = NutritionDelta::from_macros(extract_macros(nutrients, multiplier));
    // Finite grams can still overflow once scaled by the nutrient values.
    if !delta.is_finite() {
        return Err(UnitError::NonFinite);
    }
    Ok(delta)
}
