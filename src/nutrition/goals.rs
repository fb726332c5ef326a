//! Goal type derivation, weekly-rate bounds, energy targets and pacing.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// kcal in roughly one kilogram of body mass.
pub const KCAL_PER_KG: f64 = 7700.0;

/// Tolerance for macro ratios summing to 1.
pub const RATIO_SUM_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Cut,
    Bulk,
    Maintenance,
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            GoalType::Cut => "cut",
            GoalType::Bulk => "bulk",
            GoalType::Maintenance => "maintenance",
        })
    }
}

pub fn derive_goal_type(goal_weight: f64, current_weight: f64) -> GoalType {
    if goal_weight < current_weight {
        GoalType::Cut
    } else if goal_weight > current_weight {
        GoalType::Bulk
    } else {
        GoalType::Maintenance
    }
}

/// Inclusive kg/week bounds for a goal type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateBounds {
    pub min: f64,
    pub max: f64,
}

impl GoalType {
    pub fn rate_bounds(self) -> RateBounds {
        match self {
            GoalType::Cut => RateBounds { min: -1.0, max: -0.1 },
            GoalType::Bulk => RateBounds { min: 0.1, max: 0.5 },
            GoalType::Maintenance => RateBounds { min: 0.0, max: 0.0 },
        }
    }

    /// Rate assigned when a goal is created or re-typed and the previous rate
    /// no longer fits.
    pub fn default_rate(self) -> f64 {
        match self {
            GoalType::Cut => -0.5,
            GoalType::Bulk => 0.25,
            GoalType::Maintenance => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("Weekly rate {rate} kg is outside {min}..={max} for a {goal_type} goal")]
pub struct RateOutOfBounds {
    pub goal_type: GoalType,
    pub rate: f64,
    pub min: f64,
    pub max: f64,
}

pub fn validate_rate(goal_type: GoalType, rate: f64) -> Result<(), RateOutOfBounds> {
    let RateBounds { min, max } = goal_type.rate_bounds();
    if rate.is_finite() && rate >= min && rate <= max {
        Ok(())
    } else {
        Err(RateOutOfBounds { goal_type, rate, min, max })
    }
}

/// The stored rate if it still fits the goal type, otherwise the type's default.
pub fn effective_rate(goal_type: GoalType, stored_rate: f64) -> f64 {
    match validate_rate(goal_type, stored_rate) {
        Ok(()) => stored_rate,
        Err(_) => goal_type.default_rate(),
    }
}

pub fn daily_calorie_change(weekly_rate_kg: f64) -> f64 {
    weekly_rate_kg * KCAL_PER_KG / 7.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyTarget {
    pub energy_target: f64,
    /// Signed; negative for a cut.
    pub energy_deficit: f64,
}

pub fn energy_target(tdee: f64, weekly_rate_kg: f64) -> EnergyTarget {
    let energy_target = tdee + daily_calorie_change(weekly_rate_kg);
    EnergyTarget {
        energy_target,
        energy_deficit: energy_target - tdee,
    }
}

/// Projected completion date, or `None` for maintenance / zero rate / already there.
pub fn forecast_date(
    goal_type: GoalType,
    current_weight: f64,
    goal_weight: f64,
    weekly_rate_kg: f64,
    goal_created_at: DateTime<Utc>,
) -> Option<NaiveDate> {
    if goal_type == GoalType::Maintenance || weekly_rate_kg == 0.0 || current_weight == goal_weight
    {
        return None;
    }
    let weeks_needed = ((current_weight - goal_weight) / weekly_rate_kg).abs();
    let days = (weeks_needed * 7.0).round();
    if !days.is_finite() || days > i64::from(i32::MAX) as f64 {
        return None;
    }
    goal_created_at
        .checked_add_signed(Duration::days(days as i64))
        .map(|d| d.date_naive())
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MacroRatios {
    pub protein_ratio: f64,
    pub fat_ratio: f64,
    pub carb_ratio: f64,
}

impl MacroRatios {
    pub fn is_valid(&self) -> bool {
        let parts = [self.protein_ratio, self.fat_ratio, self.carb_ratio];
        parts.iter().all(|r| r.is_finite() && (0.0..=1.0).contains(r))
            && (parts.iter().sum::<f64>() - 1.0).abs() <= RATIO_SUM_TOLERANCE
    }
}

pub const MACRO_PRESETS: [(&str, MacroRatios); 4] = [
    ("balanced", MacroRatios { protein_ratio: 0.30, fat_ratio: 0.30, carb_ratio: 0.40 }),
    ("high_protein", MacroRatios { protein_ratio: 0.40, fat_ratio: 0.30, carb_ratio: 0.30 }),
    ("low_carb", MacroRatios { protein_ratio: 0.40, fat_ratio: 0.40, carb_ratio: 0.20 }),
    ("low_fat", MacroRatios { protein_ratio: 0.30, fat_ratio: 0.20, carb_ratio: 0.50 }),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroOption {
    pub name: String,
    pub protein_g: i64,
    pub fat_g: i64,
    pub carbs_g: i64,
}

pub fn macro_targets(name: &str, energy_target: f64, ratios: &MacroRatios) -> MacroOption {
    MacroOption {
        name: name.to_string(),
        protein_g: (energy_target * ratios.protein_ratio / 4.0).round() as i64,
        fat_g: (energy_target * ratios.fat_ratio / 9.0).round() as i64,
        carbs_g: (energy_target * ratios.carb_ratio / 4.0).round() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_goal_type_is_pure_function_of_weights() {
        let w = 80.0;
        assert_eq!(derive_goal_type(w, w), GoalType::Maintenance);
        assert_eq!(derive_goal_type(w - 1.0, w), GoalType::Cut);
        assert_eq!(derive_goal_type(w + 1.0, w), GoalType::Bulk);
    }

    #[test]
    fn test_cut_bounds() {
        assert!(validate_rate(GoalType::Cut, -0.1).is_ok());
        assert!(validate_rate(GoalType::Cut, -1.0).is_ok());
        assert!(validate_rate(GoalType::Cut, -0.5).is_ok());
        assert!(validate_rate(GoalType::Cut, -0.05).is_err());
        assert!(validate_rate(GoalType::Cut, -1.1).is_err());
        assert!(validate_rate(GoalType::Cut, 0.2).is_err());
    }

    #[test]
    fn test_bulk_bounds() {
        assert!(validate_rate(GoalType::Bulk, 0.1).is_ok());
        assert!(validate_rate(GoalType::Bulk, 0.5).is_ok());
        assert!(validate_rate(GoalType::Bulk, 0.05).is_err());
        assert!(validate_rate(GoalType::Bulk, 0.6).is_err());
        assert!(validate_rate(GoalType::Bulk, -0.3).is_err());
    }

    #[test]
    fn test_maintenance_only_zero() {
        assert!(validate_rate(GoalType::Maintenance, 0.0).is_ok());
        assert!(validate_rate(GoalType::Maintenance, 0.1).is_err());
        assert!(validate_rate(GoalType::Maintenance, -0.1).is_err());
    }

    #[test]
    fn test_nan_rate_rejected() {
        assert!(validate_rate(GoalType::Cut, f64::NAN).is_err());
    }

    #[test]
    fn test_rejection_carries_bounds() {
        let err = validate_rate(GoalType::Bulk, 1.0).unwrap_err();
        assert_eq!(err.goal_type, GoalType::Bulk);
        assert_eq!((err.min, err.max), (0.1, 0.5));
    }

    #[test]
    fn test_effective_rate_falls_back_to_default() {
        assert_eq!(effective_rate(GoalType::Cut, -0.7), -0.7);
        assert_eq!(effective_rate(GoalType::Bulk, -0.7), 0.25);
        assert_eq!(effective_rate(GoalType::Maintenance, -0.7), 0.0);
    }

    #[test]
    fn test_energy_target_for_cut() {
        let t = energy_target(2500.0, -0.5);
        assert_eq!(t.energy_target, 2500.0 - 550.0);
        assert_eq!(t.energy_deficit, -550.0);
    }

    #[test]
    fn test_energy_target_for_maintenance() {
        let t = energy_target(2200.0, 0.0);
        assert_eq!(t.energy_target, 2200.0);
        assert_eq!(t.energy_deficit, 0.0);
    }

    #[test]
    fn test_forecast_cut() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        // 5 kg at 0.5 kg/week = 10 weeks = 70 days
        let date = forecast_date(GoalType::Cut, 80.0, 75.0, -0.5, created).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 12).unwrap());
    }

    #[test]
    fn test_forecast_rounds_days() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        // 1 kg at 0.3 kg/week = 3.333 weeks = 23.33 days -> 23
        let date = forecast_date(GoalType::Bulk, 70.0, 71.0, 0.3, created).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 24).unwrap());
    }

    #[test]
    fn test_forecast_absent_when_not_applicable() {
        let created = Utc::now();
        assert!(forecast_date(GoalType::Maintenance, 70.0, 70.0, 0.0, created).is_none());
        assert!(forecast_date(GoalType::Cut, 80.0, 75.0, 0.0, created).is_none());
        assert!(forecast_date(GoalType::Cut, 75.0, 75.0, -0.5, created).is_none());
    }

    #[test]
    fn test_presets_are_valid() {
        for (name, ratios) in MACRO_PRESETS {
            assert!(ratios.is_valid(), "preset {name} must sum to 1");
        }
    }

    #[test]
    fn test_ratio_validation() {
        let ok = MacroRatios { protein_ratio: 0.3334, fat_ratio: 0.3333, carb_ratio: 0.3333 };
        assert!(ok.is_valid());
        let off = MacroRatios { protein_ratio: 0.5, fat_ratio: 0.3, carb_ratio: 0.3 };
        assert!(!off.is_valid());
        let negative = MacroRatios { protein_ratio: 1.2, fat_ratio: -0.1, carb_ratio: -0.1 };
        assert!(!negative.is_valid());
    }

    #[test]
    fn test_macro_targets_rounding() {
        let ratios = MacroRatios { protein_ratio: 0.30, fat_ratio: 0.30, carb_ratio: 0.40 };
        let option = macro_targets("balanced", 2000.0, &ratios);
        assert_eq!(option.protein_g, 150);
        assert_eq!(option.fat_g, 67); // 66.67
        assert_eq!(option.carbs_g, 200);
    }
}
