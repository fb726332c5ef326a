use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::nutrition::energy::age_on;

/// Account row. Owned by the accounts service; this crate reads it and only
/// writes the biometric columns.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub sex: Option<Sex>,
    pub birthday: Option<NaiveDate>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level_id: Option<i32>,
    pub physiological_state: Option<PhysiologicalState>,
    pub neck_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "sex", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "physiological_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PhysiologicalState {
    #[default]
    None,
    Pregnant,
    Breastfeeding,
    Menopause,
}

/// Activity levels, keyed by the `activity_level_id` stored on the user.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightExercise,
    ModerateExercise,
    HeavyExercise,
    Athlete,
}

impl ActivityLevel {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Self::Sedentary),
            2 => Some(Self::LightExercise),
            3 => Some(Self::ModerateExercise),
            4 => Some(Self::HeavyExercise),
            5 => Some(Self::Athlete),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::LightExercise => 1.375,
            Self::ModerateExercise => 1.55,
            Self::HeavyExercise => 1.725,
            Self::Athlete => 1.9,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Sedentary => "Sedentary (office job)",
            Self::LightExercise => "Light Exercise (1-2 days/week)",
            Self::ModerateExercise => "Moderate Exercise (3-5 days/week)",
            Self::HeavyExercise => "Heavy Exercise (6-7 days/week)",
            Self::Athlete => "Athlete (2x per day)",
        }
    }
}

/// PATCH /api/users/profile. Every field is optional; at least one is required.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub sex: Option<Sex>,
    pub physiological_state: Option<PhysiologicalState>,
    #[validate(range(min = 50.0, max = 272.0, message = "Height must be 50-272 cm"))]
    pub height_cm: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be 20-500 kg"))]
    pub weight_kg: Option<f64>,
    pub birthday: Option<NaiveDate>,
    #[validate(range(min = 1, max = 5, message = "Activity level must be 1-5"))]
    pub activity_level_id: Option<i32>,
    #[validate(range(min = 15.0, max = 80.0, message = "Neck must be 15-80 cm"))]
    pub neck_cm: Option<f64>,
    #[validate(range(min = 30.0, max = 250.0, message = "Waist must be 30-250 cm"))]
    pub waist_cm: Option<f64>,
    #[validate(range(min = 30.0, max = 250.0, message = "Hip must be 30-250 cm"))]
    pub hip_cm: Option<f64>,
}

impl UpdateProfileRequest {
    pub fn is_empty(&self) -> bool {
        self.sex.is_none()
            && self.physiological_state.is_none()
            && self.height_cm.is_none()
            && self.weight_kg.is_none()
            && self.birthday.is_none()
            && self.activity_level_id.is_none()
            && self.neck_cm.is_none()
            && self.waist_cm.is_none()
            && self.hip_cm.is_none()
    }
}

#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub sex: Option<Sex>,
    pub birthday: Option<NaiveDate>,
    pub age: Option<u32>,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub activity_level_label: Option<&'static str>,
    pub physiological_state: PhysiologicalState,
    pub neck_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn from_user(u: User, today: NaiveDate) -> Self {
        let activity_level = u.activity_level_id.and_then(ActivityLevel::from_id);
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            sex: u.sex,
            birthday: u.birthday,
            age: u.birthday.map(|b| age_on(b, today)),
            height_cm: u.height_cm,
            weight_kg: u.weight_kg,
            activity_level,
            activity_level_label: activity_level.map(ActivityLevel::label),
            physiological_state: u.physiological_state.unwrap_or_default(),
            neck_cm: u.neck_cm,
            waist_cm: u.waist_cm,
            hip_cm: u.hip_cm,
            created_at: u.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_multipliers() {
        let expected = [1.2, 1.375, 1.55, 1.725, 1.9];
        for (id, m) in (1..=5).zip(expected) {
            assert_eq!(ActivityLevel::from_id(id).unwrap().multiplier(), m);
        }
        assert!(ActivityLevel::from_id(0).is_none());
        assert!(ActivityLevel::from_id(6).is_none());
    }

    #[test]
    fn test_physiological_state_defaults_to_none() {
        assert_eq!(PhysiologicalState::default(), PhysiologicalState::None);
        assert_eq!(serde_json::to_value(PhysiologicalState::default()).unwrap(), "none");
    }

    #[test]
    fn test_profile_request_rejects_unknown_sex() {
        let result = serde_json::from_str::<UpdateProfileRequest>(r#"{"sex":"other"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_profile_request_ranges() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"height_cm": 10.0, "activity_level_id": 9}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("height_cm"));
        assert!(fields.contains_key("activity_level_id"));
    }

    #[test]
    fn test_empty_profile_request() {
        let req: UpdateProfileRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"physiological_state":"pregnant"}"#).unwrap();
        assert!(!req.is_empty());
    }
}
