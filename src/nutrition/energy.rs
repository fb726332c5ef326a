//! Energy arithmetic: macro calories, Mifflin-St Jeor BMR, TDEE, age.

use chrono::{Datelike, NaiveDate};

use crate::models::user::Sex;

pub const KCAL_PER_G_PROTEIN: f64 = 4.0;
pub const KCAL_PER_G_CARBS: f64 = 4.0;
pub const KCAL_PER_G_FAT: f64 = 9.0;

pub fn calories_from_macros(protein_g: f64, carbs_g: f64, fat_g: f64) -> f64 {
    KCAL_PER_G_PROTEIN * protein_g + KCAL_PER_G_CARBS * carbs_g + KCAL_PER_G_FAT * fat_g
}

/// Mifflin-St Jeor (1990).
pub fn compute_bmr(sex: Sex, weight_kg: f64, height_cm: f64, age_years: u32) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years);
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

pub fn compute_tdee(bmr: f64, activity_multiplier: f64) -> f64 {
    bmr * activity_multiplier
}

/// Whole years between `birthday` and `today`, decremented if this year's
/// birthday hasn't happened yet. Never negative.
pub fn age_on(birthday: NaiveDate, today: NaiveDate) -> u32 {
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    age.max(0) as u32
}
