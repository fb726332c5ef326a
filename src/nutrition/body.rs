//! BMI and U.S. Navy circumference body-fat estimate.

use std::ops::RangeInclusive;

use crate::models::user::Sex;

/// Estimates outside this band come from near-degenerate girths, not bodies.
/// Same bounds as a manually entered body-fat value.
pub const PLAUSIBLE_BODY_FAT: RangeInclusive<f64> = 2.0..=75.0;

pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    (height_cm > 0.0 && value.is_finite()).then_some(value)
}

/// Circumferences in centimetres. `hip_cm` is only read for women.
#[derive(Debug, Clone, Copy, Default)]
pub struct Circumferences {
    pub neck_cm: Option<f64>,
    pub waist_cm: Option<f64>,
    pub hip_cm: Option<f64>,
}

/// Body-fat percentage, or `None` when inputs are incomplete or fall outside
/// the formula's domain (e.g. waist not larger than neck), or when the result
/// is outside [`PLAUSIBLE_BODY_FAT`].
pub fn navy_body_fat(sex: Sex, height_cm: f64, c: Circumferences) -> Option<f64> {
    let neck = c.neck_cm?;
    let waist = c.waist_cm?;

    let denominator = match sex {
        Sex::Male => {
            let girth = waist - neck;
            if girth <= 0.0 || height_cm <= 0.0 {
                return None;
            }
            1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10()
        }
        Sex::Female => {
            let hip = c.hip_cm?;
            let girth = waist + hip - neck;
            if girth <= 0.0 || height_cm <= 0.0 {
                return None;
            }
            1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10()
        }
    };

    let body_fat = 495.0 / denominator - 450.0;
    PLAUSIBLE_BODY_FAT.contains(&body_fat).then_some(body_fat)
}

/// One-decimal rounding for display; stored values stay unrounded.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
