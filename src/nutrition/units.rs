//! Logged quantity + unit string → grams.
//!
//! Stored unit strings encode grams-per-unit, e.g. `"100 g"` or `"1 g"`.

/// Serving size used when a food record has none (or a nonsensical one).
pub const DEFAULT_SERVING_SIZE_G: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UnitError {
    #[error("Invalid unit '{0}': expected a grams amount such as \"100 g\"")]
    InvalidUnit(String),
    #[error("Quantity and unit produce a non-finite amount")]
    NonFinite,
}

/// Parse `"<number> g"` into grams-per-unit.
///
/// The grams marker is required (`g`, `gram`, `grams`, any case, optional
/// space). Negative or non-finite amounts are rejected.
pub fn parse_unit_grams(unit: &str) -> Result<f64, UnitError> {
    let invalid = || UnitError::InvalidUnit(unit.to_string());
    let trimmed = unit.trim();

    let split_at = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.' || *c == '-' || *c == '+'))
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    let (number, marker) = trimmed.split_at(split_at);

    let grams: f64 = number.parse().map_err(|_| invalid())?;
    if !grams.is_finite() || grams < 0.0 {
        return Err(invalid());
    }

    match marker.trim().to_ascii_lowercase().as_str() {
        "g" | "gram" | "grams" => Ok(grams),
        _ => Err(invalid()),
    }
}

/// Total grams for a logged entry: `quantity * unit_grams`.
///
/// Not divided by serving size; see [`serving_multiplier`].
pub fn resolve_grams(quantity: f64, unit: &str) -> Result<f64, UnitError> {
    let unit_grams = parse_unit_grams(unit)?;
    let total = quantity * unit_grams;
    if !total.is_finite() {
        return Err(UnitError::NonFinite);
    }
    Ok(total)
}

pub fn effective_serving_size(serving_size_g: Option<f64>) -> f64 {
    match serving_size_g {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => DEFAULT_SERVING_SIZE_G,
    }
}

/// `total_grams / serving_size`, the factor applied to per-serving nutrient values.
pub fn serving_multiplier(total_grams: f64, serving_size_g: Option<f64>) -> f64 {
    total_grams / effective_serving_size(serving_size_g)
}
