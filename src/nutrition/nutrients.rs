//! Food nutrient tables and macro extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROTEIN: &str = "Protein";
pub const CARBOHYDRATE: &str = "Carbohydrate, by difference";
pub const FAT: &str = "Total lipid (fat)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutrientAmount {
    pub value: f64,
    pub unit: String,
}

/// A food's nutrient table as stored in `foods.nutrients`.
///
/// Legacy rows may hold the table as a JSON-encoded string, or something that
/// isn't a table at all. The latter becomes `Unparseable` and extracts as empty.
#[derive(Debug, Clone, PartialEq)]
pub enum NutrientTable {
    Parsed(BTreeMap<String, NutrientAmount>),
    Unparseable,
}

impl NutrientTable {
    pub fn from_json(raw: &Value) -> Self {
        match raw {
            Value::Null => Self::Parsed(BTreeMap::new()),
            Value::Object(map) => Self::Parsed(
                map.iter()
                    .filter_map(|(name, entry)| {
                        parse_amount(entry).map(|amount| (name.clone(), amount))
                    })
                    .collect(),
            ),
            Value::String(encoded) => match serde_json::from_str::<Value>(encoded) {
                Ok(inner @ Value::Object(_)) => Self::from_json(&inner),
                _ => Self::Unparseable,
            },
            _ => Self::Unparseable,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, Self::Unparseable)
    }

    /// Stored per-serving value for `name`; missing entries are 0.
    pub fn value_of(&self, name: &str) -> f64 {
        match self {
            Self::Parsed(map) => map.get(name).map(|a| a.value).unwrap_or(0.0),
            Self::Unparseable => 0.0,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &NutrientAmount)> {
        let map = match self {
            Self::Parsed(map) => Some(map),
            Self::Unparseable => None,
        };
        map.into_iter().flat_map(|m| m.iter())
    }
}

fn parse_amount(entry: &Value) -> Option<NutrientAmount> {
    match entry {
        Value::Object(fields) => Some(NutrientAmount {
            value: fields.get("value").map(numeric).unwrap_or(0.0),
            unit: fields
                .get("unit")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        Value::Number(_) => Some(NutrientAmount {
            value: numeric(entry),
            unit: String::new(),
        }),
        _ => None,
    }
}

fn numeric(v: &Value) -> f64 {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite()).unwrap_or(0.0)
}

/// Gram amounts of the three macros for one logged entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Macros {
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

pub fn extract_macros(table: &NutrientTable, multiplier: f64) -> Macros {
    Macros {
        protein_g: table.value_of(PROTEIN) * multiplier,
        carbs_g: table.value_of(CARBOHYDRATE) * multiplier,
        fat_g: table.value_of(FAT) * multiplier,
    }
}

/// Every nutrient in the table scaled by `multiplier`.
pub fn scale_all(table: &NutrientTable, multiplier: f64) -> BTreeMap<String, NutrientAmount> {
    table
        .entries()
        .map(|(name, amount)| {
            (
                name.clone(),
                NutrientAmount {
                    value: amount.value * multiplier,
                    unit: amount.unit.clone(),
                },
            )
        })
        .collect()
}

/// Add `other` into `totals`, keeping the first unit seen for each nutrient.
pub fn accumulate(
    totals: &mut BTreeMap<String, NutrientAmount>,
    other: BTreeMap<String, NutrientAmount>,
) {
    for (name, amount) in other {
        totals
            .entry(name)
            .and_modify(|t| t.value += amount.value)
            .or_insert(amount);
    }
}
