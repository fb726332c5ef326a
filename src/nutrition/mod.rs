//! Nutrition accounting rules.
//!
//! Everything here is pure: no I/O, no clocks. Services feed it rows from the
//! store and persist what it returns.

pub mod body;
pub mod energy;
pub mod goals;
pub mod nutrients;
pub mod summary;
pub mod units;

pub use nutrients::NutrientTable;
pub use summary::{entry_contribution, NutritionDelta};
