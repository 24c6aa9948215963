//! Indicator query engine.
//!
//! Pure functions over an immutable [`crate::models::RegionTable`]; no state
//! survives between calls, so concurrent or superseded queries are safe.

mod query;
mod stats;

pub use query::*;
pub use stats::{ValueRange, median};
