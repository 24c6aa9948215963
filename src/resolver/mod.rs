//! Region key resolution.
//!
//! K_i: After [`resolve`] succeeds, identifiers are unique by construction:
//! either the natural keys were already distinct, or every identifier embeds
//! its row index.
//! B_i: The natural key column exists → `SchemaError` otherwise.

use crate::models::{KeyScheme, NATURAL_KEY, RegionTable, SchemaError};
use std::collections::HashSet;
use tracing::{info, warn};

/// Assign every region a unique identifier.
///
/// Natural keys are kept when they are already distinct. Otherwise every row
/// (not just the colliding ones) gets `naturalKey_rowIndex`, with the row
/// index taken from load order, so lookups use one scheme throughout.
pub fn resolve(mut table: RegionTable) -> Result<RegionTable, SchemaError> {
    if !table.has_natural_key {
        return Err(SchemaError::MissingNaturalKey(NATURAL_KEY));
    }

    let total = table.regions.len();
    let distinct = table
        .regions
        .iter()
        .map(|r| r.county.as_str())
        .collect::<HashSet<_>>()
        .len();
    info!(distinct, total, "Checked natural key uniqueness");

    if distinct == total {
        for region in &mut table.regions {
            region.id = region.county.clone();
        }
        table.key_scheme = KeyScheme::Natural;
        return Ok(table);
    }

    warn!(
        duplicates = total - distinct,
        "Natural key collides, synthesizing identifiers"
    );
    for (row, region) in table.regions.iter_mut().enumerate() {
        region.id = format!("{}_{}", region.county, row);
    }
    table.key_scheme = KeyScheme::Synthesized;
    Ok(table)
}
