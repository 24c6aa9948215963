//! Region and region table types.
//!
//! K_i: A region is one county row: identifier, natural key, boundary and
//! indicator values. Missing values are `None`, never a sentinel number.
//! K_i: The table keeps source file order; row index is position in that
//! order and is what the key resolver uses to disambiguate.

use crate::catalog::Indicator;
use geo_types::MultiPolygon;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Column holding the source dataset's intended unique key.
pub const NATURAL_KEY: &str = "County";

/// Property carrying the synthesized identifier when the natural key collides.
pub const SYNTHESIZED_KEY: &str = "County_ID";

/// How region identifiers were derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    /// Identifier is the natural key, unmodified
    #[default]
    Natural,
    /// Identifier is `naturalKey_rowIndex`
    Synthesized,
}

impl KeyScheme {
    /// Property path the map uses to match features against locations.
    pub fn feature_id_key(&self) -> &'static str {
        match self {
            Self::Natural => "properties.County",
            Self::Synthesized => "properties.County_ID",
        }
    }
}

/// One county row.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Unique identifier (equal to `county` until the resolver says otherwise)
    pub id: String,

    /// Natural key value as found in the source
    pub county: String,

    /// Boundary in WGS84 longitude/latitude
    pub geometry: MultiPolygon<f64>,

    values: BTreeMap<Indicator, Option<f64>>,
}

impl Region {
    /// Create a region with no indicator values; the id starts as the natural key.
    pub fn new(county: impl Into<String>, geometry: MultiPolygon<f64>) -> Self {
        let county = county.into();
        Self {
            id: county.clone(),
            county,
            geometry,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter for an indicator value.
    pub fn with_value(mut self, indicator: Indicator, value: Option<f64>) -> Self {
        self.set_value(indicator, value);
        self
    }

    /// Record an indicator value. Non-finite numbers are stored as missing.
    ///
    /// `-0.0` is stored as `0.0` so equal values always rank as ties.
    pub fn set_value(&mut self, indicator: Indicator, value: Option<f64>) {
        self.values
            .insert(indicator, value.filter(|v| v.is_finite()).map(|v| v + 0.0));
    }

    /// Value of a known indicator, `None` when missing or not recorded.
    pub fn get(&self, indicator: Indicator) -> Option<f64> {
        self.values.get(&indicator).copied().flatten()
    }

    /// Value by column name, for callers holding a raw selection string.
    pub fn value(&self, name: &str) -> Option<f64> {
        Indicator::lookup(name).and_then(|indicator| self.get(indicator))
    }

    /// All recorded indicator values, including missing ones.
    pub fn values(&self) -> impl Iterator<Item = (Indicator, Option<f64>)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

/// Ordered, immutable collection of regions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTable {
    pub(crate) regions: Vec<Region>,
    pub(crate) columns: BTreeSet<Indicator>,
    pub(crate) has_natural_key: bool,
    pub(crate) key_scheme: KeyScheme,
}

impl RegionTable {
    /// Table with no rows and no columns: the degraded "no data" state.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an unresolved table.
    ///
    /// `columns` lists the indicator columns present in the source, which may
    /// include columns whose every value is missing.
    pub fn new(regions: Vec<Region>, columns: BTreeSet<Indicator>, has_natural_key: bool) -> Self {
        Self {
            regions,
            columns,
            has_natural_key,
            key_scheme: KeyScheme::Natural,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Whether the source carried this indicator as a column.
    pub fn has_column(&self, indicator: Indicator) -> bool {
        self.columns.contains(&indicator)
    }

    pub fn columns(&self) -> impl Iterator<Item = Indicator> + '_ {
        self.columns.iter().copied()
    }

    pub fn has_natural_key(&self) -> bool {
        self.has_natural_key
    }

    pub fn key_scheme(&self) -> KeyScheme {
        self.key_scheme
    }

    /// Find a region by identifier.
    pub fn get(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }
}
