//! Indicator query: impute, rank, and bound one indicator.
//!
//! Epistemic foundation:
//! - K_i: The stored table is borrowed immutably; imputation lives in the
//!   result only
//! - B_i: The indicator exists as a column → `QueryResult::NotFound`
//! - B_i: At least one value is present → `QueryResult::InsufficientData`
//! - K_i: Every number in a `Ready` result is finite

use super::stats::{ValueRange, median};
use crate::catalog::Indicator;
use crate::models::RegionTable;
use serde::Serialize;
use tracing::debug;

/// Regions shown in the top chart unless a caller asks otherwise.
pub const DEFAULT_TOP_N: usize = 10;

/// Regions shown in the bottom chart unless a caller asks otherwise.
pub const DEFAULT_BOTTOM_N: usize = 10;

/// One region's value for the selected indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRegion {
    /// Unique region identifier
    pub id: String,

    /// Natural key, used as the display label
    pub county: String,

    /// Observed value, or the median when `imputed`
    pub value: f64,

    /// Whether `value` was filled in for this query
    pub imputed: bool,
}

/// Successful query output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorQuery {
    pub indicator: Indicator,

    /// Every region in load order, missing values imputed
    pub full_set: Vec<RankedRegion>,

    /// Highest values first, ties in load order
    pub top_set: Vec<RankedRegion>,

    /// Lowest values first, ties in load order
    pub bottom_set: Vec<RankedRegion>,

    /// Span of `full_set`, for the map's color scale
    pub value_range: ValueRange,

    /// Median of the observed values, used for imputation
    pub median: f64,

    /// How many regions were imputed
    pub imputed: usize,
}

/// Outcome of querying one indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryResult {
    Ready(IndicatorQuery),
    /// The name is not a catalogued indicator present in the table
    NotFound { indicator: String },
    /// The indicator exists but no region has a value
    InsufficientData { indicator: String },
}

impl QueryResult {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn as_ready(&self) -> Option<&IndicatorQuery> {
        match self {
            Self::Ready(q) => Some(q),
            _ => None,
        }
    }

    /// Name of the queried indicator, as requested.
    pub fn indicator_name(&self) -> &str {
        match self {
            Self::Ready(q) => q.indicator.name(),
            Self::NotFound { indicator } | Self::InsufficientData { indicator } => indicator,
        }
    }

    /// Full imputed set; empty for failure variants.
    pub fn full_set(&self) -> &[RankedRegion] {
        self.as_ready().map(|q| q.full_set.as_slice()).unwrap_or(&[])
    }

    pub fn top_set(&self) -> &[RankedRegion] {
        self.as_ready().map(|q| q.top_set.as_slice()).unwrap_or(&[])
    }

    pub fn bottom_set(&self) -> &[RankedRegion] {
        self.as_ready().map(|q| q.bottom_set.as_slice()).unwrap_or(&[])
    }
}

/// Query one indicator over the table.
///
/// Missing values are replaced with the median of the observed ones for this
/// call only. Ranking uses a stable sort, so equal values keep load order.
pub fn query(table: &RegionTable, indicator_name: &str, top_n: usize, bottom_n: usize) -> QueryResult {
    let Some(indicator) = Indicator::lookup(indicator_name).filter(|i| table.has_column(*i)) else {
        debug!(indicator = indicator_name, "Indicator not available");
        return QueryResult::NotFound {
            indicator: indicator_name.to_string(),
        };
    };

    let observed: Vec<f64> = table.regions().iter().filter_map(|r| r.get(indicator)).collect();
    let Some(median) = median(&observed) else {
        debug!(indicator = indicator_name, "No observed values");
        return QueryResult::InsufficientData {
            indicator: indicator_name.to_string(),
        };
    };

    let full_set: Vec<RankedRegion> = table
        .regions()
        .iter()
        .map(|r| {
            let cell = r.get(indicator);
            RankedRegion {
                id: r.id.clone(),
                county: r.county.clone(),
                value: cell.unwrap_or(median),
                imputed: cell.is_none(),
            }
        })
        .collect();

    let Some(value_range) = ValueRange::of(full_set.iter().map(|r| r.value)) else {
        return QueryResult::InsufficientData {
            indicator: indicator_name.to_string(),
        };
    };

    let mut top_set = full_set.clone();
    top_set.sort_by(|a, b| b.value.total_cmp(&a.value));
    top_set.truncate(top_n);

    let mut bottom_set = full_set.clone();
    bottom_set.sort_by(|a, b| a.value.total_cmp(&b.value));
    bottom_set.truncate(bottom_n);

    let imputed = full_set.len() - observed.len();
    debug!(
        indicator = indicator_name,
        regions = full_set.len(),
        imputed,
        median,
        "Indicator query complete"
    );

    QueryResult::Ready(IndicatorQuery {
        indicator,
        full_set,
        top_set,
        bottom_set,
        value_range,
        median,
        imputed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Region;
    use crate::resolver::resolve;
    use geo_types::MultiPolygon;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const RURAL: &str = "% Rural";

    fn table(rows: &[(&str, Option<f64>)]) -> RegionTable {
        let indicator = Indicator::lookup(RURAL).unwrap();
        let regions = rows
            .iter()
            .map(|(county, v)| {
                Region::new(*county, MultiPolygon::new(vec![])).with_value(indicator, *v)
            })
            .collect();
        resolve(RegionTable::new(regions, BTreeSet::from([indicator]), true)).unwrap()
    }

    fn values(set: &[RankedRegion]) -> Vec<f64> {
        set.iter().map(|r| r.value).collect()
    }

    fn ids(set: &[RankedRegion]) -> Vec<&str> {
        set.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_median_imputation_and_ranking() {
        let t = table(&[("Alamance", Some(10.0)), ("Bertie", None), ("Camden", Some(30.0))]);
        let result = query(&t, RURAL, 2, 2);
        let q = result.as_ready().unwrap();

        assert_eq!(q.median, 20.0);
        assert_eq!(q.imputed, 1);
        assert_eq!(values(&q.full_set), vec![10.0, 20.0, 30.0]);
        assert!(q.full_set[1].imputed);
        assert_eq!(values(&q.top_set), vec![30.0, 20.0]);
        assert_eq!(ids(&q.top_set), vec!["Camden", "Bertie"]);
        assert_eq!(values(&q.bottom_set), vec![10.0, 20.0]);
        assert_eq!(q.value_range, ValueRange { min: 10.0, max: 30.0 });
    }

    #[test]
    fn test_unknown_indicator_not_found() {
        let t = table(&[("Wake", Some(1.0))]);
        let result = query(&t, "Average Commute Length", 10, 10);
        assert_eq!(
            result,
            QueryResult::NotFound {
                indicator: "Average Commute Length".into()
            }
        );
        assert!(result.full_set().is_empty());
        assert!(result.top_set().is_empty());
        assert!(result.bottom_set().is_empty());
    }

    #[test]
    fn test_catalogued_but_absent_column_not_found() {
        let t = table(&[("Wake", Some(1.0))]);
        let result = query(&t, "Life Expectancy", 10, 10);
        assert!(matches!(result, QueryResult::NotFound { .. }));
    }

    #[test]
    fn test_all_missing_is_insufficient() {
        let t = table(&[("Wake", None), ("Durham", None)]);
        let result = query(&t, RURAL, 10, 10);
        assert_eq!(
            result,
            QueryResult::InsufficientData {
                indicator: RURAL.into()
            }
        );
        assert_eq!(result.indicator_name(), RURAL);
        assert!(result.full_set().is_empty());
    }

    #[test]
    fn test_empty_table_degrades() {
        let result = query(&RegionTable::empty(), RURAL, 10, 10);
        assert!(matches!(result, QueryResult::NotFound { .. }));
    }

    #[test]
    fn test_ties_keep_load_order() {
        let t = table(&[
            ("A", Some(5.0)),
            ("B", Some(7.0)),
            ("C", Some(5.0)),
            ("D", Some(7.0)),
            ("E", None),
        ]);
        let q = query(&t, RURAL, 3, 3);
        let q = q.as_ready().unwrap();
        // median of [5,7,5,7] is 6
        assert_eq!(ids(&q.top_set), vec!["B", "D", "E"]);
        assert_eq!(ids(&q.bottom_set), vec!["A", "C", "E"]);
    }

    #[test]
    fn test_n_larger_than_table() {
        let t = table(&[("A", Some(1.0)), ("B", Some(2.0))]);
        let q = query(&t, RURAL, DEFAULT_TOP_N, DEFAULT_BOTTOM_N);
        assert_eq!(q.top_set().len(), 2);
        assert_eq!(q.bottom_set().len(), 2);

        let q = query(&t, RURAL, 0, 0);
        assert!(q.top_set().is_empty());
        assert_eq!(q.full_set().len(), 2);
    }

    #[test]
    fn test_query_is_idempotent_and_pure() {
        let t = table(&[("A", Some(3.0)), ("B", None), ("C", Some(9.0))]);
        let before = t.clone();
        let first = query(&t, RURAL, 10, 10);
        let second = query(&t, RURAL, 10, 10);
        assert_eq!(first, second);
        assert_eq!(t, before);
        assert_eq!(t.regions()[1].get(Indicator::lookup(RURAL).unwrap()), None);
    }

    #[test]
    fn test_signed_zero_ties_keep_load_order() {
        let t = table(&[("A", Some(-0.0)), ("B", Some(0.0))]);
        let q = query(&t, RURAL, 2, 2);
        assert_eq!(ids(q.top_set()), vec!["A", "B"]);
        assert_eq!(ids(q.bottom_set()), vec!["A", "B"]);
    }

    #[test]
    fn test_large_values_impute_within_range() {
        let t = table(&[("A", Some(1e308)), ("B", Some(1.7e308)), ("C", None)]);
        let q = query(&t, RURAL, 3, 3);
        let q = q.as_ready().unwrap();
        assert!(q.median.is_finite());
        assert!(q.full_set.iter().all(|r| r.value.is_finite()));
        assert!(q.full_set.iter().all(|r| q.value_range.contains(r.value)));
    }

    fn region_rows() -> impl Strategy<Value = Vec<(String, Option<f64>)>> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["Wake", "Durham", "Hyde", "Orange"]),
                prop::option::weighted(0.75, -1e6..1e6f64),
            ),
            1..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .map(|(county, value)| (county.to_string(), value))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn ranking_properties_hold(
            rows in region_rows(),
            top_n in 0usize..50,
            bottom_n in 0usize..50,
        ) {
            let borrowed: Vec<(&str, Option<f64>)> =
                rows.iter().map(|(c, v)| (c.as_str(), *v)).collect();
            let t = table(&borrowed);

            match query(&t, RURAL, top_n, bottom_n) {
                QueryResult::Ready(q) => {
                    prop_assert!(q.top_set.windows(2).all(|w| w[0].value >= w[1].value));
                    prop_assert!(q.bottom_set.windows(2).all(|w| w[0].value <= w[1].value));
                    prop_assert!(q.top_set.iter().all(|r| q.full_set.contains(r)));
                    prop_assert!(q.bottom_set.iter().all(|r| q.full_set.contains(r)));
                    prop_assert!(q.full_set.iter().all(|r| r.value.is_finite()));
                    prop_assert!(q.full_set.iter().all(|r| q.value_range.contains(r.value)));
                    prop_assert_eq!(q.full_set.len(), rows.len());
                    prop_assert_eq!(q.top_set.len(), top_n.min(rows.len()));
                    prop_assert_eq!(q.bottom_set.len(), bottom_n.min(rows.len()));
                }
                QueryResult::InsufficientData { .. } => {
                    prop_assert!(rows.iter().all(|(_, v)| v.is_none()));
                }
                QueryResult::NotFound { .. } => prop_assert!(false, "column is present"),
            }
        }

        #[test]
        fn query_leaves_table_untouched(rows in region_rows()) {
            let borrowed: Vec<(&str, Option<f64>)> =
                rows.iter().map(|(c, v)| (c.as_str(), *v)).collect();
            let t = table(&borrowed);
            let before = t.clone();
            let first = query(&t, RURAL, 10, 10);
            prop_assert_eq!(&first, &query(&t, RURAL, 10, 10));
            prop_assert_eq!(t, before);
        }
    }
}
