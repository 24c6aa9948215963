//! Chart-ready view specs, one independent stage per widget.
//!
//! Each stage is either ready to draw or a notice to show in its place, so a
//! problem with one widget never blanks the others and every failure has a
//! distinct, testable kind.

use crate::engine::{IndicatorQuery, RankedRegion, ValueRange};
use crate::models::BoundaryDocument;
use serde::Serialize;

/// Map center over North Carolina.
pub const MAP_CENTER: MapCenter = MapCenter {
    lat: 35.7596,
    lon: -79.0193,
};
pub const MAP_ZOOM: f64 = 6.0;
pub const MAP_OPACITY: f64 = 0.7;
pub const MAP_STYLE: &str = "carto-positron";
pub const COLOR_SCALE: &str = "Viridis";

/// Output of one view-building stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Stage<T> {
    Ready(T),
    Notice(Notice),
}

impl<T> Stage<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(t) => Some(t),
            Self::Notice(_) => None,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Ready(_) => None,
            Self::Notice(n) => Some(n),
        }
    }
}

/// Why a stage has nothing to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    NoIndicatorSelected,
    IndicatorNotFound,
    InsufficientData,
    NoData,
    /// Query locations without a matching boundary feature
    BoundaryMismatch,
    EmptyRanking,
}

/// Message rendered in place of a widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn no_indicator_selected() -> Self {
        Self {
            kind: NoticeKind::NoIndicatorSelected,
            title: "Please select an indicator to display the visualizations.".into(),
            message: "No indicator selected.".into(),
        }
    }

    pub fn indicator_not_found(indicator: &str) -> Self {
        Self {
            kind: NoticeKind::IndicatorNotFound,
            title: format!("Indicator '{indicator}' not found in the data."),
            message: format!("Indicator '{indicator}' not found."),
        }
    }

    pub fn insufficient_data(indicator: &str) -> Self {
        Self {
            kind: NoticeKind::InsufficientData,
            title: format!("No values recorded for '{indicator}'."),
            message: format!("Every county is missing a value for '{indicator}'."),
        }
    }

    pub fn no_data(reason: &str) -> Self {
        Self {
            kind: NoticeKind::NoData,
            title: "County data is unavailable.".into(),
            message: reason.to_string(),
        }
    }

    fn boundary_mismatch(missing: usize) -> Self {
        Self {
            kind: NoticeKind::BoundaryMismatch,
            title: "Error creating the choropleth map.".into(),
            message: format!("{missing} counties have no matching boundary."),
        }
    }

    fn empty_ranking(ranking: Ranking) -> Self {
        Self {
            kind: NoticeKind::EmptyRanking,
            title: format!("Error creating the {} bar chart.", ranking.label()),
            message: "No counties to rank.".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Everything a choropleth widget needs besides the boundary document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethSpec {
    pub indicator: String,
    /// Region identifiers, matched against `feature_id_key`
    pub locations: Vec<String>,
    pub values: Vec<f64>,
    /// County names for hover text
    pub labels: Vec<String>,
    pub imputed: Vec<bool>,
    pub color_range: ValueRange,
    pub feature_id_key: &'static str,
    pub color_scale: &'static str,
    pub map_style: &'static str,
    pub center: MapCenter,
    pub zoom: f64,
    pub opacity: f64,
}

/// Which end of the ranking a bar chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    Top,
    Bottom,
}

impl Ranking {
    fn label(&self) -> &'static str {
        match self {
            Self::Top => "Top",
            Self::Bottom => "Bottom",
        }
    }
}

/// Vertical bar chart of a ranked subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChartSpec {
    pub ranking: Ranking,
    pub title: String,
    pub indicator: String,
    pub ids: Vec<String>,
    /// X-axis tick labels (county names)
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub x_axis_title: &'static str,
    pub y_axis_title: String,
    /// Shared with the map so bar colors match region colors
    pub color_range: ValueRange,
}

/// Map stage: every region colored on the full-set range.
pub fn build_map(query: &IndicatorQuery, boundaries: &BoundaryDocument) -> Stage<ChoroplethSpec> {
    let missing = query
        .full_set
        .iter()
        .filter(|r| boundaries.feature(&r.id).is_none())
        .count();
    if missing > 0 {
        return Stage::Notice(Notice::boundary_mismatch(missing));
    }

    let indicator = query.indicator.name().to_string();
    Stage::Ready(ChoroplethSpec {
        locations: query.full_set.iter().map(|r| r.id.clone()).collect(),
        values: query.full_set.iter().map(|r| r.value).collect(),
        labels: query.full_set.iter().map(|r| r.county.clone()).collect(),
        imputed: query.full_set.iter().map(|r| r.imputed).collect(),
        color_range: query.value_range,
        feature_id_key: boundaries.feature_id_key,
        color_scale: COLOR_SCALE,
        map_style: MAP_STYLE,
        center: MAP_CENTER,
        zoom: MAP_ZOOM,
        opacity: MAP_OPACITY,
        indicator,
    })
}

/// Bar chart stage for one end of the ranking.
pub fn build_bar_chart(query: &IndicatorQuery, ranking: Ranking) -> Stage<BarChartSpec> {
    let subset: &[RankedRegion] = match ranking {
        Ranking::Top => &query.top_set,
        Ranking::Bottom => &query.bottom_set,
    };
    if subset.is_empty() {
        return Stage::Notice(Notice::empty_ranking(ranking));
    }

    let indicator = query.indicator.name();
    Stage::Ready(BarChartSpec {
        ranking,
        title: format!("{} {} Counties by {}", ranking.label(), subset.len(), indicator),
        indicator: indicator.to_string(),
        ids: subset.iter().map(|r| r.id.clone()).collect(),
        labels: subset.iter().map(|r| r.county.clone()).collect(),
        values: subset.iter().map(|r| r.value).collect(),
        x_axis_title: "County",
        y_axis_title: indicator.to_string(),
        color_range: query.value_range,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Indicator;
    use crate::engine::{QueryResult, query};
    use crate::models::{Region, RegionTable};
    use crate::resolver::resolve;
    use geo_types::MultiPolygon;
    use std::collections::BTreeSet;

    const INCOME: &str = "Median Household Income";

    fn table(counties: &[(&str, f64)]) -> RegionTable {
        let indicator = Indicator::lookup(INCOME).unwrap();
        let regions = counties
            .iter()
            .map(|(c, v)| Region::new(*c, MultiPolygon::new(vec![])).with_value(indicator, Some(*v)))
            .collect();
        resolve(RegionTable::new(regions, BTreeSet::from([indicator]), true)).unwrap()
    }

    fn ready(result: QueryResult) -> IndicatorQuery {
        match result {
            QueryResult::Ready(q) => q,
            other => panic!("expected ready query, got {other:?}"),
        }
    }

    #[test]
    fn test_map_spec_covers_full_set() {
        let t = table(&[("Wake", 90000.0), ("Hyde", 41000.0), ("Orange", 85000.0)]);
        let doc = BoundaryDocument::from_table(&t);
        let q = ready(query(&t, INCOME, 1, 1));

        let map = build_map(&q, &doc);
        let spec = map.ready().unwrap();
        assert_eq!(spec.locations, vec!["Wake", "Hyde", "Orange"]);
        assert_eq!(spec.values.len(), 3);
        assert_eq!(spec.color_range, ValueRange { min: 41000.0, max: 90000.0 });
        assert_eq!(spec.feature_id_key, "properties.County");
        assert_eq!(spec.center, MAP_CENTER);
    }

    #[test]
    fn test_map_rejects_mismatched_boundaries() {
        let t = table(&[("Wake", 1.0), ("Hyde", 2.0)]);
        let other = BoundaryDocument::from_table(&table(&[("Wake", 1.0)]));
        let q = ready(query(&t, INCOME, 10, 10));

        let map = build_map(&q, &other);
        assert_eq!(map.notice().unwrap().kind, NoticeKind::BoundaryMismatch);
    }

    #[test]
    fn test_bar_charts() {
        let t = table(&[("Wake", 90000.0), ("Hyde", 41000.0), ("Orange", 85000.0)]);
        let q = ready(query(&t, INCOME, 2, 2));

        let top = build_bar_chart(&q, Ranking::Top);
        let top = top.ready().unwrap();
        assert_eq!(top.title, "Top 2 Counties by Median Household Income");
        assert_eq!(top.labels, vec!["Wake", "Orange"]);
        assert_eq!(top.x_axis_title, "County");
        assert_eq!(top.y_axis_title, INCOME);

        let bottom = build_bar_chart(&q, Ranking::Bottom);
        let bottom = bottom.ready().unwrap();
        assert_eq!(bottom.title, "Bottom 2 Counties by Median Household Income");
        assert_eq!(bottom.values, vec![41000.0, 85000.0]);
    }

    #[test]
    fn test_empty_ranking_notice() {
        let t = table(&[("Wake", 1.0)]);
        let q = ready(query(&t, INCOME, 0, 1));
        assert_eq!(
            build_bar_chart(&q, Ranking::Top).notice().unwrap().kind,
            NoticeKind::EmptyRanking
        );
        assert!(build_bar_chart(&q, Ranking::Bottom).is_ready());
    }

    #[test]
    fn test_stage_serialization() {
        let stage: Stage<BarChartSpec> = Stage::Notice(Notice::indicator_not_found("X"));
        let json = serde_json::to_value(&stage).unwrap();
        assert_eq!(json["stage"], "notice");
        assert_eq!(json["kind"], "indicator_not_found");
        assert_eq!(json["message"], "Indicator 'X' not found.");
    }
}
