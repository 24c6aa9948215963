//! Dashboard: selection events in, chart-ready views out.
//!
//! Handles the two presentation events, `categorySelected` and
//! `indicatorSelected`, against the shared immutable [`Dataset`]. Holds no
//! state between calls.

mod state;
mod view;

pub use state::*;
pub use view::*;

use crate::catalog::{self, CATEGORIES, Category};
use crate::engine::{self, DEFAULT_BOTTOM_N, DEFAULT_TOP_N, QueryResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Name of the landing tab that precedes the categories.
pub const README_TAB: &str = "Readme";

/// Landing tab content.
pub const README_MARKDOWN: &str = "\
## Overview

County-level view of health and socioeconomic indicators across North Carolina, \
grouped by Social Determinants of Health category.

## Data Source

2024 County Health Rankings & Roadmaps.

## Features

- **Interactive map**: spatial distribution of the selected indicator.
- **Bar charts**: top 10 and bottom 10 counties for the selected indicator.

## Usage

1. Select a category tab.
2. Choose an indicator from the menu.
3. Explore the map and the ranked bar charts.
";

/// Content for a selected tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum CategoryPanel {
    Readme {
        markdown: &'static str,
    },
    Indicators {
        category: &'static str,
        options: &'static [&'static str],
        default_indicator: Option<&'static str>,
    },
    UnknownCategory {
        category: String,
    },
}

/// The three widgets for one indicator selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub indicator: Option<String>,
    pub map: Stage<ChoroplethSpec>,
    pub top_chart: Stage<BarChartSpec>,
    pub bottom_chart: Stage<BarChartSpec>,
}

impl DashboardView {
    /// Same notice in every widget.
    fn notice(indicator: Option<&str>, notice: Notice) -> Self {
        Self {
            indicator: indicator.map(str::to_string),
            map: Stage::Notice(notice.clone()),
            top_chart: Stage::Notice(notice.clone()),
            bottom_chart: Stage::Notice(notice),
        }
    }
}

/// Event handlers over a shared dataset.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Categories for menu population.
    pub fn catalog(&self) -> &'static [Category] {
        CATEGORIES
    }

    /// `categorySelected`: the tab's menu, or the readme.
    pub fn select_category(&self, name: &str) -> CategoryPanel {
        if name == README_TAB {
            return CategoryPanel::Readme {
                markdown: README_MARKDOWN,
            };
        }
        match catalog::category(name) {
            Some(c) => CategoryPanel::Indicators {
                category: c.name,
                options: c.indicators,
                default_indicator: c.default_indicator(),
            },
            None => {
                debug!(category = name, "Unknown category selected");
                CategoryPanel::UnknownCategory {
                    category: name.to_string(),
                }
            }
        }
    }

    /// `indicatorSelected`: query with the default ranking size and build
    /// each widget independently.
    ///
    /// Names match exactly; padded or re-cased names are not found.
    pub fn select_indicator(&self, name: Option<&str>) -> DashboardView {
        let Some(name) = name.filter(|n| !n.is_empty()) else {
            return DashboardView::notice(None, Notice::no_indicator_selected());
        };

        if let DatasetStatus::Unavailable { reason, .. } = self.dataset.status() {
            return DashboardView::notice(Some(name), Notice::no_data(reason));
        }

        match engine::query(self.dataset.table(), name, DEFAULT_TOP_N, DEFAULT_BOTTOM_N) {
            QueryResult::Ready(q) => DashboardView {
                indicator: Some(name.to_string()),
                map: build_map(&q, self.dataset.boundaries()),
                top_chart: build_bar_chart(&q, Ranking::Top),
                bottom_chart: build_bar_chart(&q, Ranking::Bottom),
            },
            QueryResult::NotFound { indicator } => {
                DashboardView::notice(Some(name), Notice::indicator_not_found(&indicator))
            }
            QueryResult::InsufficientData { indicator } => {
                DashboardView::notice(Some(name), Notice::insufficient_data(&indicator))
            }
        }
    }

    /// Raw query result with the default ranking size.
    pub fn query(&self, name: &str) -> QueryResult {
        engine::query(self.dataset.table(), name, DEFAULT_TOP_N, DEFAULT_BOTTOM_N)
    }
}
