//! Process-wide dataset state.
//!
//! K_i: Built once before anything is served and never mutated afterward.
//! I^B: A failed load is not fatal; the dataset is empty and the status
//!      carries the reason for the presentation layer.

use crate::loader;
use crate::models::{BoundaryDocument, KeyScheme, LoadError, LoadErrorKind, RegionTable, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Whether data is available, and why not when it isn't.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DatasetStatus {
    Ready {
        source: PathBuf,
        regions: usize,
        indicators: usize,
        key_scheme: KeyScheme,
        loaded_at: DateTime<Utc>,
    },
    Unavailable {
        kind: LoadErrorKind,
        reason: String,
    },
}

/// Immutable region table plus its boundary document.
#[derive(Debug, Clone)]
pub struct Dataset {
    table: RegionTable,
    boundaries: BoundaryDocument,
    status: DatasetStatus,
}

impl Dataset {
    /// Load `path`, failing on any load error.
    ///
    /// For callers that must not serve a degraded dataset (`validate`).
    pub fn load(path: &Path) -> Result<Self> {
        let (table, boundaries) = loader::load(path)?;
        Ok(Self::ready(table, boundaries, path))
    }

    /// Load `path`, degrading to an empty dataset on any load error.
    pub fn load_or_empty(path: &Path) -> Self {
        match loader::load(path) {
            Ok((table, boundaries)) => {
                let dataset = Self::ready(table, boundaries, path);
                info!(path = %path.display(), regions = dataset.table.len(), "Dataset ready");
                dataset
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Dataset unavailable, serving no-data state");
                Self::unavailable(&e)
            }
        }
    }

    /// Dataset for a resolved table; the boundary document is derived from it.
    pub fn from_table(table: RegionTable, source: impl Into<PathBuf>) -> Self {
        let boundaries = BoundaryDocument::from_table(&table);
        Self::ready(table, boundaries, source)
    }

    /// Empty dataset recording why loading failed.
    pub fn unavailable(err: &LoadError) -> Self {
        Self {
            table: RegionTable::empty(),
            boundaries: BoundaryDocument::empty(),
            status: DatasetStatus::Unavailable {
                kind: err.kind(),
                reason: err.to_string(),
            },
        }
    }

    fn ready(table: RegionTable, boundaries: BoundaryDocument, source: impl Into<PathBuf>) -> Self {
        let status = DatasetStatus::Ready {
            source: source.into(),
            regions: table.len(),
            indicators: table.columns().count(),
            key_scheme: table.key_scheme(),
            loaded_at: Utc::now(),
        };
        Self {
            table,
            boundaries,
            status,
        }
    }

    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    pub fn boundaries(&self) -> &BoundaryDocument {
        &self.boundaries
    }

    pub fn status(&self) -> &DatasetStatus {
        &self.status
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, DatasetStatus::Ready { .. })
    }
}
