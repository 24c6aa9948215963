//! Error types for countylens.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Expected failures (missing file, bad schema)
//! - I^B materialized: Degraded data the dashboard must keep serving around
//! - K_i violated: Internal invariant violations (bugs)
//!
//! Per-query failures (`NotFound`, `InsufficientData`) are not errors: they
//! are variants of [`crate::engine::QueryResult`] so the presentation layer
//! can render them.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for countylens.
#[derive(Debug, Error)]
pub enum CountylensError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED: Belief proven wrong (expected failures)
    // ═══════════════════════════════════════════════════════════════════
    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED: Bounded ignorance became known-bad
    // ═══════════════════════════════════════════════════════════════════
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED: Invariant broken (bug, should not happen)
    // ═══════════════════════════════════════════════════════════════════
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CountylensError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Failures of the startup load phase.
///
/// None of these stop the process: the dashboard falls back to an empty
/// dataset and reports the reason through its status.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File missing or unreadable.
    #[error("Data unavailable at {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File readable but with no usable geometry or attributes.
    #[error("Data corrupt in {path}: {reason}")]
    DataCorrupt { path: PathBuf, reason: String },

    /// Required natural-key column absent.
    #[error("Schema error in {path}: {source}")]
    Schema {
        path: PathBuf,
        #[source]
        source: SchemaError,
    },
}

impl LoadError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable kind, surfaced in the dataset status.
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::DataUnavailable { .. } => LoadErrorKind::DataUnavailable,
            Self::DataCorrupt { .. } => LoadErrorKind::DataCorrupt,
            Self::Schema { .. } => LoadErrorKind::SchemaError,
        }
    }
}

/// Discriminant of [`LoadError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum LoadErrorKind {
    DataUnavailable,
    DataCorrupt,
    SchemaError,
}

/// Region table schema violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("natural key column '{0}' not found")]
    MissingNaturalKey(&'static str),
}

/// Result type alias for countylens.
pub type Result<T> = std::result::Result<T, CountylensError>;
