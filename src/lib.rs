//! countylens - County health indicator dashboard backend.
//!
//! ## Architecture
//!
//! Loaded once, queried many times:
//! - **Loader**: GeoJSON → WGS84 → simplified boundaries → numeric indicators
//! - **Resolver**: guarantees a unique identifier per county row
//! - **Engine**: per-indicator median imputation, ranking and value range
//! - **Dashboard**: selection events → map / top chart / bottom chart stages
//! - **Server**: read-only JSON API for the front end
//!
//! ## Epistemic Design
//!
//! - K_i (Knowledge): Static catalog, typed indicators, immutable dataset
//! - B_i (Beliefs): Load outcomes as `Result`, query outcomes as variants
//! - I^R (Resolvable): Data path and listen address from config
//! - I^B (Bounded): Bad files and bad cells degrade, never crash

pub mod catalog;
pub mod dashboard;
pub mod engine;
pub mod loader;
pub mod models;
pub mod resolver;
pub mod server;

// Re-exports for convenience
pub use catalog::{CATEGORIES, Category, Indicator};
pub use dashboard::{CategoryPanel, Dashboard, DashboardView, Dataset, DatasetStatus};
pub use engine::{DEFAULT_BOTTOM_N, DEFAULT_TOP_N, QueryResult, query};
pub use loader::load;
pub use models::{
    BoundaryDocument, Config, CountylensError, LoadError, Region, RegionTable, Result, SchemaError,
};
pub use resolver::resolve;
