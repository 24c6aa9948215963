//! Core data models for countylens.
//!
//! Epistemic mapping:
//! - K_i (Knowledge): Region/table/document types with compile-time shape
//! - B_i (Beliefs): Load outcomes wrapped in Result
//! - I^R (Resolvable): Config parameters
//! - I^B (Bounded): Error variants with degraded fallbacks

mod boundary;
mod config;
mod error;
mod region;

pub use boundary::*;
pub use config::*;
pub use error::*;
pub use region::*;
