//! Configuration module for SoulSync
//!
//! This module handles:
//! - The categorical mapping table (mappings.json)
//! - Reference-dataset feature statistics (per-column mean/std)
//!
//! Both tables are loaded once at startup and treated as read-only for the
//! process lifetime. Absence of either source is non-fatal: lookups fall
//! back to defined neutral values.

mod feature_stats;
mod mappings;

pub use feature_stats::FeatureStats;
pub use mappings::CategoryMappings;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration artifacts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{path}: invalid CSV: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
