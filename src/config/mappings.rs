//! Categorical value mapping table
//!
//! The frozen model was trained on ordinal-encoded categorical columns. The
//! encoder's fitted mapping is exported as a JSON document mapping
//! column name -> { raw value -> integer code } and loaded once at startup.
//! Unknown values always encode to 0.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ConfigError;

/// Column-keyed categorical mapping table. Immutable after load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMappings {
    columns: HashMap<String, HashMap<String, i64>>,
}

impl CategoryMappings {
    /// Empty table: every lookup encodes to 0.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from an in-memory column map.
    pub fn from_columns(columns: HashMap<String, HashMap<String, i64>>) -> Self {
        Self { columns }
    }

    /// Load the mapping table from a JSON document on disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let columns: HashMap<String, HashMap<String, i64>> = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Json {
                path: path.to_path_buf(),
                source: e,
            })?;
        debug!(
            "Loaded {} mapping columns from {}",
            columns.len(),
            path.display()
        );
        Ok(Self { columns })
    }

    /// Load the table, degrading to an empty one when the file is missing or
    /// unreadable. A half-readable table would silently shift every
    /// categorical code, so parse failures also degrade rather than keeping
    /// partial content.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            warn!(
                "Mapping table not found at {}, using empty table",
                path.display()
            );
            return Self::empty();
        }
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                warn!("Failed to load mapping table: {}", e);
                Self::empty()
            }
        }
    }

    /// Persist the table as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&self.columns).map_err(|e| ConfigError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        std::fs::write(path, json).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Encode a raw categorical value for a column.
    ///
    /// Exact match first, then case-insensitive match, then 0 for unknowns.
    pub fn encode(&self, column: &str, raw: &str) -> i64 {
        let Some(column_map) = self.columns.get(column) else {
            return 0;
        };
        if let Some(&code) = column_map.get(raw) {
            return code;
        }
        let lowered = raw.to_lowercase();
        for (key, &code) in column_map {
            if key.to_lowercase() == lowered {
                return code;
            }
        }
        0
    }

    /// Whether any column mappings are loaded.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of mapped columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
