//! Reference-dataset feature statistics
//!
//! Per-column mean and standard deviation computed once from the reference
//! CSV dataset. Used for mean-imputation of features that are unobservable
//! at prediction time and for manual z-score scaling ahead of inference.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, warn};

use super::ConfigError;

/// Per-column (mean, std) lookup. Immutable after load.
#[derive(Debug, Clone, Default)]
pub struct FeatureStats {
    means: HashMap<String, f64>,
    stds: HashMap<String, f64>,
}

impl FeatureStats {
    /// Empty table: imputations become 0.0 and scaling divisors 1.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute per-column statistics from a reference CSV dataset.
    ///
    /// Only columns where every non-empty cell parses as a number are kept;
    /// string columns carry no scaling information. Standard deviation uses
    /// the sample (n-1) denominator to match how the frozen model's training
    /// statistics were computed.
    pub fn from_csv(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| ConfigError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        let mut numeric: Vec<bool> = vec![true; headers.len()];

        for record in rdr.records() {
            let record = record.map_err(|e| ConfigError::Csv {
                path: path.to_path_buf(),
                source: e,
            })?;
            for (i, cell) in record.iter().enumerate() {
                if i >= headers.len() || !numeric[i] {
                    continue;
                }
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(v) => values[i].push(v),
                    Err(_) => {
                        numeric[i] = false;
                        values[i].clear();
                    }
                }
            }
        }

        let mut means = HashMap::new();
        let mut stds = HashMap::new();
        for (i, header) in headers.iter().enumerate() {
            if !numeric[i] || values[i].is_empty() {
                continue;
            }
            let n = values[i].len() as f64;
            let mean = values[i].iter().sum::<f64>() / n;
            let std = if values[i].len() > 1 {
                let var = values[i].iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
                var.sqrt()
            } else {
                0.0
            };
            means.insert(header.clone(), mean);
            stds.insert(header.clone(), std);
        }

        debug!(
            "Computed stats for {} numeric columns from {}",
            means.len(),
            path.display()
        );
        Ok(Self { means, stds })
    }

    /// Load statistics, degrading to an empty table when the dataset is
    /// missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            warn!(
                "Reference dataset not found at {}, using empty stats",
                path.display()
            );
            return Self::empty();
        }
        match Self::from_csv(path) {
            Ok(stats) => stats,
            Err(e) => {
                warn!("Failed to compute feature stats: {}", e);
                Self::empty()
            }
        }
    }

    /// Build from explicit (mean, std) pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, f64, f64)>) -> Self {
        let mut means = HashMap::new();
        let mut stds = HashMap::new();
        for (column, mean, std) in pairs {
            means.insert(column.clone(), mean);
            stds.insert(column, std);
        }
        Self { means, stds }
    }

    /// Column mean, 0.0 for columns absent from the table.
    pub fn mean(&self, column: &str) -> f64 {
        self.means.get(column).copied().unwrap_or(0.0)
    }

    /// Column standard deviation, 1.0 for columns absent from the table.
    pub fn std(&self, column: &str) -> f64 {
        self.stds.get(column).copied().unwrap_or(1.0)
    }

    /// Whether the table carries statistics for a column.
    pub fn has_column(&self, column: &str) -> bool {
        self.means.contains_key(column)
    }

    /// Z-score a value for a column.
    ///
    /// Columns absent from the table are returned unchanged. A zero or
    /// non-finite standard deviation is floored to 1, so constant columns
    /// map to `value - mean`.
    pub fn scale(&self, column: &str, value: f64) -> f64 {
        let Some(&mean) = self.means.get(column) else {
            return value;
        };
        let mut std = self.stds.get(column).copied().unwrap_or(1.0);
        if std == 0.0 || !std.is_finite() {
            std = 1.0;
        }
        (value - mean) / std
    }

    /// Whether any column statistics are loaded.
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }

    /// Number of columns with statistics.
    pub fn column_count(&self) -> usize {
        self.means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reference.csv");
        let mut f = File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_from_csv_numeric_columns() {
        let (_dir, path) = write_csv("age,gender,score\n20,Male,1.0\n30,Female,2.0\n40,Other,3.0\n");
        let stats = FeatureStats::from_csv(&path).unwrap();

        assert!((stats.mean("age") - 30.0).abs() < 1e-9);
        // Sample std of [20, 30, 40] is 10
        assert!((stats.std("age") - 10.0).abs() < 1e-9);
        assert!((stats.mean("score") - 2.0).abs() < 1e-9);

        // String column dropped entirely
        assert!(!stats.has_column("gender"));
        assert_eq!(stats.column_count(), 2);
    }

    #[test]
    fn test_scale_known_column() {
        let stats = FeatureStats::from_pairs(vec![("age".to_string(), 30.0, 10.0)]);
        assert!((stats.scale("age", 40.0) - 1.0).abs() < 1e-9);
        assert!((stats.scale("age", 30.0)).abs() < 1e-9);
    }

    #[test]
    fn test_scale_zero_std_floored_to_one() {
        let stats = FeatureStats::from_pairs(vec![("constant".to_string(), 5.0, 0.0)]);
        // Divisor forced to 1, so the column maps to value - mean
        assert!((stats.scale("constant", 8.0) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_unknown_column_unchanged() {
        let stats = FeatureStats::empty();
        assert!((stats.scale("mystery", 42.0) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_column_defaults() {
        let stats = FeatureStats::empty();
        assert!((stats.mean("anything")).abs() < 1e-9);
        assert!((stats.std("anything") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let stats = FeatureStats::load_or_default(&dir.path().join("nope.csv"));
        assert!(stats.is_empty());
    }

    #[test]
    fn test_constant_column_std_is_zero() {
        let (_dir, path) = write_csv("flag\n1\n1\n1\n");
        let stats = FeatureStats::from_csv(&path).unwrap();
        assert!((stats.mean("flag") - 1.0).abs() < 1e-9);
        assert!(stats.std("flag").abs() < 1e-9);
    }
}
