//! Gen-mappings command - build the categorical mapping table from a dataset
//!
//! Distinct values per categorical column get integer codes in
//! first-appearance order, starting at 1. Code 0 is never assigned; the
//! encoder returns it for values unseen here.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;
use csv::ReaderBuilder;

use soulsync::config::CategoryMappings;
use soulsync::predictor::ArtifactPaths;

/// Columns the feature schema encodes through the mapping table.
const CATEGORICAL_COLUMNS: &[&str] = &[
    "gender",
    "location",
    "zodiac_sign",
    "relationship_goal",
    "fav_music_genre",
];

pub fn run(paths: &ArtifactPaths, dataset: &Path, output: Option<&Path>) -> Result<()> {
    let file = File::open(dataset)
        .with_context(|| format!("failed to open dataset {}", dataset.display()))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .context("failed to read CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let targets: Vec<(usize, &str)> = CATEGORICAL_COLUMNS
        .iter()
        .filter_map(|&name| {
            headers
                .iter()
                .position(|h| h == name)
                .map(|idx| (idx, name))
        })
        .collect();

    if targets.is_empty() {
        bail!(
            "dataset {} has none of the categorical columns ({})",
            dataset.display(),
            CATEGORICAL_COLUMNS.join(", ")
        );
    }

    let mut columns: HashMap<String, HashMap<String, i64>> = HashMap::new();
    for &(_, name) in &targets {
        columns.insert(name.to_string(), HashMap::new());
    }

    for record in rdr.records() {
        let record = record.with_context(|| format!("malformed row in {}", dataset.display()))?;
        for &(idx, name) in &targets {
            let Some(raw) = record.get(idx).map(str::trim).filter(|s| !s.is_empty()) else {
                continue;
            };
            if let Some(column) = columns.get_mut(name) {
                if !column.contains_key(raw) {
                    let code = column.len() as i64 + 1;
                    column.insert(raw.to_string(), code);
                }
            }
        }
    }

    let output_path = output.unwrap_or(&paths.mappings);
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let table = CategoryMappings::from_columns(columns.clone());
    table
        .save(output_path)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!(
        "{} Mapping table written to {}",
        style("✓").green(),
        output_path.display()
    );
    let mut names: Vec<&String> = columns.keys().collect();
    names.sort();
    for name in names {
        println!("  {:<20} {} values", name, columns[name].len());
    }

    let missing: Vec<&str> = CATEGORICAL_COLUMNS
        .iter()
        .filter(|&&name| !targets.iter().any(|&(_, t)| t == name))
        .copied()
        .collect();
    if !missing.is_empty() {
        println!(
            "{} Dataset is missing columns: {}",
            style("○").yellow(),
            missing.join(", ")
        );
    }

    Ok(())
}
