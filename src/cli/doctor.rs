//! Doctor command - check artifact setup

use anyhow::Result;
use console::style;

use soulsync::config::{CategoryMappings, FeatureStats};
use soulsync::predictor::{ArtifactPaths, CompatibilityModel, NUM_FEATURES};

pub fn run(paths: &ArtifactPaths) -> Result<()> {
    println!("{}\n", style("SoulSync Doctor").bold());
    let mut healthy = true;

    println!(
        "{} Feature schema: {} columns",
        style("✓").green(),
        NUM_FEATURES
    );

    // Mapping table
    if paths.mappings.exists() {
        match CategoryMappings::load(&paths.mappings) {
            Ok(table) => println!(
                "{} Mapping table: {} columns ({})",
                style("✓").green(),
                table.column_count(),
                paths.mappings.display()
            ),
            Err(e) => {
                healthy = false;
                println!("{} Mapping table: unreadable ({})", style("✗").red(), e);
            }
        }
    } else {
        healthy = false;
        println!(
            "{} Mapping table: not found at {}",
            style("○").yellow(),
            paths.mappings.display()
        );
        println!("  Run 'soulsync gen-mappings <dataset.csv>' to create it");
    }

    // Reference dataset
    if paths.stats.exists() {
        match FeatureStats::from_csv(&paths.stats) {
            Ok(stats) => println!(
                "{} Reference dataset: {} numeric columns ({})",
                style("✓").green(),
                stats.column_count(),
                paths.stats.display()
            ),
            Err(e) => {
                healthy = false;
                println!("{} Reference dataset: unreadable ({})", style("✗").red(), e);
            }
        }
    } else {
        healthy = false;
        println!(
            "{} Reference dataset: not found at {}",
            style("○").yellow(),
            paths.stats.display()
        );
        println!("  'soulsync train <dataset.csv>' installs it automatically");
    }

    // Model
    if paths.model.exists() {
        match CompatibilityModel::load(&paths.model) {
            Ok(_) => {
                let trained = std::fs::metadata(&paths.model)
                    .and_then(|m| m.modified())
                    .map(|t| {
                        chrono::DateTime::<chrono::Local>::from(t)
                            .format("%Y-%m-%d %H:%M")
                            .to_string()
                    })
                    .unwrap_or_else(|_| "unknown".to_string());
                println!(
                    "{} Model: OK, trained {} ({})",
                    style("✓").green(),
                    trained,
                    paths.model.display()
                );
            }
            Err(e) => {
                healthy = false;
                println!("{} Model: unreadable ({})", style("✗").red(), e);
            }
        }
    } else {
        healthy = false;
        println!(
            "{} Model: not found at {}",
            style("○").yellow(),
            paths.model.display()
        );
        println!("  Run 'soulsync train <dataset.csv>' to train one");
    }

    println!();
    if healthy {
        println!("{}", style("All checks passed").green().bold());
    } else {
        println!(
            "{}",
            style("Some artifacts are missing; prediction may be degraded or unavailable")
                .yellow()
        );
    }
    Ok(())
}
