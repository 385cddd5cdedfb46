//! CLI command definitions and handlers

mod doctor;
mod gen_mappings;
mod predict;
mod train;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use soulsync::predictor::ArtifactPaths;

/// Parse and validate boosting iteration count (1-1000)
fn parse_trees(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("trees must be at least 1".to_string())
    } else if n > 1000 {
        Err("trees cannot exceed 1000".to_string())
    } else {
        Ok(n)
    }
}

/// SoulSync - compatibility prediction
///
/// 100% LOCAL - No account needed. No data leaves your machine.
#[derive(Parser, Debug)]
#[command(name = "soulsync")]
#[command(
    version,
    about = "Compatibility prediction engine for dating profiles",
    long_about = "SoulSync encodes a dating profile into a fixed feature vector, runs it \
through a gradient-boosted classifier, and derives match insights: compatibility \
and ghosting scores, a safety heuristic, icebreakers, personality flags, and a \
projected relationship timeline.\n\n\
100% LOCAL - No account needed. No data leaves your machine.",
    after_help = "\
Examples:
  soulsync predict profile.json              Predict from a profile file
  soulsync predict profile.json -f json      JSON output for scripting
  soulsync train dataset.csv                 Train a model from labelled data
  soulsync gen-mappings dataset.csv          Rebuild the categorical mapping table
  soulsync doctor                            Check artifact setup"
)]
pub struct Cli {
    /// Directory holding runtime artifacts (mapping table, reference dataset, model)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Mapping table path (overrides the data directory location)
    #[arg(long, global = true)]
    pub mappings: Option<PathBuf>,

    /// Reference dataset path (overrides the data directory location)
    #[arg(long, global = true)]
    pub stats: Option<PathBuf>,

    /// Model path (overrides the data directory location)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full prediction pipeline on a profile JSON file
    #[command(after_help = "\
Examples:
  soulsync predict profile.json                      Text report
  soulsync predict profile.json --format json        JSON output for scripting
  soulsync predict profile.json --model my.json      Use a specific model file")]
    Predict {
        /// Path to the profile JSON file
        profile: PathBuf,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Train a compatibility model from a labelled CSV dataset
    ///
    /// The dataset needs the profile columns plus a `conversation_success`
    /// label column (1 = the conversation clicked, 0 = it fizzled).
    #[command(after_help = "\
Examples:
  soulsync train dataset.csv                         Train and install the model
  soulsync train dataset.csv --trees 200 --depth 8   Heavier model
  soulsync train dataset.csv -o model.json           Write the model elsewhere")]
    Train {
        /// Path to the labelled dataset CSV
        dataset: PathBuf,

        /// Output model path (default: the data directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Number of boosting iterations (1-1000)
        #[arg(long, default_value = "100", value_parser = parse_trees)]
        trees: usize,

        /// Maximum tree depth
        #[arg(long, default_value = "6")]
        depth: u32,

        /// Shrinkage / step size
        #[arg(long, default_value = "0.1")]
        learning_rate: f64,
    },

    /// Generate the categorical mapping table from a dataset
    ///
    /// Distinct values per categorical column are assigned integer codes in
    /// first-appearance order, starting at 1. Code 0 stays reserved for
    /// values unseen at prediction time.
    GenMappings {
        /// Path to the dataset CSV
        dataset: PathBuf,

        /// Output mapping table path (default: the data directory)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Check artifact setup (mapping table, reference dataset, model)
    Doctor,

    /// Show version information
    Version,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let mut paths = match &cli.data_dir {
        Some(dir) => ArtifactPaths::in_dir(dir),
        None => ArtifactPaths::default_locations(),
    };
    if let Some(mappings) = &cli.mappings {
        paths.mappings = mappings.clone();
    }
    if let Some(stats) = &cli.stats {
        paths.stats = stats.clone();
    }
    if let Some(model) = &cli.model {
        paths.model = model.clone();
    }

    match cli.command {
        Commands::Predict { profile, format } => predict::run(&paths, &profile, &format),

        Commands::Train {
            dataset,
            output,
            trees,
            depth,
            learning_rate,
        } => train::run(
            &paths,
            &dataset,
            output.as_deref(),
            trees,
            depth,
            learning_rate,
        ),

        Commands::GenMappings { dataset, output } => {
            gen_mappings::run(&paths, &dataset, output.as_deref())
        }

        Commands::Doctor => doctor::run(&paths),

        Commands::Version => {
            println!("soulsync {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
