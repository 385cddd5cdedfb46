//! Train command - fit a compatibility model from a labelled dataset
//!
//! The dataset CSV carries the profile columns plus a `conversation_success`
//! label column. Rows are decoded into profiles, encoded and scaled with the
//! same pipeline used at prediction time, and fed to the GBDT trainer.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;
use csv::{ReaderBuilder, StringRecord};
use tracing::warn;

use soulsync::config::{CategoryMappings, FeatureStats};
use soulsync::models::UserProfile;
use soulsync::predictor::model::{save_model, train_model};
use soulsync::predictor::{build_feature_vector, ArtifactPaths, FeatureVector};

const LABEL_COLUMN: &str = "conversation_success";

pub fn run(
    paths: &ArtifactPaths,
    dataset: &Path,
    output: Option<&Path>,
    trees: usize,
    depth: u32,
    learning_rate: f64,
) -> Result<()> {
    let (profiles, labels) = read_dataset(dataset)?;
    if profiles.is_empty() {
        bail!("dataset {} contains no usable rows", dataset.display());
    }

    let mappings = CategoryMappings::load_or_default(&paths.mappings);
    if mappings.is_empty() {
        warn!(
            "mapping table is empty; categorical columns will all encode to 0. \
             Run 'soulsync gen-mappings {}' first for better models.",
            dataset.display()
        );
    }

    // The training dataset doubles as the reference for means and stds, so
    // prediction-time scaling sees the exact statistics training saw.
    let stats = FeatureStats::from_csv(dataset)
        .with_context(|| format!("failed to compute feature stats from {}", dataset.display()))?;

    let vectors: Vec<FeatureVector> = profiles
        .iter()
        .map(|p| build_feature_vector(p, &mappings, &stats))
        .collect();

    let positives = labels.iter().filter(|&&l| l > 0.0).count();
    println!(
        "Training on {} samples ({} success, {} failure), {} trees, depth {}, lr {}",
        vectors.len(),
        positives,
        vectors.len() - positives,
        trees,
        depth,
        learning_rate
    );

    let model = train_model(&vectors, &labels, trees, depth, learning_rate)
        .map_err(|e| anyhow::anyhow!("training failed: {}", e))?;

    let model_path = output.unwrap_or(&paths.model);
    if let Some(parent) = model_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    save_model(&model, model_path).map_err(|e| anyhow::anyhow!("saving model failed: {}", e))?;
    println!(
        "{} Model saved to {}",
        style("✓").green(),
        model_path.display()
    );

    // Install the dataset as the reference dataset unless it already is.
    if dataset != paths.stats.as_path() {
        if let Some(parent) = paths.stats.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::copy(dataset, &paths.stats).with_context(|| {
            format!(
                "failed to install reference dataset at {}",
                paths.stats.display()
            )
        })?;
        println!(
            "{} Reference dataset installed to {}",
            style("✓").green(),
            paths.stats.display()
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Dataset decoding
// ---------------------------------------------------------------------------

fn read_dataset(path: &Path) -> Result<(Vec<UserProfile>, Vec<f64>)> {
    let file =
        File::open(path).with_context(|| format!("failed to open dataset {}", path.display()))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let index: HashMap<String, usize> = rdr
        .headers()
        .context("failed to read CSV headers")?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    if !index.contains_key(LABEL_COLUMN) {
        bail!(
            "dataset {} has no '{}' label column",
            path.display(),
            LABEL_COLUMN
        );
    }

    let mut profiles = Vec::new();
    let mut labels = Vec::new();
    let mut skipped = 0_usize;

    for record in rdr.records() {
        let record = record.with_context(|| format!("malformed row in {}", path.display()))?;
        match field_f64(&index, &record, LABEL_COLUMN) {
            Some(label) => {
                profiles.push(profile_from_record(&index, &record));
                // LogLikelyhood convention: 1.0 success, -1.0 failure
                labels.push(if label >= 0.5 { 1.0 } else { -1.0 });
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("skipped {} rows with a missing or unparsable label", skipped);
    }

    Ok((profiles, labels))
}

fn field<'r>(
    index: &HashMap<String, usize>,
    record: &'r StringRecord,
    name: &str,
) -> Option<&'r str> {
    index
        .get(name)
        .and_then(|&i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn field_f64(index: &HashMap<String, usize>, record: &StringRecord, name: &str) -> Option<f64> {
    field(index, record, name).and_then(|s| s.parse().ok())
}

fn field_bool(index: &HashMap<String, usize>, record: &StringRecord, name: &str) -> bool {
    match field(index, record, name) {
        Some(s) => match s.to_lowercase().as_str() {
            "true" | "yes" => true,
            "false" | "no" => false,
            other => other.parse::<f64>().map(|v| v != 0.0).unwrap_or(false),
        },
        None => false,
    }
}

fn field_string(
    index: &HashMap<String, usize>,
    record: &StringRecord,
    name: &str,
    default: &str,
) -> String {
    field(index, record, name).unwrap_or(default).to_string()
}

/// Decode a CSV row into a profile, falling back to profile defaults for
/// missing cells.
fn profile_from_record(index: &HashMap<String, usize>, record: &StringRecord) -> UserProfile {
    let defaults = UserProfile::default();
    let num = |name: &str, fallback: f64| field_f64(index, record, name).unwrap_or(fallback);

    UserProfile {
        age: field_f64(index, record, "age")
            .map(|v| v.max(0.0) as u32)
            .unwrap_or(defaults.age),
        gender: field_string(index, record, "gender", &defaults.gender),
        location: field_string(index, record, "location", &defaults.location),
        openness: num("openness", defaults.openness),
        extroversion: num("extroversion", defaults.extroversion),
        agreeableness: num("agreeableness", defaults.agreeableness),
        neuroticism: num("neuroticism", defaults.neuroticism),
        conscientiousness: num("conscientiousness", defaults.conscientiousness),
        words_of_affirmation: num("words_of_affirmation", defaults.words_of_affirmation),
        quality_time: num("quality_time", defaults.quality_time),
        gifts: num("gifts", defaults.gifts),
        physical_touch: num("physical_touch", defaults.physical_touch),
        acts_of_service: num("acts_of_service", defaults.acts_of_service),
        likes_music: field_bool(index, record, "likes_music"),
        likes_travel: field_bool(index, record, "likes_travel"),
        likes_pets: field_bool(index, record, "likes_pets"),
        foodie: field_bool(index, record, "foodie"),
        gym_person: field_bool(index, record, "gym_person"),
        movie_lover: field_bool(index, record, "movie_lover"),
        gamer: field_bool(index, record, "gamer"),
        reader: field_bool(index, record, "reader"),
        night_owl: field_bool(index, record, "night_owl"),
        early_bird: field_bool(index, record, "early_bird"),
        zodiac_sign: field_string(index, record, "zodiac_sign", &defaults.zodiac_sign),
        relationship_goal: field_string(
            index,
            record,
            "relationship_goal",
            &defaults.relationship_goal,
        ),
        fav_music_genre: field_string(index, record, "fav_music_genre", &defaults.fav_music_genre),
        bio_text: field_string(index, record, "bio_text", ""),
    }
}
