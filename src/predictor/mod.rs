//! Prediction pipeline
//!
//! Ties the stages together: profile encoding, z-score scaling, classifier
//! inference, and heuristic post-processing. `PredictionPipeline` owns the
//! loaded artifacts (category mappings, feature statistics, and optionally
//! the trained model) and exposes both stage-level and end-to-end entry
//! points.

pub mod features;
pub mod model;
pub mod postprocess;
pub mod sentiment;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

use crate::config::{CategoryMappings, FeatureStats};
use crate::models::{Prediction, UserProfile};

pub use features::{build_feature_vector, FeatureVector, RawFeatures, FEATURE_NAMES, NUM_FEATURES};
pub use model::{CompatibilityModel, ProbabilityPair};
pub use postprocess::post_process;
pub use sentiment::analyze_bio;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures surfaced by the prediction pipeline.
#[derive(Debug, Error)]
pub enum PredictError {
    /// No trained model is loaded; encoding and scaling still work, but
    /// inference cannot run.
    #[error("no compatibility model loaded")]
    ModelUnavailable,

    /// The underlying classifier failed to produce a prediction.
    #[error("inference failed: {0}")]
    Inference(String),
}

pub type PredictResult<T> = Result<T, PredictError>;

// ---------------------------------------------------------------------------
// Artifact locations
// ---------------------------------------------------------------------------

/// Filesystem locations of the three runtime artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    /// Categorical value-to-code mapping table (JSON).
    pub mappings: PathBuf,
    /// Reference dataset used to derive feature means and stds (CSV).
    pub stats: PathBuf,
    /// Trained compatibility model (gbdt-rs native JSON).
    pub model: PathBuf,
}

impl ArtifactPaths {
    /// Resolve artifact paths under the given data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            mappings: dir.join("mappings.json"),
            stats: dir.join("reference_dataset.csv"),
            model: dir.join("compatibility_model.json"),
        }
    }

    /// Default locations under the platform data directory
    /// (e.g. `~/.local/share/soulsync/` on Linux).
    pub fn default_locations() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("soulsync");
        Self::in_dir(&base)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// End-to-end prediction pipeline holding the loaded artifacts.
pub struct PredictionPipeline {
    mappings: CategoryMappings,
    stats: FeatureStats,
    model: Option<CompatibilityModel>,
}

impl PredictionPipeline {
    /// Build a pipeline from already-loaded components.
    pub fn new(
        mappings: CategoryMappings,
        stats: FeatureStats,
        model: Option<CompatibilityModel>,
    ) -> Self {
        Self {
            mappings,
            stats,
            model,
        }
    }

    /// Load a pipeline from artifact paths.
    ///
    /// Missing or malformed mapping and statistics files degrade to empty
    /// tables (encoding falls back to code 0, scaling becomes identity). A
    /// missing or unreadable model leaves the pipeline without inference;
    /// `predict` then returns [`PredictError::ModelUnavailable`].
    pub fn from_paths(paths: &ArtifactPaths) -> Self {
        let mappings = CategoryMappings::load_or_default(&paths.mappings);
        let stats = FeatureStats::load_or_default(&paths.stats);

        let model = if paths.model.exists() {
            match CompatibilityModel::load(&paths.model) {
                Ok(m) => Some(m),
                Err(e) => {
                    warn!(path = %paths.model.display(), error = %e, "failed to load model");
                    None
                }
            }
        } else {
            warn!(path = %paths.model.display(), "model file not found, inference disabled");
            None
        };

        Self::new(mappings, stats, model)
    }

    /// Whether a trained model is loaded and inference can run.
    pub fn model_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn mappings(&self) -> &CategoryMappings {
        &self.mappings
    }

    pub fn stats(&self) -> &FeatureStats {
        &self.stats
    }

    /// Encode and scale a profile into a finished feature vector.
    pub fn build_feature_vector(&self, profile: &UserProfile) -> FeatureVector {
        build_feature_vector(profile, &self.mappings, &self.stats)
    }

    /// Run classifier inference on a finished feature vector.
    pub fn predict(&self, vector: &FeatureVector) -> PredictResult<ProbabilityPair> {
        let model = self.model.as_ref().ok_or(PredictError::ModelUnavailable)?;
        model.predict(vector).map_err(PredictError::Inference)
    }

    /// Full pass: profile in, assembled prediction out.
    pub fn predict_profile(&self, profile: &UserProfile) -> PredictResult<Prediction> {
        let vector = self.build_feature_vector(profile);
        let probabilities = self.predict(&vector)?;
        Ok(post_process(profile, probabilities))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
