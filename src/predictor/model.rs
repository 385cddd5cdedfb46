//! GBDT model adapter
//!
//! Wraps the `gbdt` crate to provide:
//! - Model loading from the serialized native JSON format
//! - Single inference returning a class-probability pair
//! - Training and saving helpers for building new models from labelled data
//!
//! The classifier produces probabilities via the `LogLikelyhood` loss
//! (binary classification), interpreting label 1.0 as conversation-success
//! and -1.0 as failure.
//!
//! Note: the gbdt crate internally uses `f32` (`ValueType`), while the
//! feature vector stores `f64`. Conversions happen transparently at the
//! crate boundary.

use std::path::Path;

use gbdt::config::Config;
use gbdt::decision_tree::Data;
use gbdt::gradient_boost::GBDT;

use super::features::FeatureVector;

#[inline]
fn vector_to_f32(vector: &FeatureVector) -> Vec<f32> {
    vector.values.iter().map(|&v| v as f32).collect()
}

// ---------------------------------------------------------------------------
// Prediction output
// ---------------------------------------------------------------------------

/// Class probabilities for the binary conversation outcome.
#[derive(Debug, Clone, Copy)]
pub struct ProbabilityPair {
    /// Probability of class 0 (the conversation fizzles out).
    pub failure: f64,
    /// Probability of class 1 (the conversation succeeds).
    pub success: f64,
}

impl ProbabilityPair {
    /// Build a pair from the raw success probability.
    pub fn from_success(success: f64) -> Self {
        let success = success.clamp(0.0, 1.0);
        Self {
            failure: 1.0 - success,
            success,
        }
    }
}

// ---------------------------------------------------------------------------
// Model wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around `gbdt::gradient_boost::GBDT` providing a
/// feature-vector-aware inference interface.
pub struct CompatibilityModel {
    model: GBDT,
}

impl CompatibilityModel {
    /// Load a model from the gbdt-rs native JSON format on disk.
    ///
    /// This is the format produced by `save_model`.
    pub fn load(path: &Path) -> Result<Self, String> {
        let path_str = path
            .to_str()
            .ok_or_else(|| "invalid UTF-8 in model path".to_string())?;
        let model =
            GBDT::load_model(path_str).map_err(|e| format!("failed to load GBDT model: {e}"))?;
        Ok(Self { model })
    }

    /// Load a model from a JSON string (gbdt-rs native format).
    pub fn from_json(json: &str) -> Result<Self, String> {
        let model: GBDT =
            serde_json::from_str(json).map_err(|e| format!("failed to parse GBDT JSON: {e}"))?;
        Ok(Self { model })
    }

    /// Wrap an already-trained `GBDT` instance.
    pub fn from_trained(model: GBDT) -> Self {
        Self { model }
    }

    /// Run inference on a single finished feature vector.
    pub fn predict(&self, vector: &FeatureVector) -> Result<ProbabilityPair, String> {
        let data = vec![Data::new_test_data(vector_to_f32(vector), None)];
        let preds = self.model.predict(&data);
        let success = preds
            .first()
            .copied()
            .ok_or_else(|| "model returned no prediction".to_string())?;
        Ok(ProbabilityPair::from_success(f64::from(success)))
    }

    /// Return a reference to the underlying GBDT model.
    pub fn inner(&self) -> &GBDT {
        &self.model
    }
}

// ---------------------------------------------------------------------------
// Training helpers
// ---------------------------------------------------------------------------

/// Train a new GBDT model from labelled feature vectors.
///
/// - `vectors`: the scaled feature vectors for each sample
/// - `labels`: 1.0 for conversation-success, -1.0 for failure (LogLikelyhood convention)
/// - `num_trees`: number of boosting iterations (e.g. 100)
/// - `max_depth`: maximum tree depth (e.g. 6)
/// - `learning_rate`: shrinkage / step size (e.g. 0.1)
///
/// Returns the trained `GBDT` model.
pub fn train_model(
    vectors: &[FeatureVector],
    labels: &[f64],
    num_trees: usize,
    max_depth: u32,
    learning_rate: f64,
) -> Result<GBDT, String> {
    if vectors.is_empty() {
        return Err("no training samples provided".into());
    }
    if vectors.len() != labels.len() {
        return Err(format!(
            "sample count ({}) does not match label count ({})",
            vectors.len(),
            labels.len()
        ));
    }

    let feature_size = vectors[0].values.len();

    let mut cfg = Config::new();
    cfg.set_feature_size(feature_size);
    cfg.set_max_depth(max_depth);
    cfg.set_iterations(num_trees);
    cfg.set_shrinkage(learning_rate as f32);
    cfg.set_loss("LogLikelyhood");
    cfg.set_debug(false);
    cfg.set_training_optimization_level(2);
    cfg.set_min_leaf_size(1);

    let mut gbdt = GBDT::new(&cfg);

    let mut training_data: Vec<Data> = vectors
        .iter()
        .zip(labels.iter())
        .map(|(v, &label)| Data::new_training_data(vector_to_f32(v), 1.0_f32, label as f32, None))
        .collect();

    gbdt.fit(&mut training_data);

    Ok(gbdt)
}

/// Save a trained GBDT model to disk (gbdt-rs native JSON format).
pub fn save_model(model: &GBDT, path: &Path) -> Result<(), String> {
    let path_str = path
        .to_str()
        .ok_or_else(|| "invalid UTF-8 in model path".to_string())?;
    model
        .save_model(path_str)
        .map_err(|e| format!("failed to save GBDT model: {e}"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::features::NUM_FEATURES;

    /// Build a synthetic feature vector with deterministic values.
    fn make_vector(seed: f64) -> FeatureVector {
        let mut values = [0.0_f64; NUM_FEATURES];
        for (i, v) in values.iter_mut().enumerate() {
            *v = (seed + i as f64 * 0.1).sin().abs();
        }
        FeatureVector::new(values)
    }

    #[test]
    fn test_probability_pair_complement() {
        let pair = ProbabilityPair::from_success(0.85);
        assert!((pair.success - 0.85).abs() < f64::EPSILON);
        assert!((pair.failure - 0.15).abs() < f64::EPSILON);
        assert!((pair.success + pair.failure - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_probability_pair_clamps_out_of_range() {
        let high = ProbabilityPair::from_success(1.7);
        assert!((high.success - 1.0).abs() < f64::EPSILON);
        assert!(high.failure.abs() < f64::EPSILON);

        let low = ProbabilityPair::from_success(-0.3);
        assert!(low.success.abs() < f64::EPSILON);
        assert!((low.failure - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_train_and_predict() {
        // Synthetic data: two clusters with distinct seeds.
        let mut vectors = Vec::new();
        let mut labels = Vec::new();

        for i in 0..25 {
            vectors.push(make_vector(i as f64));
            labels.push(1.0);
        }
        for i in 100..125 {
            vectors.push(make_vector(i as f64));
            labels.push(-1.0);
        }

        let model = train_model(&vectors, &labels, 10, 3, 0.3).expect("training should succeed");
        let adapter = CompatibilityModel::from_trained(model);

        // The clusters might not be perfectly separable with 10 trees, so we
        // only assert the probabilities are valid.
        let pair_a = adapter.predict(&make_vector(5.0)).expect("predict");
        let pair_b = adapter.predict(&make_vector(110.0)).expect("predict");
        assert!(
            (0.0..=1.0).contains(&pair_a.success),
            "success probability should be in [0, 1], got {}",
            pair_a.success,
        );
        assert!(
            (0.0..=1.0).contains(&pair_b.success),
            "success probability should be in [0, 1], got {}",
            pair_b.success,
        );
    }

    #[test]
    fn test_train_validation_errors() {
        // Empty samples.
        let result = train_model(&[], &[], 10, 3, 0.3);
        match result {
            Err(e) => assert!(
                e.contains("no training samples"),
                "expected 'no training samples' error, got: {e}"
            ),
            Ok(_) => panic!("expected error for empty samples"),
        }

        // Mismatched lengths.
        let vectors = vec![make_vector(1.0), make_vector(2.0)];
        let labels = vec![1.0];
        let result = train_model(&vectors, &labels, 10, 3, 0.3);
        match result {
            Err(e) => assert!(
                e.contains("does not match"),
                "expected 'does not match' error, got: {e}"
            ),
            Ok(_) => panic!("expected error for mismatched lengths"),
        }
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut vectors = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10 {
            vectors.push(make_vector(i as f64));
            labels.push(if i < 5 { 1.0 } else { -1.0 });
        }

        let model = train_model(&vectors, &labels, 5, 2, 0.3).expect("training should succeed");

        let tmp = tempfile::NamedTempFile::new().expect("create temp file");
        let path = tmp.path().to_path_buf();
        save_model(&model, &path).expect("save should succeed");

        let loaded = CompatibilityModel::load(&path).expect("load should succeed");

        let test_vector = make_vector(3.0);
        let original = CompatibilityModel::from_trained(model);
        let pair_original = original.predict(&test_vector).expect("predict");
        let pair_loaded = loaded.predict(&test_vector).expect("predict");

        assert!(
            (pair_original.success - pair_loaded.success).abs() < 1e-6,
            "loaded model predictions should match original: {} vs {}",
            pair_original.success,
            pair_loaded.success,
        );
    }

    #[test]
    fn test_from_json_roundtrip() {
        let mut vectors = Vec::new();
        let mut labels = Vec::new();
        for i in 0..10 {
            vectors.push(make_vector(i as f64));
            labels.push(if i < 5 { 1.0 } else { -1.0 });
        }

        let model = train_model(&vectors, &labels, 5, 2, 0.3).expect("training should succeed");
        let json = serde_json::to_string(&model).expect("serialise should succeed");

        let adapter = CompatibilityModel::from_json(&json).expect("from_json should succeed");
        let pair = adapter.predict(&make_vector(3.0)).expect("predict");
        assert!((0.0..=1.0).contains(&pair.success));
    }
}
