//! Model artifact handle
//!
//! The producer treats the trained model as an opaque capability: an
//! ordered list of expected feature names plus a probability-of-up
//! estimate. The concrete artifact here is a logistic model exported to
//! JSON by the offline training pipeline; anything implementing
//! [`ProbabilityModel`] can stand in for it.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Opaque prediction capability loaded once at startup
pub trait ProbabilityModel: Send {
    /// Feature names in the order the model expects them
    fn feature_names(&self) -> &[String];

    /// Probability-of-up estimate in [0, 1] for one ordered feature array
    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError>;
}

/// Logistic model artifact exported by the training pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl ModelArtifact {
    /// Load and validate an artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&contents)?;
        if artifact.weights.len() != artifact.feature_names.len() {
            return Err(ModelError::SchemaMismatch {
                expected: artifact.feature_names.len(),
                got: artifact.weights.len(),
            });
        }
        Ok(artifact)
    }
}

impl ProbabilityModel for ModelArtifact {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_probability(&self, features: &[f64]) -> Result<f64, ModelError> {
        if features.len() != self.weights.len() {
            return Err(ModelError::Evaluation(format!(
                "expected {} features, got {}",
                self.weights.len(),
                features.len()
            )));
        }
        let z: f64 = self.bias
            + self
                .weights
                .iter()
                .zip(features)
                .map(|(w, x)| w * x)
                .sum::<f64>();
        let p = 1.0 / (1.0 + (-z).exp());
        if !p.is_finite() {
            return Err(ModelError::Evaluation(format!(
                "non-finite probability from logit {}",
                z
            )));
        }
        Ok(p)
    }
}

/// Model that always returns the same probability
///
/// Useful for dry runs and deterministic end-to-end tests.
#[derive(Debug, Clone)]
pub struct ConstantModel {
    probability: f64,
    feature_names: Vec<String>,
}

impl ConstantModel {
    pub fn new(probability: f64, feature_names: Vec<String>) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
            feature_names,
        }
    }
}

impl ProbabilityModel for ConstantModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_probability(&self, _features: &[f64]) -> Result<f64, ModelError> {
        Ok(self.probability)
    }
}
