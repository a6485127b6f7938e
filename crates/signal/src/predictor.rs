//! Signal prediction with a probability-threshold dead zone
//!
//! Maps a feature vector through the model capability and a threshold
//! policy. The [0.45, 0.55] band is a deliberate dead zone that maps to a
//! neutral signal, suppressing low-conviction trades. When no model is
//! loaded the predictor runs in an explicit, logged degraded mode that
//! draws random probabilities, never a silent substitution.

use crate::features::FeatureVector;
use crate::model::ProbabilityModel;
use iris_core::{Signal, SignalDirection};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Probability thresholds around the neutral dead zone
///
/// Hand-tuned constants carried as configuration so they can be
/// studied without a rebuild.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdPolicy {
    /// Strictly above -> direction +1
    pub upper: f64,
    /// Strictly below -> direction -1
    pub lower: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            upper: 0.55,
            lower: 0.45,
        }
    }
}

impl ThresholdPolicy {
    /// Map a probability to a direction; the boundary values themselves
    /// fall in the dead zone (strict comparisons on both sides)
    pub fn decide(&self, probability: f64) -> SignalDirection {
        if probability > self.upper {
            SignalDirection::Up
        } else if probability < self.lower {
            SignalDirection::Down
        } else {
            SignalDirection::Neutral
        }
    }
}

enum PredictMode {
    Model(Box<dyn ProbabilityModel>),
    /// Declared random fallback for degraded-mode operation
    Random(StdRng),
}

/// Maps feature vectors to discrete signals
pub struct SignalPredictor {
    mode: PredictMode,
    feature_names: Vec<String>,
    policy: ThresholdPolicy,
}

impl SignalPredictor {
    /// Predictor backed by a loaded model capability
    pub fn with_model(model: Box<dyn ProbabilityModel>, policy: ThresholdPolicy) -> Self {
        let feature_names = model.feature_names().to_vec();
        Self {
            mode: PredictMode::Model(model),
            feature_names,
            policy,
        }
    }

    /// Explicit degraded mode: random probabilities through the same policy
    ///
    /// Used when the model artifact is unavailable. The mode is announced
    /// loudly so tests and operators can never mistake it for real output.
    pub fn degraded(
        feature_names: Vec<String>,
        policy: ThresholdPolicy,
        seed: Option<u64>,
    ) -> Self {
        warn!("no model capability available; running in DEGRADED random-signal mode");
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            mode: PredictMode::Random(rng),
            feature_names,
            policy,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.mode, PredictMode::Random(_))
    }

    /// Feature names in the order the model expects
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn policy(&self) -> ThresholdPolicy {
        self.policy
    }

    /// Map one feature vector to a signal
    ///
    /// Missing or non-finite features default to 0.0. Any model failure
    /// degrades to a neutral signal rather than propagating: a stalled
    /// stream is worse than one incorrect neutral tick.
    pub fn predict(&mut self, features: &FeatureVector) -> Signal {
        let probability = match &mut self.mode {
            PredictMode::Random(rng) => rng.gen_range(0.0..1.0),
            PredictMode::Model(model) => {
                let ordered: Vec<f64> = self
                    .feature_names
                    .iter()
                    .map(|name| {
                        features
                            .get(name)
                            .copied()
                            .filter(|v| v.is_finite())
                            .unwrap_or(0.0)
                    })
                    .collect();
                match model.predict_probability(&ordered) {
                    Ok(p) => p.clamp(0.0, 1.0),
                    Err(e) => {
                        warn!(error = %e, "prediction failed; emitting neutral signal");
                        return Signal::neutral();
                    }
                }
            }
        };
        Signal::new(self.policy.decide(probability), probability)
    }
}
