//! Online feature computation and signal prediction
//!
//! Turns a stream of quotes into a stream of discrete trading signals:
//! a [`FeatureStream`] derives a feature vector per quote from rolling
//! windows, and a [`SignalPredictor`] maps that vector through a model
//! capability and a probability-threshold policy.

pub mod error;
pub mod features;
pub mod model;
pub mod predictor;

pub use error::ModelError;
pub use features::{FeatureConfig, FeatureStream, FeatureVector};
pub use model::{ConstantModel, ModelArtifact, ProbabilityModel};
pub use predictor::{SignalPredictor, ThresholdPolicy};
