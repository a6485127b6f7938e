//! Error types for the signal crate

use thiserror::Error;

/// Model artifact and evaluation errors
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed model artifact: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("artifact schema mismatch: {expected} feature names, {got} weights")]
    SchemaMismatch { expected: usize, got: usize },

    #[error("model evaluation failed: {0}")]
    Evaluation(String),
}
