//! Error types for the ipc crate

use thiserror::Error;

/// Transport-level errors
#[derive(Error, Debug)]
pub enum IpcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Signal log not created yet: {0}")]
    LogMissing(String),
}

pub type IpcResult<T> = std::result::Result<T, IpcError>;
