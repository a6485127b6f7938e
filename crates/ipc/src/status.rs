//! Durable single-line status slot
//!
//! A status slot is a tiny file holding exactly one state token. The owning
//! process fully rewrites it (truncate + write + flush + fsync) on every
//! transition, so readers either see the previous token or the new one,
//! never a torn write.

use crate::error::IpcResult;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Single-writer / multi-reader key-value slot backed by a small file
#[derive(Debug, Clone)]
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the slot with a new token, durably
    ///
    /// The write is flushed and fsynced before returning, guaranteeing the
    /// peer never observes a partially written status.
    pub fn write(&self, token: &str) -> IpcResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = File::create(&self.path)?;
        file.write_all(token.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }

    /// Read the current token
    ///
    /// Returns `None` when the slot does not exist or cannot be read; read
    /// failures are logged and treated as "unknown", never propagated.
    pub fn read(&self) -> Option<String> {
        if !self.path.exists() {
            return None;
        }
        match fs::read_to_string(&self.path) {
            Ok(contents) => Some(contents.trim().to_string()),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "status slot read failed");
                None
            }
        }
    }

    /// Whether the slot file exists at all
    ///
    /// Distinguishes "peer never started" from "peer started but not ready".
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}
