//! Append-only signal log
//!
//! The producer appends one record per signal; the engine tails the file
//! with a monotonically advancing byte cursor it owns. Delivery is
//! at-most-once: there is no consumer ack, so a record appended but never
//! read (crash, early exit) is a genuine loss, not a duplicate.

use crate::error::{IpcError, IpcResult};
use iris_core::{Signal, SignalDirection};
use serde::Serialize;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Running delivery counters, one writer per process
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DeliveryCounters {
    pub total: u64,
    pub buy: u64,
    pub sell: u64,
    pub neutral: u64,
}

impl DeliveryCounters {
    pub fn record(&mut self, direction: SignalDirection) {
        self.total += 1;
        match direction {
            SignalDirection::Up => self.buy += 1,
            SignalDirection::Down => self.sell += 1,
            SignalDirection::Neutral => self.neutral += 1,
        }
    }
}

impl fmt::Display for DeliveryCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total={} buy={} sell={} neutral={}",
            self.total, self.buy, self.sell, self.neutral
        )
    }
}

/// Producer half of the signal channel
///
/// Created only after the handshake succeeds; a pre-existing log from an
/// earlier run is truncated so the engine never replays stale signals.
pub struct SignalWriter {
    file: File,
    path: PathBuf,
    counters: DeliveryCounters,
}

impl SignalWriter {
    /// Create (or truncate) the signal log
    pub fn create(path: impl Into<PathBuf>) -> IpcResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        Ok(Self {
            file,
            path,
            counters: DeliveryCounters::default(),
        })
    }

    /// Append one record, flushed and fsynced before returning
    ///
    /// No batching: a crash after `emit` returns can never lose the signal.
    pub fn emit(&mut self, signal: &Signal) -> IpcResult<()> {
        let line = signal.wire_line();
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        self.file.flush()?;
        self.file.sync_data()?;
        self.counters.record(signal.direction);
        Ok(())
    }

    pub fn counters(&self) -> DeliveryCounters {
        self.counters
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Consumer half of the signal channel
///
/// Each poll re-opens the log and reads forward from the saved cursor.
/// Only complete lines are consumed; a partial trailing line (an append
/// racing the read) is left for the next poll.
pub struct SignalReader {
    path: PathBuf,
    offset: u64,
    counters: DeliveryCounters,
    malformed: u64,
}

impl SignalReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            counters: DeliveryCounters::default(),
            malformed: 0,
        }
    }

    /// Drain all complete records appended since the last poll
    ///
    /// An absent log file is not an error; the producer simply has not
    /// started sending yet.
    pub fn poll(&mut self) -> IpcResult<Vec<Signal>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path).map_err(|e| {
            IpcError::LogMissing(format!("{}: {}", self.path.display(), e))
        })?;
        file.seek(SeekFrom::Start(self.offset))?;
        let mut tail = String::new();
        file.read_to_string(&mut tail)?;

        // Consume up to the last newline only
        let consumable = match tail.rfind('\n') {
            Some(idx) => &tail[..=idx],
            None => return Ok(Vec::new()),
        };
        self.offset += consumable.len() as u64;

        let mut signals = Vec::new();
        for line in consumable.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match Signal::from_wire_line(line) {
                Some(signal) => {
                    self.counters.record(signal.direction);
                    signals.push(signal);
                }
                None => {
                    self.malformed += 1;
                    warn!(line = %line, "malformed signal record skipped");
                }
            }
        }
        Ok(signals)
    }

    /// Byte position of the read cursor
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn counters(&self) -> DeliveryCounters {
        self.counters
    }

    /// Lines that failed to parse since construction
    pub fn malformed(&self) -> u64 {
        self.malformed
    }
}
