//! Egress sinks: where formatted results leave the system

use crate::models::EgressRecord;
use crate::wire::{encode_egress, WireError};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("egress write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Encode(#[from] WireError),

    #[error("egress sink lock poisoned")]
    Poisoned,
}

/// Common interface for egress sinks
pub trait EgressSink: Send + Sync {
    fn send(&self, record: EgressRecord) -> Result<(), SinkError>;

    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Writes one JSON object per record, newline-terminated
pub struct JsonLinesSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer.into_inner().map_err(|_| SinkError::Poisoned)
    }
}

impl JsonLinesSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl JsonLinesSink<std::fs::File> {
    /// Append to `path`, creating it if needed
    pub fn append_to(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> EgressSink for JsonLinesSink<W> {
    fn send(&self, record: EgressRecord) -> Result<(), SinkError> {
        let line = encode_egress(&record)?;
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writeln!(writer, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps every record in memory, in send order
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<EgressRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<EgressRecord> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Drain collected records
    pub fn take(&self) -> Vec<EgressRecord> {
        std::mem::take(
            &mut *self
                .records
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl EgressSink for MemorySink {
    fn send(&self, record: EgressRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(record);
        Ok(())
    }
}
