// Verbosity-gated logging policy shared by every toolkit component
// Records are emitted through tracing and can be captured for assertions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// How much the toolkit reports about the operations it runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// Only warnings
    #[default]
    None,
    /// Progress messages (deploys, invocations, transaction hashes)
    Some,
    /// Everything, including signed envelopes and raw simulation responses
    Full,
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Verbosity::None),
            "some" => Ok(Verbosity::Some),
            "full" => Ok(Verbosity::Full),
            other => Err(format!("Invalid verbosity '{}', expected none, some or full", other)),
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verbosity::None => "none",
            Verbosity::Some => "some",
            Verbosity::Full => "full",
        };
        f.write_str(name)
    }
}

/// Level attached to an emitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLevel {
    Warn,
    Some,
    Full,
}

/// A single emitted log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: RecordLevel,
    pub message: String,
}

/// Shared buffer of records emitted by a capturing logger
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogCapture {
    /// Snapshot of every record captured so far
    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    /// True if any record at `level` has exactly this message
    pub fn contains(&self, level: RecordLevel, message: &str) -> bool {
        self.records()
            .iter()
            .any(|record| record.level == level && record.message == message)
    }

    /// Messages of every captured record, in emission order
    pub fn messages(&self) -> Vec<String> {
        self.records().into_iter().map(|record| record.message).collect()
    }

    fn push(&self, record: LogRecord) {
        if let Ok(mut records) = self.records.lock() {
            records.push(record);
        }
    }
}

/// Logging policy handed to the address book, transaction helpers and managers
#[derive(Debug, Clone, Default)]
pub struct VerboseLogger {
    verbosity: Verbosity,
    capture: Option<LogCapture>,
}

impl VerboseLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            capture: None,
        }
    }

    /// Logger that also records every emitted line into the returned capture
    pub fn capturing(verbosity: Verbosity) -> (Self, LogCapture) {
        let capture = LogCapture::default();
        let logger = Self {
            verbosity,
            capture: Some(capture.clone()),
        };
        (logger, capture)
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Same sink, different verbosity
    pub fn with_verbosity(&self, verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            capture: self.capture.clone(),
        }
    }

    /// Whether a record at `level` passes the verbosity filter
    pub fn enabled(&self, level: RecordLevel) -> bool {
        match (self.verbosity, level) {
            (_, RecordLevel::Warn) => true,
            (Verbosity::None, _) => false,
            (Verbosity::Some, RecordLevel::Some) => true,
            (Verbosity::Some, RecordLevel::Full) => false,
            (Verbosity::Full, _) => true,
        }
    }

    /// Progress message, shown at `some` and `full`
    pub fn some(&self, message: impl Into<String>) {
        self.emit(RecordLevel::Some, message.into());
    }

    /// Detail message, shown only at `full`
    pub fn full(&self, message: impl Into<String>) {
        self.emit(RecordLevel::Full, message.into());
    }

    /// Warning, shown regardless of verbosity
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(RecordLevel::Warn, message.into());
    }

    fn emit(&self, level: RecordLevel, message: String) {
        if !self.enabled(level) {
            return;
        }

        match level {
            RecordLevel::Warn => warn!("{}", message),
            RecordLevel::Some => info!("{}", message),
            RecordLevel::Full => debug!("{}", message),
        }

        if let Some(capture) = &self.capture {
            capture.push(LogRecord { level, message });
        }
    }
}
