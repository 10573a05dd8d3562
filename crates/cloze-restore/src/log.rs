//! Restore log
//!
//! Batch-level record of what the restore steps reported. Every entry is
//! also emitted as a `tracing` event.

use cloze_codec::RecordId;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Progress detail
    Info,
    /// Data problem worked around
    Warn,
    /// Record could not be recoded
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        })
    }
}

/// One log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Question the entry is about
    pub item: Option<RecordId>,
    /// Message text
    pub message: String,
}

/// Append-only log shared by the restore steps
#[derive(Debug, Default)]
pub struct RestoreLog {
    inner: Mutex<Vec<LogEntry>>,
}

impl RestoreLog {
    /// Create empty log
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn record(&self, level: LogLevel, item: Option<RecordId>, message: impl Into<String>) {
        let message = message.into();
        let question = item.map(RecordId::get);
        match level {
            LogLevel::Info => tracing::info!(?question, "{message}"),
            LogLevel::Warn => tracing::warn!(?question, "{message}"),
            LogLevel::Error => tracing::error!(?question, "{message}"),
        }
        self.inner.lock().push(LogEntry {
            level,
            item,
            message,
        });
    }

    /// Append an info entry
    #[inline]
    pub fn info(&self, item: Option<RecordId>, message: impl Into<String>) {
        self.record(LogLevel::Info, item, message);
    }

    /// Append a warning
    #[inline]
    pub fn warn(&self, item: Option<RecordId>, message: impl Into<String>) {
        self.record(LogLevel::Warn, item, message);
    }

    /// Append an error
    #[inline]
    pub fn error(&self, item: Option<RecordId>, message: impl Into<String>) {
        self.record(LogLevel::Error, item, message);
    }

    /// Copy of all entries
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.inner.lock().clone()
    }

    /// Entries at `level`
    #[must_use]
    pub fn at_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.inner
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }

    /// Take all entries, leaving the log empty
    pub fn drain(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.inner.lock())
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check if log is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
