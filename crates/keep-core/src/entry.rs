//! Audit log entries.

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::enums::LogLevel;
use crate::time::log_timestamp;

/// One line of the audit log: `[<timestamp>] [<LEVEL>] - <message>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    /// Build an entry stamped at `at`.
    ///
    /// Line breaks in `message` are folded into spaces so an entry never spans
    /// more than one line of the log file.
    #[must_use]
    pub fn new(at: &DateTime<Local>, level: LogLevel, message: impl AsRef<str>) -> Self {
        let message = message
            .as_ref()
            .split(['\r', '\n'])
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            timestamp: log_timestamp(at),
            level,
            message,
        }
    }

    /// The formatted line, without a trailing newline.
    #[must_use]
    pub fn line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] [{}] - {}", self.timestamp, self.level, self.message)
    }
}
