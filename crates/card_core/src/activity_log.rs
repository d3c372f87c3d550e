//! Bounded, newest-first history of session activity.

use std::{collections::VecDeque, fmt, str::FromStr};

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LOG_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Warning,
    Error,
}

impl LogKind {
    pub const ALL: [LogKind; 4] = [
        LogKind::Info,
        LogKind::Success,
        LogKind::Warning,
        LogKind::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn icon(self) -> char {
        match self {
            Self::Info => 'ℹ',
            Self::Success => '✓',
            Self::Warning => '⚠',
            Self::Error => '✗',
        }
    }
}

impl fmt::Display for LogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFilter {
    #[default]
    All,
    Only(LogKind),
}

impl LogFilter {
    pub fn matches(self, entry: &LogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => entry.kind == kind,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown log filter {0:?}; expected all, info, success, warning or error")]
pub struct LogFilterError(pub String);

impl FromStr for LogFilter {
    type Err = LogFilterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == "all" {
            return Ok(Self::All);
        }
        LogKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw)
            .map(Self::Only)
            .ok_or_else(|| LogFilterError(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LogCounts {
    pub info: usize,
    pub success: usize,
    pub warning: usize,
    pub error: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    last_id: u64,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends a new entry and evicts the oldest once the log is full.
    pub fn append(&mut self, message: impl Into<String>, kind: LogKind) -> &LogEntry {
        // Ids follow the wall clock but never repeat or go backwards.
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        self.last_id = now_ms.max(self.last_id + 1);

        self.entries.push_front(LogEntry {
            id: self.last_id,
            timestamp: Local::now().format("%-I:%M:%S %p").to_string(),
            message: message.into(),
            kind,
        });
        self.entries.truncate(LOG_CAPACITY);
        &self.entries[0]
    }

    pub fn info(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append(message, LogKind::Info)
    }

    pub fn success(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append(message, LogKind::Success)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append(message, LogKind::Warning)
    }

    pub fn error(&mut self, message: impl Into<String>) -> &LogEntry {
        self.append(message, LogKind::Error)
    }

    pub fn filter(&self, filter: LogFilter) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .collect()
    }

    pub fn counts(&self) -> LogCounts {
        self.entries
            .iter()
            .fold(LogCounts::default(), |mut counts, entry| {
                match entry.kind {
                    LogKind::Info => counts.info += 1,
                    LogKind::Success => counts.success += 1,
                    LogKind::Warning => counts.warning += 1,
                    LogKind::Error => counts.error += 1,
                }
                counts
            })
    }

    /// Drops every entry; ids issued afterwards still exceed all earlier ones.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn newest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/activity_log_tests.rs"]
mod tests;
