//! Per-call log context
//!
//! A `LogContext` is built fresh for every emission and handed to the context
//! tokens, which derive their display fragments from it.

use super::log_level::LogLevel;
use super::logger::Logger;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct LogContext {
    pub level: LogLevel,
    pub logger: Logger,
    /// Dot-joined name of the sub-logger the call came through
    pub sub_logger: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LogContext {
    pub fn new(level: LogLevel, logger: Logger) -> Self {
        Self {
            level,
            logger,
            sub_logger: None,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_sub_logger(mut self, name: impl Into<String>) -> Self {
        self.sub_logger = Some(name.into());
        self
    }

    /// Pin the timestamp, mostly useful for deterministic rendering
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
