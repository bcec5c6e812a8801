//! Per-logger options
//!
//! A logger either owns a private copy of its [`LoggerOptions`] or holds a
//! [`SharedLoggerOptions`] handle. Every logger built from clones of the same
//! shared handle observes a level change made through any of them.

use super::log_level::LogLevel;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Level used when neither explicit nor shared options set one
pub const DEFAULT_LOGGER_LEVEL: LogLevel = LogLevel::Debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    /// Overrides the name the logger was requested with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<String>,
}

impl LoggerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options every logger starts from
    pub fn defaults() -> Self {
        Self {
            level: Some(DEFAULT_LOGGER_LEVEL),
            caller: None,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    /// Field-by-field merge: fields set on `self` win over `base`.
    #[must_use]
    pub fn merged_over(&self, base: &LoggerOptions) -> LoggerOptions {
        LoggerOptions {
            level: self.level.or(base.level),
            caller: self.caller.clone().or_else(|| base.caller.clone()),
        }
    }
}

#[derive(Debug)]
struct SharedInner {
    key: String,
    options: RwLock<LoggerOptions>,
}

/// Options referenced, never copied, by every logger that holds them
///
/// Cloning the handle shares the same underlying options.
///
/// # Example
///
/// ```
/// use unified_logger::core::{LogLevel, LoggerOptions, SharedLoggerOptions};
///
/// let shared = SharedLoggerOptions::new("http", LoggerOptions::new().with_level(LogLevel::Trace));
/// let alias = shared.clone();
/// alias.set_level(LogLevel::Warn);
/// assert_eq!(shared.level(), Some(LogLevel::Warn));
/// ```
#[derive(Debug, Clone)]
pub struct SharedLoggerOptions {
    inner: Arc<SharedInner>,
}

impl SharedLoggerOptions {
    pub fn new(key: impl Into<String>, options: LoggerOptions) -> Self {
        Self {
            inner: Arc::new(SharedInner {
                key: key.into(),
                options: RwLock::new(options),
            }),
        }
    }

    /// Name of the shared configuration group
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn level(&self) -> Option<LogLevel> {
        self.inner.options.read().level
    }

    pub fn set_level(&self, level: LogLevel) {
        self.inner.options.write().level = Some(level);
    }

    pub fn caller(&self) -> Option<String> {
        self.inner.options.read().caller.clone()
    }

    pub fn snapshot(&self) -> LoggerOptions {
        self.inner.options.read().clone()
    }

    /// Whether both handles point at the same group
    pub fn ptr_eq(&self, other: &SharedLoggerOptions) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Options handed to `get_logger`
#[derive(Debug, Clone)]
pub enum OptionsSource {
    Private(LoggerOptions),
    Shared(SharedLoggerOptions),
}

impl OptionsSource {
    /// The caller override carried by these options, if any
    pub fn caller(&self) -> Option<String> {
        match self {
            OptionsSource::Private(options) => options.caller.clone(),
            OptionsSource::Shared(shared) => shared.caller(),
        }
    }
}

impl From<LoggerOptions> for OptionsSource {
    fn from(options: LoggerOptions) -> Self {
        OptionsSource::Private(options)
    }
}

impl From<SharedLoggerOptions> for OptionsSource {
    fn from(shared: SharedLoggerOptions) -> Self {
        OptionsSource::Shared(shared)
    }
}

impl From<&SharedLoggerOptions> for OptionsSource {
    fn from(shared: &SharedLoggerOptions) -> Self {
        OptionsSource::Shared(shared.clone())
    }
}
