//! Logging service configuration
//!
//! [`ServiceSettings`] is the plain-data part, loadable from JSON with every
//! field defaulted. [`LoggingServiceConfig`] adds the collaborators: token
//! list, sink, persistence store and global registry.

use super::error::Result;
use super::global::GlobalRegistry;
use super::log_level::LogLevel;
use super::sink::Sink;
use super::store::PersistenceStore;
use super::timestamp::TimestampFormat;
use super::token::{default_tokens, upsert_token, ContextToken};
use crate::sinks::ConsoleSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where the host process runs; affects how a logger renders as an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Server,
    Client,
}

/// Rendering of a logger passed as a log argument to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerInfoMode {
    /// `LOGGER{name:LEVEL}`
    String,
    /// Inspectable JSON structure
    #[default]
    Object,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Global threshold
    pub level: LogLevel,
    /// Write admitted calls to the sink immediately
    pub local_logging: bool,
    /// Buffer admitted calls for batched delivery
    pub remote_logging: bool,
    /// Emit one JSON object per call instead of positional fragments
    pub json_output: bool,
    /// Buffered lines that trigger a flush; 0 never flushes automatically
    pub cache_line_threshold: usize,
    /// Persist settings on every change
    pub store: bool,
    pub store_key: String,
    /// Install the service into the global registry on construction
    pub global: bool,
    pub global_key: String,
    pub environment: Environment,
    /// Render logger arguments at all
    pub logger_info: bool,
    pub logger_info_mode: LoggerInfoMode,
    pub timestamp_format: TimestampFormat,
    /// Append a backtrace to non-debug buffered lines
    pub stack_traces: bool,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Error,
            local_logging: true,
            remote_logging: false,
            json_output: false,
            cache_line_threshold: 3,
            store: false,
            store_key: "logger".to_string(),
            global: true,
            global_key: "logger".to_string(),
            environment: Environment::Server,
            logger_info: true,
            logger_info_mode: LoggerInfoMode::Object,
            timestamp_format: TimestampFormat::Iso8601,
            stack_traces: true,
        }
    }
}

/// Subset of [`ServiceSettings`] written to the persistence store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    pub level: LogLevel,
    pub local_logging: bool,
    pub remote_logging: bool,
}

impl From<&ServiceSettings> for PersistedSettings {
    fn from(settings: &ServiceSettings) -> Self {
        Self {
            level: settings.level,
            local_logging: settings.local_logging,
            remote_logging: settings.remote_logging,
        }
    }
}

impl PersistedSettings {
    pub fn apply_to(&self, settings: &mut ServiceSettings) {
        settings.level = self.level;
        settings.local_logging = self.local_logging;
        settings.remote_logging = self.remote_logging;
    }
}

#[derive(Clone)]
pub struct LoggingServiceConfig {
    pub settings: ServiceSettings,
    pub tokens: Vec<ContextToken>,
    pub sink: Arc<dyn Sink>,
    pub persistence: Option<Arc<dyn PersistenceStore>>,
    pub global_object: Option<Arc<dyn GlobalRegistry>>,
}

impl LoggingServiceConfig {
    #[must_use]
    pub fn builder() -> LoggingServiceConfigBuilder {
        LoggingServiceConfigBuilder::new()
    }

    /// Default collaborators around settings parsed from a JSON document.
    ///
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: ServiceSettings = serde_json::from_str(json)?;
        Ok(Self::from_settings(settings))
    }

    pub fn from_settings(settings: ServiceSettings) -> Self {
        Self {
            tokens: default_tokens(settings.timestamp_format.clone()),
            settings,
            sink: Arc::new(ConsoleSink::new()),
            persistence: None,
            global_object: None,
        }
    }
}

impl Default for LoggingServiceConfig {
    fn default() -> Self {
        Self::from_settings(ServiceSettings::default())
    }
}

impl fmt::Debug for LoggingServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingServiceConfig")
            .field("settings", &self.settings)
            .field("tokens", &self.tokens)
            .field("sink", &self.sink.name())
            .field("persistence", &self.persistence.is_some())
            .field("global_object", &self.global_object.is_some())
            .finish()
    }
}

/// Builder for [`LoggingServiceConfig`]
///
/// # Example
/// ```
/// use unified_logger::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let config = LoggingServiceConfig::builder()
///     .level(LogLevel::Info)
///     .sink(sink)
///     .remote_logging(true)
///     .cache_line_threshold(10)
///     .build();
/// assert_eq!(config.settings.cache_line_threshold, 10);
/// ```
pub struct LoggingServiceConfigBuilder {
    settings: ServiceSettings,
    tokens: Option<Vec<ContextToken>>,
    extra_tokens: Vec<ContextToken>,
    datetime: bool,
    sink: Option<Arc<dyn Sink>>,
    persistence: Option<Arc<dyn PersistenceStore>>,
    global_object: Option<Arc<dyn GlobalRegistry>>,
}

impl LoggingServiceConfigBuilder {
    pub fn new() -> Self {
        Self {
            settings: ServiceSettings::default(),
            tokens: None,
            extra_tokens: Vec::new(),
            datetime: true,
            sink: None,
            persistence: None,
            global_object: None,
        }
    }

    /// Start from existing settings
    #[must_use = "builder methods return a new value"]
    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.settings.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn local_logging(mut self, enabled: bool) -> Self {
        self.settings.local_logging = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote_logging(mut self, enabled: bool) -> Self {
        self.settings.remote_logging = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn json_output(mut self, enabled: bool) -> Self {
        self.settings.json_output = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn cache_line_threshold(mut self, lines: usize) -> Self {
        self.settings.cache_line_threshold = lines;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn environment(mut self, environment: Environment) -> Self {
        self.settings.environment = environment;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logger_info(mut self, enabled: bool, mode: LoggerInfoMode) -> Self {
        self.settings.logger_info = enabled;
        self.settings.logger_info_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.settings.timestamp_format = format;
        self
    }

    /// Include the `datetime` token in the default token list
    #[must_use = "builder methods return a new value"]
    pub fn datetime(mut self, enabled: bool) -> Self {
        self.datetime = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_traces(mut self, enabled: bool) -> Self {
        self.settings.stack_traces = enabled;
        self
    }

    /// Replace the whole token list
    #[must_use = "builder methods return a new value"]
    pub fn tokens(mut self, tokens: Vec<ContextToken>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Add a token, replacing any token with the same name
    #[must_use = "builder methods return a new value"]
    pub fn token(mut self, token: ContextToken) -> Self {
        self.extra_tokens.push(token);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Persist settings through `store` under `key`, loading them on construction
    #[must_use = "builder methods return a new value"]
    pub fn persistence(mut self, store: Arc<dyn PersistenceStore>, key: impl Into<String>) -> Self {
        self.persistence = Some(store);
        self.settings.store = true;
        self.settings.store_key = key.into();
        self
    }

    /// Install the service into `registry` under `key` on construction
    #[must_use = "builder methods return a new value"]
    pub fn global_object(mut self, registry: Arc<dyn GlobalRegistry>, key: impl Into<String>) -> Self {
        self.global_object = Some(registry);
        self.settings.global = true;
        self.settings.global_key = key.into();
        self
    }

    pub fn build(self) -> LoggingServiceConfig {
        let mut tokens = self.tokens.unwrap_or_else(|| {
            let mut tokens = default_tokens(self.settings.timestamp_format.clone());
            if !self.datetime {
                tokens.retain(|t| t.name() != "datetime");
            }
            tokens
        });
        for token in self.extra_tokens {
            upsert_token(&mut tokens, token);
        }

        LoggingServiceConfig {
            settings: self.settings,
            tokens,
            sink: self.sink.unwrap_or_else(|| Arc::new(ConsoleSink::new())),
            persistence: self.persistence,
            global_object: self.global_object,
        }
    }
}

impl Default for LoggingServiceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
