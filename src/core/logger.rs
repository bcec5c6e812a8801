//! Named loggers and sub-logger views
//!
//! A [`Logger`] is obtained from [`LoggingService::get_logger`] and is shared:
//! every request for the same caller name returns the same instance. Each of
//! the six level accessors resolves an [`Emitter`] after the level gates have
//! been checked, so a disabled call site never formats its arguments.

use super::emitter::Emitter;
use super::log_arg::SERIALIZE_ERROR_TAG;
use super::log_context::LogContext;
use super::log_level::LogLevel;
use super::options::{LoggerOptions, OptionsSource, SharedLoggerOptions, DEFAULT_LOGGER_LEVEL};
use super::service::{LoggingService, ServiceInner};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Name given to loggers requested without one
pub const UNNAMED_CALLER: &str = "unnamed";

/// Effective caller name: the options' override, then `name`, then
/// [`UNNAMED_CALLER`].
pub fn resolve_caller_name(name: &str, options: Option<&OptionsSource>) -> String {
    options
        .and_then(OptionsSource::caller)
        .filter(|caller| !caller.is_empty())
        .or_else(|| (!name.is_empty()).then(|| name.to_string()))
        .unwrap_or_else(|| UNNAMED_CALLER.to_string())
}

enum OptionsBinding {
    Private(RwLock<LoggerOptions>),
    Shared(SharedLoggerOptions),
}

struct LoggerInner {
    caller: String,
    options: OptionsBinding,
    service: Weak<ServiceInner>,
    /// Shared with the service; outlives it
    counter: Arc<AtomicU64>,
}

/// Something log calls can be issued against
///
/// Implemented by [`Logger`] and [`SubLogger`]. The level accessors return an
/// [`Emitter`] that is already resolved against both level gates.
pub trait LogTarget {
    /// Emission function for a call at `level`
    fn emitter(&self, level: LogLevel) -> Emitter;

    /// Whether a call at `level` would be emitted, without rendering anything
    fn is_enabled(&self, level: LogLevel) -> bool;

    fn trace(&self) -> Emitter {
        self.emitter(LogLevel::Trace)
    }

    fn log(&self) -> Emitter {
        self.emitter(LogLevel::Log)
    }

    fn debug(&self) -> Emitter {
        self.emitter(LogLevel::Debug)
    }

    fn warn(&self) -> Emitter {
        self.emitter(LogLevel::Warn)
    }

    fn info(&self) -> Emitter {
        self.emitter(LogLevel::Info)
    }

    fn error(&self) -> Emitter {
        self.emitter(LogLevel::Error)
    }
}

impl<T: LogTarget + ?Sized> LogTarget for &T {
    fn emitter(&self, level: LogLevel) -> Emitter {
        (**self).emitter(level)
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        (**self).is_enabled(level)
    }
}

/// Handle to a registered logger; clones refer to the same logger
#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

impl Logger {
    pub(crate) fn new(
        service: Weak<ServiceInner>,
        counter: Arc<AtomicU64>,
        caller: String,
        options: Option<OptionsSource>,
    ) -> Self {
        let options = match options {
            Some(OptionsSource::Shared(shared)) => OptionsBinding::Shared(shared),
            Some(OptionsSource::Private(options)) => {
                OptionsBinding::Private(RwLock::new(options.merged_over(&LoggerOptions::defaults())))
            }
            None => OptionsBinding::Private(RwLock::new(LoggerOptions::defaults())),
        };

        Self {
            inner: Arc::new(LoggerInner {
                caller,
                options,
                service,
                counter,
            }),
        }
    }

    pub fn caller(&self) -> &str {
        &self.inner.caller
    }

    /// Caller name prefixed with the shared options key, when bound to one
    pub fn full_caller_name(&self) -> String {
        match &self.inner.options {
            OptionsBinding::Shared(shared) => format!("{}.{}", shared.key(), self.inner.caller),
            OptionsBinding::Private(_) => self.inner.caller.clone(),
        }
    }

    pub fn level(&self) -> LogLevel {
        let level = match &self.inner.options {
            OptionsBinding::Private(options) => options.read().level,
            OptionsBinding::Shared(shared) => shared.level(),
        };
        level.unwrap_or(DEFAULT_LOGGER_LEVEL)
    }

    /// Change this logger's level, announcing the transition first.
    ///
    /// With shared options, every logger of the group observes the change.
    pub fn set_level(&self, level: LogLevel) -> &Self {
        if let Some(service) = self.service() {
            let message = format!("log level changes from {} to {}", self.level(), level);
            service.announce_for(self, LogLevel::Info, vec![message.into()]);
        }

        match &self.inner.options {
            OptionsBinding::Private(options) => options.write().level = Some(level),
            OptionsBinding::Shared(shared) => shared.set_level(level),
        }
        self
    }

    pub fn shared_options(&self) -> Option<&SharedLoggerOptions> {
        match &self.inner.options {
            OptionsBinding::Shared(shared) => Some(shared),
            OptionsBinding::Private(_) => None,
        }
    }

    pub fn shared_key(&self) -> Option<&str> {
        self.shared_options().map(SharedLoggerOptions::key)
    }

    /// Current options, read through the shared group when bound to one
    pub fn options(&self) -> LoggerOptions {
        match &self.inner.options {
            OptionsBinding::Private(options) => options.read().clone(),
            OptionsBinding::Shared(shared) => shared.snapshot(),
        }
    }

    pub(crate) fn options_json(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self.options()).unwrap_or(serde_json::Value::Null);
        if let (Some(key), Some(object)) = (self.shared_key(), value.as_object_mut()) {
            object.insert("key".to_string(), key.into());
        }
        value
    }

    /// The owning service, `None` once it has been dropped
    pub fn service(&self) -> Option<LoggingService> {
        self.inner.service.upgrade().map(LoggingService::from_inner)
    }

    /// A view tagging every call with `name`, or with the next anonymous
    /// `#n` when no name is given
    pub fn sub_logger(&self, name: Option<&str>) -> SubLogger {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.anonymous_name(),
        };
        SubLogger::new(self.clone(), name)
    }

    /// Anonymous view whose name is prefixed with `id`: `id.#n`
    pub fn sub_logger_with_id(&self, id: &str) -> SubLogger {
        SubLogger::new(self.clone(), format!("{}.{}", id, self.anonymous_name()))
    }

    fn anonymous_name(&self) -> String {
        format!("#{}", self.inner.counter.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn emitter_for(&self, level: LogLevel, sub_logger: Option<&str>) -> Emitter {
        let Some(service) = self.service() else {
            return Emitter::disabled();
        };

        let ctx = LogContext::new(level, self.clone());
        let ctx = match sub_logger {
            Some(name) => ctx.with_sub_logger(name),
            None => ctx,
        };
        service.console_logger(&ctx)
    }

    /// `LOGGER{fullCallerName:LEVEL}`
    pub fn to_server_string(&self) -> String {
        format!("LOGGER{{{}:{}}}", self.full_caller_name(), self.level())
    }

    /// Inspectable structure used when a logger is logged in client mode
    pub fn to_console(&self) -> serde_json::Value {
        let mut object = serde_json::Map::new();
        object.insert(
            self.full_caller_name(),
            serde_json::json!({
                "options": self.options_json(),
                "logger": self.to_server_string(),
            }),
        );
        serde_json::Value::Object(object)
    }

    /// Pretty JSON rendering of `value`.
    ///
    /// A value that cannot be serialized renders as the error tag.
    pub fn prettify<T: Serialize + ?Sized>(&self, value: &T) -> String {
        match serde_json::to_string_pretty(value) {
            Ok(pretty) => pretty,
            Err(e) => {
                eprintln!("[LOGGER ERROR] {} cannot prettify value: {}", self.caller(), e);
                SERIALIZE_ERROR_TAG.to_string()
            }
        }
    }

    /// Whether both handles refer to the same logger
    pub fn ptr_eq(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl LogTarget for Logger {
    fn emitter(&self, level: LogLevel) -> Emitter {
        self.emitter_for(level, None)
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        self.service()
            .is_some_and(|service| service.admits(level, self.level()))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("caller", &self.full_caller_name())
            .field("level", &self.level())
            .finish()
    }
}

impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_server_string())
    }
}

/// Name-tagged view of a logger
///
/// Shares the logger's options; only adds the `subLogger` context value.
#[derive(Debug, Clone)]
pub struct SubLogger {
    logger: Logger,
    name: String,
}

impl SubLogger {
    fn new(logger: Logger, name: String) -> Self {
        Self { logger, name }
    }

    /// Dot-joined path of this view
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Nested view: `<this>.name`, or `<this>.#n` when no name is given
    pub fn sub_logger(&self, name: Option<&str>) -> SubLogger {
        let child = match name {
            Some(name) => name.to_string(),
            None => self.logger.anonymous_name(),
        };
        SubLogger::new(self.logger.clone(), format!("{}.{}", self.name, child))
    }
}

impl LogTarget for SubLogger {
    fn emitter(&self, level: LogLevel) -> Emitter {
        self.logger.emitter_for(level, Some(&self.name))
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        self.logger.is_enabled(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggingServiceConfig;
    use crate::sinks::MemorySink;

    fn setup() -> (LoggingService, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let service = LoggingService::new(
            LoggingServiceConfig::builder().sink(sink.clone()).datetime(false).build(),
        );
        (service, sink)
    }

    #[test]
    fn test_resolve_caller_name() {
        let private = OptionsSource::from(LoggerOptions::new().with_caller("Override"));
        assert_eq!(resolve_caller_name("Given", Some(&private)), "Override");
        assert_eq!(resolve_caller_name("Given", None), "Given");
        assert_eq!(resolve_caller_name("", None), UNNAMED_CALLER);

        let empty = OptionsSource::from(LoggerOptions::new().with_caller(""));
        assert_eq!(resolve_caller_name("Given", Some(&empty)), "Given");
    }

    #[test]
    fn test_default_level_is_debug() {
        let (service, _) = setup();
        let logger = service.get_logger("Api");
        assert_eq!(logger.level(), LogLevel::Debug);
        assert!(logger.is_enabled(LogLevel::Trace));
        assert!(logger.is_enabled(LogLevel::Debug));
        assert!(!logger.is_enabled(LogLevel::Warn));
    }

    #[test]
    fn test_explicit_level_merges_over_defaults() {
        let (service, _) = setup();
        let logger = service.get_logger_with("Api", LoggerOptions::new().with_level(LogLevel::Info));
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.caller(), "Api");
    }

    #[test]
    fn test_shared_level_without_value_falls_back() {
        let (service, _) = setup();
        let shared = SharedLoggerOptions::new("db", LoggerOptions::new());
        let logger = service.get_logger_with("Pool", &shared);
        assert_eq!(logger.level(), DEFAULT_LOGGER_LEVEL);
        assert_eq!(logger.full_caller_name(), "db.Pool");
        assert_eq!(logger.shared_key(), Some("db"));
    }

    #[test]
    fn test_set_level_announces_with_own_caller() {
        let (service, sink) = setup();
        let logger = service.get_logger("Api");

        logger.set_level(LogLevel::Trace);

        assert_eq!(logger.level(), LogLevel::Trace);
        assert_eq!(sink.lines(), vec!["[INFO] {Api} log level changes from DEBUG to TRACE"]);
    }

    #[test]
    fn test_server_string_and_console_rendering() {
        let (service, _) = setup();
        let logger = service.get_logger("Api");
        assert_eq!(logger.to_server_string(), "LOGGER{Api:DEBUG}");
        assert_eq!(logger.to_string(), "LOGGER{Api:DEBUG}");

        let console = logger.to_console();
        assert_eq!(console["Api"]["logger"], "LOGGER{Api:DEBUG}");
        assert_eq!(console["Api"]["options"]["level"], "DEBUG");
    }

    #[test]
    fn test_prettify() {
        let (service, _) = setup();
        let logger = service.get_logger("Api");
        assert_eq!(logger.prettify(&serde_json::json!({"a": 1})), "{\n  \"a\": 1\n}");

        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], 1);
        assert_eq!(logger.prettify(&bad), SERIALIZE_ERROR_TAG);
    }

    #[test]
    fn test_sub_logger_names() {
        let (service, _) = setup();
        let logger = service.get_logger("Api");

        assert_eq!(logger.sub_logger(Some("A")).sub_logger(Some("B")).name(), "A.B");
        assert_eq!(logger.sub_logger(None).name(), "#0");
        assert_eq!(logger.sub_logger_with_id("req").name(), "req.#1");
        assert_eq!(logger.sub_logger(Some("A")).sub_logger(None).name(), "A.#2");
    }

    #[test]
    fn test_sub_logger_tags_emission() {
        let (service, sink) = setup();
        let logger = service.get_logger("Api");

        logger.sub_logger(Some("A")).sub_logger(Some("B")).debug().emit_message("nested");

        assert_eq!(sink.lines(), vec!["[DEBUG] {Api} [A.B] nested"]);
    }

    #[test]
    fn test_dropped_service_disables_logger() {
        let (service, sink) = setup();
        let logger = service.get_logger("Api");
        assert_eq!(logger.sub_logger(None).name(), "#0");
        drop(service);

        assert!(logger.service().is_none());
        assert!(!logger.debug().is_enabled());
        assert!(!logger.is_enabled(LogLevel::Trace));
        // numbering carries on without the service
        assert_eq!(logger.sub_logger(None).name(), "#1");
        assert_eq!(logger.sub_logger_with_id("req").name(), "req.#2");
        logger.set_level(LogLevel::Log);
        assert!(sink.is_empty());
    }
}
