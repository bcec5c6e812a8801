//! Logging service
//!
//! Owns the global settings, the registry of named loggers and the local
//! buffer. Every level accessor of a logger ends up in
//! [`LoggingService::console_logger`], which applies the double gate and binds
//! the rendered context tokens to the sink.

use super::config::{
    Environment, LoggerInfoMode, LoggingServiceConfig, PersistedSettings, ServiceSettings,
};
use super::emitter::{Binding, Emitter, Prefix, Route};
use super::error::LoggerError;
use super::log_arg::LogArg;
use super::log_context::LogContext;
use super::log_level::{double_gate, LogLevel};
use super::logger::{resolve_caller_name, Logger};
use super::metrics::LoggerMetrics;
use super::options::OptionsSource;
use super::sink::Sink;
use super::token::{render_fields, render_fragments, upsert_token, ContextToken};
use crate::sinks::ConsoleSink;
use parking_lot::{Mutex, RwLock};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Caller name of the service's own diagnostic lines
pub const SERVICE_CALLER: &str = "LoggingService";

/// Backtrace frames belonging to the buffering path itself
const INTERNAL_FRAMES: usize = 2;

pub(crate) struct ServiceInner {
    config: RwLock<LoggingServiceConfig>,
    loggers: RwLock<HashMap<String, Logger>>,
    cache: Mutex<Vec<String>>,
    /// Anonymous sub-logger numbers, also held by every logger
    counter: Arc<AtomicU64>,
    metrics: LoggerMetrics,
    /// Unregistered logger the service speaks through
    internal: Logger,
}

/// Handle to a logging service; clones share the same service
///
/// # Example
/// ```
/// use unified_logger::prelude::*;
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let service = LoggingService::new(
///     LoggingServiceConfig::builder().sink(sink.clone()).datetime(false).build(),
/// );
///
/// let logger = service.get_logger("Checkout");
/// assert!(logger.ptr_eq(&service.get_logger("Checkout")));
///
/// logger.debug().emit_message("cart loaded");
/// assert_eq!(sink.lines(), vec!["[DEBUG] {Checkout} cart loaded"]);
/// ```
#[derive(Clone)]
pub struct LoggingService {
    inner: Arc<ServiceInner>,
}

impl LoggingService {
    /// Construct a service, loading persisted settings and installing it into
    /// the global registry when configured to.
    pub fn new(config: LoggingServiceConfig) -> Self {
        let counter = Arc::new(AtomicU64::new(0));
        let inner = Arc::new_cyclic(|weak| ServiceInner {
            config: RwLock::new(config),
            loggers: RwLock::new(HashMap::new()),
            cache: Mutex::new(Vec::new()),
            counter: Arc::clone(&counter),
            metrics: LoggerMetrics::new(),
            internal: Logger::new(weak.clone(), counter, SERVICE_CALLER.to_string(), None),
        });
        let service = Self { inner };

        let (store, global) = {
            let config = service.inner.config.read();
            (config.settings.store, config.settings.global)
        };
        if store {
            service.load();
        }
        if global {
            service.global();
        }
        service
    }

    pub(crate) fn from_inner(inner: Arc<ServiceInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ServiceInner> {
        Arc::downgrade(&self.inner)
    }

    /// Whether both handles refer to the same service
    pub fn ptr_eq(&self, other: &LoggingService) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ------------------------------------------------------------------
    // Logger registry
    // ------------------------------------------------------------------

    /// Logger for `name` with default options.
    ///
    /// Returns the already registered instance when one exists.
    pub fn get_logger(&self, name: &str) -> Logger {
        self.resolve_logger(name, None)
    }

    /// Logger for `name` bound to `options`.
    ///
    /// The caller override in `options` takes precedence over `name`. If a
    /// logger already exists under the resolved name it is returned as is and
    /// `options` are ignored.
    pub fn get_logger_with(&self, name: &str, options: impl Into<OptionsSource>) -> Logger {
        self.resolve_logger(name, Some(options.into()))
    }

    fn resolve_logger(&self, name: &str, options: Option<OptionsSource>) -> Logger {
        let caller = resolve_caller_name(name, options.as_ref());

        if let Some(existing) = self.inner.loggers.read().get(&caller) {
            return existing.clone();
        }

        let mut loggers = self.inner.loggers.write();
        loggers
            .entry(caller.clone())
            .or_insert_with(|| {
                Logger::new(
                    Arc::downgrade(&self.inner),
                    Arc::clone(&self.inner.counter),
                    caller,
                    options,
                )
            })
            .clone()
    }

    pub fn logger_instances(&self) -> Vec<Logger> {
        self.inner.loggers.read().values().cloned().collect()
    }

    /// Overview of the global settings and every registered logger's options.
    ///
    /// Loggers bound to shared options are listed as `key[name]`.
    pub fn loggers(&self) -> serde_json::Value {
        let global = serde_json::to_value(self.settings()).unwrap_or(serde_json::Value::Null);
        let loggers: serde_json::Map<String, serde_json::Value> = self
            .inner
            .loggers
            .read()
            .iter()
            .map(|(name, logger)| {
                let key = match logger.shared_key() {
                    Some(shared) => format!("{}[{}]", shared, name),
                    None => name.clone(),
                };
                (key, logger.options_json())
            })
            .collect();

        serde_json::json!({ "global": global, "loggers": loggers })
    }

    /// Current value of the anonymous sub-logger counter
    pub fn count(&self) -> u64 {
        self.inner.counter.load(Ordering::Relaxed)
    }

    /// Draw the next anonymous sub-logger number
    pub fn increment(&self) -> u64 {
        self.inner.counter.fetch_add(1, Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn settings(&self) -> ServiceSettings {
        self.inner.config.read().settings.clone()
    }

    pub fn tokens(&self) -> Vec<ContextToken> {
        self.inner.config.read().tokens.clone()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    pub fn level(&self) -> LogLevel {
        self.inner.config.read().settings.level
    }

    pub fn set_level(&self, level: LogLevel) -> &Self {
        let previous = self.level();
        self.announce(format!("log level changes from {} to {}", previous, level));
        self.update_persisted(|settings| settings.level = level);
        self
    }

    pub fn local_logging(&self) -> bool {
        self.inner.config.read().settings.local_logging
    }

    pub fn set_local_logging(&self, enabled: bool) -> &Self {
        let previous = self.local_logging();
        self.announce(format!("localLogging changes from {} to {}", previous, enabled));
        self.update_persisted(|settings| settings.local_logging = enabled);
        self
    }

    pub fn remote_logging(&self) -> bool {
        self.inner.config.read().settings.remote_logging
    }

    pub fn set_remote_logging(&self, enabled: bool) -> &Self {
        let previous = self.remote_logging();
        self.announce(format!("remoteLogging changes from {} to {}", previous, enabled));
        self.update_persisted(|settings| settings.remote_logging = enabled);
        self
    }

    pub fn json_output(&self) -> bool {
        self.inner.config.read().settings.json_output
    }

    pub fn set_json_output(&self, enabled: bool) -> &Self {
        self.inner.config.write().settings.json_output = enabled;
        self
    }

    pub fn set_cache_line_threshold(&self, lines: usize) -> &Self {
        self.inner.config.write().settings.cache_line_threshold = lines;
        self
    }

    pub fn set_tokens(&self, tokens: Vec<ContextToken>) -> &Self {
        self.inner.config.write().tokens = tokens;
        self
    }

    /// Add a token, replacing any token with the same name
    pub fn add_token(&self, token: ContextToken) -> &Self {
        upsert_token(&mut self.inner.config.write().tokens, token);
        self
    }

    pub fn set_sink(&self, sink: Arc<dyn Sink>) -> &Self {
        self.inner.config.write().sink = sink;
        self
    }

    fn update_persisted(&self, update: impl FnOnce(&mut ServiceSettings)) {
        let store = {
            let mut config = self.inner.config.write();
            update(&mut config.settings);
            config.settings.store
        };
        if store {
            self.store();
        }
    }

    // ------------------------------------------------------------------
    // Persistence and global export
    // ------------------------------------------------------------------

    /// Persist level and local/remote switches, and keep persisting on change.
    ///
    /// A write failure is reported through the sink; in-memory settings keep
    /// the attempted values.
    pub fn store(&self) -> &Self {
        let (persistence, key, snapshot) = {
            let mut config = self.inner.config.write();
            config.settings.store = true;
            (
                config.persistence.clone(),
                config.settings.store_key.clone(),
                PersistedSettings::from(&config.settings),
            )
        };
        let Some(persistence) = persistence.filter(|_| !key.is_empty()) else {
            return self;
        };

        let result = serde_json::to_string(&snapshot)
            .map_err(LoggerError::from)
            .and_then(|json| persistence.set(&key, &json));
        if let Err(e) = result {
            self.report_error(vec![
                "cannot store settings:".into(),
                LogArg::serialize(&snapshot),
                e.to_string().into(),
            ]);
        }
        self
    }

    /// Restore level and local/remote switches from the persistence store.
    ///
    /// A missing entry changes nothing; an unreadable or malformed one is
    /// reported through the sink and leaves the current settings untouched.
    pub fn load(&self) -> &Self {
        let (persistence, key) = {
            let config = self.inner.config.read();
            (config.persistence.clone(), config.settings.store_key.clone())
        };
        let Some(persistence) = persistence.filter(|_| !key.is_empty()) else {
            return self;
        };

        let stored = match persistence.get(&key) {
            Ok(Some(stored)) => stored,
            Ok(None) => return self,
            Err(e) => {
                self.report_error(vec!["unable to read stored settings:".into(), e.to_string().into()]);
                return self;
            }
        };

        match serde_json::from_str::<PersistedSettings>(&stored) {
            Ok(persisted) => {
                let mut config = self.inner.config.write();
                config.settings.store = true;
                persisted.apply_to(&mut config.settings);
            }
            Err(_) => {
                self.report_error(vec![
                    "unable to parse stored settings".into(),
                    "stored=".into(),
                    stored.into(),
                ]);
            }
        }
        self
    }

    /// Stop persisting and remove the stored entry
    pub fn unstore(&self) -> &Self {
        let (persistence, key) = {
            let mut config = self.inner.config.write();
            config.settings.store = false;
            (config.persistence.clone(), config.settings.store_key.clone())
        };
        if let Some(persistence) = persistence.filter(|_| !key.is_empty()) {
            if let Err(e) = persistence.remove(&key) {
                self.report_error(vec!["cannot remove stored settings:".into(), e.to_string().into()]);
            }
        }
        self
    }

    /// Install this service into the configured global registry
    pub fn global(&self) -> &Self {
        let target = {
            let config = self.inner.config.read();
            match &config.global_object {
                Some(registry) if !config.settings.global_key.is_empty() => {
                    Some((Arc::clone(registry), config.settings.global_key.clone()))
                }
                _ => None,
            }
        };
        if let Some((registry, key)) = target {
            registry.install(&key, self.clone());
        }
        self
    }

    // ------------------------------------------------------------------
    // Emission
    // ------------------------------------------------------------------

    /// Whether a call at `level` from a logger at `logger_level` would be
    /// emitted: both level gates pass and at least one output is switched on.
    pub fn admits(&self, level: LogLevel, logger_level: LogLevel) -> bool {
        let config = self.inner.config.read();
        let s = &config.settings;
        double_gate(level, logger_level, s.level) && (s.local_logging || s.remote_logging)
    }

    /// Resolve the emission function for one call.
    ///
    /// Returns a disabled emitter unless the call's level passes both the
    /// logger's level and the global level. Otherwise the rendered context
    /// tokens are bound in front of the call's arguments, and the emitter
    /// routes to the local buffer when remote logging is on, or straight to
    /// the sink when only local logging is on.
    pub fn console_logger(&self, ctx: &LogContext) -> Emitter {
        if !self.admits(ctx.level, ctx.logger.level()) {
            self.inner.metrics.record_suppressed();
            return Emitter::disabled();
        }

        let (tokens, sink, remote, json) = {
            let config = self.inner.config.read();
            let s = &config.settings;
            (config.tokens.clone(), Arc::clone(&config.sink), s.remote_logging, s.json_output)
        };
        let prefix = if json {
            Prefix::Fields(render_fields(&tokens, ctx))
        } else {
            Prefix::Fragments(render_fragments(&tokens, ctx))
        };

        Emitter::bound(Binding {
            service: self.clone(),
            sink,
            level: ctx.level,
            prefix,
            route: if remote { Route::Buffered } else { Route::Local },
        })
    }

    /// Write straight to the sink.
    ///
    /// Logger arguments are rendered before the prefix is applied, so JSON
    /// content sees the same arguments a positional line would.
    pub(crate) fn deliver(
        &self,
        level: LogLevel,
        sink: &Arc<dyn Sink>,
        prefix: &Prefix,
        args: Vec<LogArg>,
    ) {
        let args = prefix.apply(self.console_args(args));
        self.dispatch(level, sink, &args);
        self.inner.metrics.record_emitted();
    }

    /// Append one line to the local buffer, flushing when it is full
    pub(crate) fn cache_log(
        &self,
        level: LogLevel,
        sink: &Arc<dyn Sink>,
        prefix: &Prefix,
        args: Vec<LogArg>,
    ) {
        let (local, logger_info, stack_traces, threshold) = {
            let config = self.inner.config.read();
            let s = &config.settings;
            (s.local_logging, s.logger_info, s.stack_traces, s.cache_line_threshold)
        };

        if local {
            self.deliver(level, sink, prefix, args.clone());
        }

        let message = prefix
            .apply(args)
            .iter()
            .filter_map(|arg| arg.to_cache_string(logger_info))
            .collect::<Vec<_>>()
            .join(" ");
        let message = if level != LogLevel::Debug && stack_traces {
            annotate_with_backtrace(message)
        } else {
            message
        };
        let line = format!("[{}] {}", level.to_str(), message);

        let batch = {
            let mut cache = self.inner.cache.lock();
            cache.push(line);
            self.inner.metrics.record_buffered();
            if threshold > 0 && cache.len() >= threshold {
                Some(std::mem::take(&mut *cache))
            } else {
                None
            }
        };
        if let Some(batch) = batch {
            self.deliver_batch(batch);
        }
    }

    /// Deliver every buffered line to the sink and empty the buffer.
    ///
    /// Returns the number of lines delivered.
    pub fn flush(&self) -> usize {
        let batch = std::mem::take(&mut *self.inner.cache.lock());
        self.deliver_batch(batch)
    }

    fn deliver_batch(&self, batch: Vec<String>) -> usize {
        if batch.is_empty() {
            return 0;
        }
        let sink = Arc::clone(&self.inner.config.read().sink);
        for line in &batch {
            self.dispatch(LogLevel::Log, &sink, &[LogArg::Text(line.clone())]);
        }
        self.inner.metrics.record_flush(batch.len());
        batch.len()
    }

    /// Lines waiting in the local buffer
    pub fn cached_lines(&self) -> Vec<String> {
        self.inner.cache.lock().clone()
    }

    /// Replace logger arguments by their sink rendering
    fn console_args(&self, args: Vec<LogArg>) -> Vec<LogArg> {
        if !args.iter().any(|a| matches!(a, LogArg::Logger(_))) {
            return args;
        }
        let (logger_info, mode, environment) = {
            let config = self.inner.config.read();
            let s = &config.settings;
            (s.logger_info, s.logger_info_mode, s.environment)
        };

        args.into_iter()
            .filter_map(|arg| match arg {
                LogArg::Logger(logger) => {
                    if !logger_info {
                        None
                    } else if mode == LoggerInfoMode::String || environment == Environment::Server {
                        Some(LogArg::Text(logger.to_server_string()))
                    } else {
                        Some(LogArg::Json(logger.to_console()))
                    }
                }
                other => Some(other),
            })
            .collect()
    }

    /// Write to `sink`, falling back to the console for unsupported levels.
    ///
    /// Sink errors and panics are counted and reported on stderr; they never
    /// reach the caller.
    fn dispatch(&self, level: LogLevel, sink: &Arc<dyn Sink>, args: &[LogArg]) {
        let write_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            if sink.supports(level) {
                sink.write(level, args)
            } else {
                ConsoleSink::new().write(level, args)
            }
        }));

        match write_result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                self.inner.metrics.record_sink_failure();
                eprintln!("[LOGGER ERROR] {}", LoggerError::sink(sink.name(), e.to_string()));
            }
            Err(panic_info) => {
                self.inner.metrics.record_sink_failure();
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] {}",
                    LoggerError::sink(sink.name(), format!("panicked: {}", panic_msg))
                );
            }
        }
    }

    /// Ungated line at INFO, used for setting changes
    fn announce(&self, message: String) {
        let internal = self.inner.internal.clone();
        self.announce_for(&internal, LogLevel::Info, vec![LogArg::Text(message)]);
    }

    /// Ungated line at ERROR, used for persistence failures
    fn report_error(&self, args: Vec<LogArg>) {
        let internal = self.inner.internal.clone();
        self.announce_for(&internal, LogLevel::Error, args);
    }

    /// Write `args` for `logger` straight to the sink, bypassing the gates
    pub(crate) fn announce_for(&self, logger: &Logger, level: LogLevel, args: Vec<LogArg>) {
        let (tokens, sink) = {
            let config = self.inner.config.read();
            (config.tokens.clone(), Arc::clone(&config.sink))
        };
        let ctx = LogContext::new(level, logger.clone());
        let args = Prefix::Fragments(render_fragments(&tokens, &ctx)).apply(args);
        self.dispatch(level, &sink, &args);
    }
}

impl fmt::Debug for LoggingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingService")
            .field("settings", &self.inner.config.read().settings)
            .field("loggers", &self.inner.loggers.read().len())
            .field("cached_lines", &self.inner.cache.lock().len())
            .finish()
    }
}

/// Append the current backtrace, minus the buffering frames, to `message`
fn annotate_with_backtrace(message: String) -> String {
    let backtrace = Backtrace::force_capture();
    if backtrace.status() != BacktraceStatus::Captured {
        return message;
    }
    let trace = strip_frames(&backtrace.to_string(), INTERNAL_FRAMES);
    if trace.is_empty() {
        message
    } else {
        format!("{} \n{}", message, trace)
    }
}

/// Drop the first `skip` frames of a rendered backtrace
pub(crate) fn strip_frames(trace: &str, skip: usize) -> String {
    let mut frames = 0;
    let mut keep = false;
    let mut kept = Vec::new();

    for line in trace.lines() {
        if is_frame_header(line) {
            frames += 1;
            keep = frames > skip;
        }
        if keep {
            kept.push(line);
        }
    }
    kept.join("\n")
}

// "  12: crate::module::function"
fn is_frame_header(line: &str) -> bool {
    match line.trim_start().split_once(':') {
        Some((index, _)) => !index.is_empty() && index.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
