//! Logging macros for ergonomic log message formatting.
//!
//! The format arguments are only evaluated when the call passes the level
//! gates, so a disabled log site costs one gate check.
//!
//! # Examples
//!
//! ```
//! use unified_logger::prelude::*;
//! use unified_logger::{debug, emit, info};
//!
//! let service = LoggingService::new(LoggingServiceConfig::default());
//! let logger = service.get_logger("Server");
//!
//! let port = 8080;
//! debug!(logger, "listening on port {}", port);
//!
//! // above the logger's DEBUG level: not formatted at all
//! info!(logger, "expensive {:?}", vec![0u8; 1024]);
//!
//! let request = logger.sub_logger(Some("request"));
//! emit!(request, LogLevel::Trace, ["headers", serde_json::json!({"host": "example.org"})]);
//! ```

/// Log a formatted message at an explicit level.
///
/// # Examples
///
/// ```
/// # use unified_logger::prelude::*;
/// # let service = LoggingService::new(LoggingServiceConfig::default());
/// # let logger = service.get_logger("Docs");
/// use unified_logger::log;
/// log!(logger, LogLevel::Log, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($target:expr, $level:expr, $($arg:tt)+) => {{
        let emitter = $crate::core::LogTarget::emitter(&$target, $level);
        if emitter.is_enabled() {
            emitter.emit_message(format!($($arg)+));
        }
    }};
}

/// Log a list of heterogeneous arguments at an explicit level.
///
/// Each argument goes through `LogArg::from`, so strings, numbers, JSON values
/// and loggers can be mixed.
#[macro_export]
macro_rules! emit {
    ($target:expr, $level:expr, [$($arg:expr),* $(,)?]) => {{
        let emitter = $crate::core::LogTarget::emitter(&$target, $level);
        if emitter.is_enabled() {
            emitter.emit(vec![$($crate::core::LogArg::from($arg)),*]);
        }
    }};
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use unified_logger::prelude::*;
/// # let service = LoggingService::new(LoggingServiceConfig::default());
/// # let logger = service.get_logger("Docs");
/// use unified_logger::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use unified_logger::prelude::*;
/// # let service = LoggingService::new(LoggingServiceConfig::default());
/// # let logger = service.get_logger("Docs");
/// use unified_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($target:expr, $($arg:tt)+) => {
        $crate::log!($target, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{LogLevel, LoggingService, LoggingServiceConfig, LogTarget};
    use crate::sinks::MemorySink;
    use std::cell::Cell;
    use std::sync::Arc;

    fn setup(level: LogLevel) -> (LoggingService, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let service = LoggingService::new(
            LoggingServiceConfig::builder()
                .sink(sink.clone())
                .level(level)
                .datetime(false)
                .build(),
        );
        (service, sink)
    }

    #[test]
    fn test_log_macro() {
        let (service, sink) = setup(LogLevel::Error);
        let logger = service.get_logger("Macro");

        log!(logger, LogLevel::Log, "Formatted: {}", 42);

        assert_eq!(sink.lines(), vec!["[LOG] {Macro} Formatted: 42"]);
    }

    #[test]
    fn test_level_macros() {
        let (service, sink) = setup(LogLevel::Error);
        let logger = service.get_logger("Macro");
        logger.set_level(LogLevel::Error);
        sink.clear();

        trace!(logger, "trace {}", 1);
        debug!(logger, "debug {}", 2);
        warn!(logger, "warn {}", 3);
        info!(logger, "info {}", 4);
        error!(logger, "error {}", 5);

        assert_eq!(sink.len(), 5);
        assert_eq!(sink.lines()[4], "[ERROR] {Macro} error 5");
    }

    #[test]
    fn test_disabled_site_is_not_formatted() {
        let (service, sink) = setup(LogLevel::Error);
        let logger = service.get_logger("Macro");
        assert!(!logger.is_enabled(LogLevel::Warn));

        let evaluated = Cell::new(false);
        let expensive = || {
            evaluated.set(true);
            "payload"
        };
        warn!(logger, "{}", expensive());

        assert!(!evaluated.get());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_emit_macro_through_sub_logger() {
        let (service, sink) = setup(LogLevel::Error);
        let logger = service.get_logger("Macro");
        let view = logger.sub_logger(Some("job"));

        emit!(view, LogLevel::Debug, ["step", 3, serde_json::json!({"ok": true})]);
        emit!(&logger, LogLevel::Trace, []);

        assert_eq!(
            sink.lines(),
            vec![r#"[DEBUG] {Macro} [job] step 3 {"ok":true}"#, "[TRACE] {Macro}"]
        );
    }
}
