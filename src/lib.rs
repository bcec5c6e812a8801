//! # Unified Logger
//!
//! A hierarchical, level-filtered logging service for applications that want
//! named loggers sharing one global threshold.
//!
//! ## Features
//!
//! - **Named loggers**: one logger per caller name, memoized by the service
//! - **Double gate**: a call passes only when the logger's level admits it
//!   and the global level admits the logger's level
//! - **Lazy call sites**: level accessors return an already resolved emitter,
//!   so disabled calls never format their arguments
//! - **Shared options**: groups of loggers observing one level
//! - **Context tokens**: configurable datetime, level, caller and sub-logger
//!   fragments, or one JSON object per call
//! - **Buffering**: batched delivery of rendered lines once a threshold is hit
//! - **Persistence**: level and output switches survive restarts through a
//!   key-value store
//!
//! ## Quick start
//!
//! ```
//! use unified_logger::prelude::*;
//!
//! let service = LoggingService::new(LoggingServiceConfig::default());
//! let logger = service.get_logger("Billing");
//!
//! logger.debug().emit_message("invoice created");
//! logger.sub_logger(Some("pdf")).trace().emit(vec!["pages".into(), 3.into()]);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;
pub mod stores;

pub mod prelude {
    pub use crate::core::{
        ContextToken, Emitter, Environment, LogArg, LogContext, LogLevel, LogTarget, Logger,
        LoggerError, LoggerInfoMode, LoggerMetrics, LoggerOptions, LoggingService,
        LoggingServiceConfig, LoggingServiceFactory, OptionsSource, Result, ServiceDirectory,
        ServiceSettings, SharedLoggerOptions, SubLogger, TimestampFormat, TokenFormat,
    };
    pub use crate::sinks::{ConsoleSink, MemorySink};
    pub use crate::stores::{FileStore, MemoryStore};
}

pub use crate::core::{
    ContextToken, Emitter, Environment, GlobalRegistry, LogArg, LogContext, LogLevel, LogTarget,
    Logger, LoggerError, LoggerInfoMode, LoggerMetrics, LoggerOptions, LoggingService,
    LoggingServiceConfig, LoggingServiceConfigBuilder, LoggingServiceFactory, OptionsSource,
    PersistenceStore, Result, ServiceDirectory, ServiceSettings, SharedLoggerOptions, Sink,
    SubLogger, TimestampFormat, TokenFormat,
};
pub use crate::sinks::{ConsoleSink, MemorySink};
pub use crate::stores::{FileStore, MemoryStore};
