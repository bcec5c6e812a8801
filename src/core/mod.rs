//! Core logger types and traits

pub mod config;
pub mod emitter;
pub mod error;
pub mod factory;
pub mod global;
pub mod log_arg;
pub mod log_context;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod service;
pub mod sink;
pub mod store;
pub mod timestamp;
pub mod token;

pub use config::{
    Environment, LoggerInfoMode, LoggingServiceConfig, LoggingServiceConfigBuilder,
    PersistedSettings, ServiceSettings,
};
pub use emitter::Emitter;
pub use error::{LoggerError, Result};
pub use factory::LoggingServiceFactory;
pub use global::{GlobalRegistry, ServiceDirectory};
pub use log_arg::{join_args, LogArg, SERIALIZE_ERROR_TAG};
pub use log_context::LogContext;
pub use log_level::{double_gate, LogLevel};
pub use logger::{resolve_caller_name, LogTarget, Logger, SubLogger, UNNAMED_CALLER};
pub use metrics::LoggerMetrics;
pub use options::{LoggerOptions, OptionsSource, SharedLoggerOptions, DEFAULT_LOGGER_LEVEL};
pub use service::{LoggingService, SERVICE_CALLER};
pub use sink::Sink;
pub use store::PersistenceStore;
pub use timestamp::TimestampFormat;
pub use token::{default_tokens, render_fields, render_fragments, ContextToken, TokenFormat};
