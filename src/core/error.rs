//! Error types for the logging service

use super::log_level::LogLevel;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Factory used before a service was constructed
    #[error("LoggingServiceFactory: no logging service initialized, call init() first")]
    NotInitialized,

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Persistence store read or write failure
    #[error("Persistence error for key '{key}': {message}")]
    Persistence { key: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Sink has no method for the requested level
    #[error("Sink '{sink}' does not support level {level}")]
    UnsupportedLevel { sink: String, level: LogLevel },

    /// Sink failed while writing
    #[error("Sink '{sink}' failed: {message}")]
    SinkFailure { sink: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a persistence error
    pub fn persistence(key: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Persistence {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_level(sink: impl Into<String>, level: LogLevel) -> Self {
        LoggerError::UnsupportedLevel {
            sink: sink.into(),
            level,
        }
    }

    /// Create a sink failure error
    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkFailure {
            sink: sink.into(),
            message: message.into(),
        }
    }
}
