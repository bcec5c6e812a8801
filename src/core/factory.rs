//! Process-wide bootstrap of a logging service

use super::config::LoggingServiceConfig;
use super::error::{LoggerError, Result};
use super::logger::Logger;
use super::options::OptionsSource;
use super::service::LoggingService;
use parking_lot::RwLock;
use std::sync::OnceLock;

/// Holder of at most one logging service
///
/// [`LoggingServiceFactory::global`] gives the process-wide instance; tests and
/// embedded uses construct their own with [`LoggingServiceFactory::new`].
///
/// # Example
/// ```
/// use unified_logger::prelude::*;
///
/// let factory = LoggingServiceFactory::new();
/// assert!(factory.get().is_err());
///
/// factory.init(LoggingServiceConfig::default());
/// let logger = factory.get_logger("Boot").unwrap();
/// assert_eq!(logger.caller(), "Boot");
/// ```
#[derive(Default)]
pub struct LoggingServiceFactory {
    service: RwLock<Option<LoggingService>>,
}

static GLOBAL_FACTORY: OnceLock<LoggingServiceFactory> = OnceLock::new();

impl LoggingServiceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory already holding a service built from `config`
    pub fn initialized(config: LoggingServiceConfig) -> Self {
        let factory = Self::new();
        factory.init(config);
        factory
    }

    /// The process-wide factory, uninitialized until the first `init`
    pub fn global() -> &'static LoggingServiceFactory {
        GLOBAL_FACTORY.get_or_init(LoggingServiceFactory::new)
    }

    /// Build a new service from `config`, replacing any previous one.
    ///
    /// Loggers obtained from the previous service keep working against it for
    /// as long as someone holds that service.
    pub fn init(&self, config: LoggingServiceConfig) -> LoggingService {
        let service = LoggingService::new(config);
        *self.service.write() = Some(service.clone());
        service
    }

    pub fn get(&self) -> Result<LoggingService> {
        self.service.read().clone().ok_or(LoggerError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.service.read().is_some()
    }

    pub fn get_logger(&self, name: &str) -> Result<Logger> {
        Ok(self.get()?.get_logger(name))
    }

    pub fn get_logger_with(&self, name: &str, options: impl Into<OptionsSource>) -> Result<Logger> {
        Ok(self.get()?.get_logger_with(name, options))
    }

    /// Overview of the current service's settings and loggers
    pub fn loggers(&self) -> Result<serde_json::Value> {
        Ok(self.get()?.loggers())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_get_before_init_fails() {
        let factory = LoggingServiceFactory::new();
        assert!(!factory.is_initialized());
        assert!(matches!(factory.get(), Err(LoggerError::NotInitialized)));
        assert!(matches!(factory.get_logger("x"), Err(LoggerError::NotInitialized)));
        assert!(factory.loggers().is_err());
    }

    #[test]
    fn test_init_replaces_service() {
        let factory = LoggingServiceFactory::initialized(LoggingServiceConfig::default());
        let first = factory.get().unwrap();
        let logger = factory.get_logger("Boot").unwrap();

        let second = factory.init(
            LoggingServiceConfig::builder().level(LogLevel::Warn).build(),
        );

        assert!(!first.ptr_eq(&second));
        assert_eq!(factory.get().unwrap().level(), LogLevel::Warn);
        assert!(!logger.ptr_eq(&factory.get_logger("Boot").unwrap()));
    }

    #[test]
    fn test_global_is_a_single_instance() {
        assert!(std::ptr::eq(
            LoggingServiceFactory::global(),
            LoggingServiceFactory::global()
        ));
    }
}
