//! Ambient discovery of a logging service
//!
//! When enabled, a service installs itself into a caller-supplied registry
//! under a configured key, so code without a reference can still find it.

use super::service::{LoggingService, ServiceInner};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Weak;

/// Target of [`LoggingService::global`].
///
/// The service keeps its registry alive, so an implementation that stores the
/// handle as is keeps the service alive for as long as the registry lives.
pub trait GlobalRegistry: Send + Sync {
    fn install(&self, key: &str, service: LoggingService);
}

/// Key to service map
///
/// Entries do not keep their service alive: once every other handle is
/// dropped, [`lookup`](Self::lookup) returns `None`.
#[derive(Default)]
pub struct ServiceDirectory {
    entries: RwLock<HashMap<String, Weak<ServiceInner>>>,
}

impl ServiceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &str) -> Option<LoggingService> {
        self.entries
            .read()
            .get(key)
            .and_then(Weak::upgrade)
            .map(LoggingService::from_inner)
    }

    /// Keys whose service is still alive
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .iter()
            .filter(|(_, service)| service.strong_count() > 0)
            .map(|(key, _)| key.clone())
            .collect()
    }
}

impl GlobalRegistry for ServiceDirectory {
    fn install(&self, key: &str, service: LoggingService) {
        self.entries.write().insert(key.to_string(), service.downgrade());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggingServiceConfig;
    use std::sync::Arc;

    #[test]
    fn test_install_and_lookup() {
        let directory = ServiceDirectory::new();
        let service = LoggingService::new(LoggingServiceConfig::default());

        directory.install("logger", service.clone());
        let found = directory.lookup("logger").expect("installed");
        assert!(found.ptr_eq(&service));
        assert!(directory.lookup("other").is_none());
        assert_eq!(directory.keys(), vec!["logger".to_string()]);
    }

    #[test]
    fn test_installed_service_is_released() {
        let directory = Arc::new(ServiceDirectory::new());
        let service = LoggingService::new(
            LoggingServiceConfig::builder()
                .global_object(directory.clone(), "logger")
                .build(),
        );
        let logger = service.get_logger("Api");
        assert!(directory.lookup("logger").is_some());

        drop(service);

        assert!(directory.lookup("logger").is_none());
        assert!(directory.keys().is_empty());
        assert!(logger.service().is_none());
    }
}
