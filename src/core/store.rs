//! Key-value persistence for service settings

use super::error::Result;

/// Key-value store the service round-trips its persisted settings through
pub trait PersistenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
