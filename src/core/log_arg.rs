//! Arguments of a log call
//!
//! A log call takes any number of heterogeneous arguments. Text is forwarded
//! as is, structured values travel as JSON, and loggers stay loggers until a
//! sink-specific rendering is chosen.

use super::logger::Logger;
use serde::Serialize;
use std::fmt;

/// Replaces a value that could not be serialized
pub const SERIALIZE_ERROR_TAG: &str = "[!error on stringify the error!]";

#[derive(Debug, Clone)]
pub enum LogArg {
    Text(String),
    Json(serde_json::Value),
    Logger(Logger),
    /// A value whose serialization failed, with the failure message
    Unserializable(String),
}

impl LogArg {
    /// Serialize any value into an argument.
    ///
    /// Never fails: a serialization error yields [`LogArg::Unserializable`].
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(value) => LogArg::Json(value),
            Err(e) => LogArg::Unserializable(e.to_string()),
        }
    }

    /// A non-null JSON object
    pub fn is_object(&self) -> bool {
        matches!(self, LogArg::Json(serde_json::Value::Object(_)))
    }

    /// Rendering used by the local buffer.
    ///
    /// `None` means the argument is left out of the line.
    pub(crate) fn to_cache_string(&self, logger_info: bool) -> Option<String> {
        match self {
            LogArg::Text(s) => Some(s.clone()),
            LogArg::Logger(logger) => logger_info.then(|| logger.to_server_string()),
            LogArg::Json(value) => {
                let rendered = match serde_json::to_string(value) {
                    Ok(s) => s,
                    Err(_) => return Some(SERIALIZE_ERROR_TAG.to_string()),
                };
                match value {
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        Some(format!("\n------\n{}\n------\n", rendered))
                    }
                    _ => Some(rendered),
                }
            }
            LogArg::Unserializable(_) => Some(SERIALIZE_ERROR_TAG.to_string()),
        }
    }
}

impl fmt::Display for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogArg::Text(s) => write!(f, "{}", s),
            LogArg::Json(serde_json::Value::String(s)) => write!(f, "{}", s),
            LogArg::Json(value) => write!(f, "{}", value),
            LogArg::Logger(logger) => write!(f, "{}", logger.to_server_string()),
            LogArg::Unserializable(_) => write!(f, "{}", SERIALIZE_ERROR_TAG),
        }
    }
}

/// Space-joined display form of a list of arguments
pub fn join_args(args: &[LogArg]) -> String {
    args.iter()
        .map(|arg| arg.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl From<String> for LogArg {
    fn from(s: String) -> Self {
        LogArg::Text(s)
    }
}

impl From<&str> for LogArg {
    fn from(s: &str) -> Self {
        LogArg::Text(s.to_string())
    }
}

impl From<&String> for LogArg {
    fn from(s: &String) -> Self {
        LogArg::Text(s.clone())
    }
}

impl From<serde_json::Value> for LogArg {
    fn from(value: serde_json::Value) -> Self {
        LogArg::Json(value)
    }
}

impl From<i64> for LogArg {
    fn from(i: i64) -> Self {
        LogArg::Json(i.into())
    }
}

impl From<i32> for LogArg {
    fn from(i: i32) -> Self {
        LogArg::Json(i.into())
    }
}

impl From<u64> for LogArg {
    fn from(u: u64) -> Self {
        LogArg::Json(u.into())
    }
}

impl From<f64> for LogArg {
    fn from(f: f64) -> Self {
        LogArg::serialize(&f)
    }
}

impl From<bool> for LogArg {
    fn from(b: bool) -> Self {
        LogArg::Json(b.into())
    }
}

impl From<Logger> for LogArg {
    fn from(logger: Logger) -> Self {
        LogArg::Logger(logger)
    }
}

impl From<&Logger> for LogArg {
    fn from(logger: &Logger) -> Self {
        LogArg::Logger(logger.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_serialize_value() {
        let arg = LogArg::serialize(&vec![1, 2, 3]);
        assert!(matches!(arg, LogArg::Json(serde_json::Value::Array(_))));
    }

    #[test]
    fn test_serialize_failure_is_captured() {
        // JSON object keys must be strings
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        let arg = LogArg::serialize(&map);

        assert!(matches!(arg, LogArg::Unserializable(_)));
        assert_eq!(arg.to_string(), SERIALIZE_ERROR_TAG);
        assert_eq!(arg.to_cache_string(true).as_deref(), Some(SERIALIZE_ERROR_TAG));
    }

    #[test]
    fn test_non_finite_float_is_null() {
        let arg = LogArg::from(f64::NAN);
        assert_eq!(arg.to_string(), "null");
    }

    #[test]
    fn test_cache_string_wraps_objects() {
        let arg = LogArg::from(json!({"id": 7}));
        assert_eq!(
            arg.to_cache_string(true).as_deref(),
            Some("\n------\n{\"id\":7}\n------\n")
        );

        let arg = LogArg::from(42);
        assert_eq!(arg.to_cache_string(true).as_deref(), Some("42"));
    }

    #[test]
    fn test_display_and_join() {
        let args = vec![
            LogArg::from("user"),
            LogArg::from(json!("alice")),
            LogArg::from(true),
        ];
        assert_eq!(join_args(&args), "user alice true");
    }

    #[test]
    fn test_is_object() {
        assert!(LogArg::from(json!({})).is_object());
        assert!(!LogArg::from(json!(null)).is_object());
        assert!(!LogArg::from("text").is_object());
    }
}
