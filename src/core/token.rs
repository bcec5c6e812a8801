//! Context tokens
//!
//! A token is a named extractor producing one display fragment (timestamp,
//! level, caller, sub-logger) from the [`LogContext`] of a call. Tokens whose
//! value is absent or empty are left out entirely.

use super::log_context::LogContext;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type TokenExtractor = Arc<dyn Fn(&LogContext) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenFormat {
    #[default]
    None,
    /// `[value]`
    Brackets,
    /// `{value}`
    Braces,
}

impl TokenFormat {
    pub fn wrap(&self, value: &str) -> String {
        match self {
            TokenFormat::None => value.to_string(),
            TokenFormat::Brackets => format!("[{}]", value),
            TokenFormat::Braces => format!("{{{}}}", value),
        }
    }
}

#[derive(Clone)]
pub struct ContextToken {
    name: String,
    format: TokenFormat,
    extract: TokenExtractor,
}

impl ContextToken {
    pub fn new<F>(name: impl Into<String>, format: TokenFormat, extract: F) -> Self
    where
        F: Fn(&LogContext) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            format,
            extract: Arc::new(extract),
        }
    }

    /// `[DEBUG]`
    pub fn level() -> Self {
        Self::new("level", TokenFormat::Brackets, |ctx| {
            Some(ctx.level.to_str().to_string())
        })
    }

    /// `[2025-01-08T10:30:45.123Z]`
    pub fn datetime(format: TimestampFormat) -> Self {
        Self::new("datetime", TokenFormat::Brackets, move |ctx| {
            Some(format.format(&ctx.timestamp))
        })
    }

    /// `{sharedKey.Caller}`
    pub fn caller() -> Self {
        Self::new("caller", TokenFormat::Braces, |ctx| {
            Some(ctx.logger.full_caller_name())
        })
    }

    /// `[parent.child]`
    pub fn sub_logger() -> Self {
        Self::new("subLogger", TokenFormat::Brackets, |ctx| ctx.sub_logger.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> TokenFormat {
        self.format
    }

    /// Raw value for this context, `None` when absent or empty
    pub fn value(&self, ctx: &LogContext) -> Option<String> {
        (self.extract)(ctx).filter(|v| !v.is_empty())
    }

    /// Wrapped fragment for this context, `None` when absent or empty
    pub fn render(&self, ctx: &LogContext) -> Option<String> {
        self.value(ctx).map(|v| self.format.wrap(&v))
    }
}

impl fmt::Debug for ContextToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextToken")
            .field("name", &self.name)
            .field("format", &self.format)
            .finish()
    }
}

/// `datetime`, `level`, `caller`, `subLogger`
pub fn default_tokens(timestamp_format: TimestampFormat) -> Vec<ContextToken> {
    vec![
        ContextToken::datetime(timestamp_format),
        ContextToken::level(),
        ContextToken::caller(),
        ContextToken::sub_logger(),
    ]
}

/// Positional fragments, in token order, absent values skipped
pub fn render_fragments(tokens: &[ContextToken], ctx: &LogContext) -> Vec<String> {
    tokens.iter().filter_map(|token| token.render(ctx)).collect()
}

/// Token name to raw value, absent values skipped
pub fn render_fields(
    tokens: &[ContextToken],
    ctx: &LogContext,
) -> serde_json::Map<String, serde_json::Value> {
    tokens
        .iter()
        .filter_map(|token| {
            token
                .value(ctx)
                .map(|v| (token.name.clone(), serde_json::Value::String(v)))
        })
        .collect()
}

/// Insert `token`, replacing any token with the same name in place.
pub(crate) fn upsert_token(tokens: &mut Vec<ContextToken>, token: ContextToken) {
    match tokens.iter_mut().find(|t| t.name == token.name) {
        Some(existing) => *existing = token,
        None => tokens.push(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LogLevel, LoggingService, LoggingServiceConfig};
    use chrono::{TimeZone, Utc};

    fn context(level: LogLevel) -> (LoggingService, LogContext) {
        let service = LoggingService::new(LoggingServiceConfig::default());
        let logger = service.get_logger("Checkout");
        let stamp = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        (service, LogContext::new(level, logger).with_timestamp(stamp))
    }

    #[test]
    fn test_wrap_formats() {
        assert_eq!(TokenFormat::None.wrap("v"), "v");
        assert_eq!(TokenFormat::Brackets.wrap("v"), "[v]");
        assert_eq!(TokenFormat::Braces.wrap("v"), "{v}");
    }

    #[test]
    fn test_default_rendering() {
        let (_service, ctx) = context(LogLevel::Debug);
        let fragments = render_fragments(&default_tokens(TimestampFormat::Iso8601), &ctx);

        assert_eq!(
            fragments,
            vec!["[2025-01-08T10:30:45.000Z]", "[DEBUG]", "{Checkout}"]
        );
    }

    #[test]
    fn test_absent_value_is_suppressed() {
        let (_service, ctx) = context(LogLevel::Log);
        let tokens = vec![
            ContextToken::datetime(TimestampFormat::UnixMillis),
            ContextToken::level(),
            ContextToken::new("caller", TokenFormat::Braces, |_| None),
        ];

        let fragments = render_fragments(&tokens, &ctx);
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[1], "[LOG]");
        assert!(!fragments.iter().any(|f| f == "{}" || f == "[]"));
    }

    #[test]
    fn test_empty_value_is_suppressed() {
        let (_service, ctx) = context(LogLevel::Log);
        let token = ContextToken::new("empty", TokenFormat::Brackets, |_| Some(String::new()));
        assert_eq!(token.render(&ctx), None);
    }

    #[test]
    fn test_sub_logger_token() {
        let (_service, ctx) = context(LogLevel::Trace);
        let ctx = ctx.with_sub_logger("A.B");
        assert_eq!(ContextToken::sub_logger().render(&ctx).as_deref(), Some("[A.B]"));
    }

    #[test]
    fn test_render_fields() {
        let (_service, ctx) = context(LogLevel::Trace);
        let fields = render_fields(&[ContextToken::level(), ContextToken::caller()], &ctx);

        assert_eq!(fields["level"], "TRACE");
        assert_eq!(fields["caller"], "Checkout");
        assert!(!fields.contains_key("subLogger"));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut tokens = default_tokens(TimestampFormat::Iso8601);
        upsert_token(
            &mut tokens,
            ContextToken::new("level", TokenFormat::None, |ctx| {
                Some(ctx.level.to_str().to_lowercase())
            }),
        );

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[1].name(), "level");
        assert_eq!(tokens[1].format(), TokenFormat::None);
    }
}
