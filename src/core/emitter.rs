//! Bound emission functions
//!
//! An [`Emitter`] is what a level accessor hands back: either a disabled
//! no-op, or a function already bound to the sink (or the local buffer) and
//! pre-seeded with the rendered context of the call. Gate checks happen when
//! the emitter is resolved, so a disabled log site never formats anything.

use super::log_arg::{join_args, LogArg};
use super::log_level::LogLevel;
use super::service::LoggingService;
use super::sink::Sink;
use std::fmt;
use std::sync::Arc;

/// Rendered context to put in front of a call's arguments
#[derive(Debug, Clone)]
pub(crate) enum Prefix {
    /// Positional fragments, in token order
    Fragments(Vec<String>),
    /// Token name to value, completed with a `content` field per call
    Fields(serde_json::Map<String, serde_json::Value>),
}

impl Prefix {
    pub(crate) fn apply(&self, args: Vec<LogArg>) -> Vec<LogArg> {
        match self {
            Prefix::Fragments(fragments) => fragments
                .iter()
                .cloned()
                .map(LogArg::Text)
                .chain(args)
                .collect(),
            Prefix::Fields(fields) => {
                let mut object = fields.clone();
                let content = match args.as_slice() {
                    [LogArg::Json(value)] if value.is_object() || value.is_array() => value.clone(),
                    _ => serde_json::Value::String(join_args(&args)),
                };
                object.insert("content".to_string(), content);
                vec![LogArg::Json(serde_json::Value::Object(object))]
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    /// Straight to the sink
    Local,
    /// Into the local buffer, and to the sink too when local logging is on
    Buffered,
}

pub(crate) struct Binding {
    pub(crate) service: LoggingService,
    pub(crate) sink: Arc<dyn Sink>,
    pub(crate) level: LogLevel,
    pub(crate) prefix: Prefix,
    pub(crate) route: Route,
}

/// Emission function for one log call site
///
/// # Example
///
/// ```
/// use unified_logger::prelude::*;
///
/// let service = LoggingService::new(LoggingServiceConfig::default());
/// let logger = service.get_logger("Startup");
///
/// let emit = logger.debug();
/// if emit.is_enabled() {
///     emit.emit(vec!["listening on".into(), 8080.into()]);
/// }
///
/// // INFO is above the default DEBUG logger level: nothing happens
/// logger.info().emit_message("never rendered");
/// ```
#[derive(Clone)]
pub struct Emitter {
    binding: Option<Arc<Binding>>,
}

impl Emitter {
    /// An emitter that ignores every call
    pub const fn disabled() -> Self {
        Self { binding: None }
    }

    pub(crate) fn bound(binding: Binding) -> Self {
        Self {
            binding: Some(Arc::new(binding)),
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.binding.is_some()
    }

    /// Level this emitter writes at, `None` when disabled
    pub fn level(&self) -> Option<LogLevel> {
        self.binding.as_ref().map(|b| b.level)
    }

    pub fn emit(&self, args: Vec<LogArg>) {
        let Some(binding) = &self.binding else {
            return;
        };

        let Binding {
            service,
            sink,
            level,
            prefix,
            route,
        } = &**binding;
        match route {
            Route::Local => service.deliver(*level, sink, prefix, args),
            Route::Buffered => service.cache_log(*level, sink, prefix, args),
        }
    }

    pub fn emit_message(&self, message: impl Into<String>) {
        if self.is_enabled() {
            self.emit(vec![LogArg::Text(message.into())]);
        }
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.binding {
            None => f.write_str("Emitter(disabled)"),
            Some(binding) => f
                .debug_struct("Emitter")
                .field("level", &binding.level)
                .field("route", &binding.route)
                .field("sink", &binding.sink.name())
                .finish(),
        }
    }
}
