//! Sink trait for rendered log output

use super::{error::Result, log_arg::LogArg, log_level::LogLevel};

/// Destination of rendered log calls.
///
/// A sink exposes one method per level. `write` receives the context
/// fragments first, followed by the call's own arguments. A sink lacking a
/// method for some level reports it through `supports`; calls at that level are
/// then routed to the default console sink instead.
pub trait Sink: Send + Sync {
    fn write(&self, level: LogLevel, args: &[LogArg]) -> Result<()>;

    fn supports(&self, _level: LogLevel) -> bool {
        true
    }

    fn name(&self) -> &str;
}
