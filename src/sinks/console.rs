//! Console sink implementation

use crate::core::{join_args, LogArg, LogLevel, Result, Sink};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes each call as one line; WARN and ERROR go to stderr, the rest to
/// stdout.
///
/// Also the fallback for levels another sink does not support.
pub struct ConsoleSink {
    use_colors: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn render(&self, level: LogLevel, args: &[LogArg]) -> String {
        let line = join_args(args);
        if self.use_colors {
            colorize(line, level)
        } else {
            line
        }
    }
}

#[cfg(feature = "console")]
fn colorize(line: String, level: LogLevel) -> String {
    line.color(level.color_code()).to_string()
}

#[cfg(not(feature = "console"))]
fn colorize(line: String, _level: LogLevel) -> String {
    line
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn write(&self, level: LogLevel, args: &[LogArg]) -> Result<()> {
        let output = self.render(level, args);

        match level {
            LogLevel::Warn | LogLevel::Error => {
                let mut stderr = std::io::stderr().lock();
                writeln!(stderr, "{}", output)?;
            }
            _ => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", output)?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_render() {
        let sink = ConsoleSink::with_colors(false);
        let line = sink.render(LogLevel::Info, &["[INFO]".into(), "ready".into()]);
        assert_eq!(line, "[INFO] ready");
    }

    #[test]
    fn test_write_never_fails_on_console() {
        let sink = ConsoleSink::with_colors(false);
        for level in LogLevel::all() {
            assert!(sink.write(level, &["console sink test".into()]).is_ok());
        }
        assert_eq!(sink.name(), "console");
    }
}
