//! Log level definitions and the double-gate rule
//!
//! Levels are ordered by rank, TRACE being the most verbose and ERROR the
//! least. A level acts as a threshold: it admits every candidate whose rank is
//! at or below its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Trace = 0,
    Log = 1,
    #[default]
    Debug = 2,
    Warn = 3,
    Info = 4,
    Error = 5,
}

impl LogLevel {
    /// Every level, in rank order
    pub const fn all() -> [LogLevel; 6] {
        [
            LogLevel::Trace,
            LogLevel::Log,
            LogLevel::Debug,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Error,
        ]
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Whether this level, used as a threshold, lets `candidate` through.
    #[inline]
    pub const fn admits(self, candidate: LogLevel) -> bool {
        candidate.rank() <= self.rank()
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "TRACE",
            LogLevel::Log => "LOG",
            LogLevel::Debug => "DEBUG",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
        }
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace => BrightBlack,
            LogLevel::Log => White,
            LogLevel::Debug => Blue,
            LogLevel::Warn => Yellow,
            LogLevel::Info => Green,
            LogLevel::Error => Red,
        }
    }
}

/// Both thresholds must admit a call before it is emitted: the logger's own
/// level must admit the call, and the service's global level must admit the
/// logger's level.
///
/// Lowering the global level below a logger's level silences that logger
/// entirely, even for calls the global level alone would admit.
#[inline]
pub const fn double_gate(candidate: LogLevel, logger_level: LogLevel, global_level: LogLevel) -> bool {
    logger_level.admits(candidate) && global_level.admits(logger_level)
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRACE" => Ok(LogLevel::Trace),
            "LOG" => Ok(LogLevel::Log),
            "DEBUG" => Ok(LogLevel::Debug),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "INFO" => Ok(LogLevel::Info),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        let ranks: Vec<u8> = LogLevel::all().iter().map(|l| l.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
        assert!(LogLevel::Warn < LogLevel::Info);
    }

    #[test]
    fn test_admits_boundaries() {
        assert!(LogLevel::Debug.admits(LogLevel::Debug));
        assert!(LogLevel::Debug.admits(LogLevel::Trace));
        assert!(!LogLevel::Debug.admits(LogLevel::Warn));
        assert!(LogLevel::Error.admits(LogLevel::Info));
    }

    #[test]
    fn test_double_gate() {
        // defaults: logger DEBUG, service ERROR
        assert!(double_gate(LogLevel::Log, LogLevel::Debug, LogLevel::Error));
        assert!(!double_gate(LogLevel::Info, LogLevel::Debug, LogLevel::Error));

        // global below the logger's own level silences it
        assert!(!double_gate(LogLevel::Trace, LogLevel::Info, LogLevel::Warn));
        assert!(double_gate(LogLevel::Trace, LogLevel::Warn, LogLevel::Warn));
    }

    #[test]
    fn test_parse() {
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("Log".parse::<LogLevel>(), Ok(LogLevel::Log));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_uppercase() {
        let json = serde_json::to_string(&LogLevel::Info).unwrap();
        assert_eq!(json, "\"INFO\"");
        let level: LogLevel = serde_json::from_str("\"TRACE\"").unwrap();
        assert_eq!(level, LogLevel::Trace);
    }
}
