//! In-memory recording sink

use crate::core::{LogArg, LogLevel, LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::collections::HashSet;

/// One recorded call: its level and the display form of every argument
pub type Record = (LogLevel, Vec<String>);

/// Records every call instead of printing it
///
/// Useful to capture output in tests, or to hand rendered lines to another
/// system. Levels listed with [`MemorySink::rejecting`] are reported as
/// unsupported, so those calls fall back to the console sink.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
    unsupported: HashSet<LogLevel>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink without methods for `levels`
    pub fn rejecting(levels: impl IntoIterator<Item = LogLevel>) -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            unsupported: levels.into_iter().collect(),
        }
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().clone()
    }

    /// Each record's arguments, space-joined
    pub fn lines(&self) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .map(|(_, args)| args.join(" "))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, level: LogLevel, args: &[LogArg]) -> Result<()> {
        if !self.supports(level) {
            return Err(LoggerError::unsupported_level(self.name(), level));
        }
        let rendered = args.iter().map(ToString::to_string).collect();
        self.records.lock().push((level, rendered));
        Ok(())
    }

    fn supports(&self, level: LogLevel) -> bool {
        !self.unsupported.contains(&level)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

impl std::fmt::Debug for MemorySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySink")
            .field("records", &self.len())
            .field("unsupported", &self.unsupported)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::join_args;
    use serde_json::json;

    #[test]
    fn test_records_calls() {
        let sink = MemorySink::new();
        sink.write(LogLevel::Debug, &["[DEBUG]".into(), json!({"k": 1}).into()]).unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.records()[0].0, LogLevel::Debug);
        assert_eq!(sink.lines(), vec![r#"[DEBUG] {"k":1}"#]);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_lines_match_join_args() {
        let sink = MemorySink::new();
        let args: Vec<LogArg> = vec!["a".into(), json!("b").into(), 3.into()];
        sink.write(LogLevel::Log, &args).unwrap();
        assert_eq!(sink.lines()[0], join_args(&args));
    }

    #[test]
    fn test_rejecting() {
        let sink = MemorySink::rejecting([LogLevel::Trace]);
        assert!(!sink.supports(LogLevel::Trace));
        assert!(sink.supports(LogLevel::Error));
        assert!(matches!(
            sink.write(LogLevel::Trace, &["x".into()]),
            Err(LoggerError::UnsupportedLevel { .. })
        ));
        assert!(sink.is_empty());
    }
}
