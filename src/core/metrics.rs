//! Service metrics for observability
//!
//! Counters for emitted, suppressed and buffered calls, buffer flushes, and
//! sink failures.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by a logging service
///
/// # Example
///
/// ```
/// use unified_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_emitted();
/// metrics.record_suppressed();
///
/// assert_eq!(metrics.emitted(), 1);
/// assert_eq!(metrics.suppressed(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Calls delivered to the sink immediately
    emitted: AtomicU64,

    /// Emitters resolved to no-ops by the level gate
    suppressed: AtomicU64,

    /// Lines appended to the local buffer
    buffered: AtomicU64,

    /// Buffer flushes
    flushes: AtomicU64,

    /// Lines delivered by buffer flushes
    flushed_lines: AtomicU64,

    /// Sink writes that returned an error or panicked
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            buffered: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
            flushed_lines: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn buffered(&self) -> u64 {
        self.buffered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flushed_lines(&self) -> u64 {
        self.flushed_lines.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_buffered(&self) -> u64 {
        self.buffered.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one flush of `lines` buffered lines
    #[inline]
    pub fn record_flush(&self, lines: usize) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        self.flushed_lines.fetch_add(lines as u64, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.buffered.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
        self.flushed_lines.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            emitted: AtomicU64::new(self.emitted()),
            suppressed: AtomicU64::new(self.suppressed()),
            buffered: AtomicU64::new(self.buffered()),
            flushes: AtomicU64::new(self.flushes()),
            flushed_lines: AtomicU64::new(self.flushed_lines()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.emitted(), 0);
        assert_eq!(metrics.suppressed(), 0);
        assert_eq!(metrics.buffered(), 0);
        assert_eq!(metrics.flushes(), 0);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_record_returns_previous() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_emitted(), 0);
        assert_eq!(metrics.record_emitted(), 1);
        assert_eq!(metrics.emitted(), 2);
    }

    #[test]
    fn test_record_flush() {
        let metrics = LoggerMetrics::new();
        metrics.record_flush(3);
        metrics.record_flush(2);
        assert_eq!(metrics.flushes(), 2);
        assert_eq!(metrics.flushed_lines(), 5);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_suppressed();
        metrics.record_buffered();
        metrics.record_sink_failure();

        metrics.reset();

        assert_eq!(metrics.suppressed(), 0);
        assert_eq!(metrics.buffered(), 0);
        assert_eq!(metrics.sink_failures(), 0);
    }

    #[test]
    fn test_metrics_clone_is_snapshot() {
        let metrics = LoggerMetrics::new();
        metrics.record_buffered();

        let snapshot = metrics.clone();
        metrics.record_buffered();

        assert_eq!(metrics.buffered(), 2);
        assert_eq!(snapshot.buffered(), 1);
    }
}
