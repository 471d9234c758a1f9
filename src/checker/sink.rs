//! Where finished reports go.

use async_trait::async_trait;
use thiserror::Error;

use super::types::CheckReport;

#[derive(Debug, Error)]
/// Errors raised by a verdict sink.
pub enum SinkError {
    /// The backing store rejected the report.
    #[error("report store failed: {message}")]
    StoreFailed {
        /// Underlying store error.
        message: String,
    },
}

/// Destination for finished check reports.
///
/// Storage is best-effort: the pipeline logs a sink failure and still
/// returns the report to the caller.
#[async_trait]
pub trait VerdictSink: Send + Sync {
    /// Persists one report.
    async fn store(&self, report: &CheckReport) -> Result<(), SinkError>;
}

/// Sink that discards every report. The default when no persistence is
/// wired in.
#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl VerdictSink for NoopSink {
    async fn store(&self, _report: &CheckReport) -> Result<(), SinkError> {
        Ok(())
    }
}

/// In-memory sink for tests: keeps every stored report.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: std::sync::Mutex<Vec<CheckReport>>,
}

#[cfg(any(test, feature = "mock"))]
impl MemorySink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports stored so far, oldest first.
    pub fn reports(&self) -> Vec<CheckReport> {
        self.reports
            .lock()
            .expect("memory sink lock poisoned")
            .clone()
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl VerdictSink for MemorySink {
    async fn store(&self, report: &CheckReport) -> Result<(), SinkError> {
        self.reports
            .lock()
            .expect("memory sink lock poisoned")
            .push(report.clone());
        Ok(())
    }
}
