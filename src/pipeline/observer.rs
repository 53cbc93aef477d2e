//! Observers for analysis runs.
//!
//! The pipeline reports progress as [`AnalysisEvent`]s and failures with an
//! [`AnalysisSeverity`]. [`StdErrObserver`] and [`FileObserver`] write one line per callback;
//! [`CompositeObserver`] fans out to several observers.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::AnalysisError;
use crate::types::Pass;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnalysisSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (run failed).
    Error,
    /// Critical error (I/O failures).
    Critical,
}

impl AnalysisSeverity {
    /// Severity a failed run is reported with.
    pub fn for_error(error: &AnalysisError) -> Self {
        match error {
            AnalysisError::Io(_) => Self::Critical,
            AnalysisError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            AnalysisError::Json(err) if err.is_io() => Self::Critical,
            AnalysisError::Json(_) | AnalysisError::InvalidConfig { .. } => Self::Error,
        }
    }
}

/// Progress events emitted while a table is analyzed.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisEvent {
    BufferLoaded { path: PathBuf, bytes: usize },
    TableParsed { rows: usize, columns: usize },
    FilterRowFound { row: usize, column: usize, value: String },
    FilterRowMissing { column: usize, value: String },
    /// No filter value was supplied; statistics are left zeroed.
    FilterSkipped,
    ColumnsPruned { removed: usize, retained: usize },
    PassFinished { pass: Pass, correlated: usize, skipped: usize },
    OutputWritten { path: PathBuf, bytes: usize },
}

impl AnalysisEvent {
    pub fn severity(&self) -> AnalysisSeverity {
        match self {
            Self::FilterRowMissing { .. } => AnalysisSeverity::Warning,
            _ => AnalysisSeverity::Info,
        }
    }
}

impl fmt::Display for AnalysisEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferLoaded { path, bytes } => {
                write!(f, "loaded path={} bytes={bytes}", path.display())
            }
            Self::TableParsed { rows, columns } => {
                write!(f, "parsed rows={rows} columns={columns}")
            }
            Self::FilterRowFound { row, column, value } => {
                write!(f, "filter row={row} column={column} value={value}")
            }
            Self::FilterRowMissing { column, value } => {
                write!(f, "no row matches column={column} value={value}")
            }
            Self::FilterSkipped => write!(f, "no filter value, statistics left zeroed"),
            Self::ColumnsPruned { removed, retained } => {
                write!(f, "pruned removed={removed} retained={retained}")
            }
            Self::PassFinished {
                pass,
                correlated,
                skipped,
            } => write!(f, "pass={pass:?} correlated={correlated} skipped={skipped}"),
            Self::OutputWritten { path, bytes } => {
                write!(f, "wrote path={} bytes={bytes}", path.display())
            }
        }
    }
}

/// Observer interface for analysis progress and failures.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait AnalysisObserver: Send + Sync {
    /// Called for every pipeline event.
    fn on_event(&self, _event: &AnalysisEvent) {}

    /// Called when a run fails.
    fn on_failure(&self, _severity: AnalysisSeverity, _error: &AnalysisError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, severity: AnalysisSeverity, error: &AnalysisError) {
        self.on_failure(severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn AnalysisObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn AnalysisObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl AnalysisObserver for CompositeObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }

    fn on_failure(&self, severity: AnalysisSeverity, error: &AnalysisError) {
        for o in &self.observers {
            o.on_failure(severity, error);
        }
    }

    fn on_alert(&self, severity: AnalysisSeverity, error: &AnalysisError) {
        for o in &self.observers {
            o.on_alert(severity, error);
        }
    }
}

/// Logs analysis events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl AnalysisObserver for StdErrObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        eprintln!("[analyze][{:?}] {event}", event.severity());
    }

    fn on_failure(&self, severity: AnalysisSeverity, error: &AnalysisError) {
        eprintln!("[analyze][{severity:?}] err={error}");
    }

    fn on_alert(&self, severity: AnalysisSeverity, error: &AnalysisError) {
        eprintln!("[ALERT][analyze][{severity:?}] err={error}");
    }
}

/// Appends analysis events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl AnalysisObserver for FileObserver {
    fn on_event(&self, event: &AnalysisEvent) {
        self.append_line(&format!("{} {:?} {event}", unix_ts(), event.severity()));
    }

    fn on_failure(&self, severity: AnalysisSeverity, error: &AnalysisError) {
        self.append_line(&format!("{} fail severity={severity:?} err={error}", unix_ts()));
    }

    fn on_alert(&self, severity: AnalysisSeverity, error: &AnalysisError) {
        self.append_line(&format!("{} ALERT severity={severity:?} err={error}", unix_ts()));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
