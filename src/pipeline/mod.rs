//! End-to-end analysis runs.
//!
//! The pipeline is a single synchronous pass:
//!
//! parse → locate filter row → full pass → prune → minimized pass → serialize
//!
//! If no filter value is given, or no row matches it, the correlation and pruning steps are
//! skipped and every statistic is written as zero.
//!
//! - [`analyze_table`] runs the analysis steps on an already parsed table
//! - [`analyze_bytes`] parses, analyzes and renders an in-memory buffer
//! - [`analyze_file`] adds loading the source and storing the target
//!
//! When an [`AnalysisObserver`] is configured it receives an [`AnalysisEvent`] per step, and
//! `on_failure`/`on_alert` when a run fails.

pub mod io;
mod observer;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::ingestion::parse_table;
use crate::output::render_table;
use crate::processing::{correlate_table, find_filter_row, prune_columns, PassSummary};
use crate::types::{Pass, Table};

pub use observer::{
    AnalysisEvent, AnalysisObserver, AnalysisSeverity, CompositeObserver, FileObserver,
    StdErrObserver,
};

/// Field position matched against the filter value unless configured otherwise.
pub const DEFAULT_FILTER_COLUMN: usize = 1;

/// Options controlling an analysis run.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct AnalysisOptions {
    /// Field position the filter value is compared against.
    pub filter_column: usize,
    /// Text identifying the filter row. `None` (or empty) skips all correlation work.
    pub filter_value: Option<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn AnalysisObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: AnalysisSeverity,
}

impl fmt::Debug for AnalysisOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisOptions")
            .field("filter_column", &self.filter_column)
            .field("filter_value", &self.filter_value)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            filter_column: DEFAULT_FILTER_COLUMN,
            filter_value: None,
            observer: None,
            alert_at_or_above: AnalysisSeverity::Critical,
        }
    }
}

impl AnalysisOptions {
    /// Options selecting the row whose field `filter_column` equals `filter_value`.
    pub fn with_filter(filter_column: usize, filter_value: impl Into<String>) -> Self {
        Self {
            filter_column,
            filter_value: Some(filter_value.into()),
            ..Default::default()
        }
    }

    fn emit(&self, event: AnalysisEvent) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_event(&event);
        }
    }

    fn report_failure(&self, error: &AnalysisError) {
        if let Some(obs) = self.observer.as_ref() {
            let sev = AnalysisSeverity::for_error(error);
            obs.on_failure(sev, error);
            if sev >= self.alert_at_or_above {
                obs.on_alert(sev, error);
            }
        }
    }
}

/// What a run did, in a form suitable for JSON reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    /// Rows in the table, header included.
    pub rows: usize,
    /// Field count of the header line.
    pub total_columns: usize,
    /// Data columns kept after pruning.
    pub retained_columns: usize,
    /// Index of the filter row, if one was found.
    pub filter_row: Option<usize>,
    /// Field positions removed by pruning.
    pub removed_columns: Vec<usize>,
    pub full_pass: PassSummary,
    pub minimized_pass: PassSummary,
}

/// Serialized output plus the summary of the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutput {
    pub text: String,
    pub summary: AnalysisSummary,
}

/// Run filter selection, both correlation passes and pruning on a parsed table.
pub fn analyze_table(table: &mut Table<'_>, options: &AnalysisOptions) -> AnalysisSummary {
    let mut summary = AnalysisSummary {
        rows: table.row_count(),
        total_columns: table.total_columns,
        ..Default::default()
    };
    options.emit(AnalysisEvent::TableParsed {
        rows: summary.rows,
        columns: summary.total_columns,
    });

    let Some(value) = options.filter_value.as_deref().filter(|v| !v.is_empty()) else {
        table.reset_statistics();
        options.emit(AnalysisEvent::FilterSkipped);
        return summary;
    };

    let Some(filter_row) = find_filter_row(table, options.filter_column, Some(value)) else {
        table.reset_statistics();
        options.emit(AnalysisEvent::FilterRowMissing {
            column: options.filter_column,
            value: value.to_string(),
        });
        return summary;
    };
    summary.filter_row = Some(filter_row);
    options.emit(AnalysisEvent::FilterRowFound {
        row: filter_row,
        column: options.filter_column,
        value: value.to_string(),
    });

    summary.full_pass = correlate_table(table, filter_row, Pass::Full);
    options.emit(pass_finished(Pass::Full, summary.full_pass));

    // The filter row is addressed by index, not re-matched by text: the match column can
    // itself be pruned.
    if let Some(outcome) = prune_columns(table, filter_row) {
        options.emit(AnalysisEvent::ColumnsPruned {
            removed: outcome.removed.len(),
            retained: outcome.retained,
        });
        summary.retained_columns = outcome.retained;
        summary.removed_columns = outcome.removed;
    }

    summary.minimized_pass = correlate_table(table, filter_row, Pass::Minimized);
    options.emit(pass_finished(Pass::Minimized, summary.minimized_pass));

    summary
}

/// Parse `input`, analyze it and render the result.
///
/// Invalid UTF-8 sequences are replaced before tokenizing.
pub fn analyze_bytes(input: &[u8], options: &AnalysisOptions) -> AnalysisResult<AnalysisOutput> {
    let decoded = String::from_utf8_lossy(input);
    let mut table = parse_table(&decoded);
    let summary = analyze_table(&mut table, options);
    let text = render_table(&table)?;
    Ok(AnalysisOutput { text, summary })
}

/// Load `source`, analyze it and store the rendered table at `target`.
///
/// Nothing is written to `target` unless the whole run succeeds.
pub fn analyze_file(
    source: impl AsRef<Path>,
    target: impl AsRef<Path>,
    options: &AnalysisOptions,
) -> AnalysisResult<AnalysisSummary> {
    let result = run_file(source.as_ref(), target.as_ref(), options);
    if let Err(e) = &result {
        options.report_failure(e);
    }
    result
}

fn run_file(
    source: &Path,
    target: &Path,
    options: &AnalysisOptions,
) -> AnalysisResult<AnalysisSummary> {
    let input = io::load_bytes(source)?;
    options.emit(AnalysisEvent::BufferLoaded {
        path: source.to_path_buf(),
        bytes: input.len(),
    });

    let output = analyze_bytes(&input, options)?;

    io::store_bytes(target, output.text.as_bytes())?;
    options.emit(AnalysisEvent::OutputWritten {
        path: target.to_path_buf(),
        bytes: output.text.len(),
    });
    Ok(output.summary)
}

fn pass_finished(pass: Pass, summary: PassSummary) -> AnalysisEvent {
    AnalysisEvent::PassFinished {
        pass,
        correlated: summary.correlated,
        skipped: summary.skipped,
    }
}

/// Owned description of one file-to-file run.
///
/// This can be useful to queue several runs with different filters.
#[derive(Clone)]
pub struct AnalysisRequest {
    pub source: PathBuf,
    pub target: PathBuf,
    pub options: AnalysisOptions,
}

impl fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("source", &self.source)
            .field("target", &self.target)
            .field("options", &self.options)
            .finish()
    }
}

impl AnalysisRequest {
    /// Execute the request by calling [`analyze_file`].
    pub fn run(&self) -> AnalysisResult<AnalysisSummary> {
        analyze_file(&self.source, &self.target, &self.options)
    }
}
