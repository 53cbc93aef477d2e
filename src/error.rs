use thiserror::Error;

/// Convenience result type for analysis operations.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by the analysis pipeline.
///
/// Only failures at the outer boundary end up here. Short rows, a missing filter row and
/// degenerate correlation denominators are recovered in place and never surface as errors.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Underlying I/O error (e.g. source file not found, target not writable).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the serialized table failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A configuration file or summary could not be (de)serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration parsed but describes an unusable run.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },
}
