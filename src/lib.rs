//! `row-correlation` reads a whitespace/tab-delimited table, picks one row as the reference
//! ("filter row") and correlates every other row against it.
//!
//! ## What a run does
//!
//! 1. Tokenize the input into a [`types::Table`]. The first line is the header; the first two
//!    fields of every row are labels, the rest are numeric data columns.
//! 2. Find the filter row: the first data row whose field at the filter column equals the
//!    filter value.
//! 3. Full pass: Pearson (as `r²`) and Spearman of every row against the filter row, over all
//!    data columns.
//! 4. Prune: every column where the filter row's value is not positive is removed from every
//!    row, and the minimized sums are adjusted.
//! 5. Minimized pass: the same statistics over the surviving columns.
//! 6. Serialize: surviving fields plus fourteen statistic columns per row.
//!
//! ## Quick example
//!
//! ```rust
//! use row_correlation::pipeline::{analyze_bytes, AnalysisOptions};
//!
//! # fn main() -> Result<(), row_correlation::AnalysisError> {
//! let input = b"id\tname\tcat\tx\ty\nrow\tA\tk\t1\t2\nrow\tB\tk\t2\t4\n";
//! let output = analyze_bytes(input, &AnalysisOptions::with_filter(2, "k"))?;
//!
//! assert_eq!(output.summary.filter_row, Some(1));
//! assert_eq!(output.text.lines().count(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: table model and statistic blocks
//! - [`ingestion`]: tokenizer
//! - [`processing`]: filter selection, correlation, column pruning
//! - [`output`]: tab-separated serializer
//! - [`pipeline`]: end-to-end runs, file I/O and observers
//! - [`config`]: JSON configuration
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod ingestion;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{AnalysisError, AnalysisResult};
