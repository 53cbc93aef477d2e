//! In-memory table analysis.
//!
//! The processing layer operates on [`crate::types::Table`] values produced by the tokenizer:
//!
//! - [`find_filter_row()`]: locate the reference row by exact field match
//! - [`correlate_table()`]: Pearson (`r²`) and Spearman of every row against the filter row
//! - [`prune_columns()`]: drop columns the filter row disqualifies and adjust minimized sums
//!
//! ## Example: full pass → prune → minimized pass
//!
//! ```rust
//! use row_correlation::ingestion::parse_table;
//! use row_correlation::processing::{correlate_table, find_filter_row, prune_columns};
//! use row_correlation::types::Pass;
//!
//! let input = "id name a b c\nrow A 1 0 3\nrow B 2 5 6\n";
//! let mut table = parse_table(input);
//!
//! let filter = find_filter_row(&table, 1, Some("A")).unwrap();
//! correlate_table(&mut table, filter, Pass::Full);
//!
//! // Column `b` is 0 in the filter row, so it disappears from every row.
//! let outcome = prune_columns(&mut table, filter).unwrap();
//! assert_eq!(outcome.removed, vec![3]);
//!
//! correlate_table(&mut table, filter, Pass::Minimized);
//! assert_eq!(table.rows[2].min.sum_x, 8.0);
//! assert_eq!(table.rows[1].min.spearman, 1.0);
//! ```

pub mod correlation;
pub mod filter;
pub mod prune;

pub use correlation::{correlate_table, pearson, spearman, sum_xy, PassSummary};
pub use filter::find_filter_row;
pub use prune::{prune_columns, pruning_mask, PruneOutcome};
