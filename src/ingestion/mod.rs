//! Turning raw input into a [`crate::types::Table`].
//!
//! Most callers should use [`parse_table`], which treats the first line as the header and every
//! following line, blank or not, as an observation. [`parse_row`] and [`probe_field_count`]
//! expose the line-level steps.

pub mod tokenizer;

pub use tokenizer::{parse_row, parse_table, probe_field_count, ParsedRow};
