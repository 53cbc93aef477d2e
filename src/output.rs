//! Tab-separated rendering of an analyzed [`Table`].
//!
//! Every row is written as its surviving field texts followed by fourteen statistic fields,
//! seven for the full pass and seven for the minimized pass (see [`HEADER_LABELS`]). The header
//! row gets the labels instead of numbers. Floats use six decimals.

use std::io::Write;

use crate::error::AnalysisResult;
use crate::types::{Row, RowStats, Table};

/// Labels appended to the header row, in the order statistics are written.
pub const HEADER_LABELS: [&str; 14] = [
    "total_count",
    "total_value",
    "total_square",
    "total_avg",
    "total_valid_avg",
    "total_spearman",
    "total_pearson",
    "left_count",
    "left_value",
    "left_square",
    "left_avg",
    "left_valid_avg",
    "left_spearman",
    "left_pearson",
];

/// Write `table` to `writer`, one newline-terminated record per row.
pub fn write_table<W: Write>(table: &Table<'_>, writer: W) -> AnalysisResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .flexible(true)
        .from_writer(writer);

    for row in &table.rows {
        for column in &row.fields {
            wtr.write_field(column.text)?;
        }
        if row.is_header() {
            wtr.write_record(HEADER_LABELS)?;
        } else {
            wtr.write_record(stat_fields(row))?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Render `table` into an owned string.
pub fn render_table(table: &Table<'_>) -> AnalysisResult<String> {
    let mut buf = Vec::new();
    write_table(table, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn stat_fields(row: &Row<'_>) -> Vec<String> {
    let mut out = Vec::with_capacity(HEADER_LABELS.len());
    push_stats(&mut out, &row.full);
    push_stats(&mut out, &row.min);
    out
}

// The printed count is the one `avg_all` divides by.
fn push_stats(out: &mut Vec<String>, stats: &RowStats) {
    out.push(stats.column_count.to_string());
    out.push(format_float(stats.sum_x));
    out.push(format_float(stats.sum_xx));
    out.push(format_float(stats.avg_all()));
    out.push(format_float(stats.avg_valid()));
    out.push(format_float(stats.spearman));
    out.push(format_float(stats.pearson));
}

fn format_float(v: f64) -> String {
    // Running-sum subtraction can leave -0.0 behind.
    let v = if v == 0.0 { 0.0 } else { v };
    format!("{v:.6}")
}
