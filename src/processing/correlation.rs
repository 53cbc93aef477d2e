//! Pearson and Spearman correlation of every row against the filter row.
//!
//! Both statistics are written into the [`RowStats`] block selected by [`Pass`]. A row whose
//! valid column count differs from the filter row's is skipped and keeps zeroed statistics,
//! since the two series would not have equal length.
//!
//! The "pearson" statistic is the squared product-moment correlation (coefficient of
//! determination), kept for output compatibility.
//!
//! Spearman ranks only the columns the pass counts as valid (see [`Column::is_valid_in`]), so
//! both rank series have exactly `n` entries.

use serde::Serialize;

use crate::types::{Column, Pass, RowStats, Table};

/// Rows touched by one correlation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    /// Rows whose statistics were computed.
    pub correlated: usize,
    /// Rows skipped because their column count differed from the filter row's.
    pub skipped: usize,
}

/// `Σ filter[i].value * row[i].value` over the data columns both rows have.
pub fn sum_xy(filter: &[Column<'_>], row: &[Column<'_>]) -> f64 {
    filter.iter().zip(row).map(|(f, r)| f.value * r.value).sum()
}

/// Squared correlation of two series of length `n` described by their running sums.
///
/// Returns 0 when `n` is 0 or either series has zero variance.
pub fn pearson(filter: &RowStats, row: &RowStats, sum_xy: f64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    let lxx = filter.sum_xx - filter.sum_x * filter.sum_x / n;
    let lyy = row.sum_xx - row.sum_x * row.sum_x / n;
    let lxy = sum_xy - filter.sum_x * row.sum_x / n;

    if lxx == 0.0 || lyy == 0.0 {
        0.0
    } else {
        (lxy * lxy) / (lxx * lyy)
    }
}

/// Spearman rank correlation of two series of length `n`.
///
/// A column's rank is its position within its series. Each side is stably sorted by value
/// (ties keep their column order) and `d` sums the squared rank displacement over the first
/// `n` sorted positions. Returns 0 when `n <= 1` or either series is shorter than `n`.
pub fn spearman(filter: &[Column<'_>], row: &[Column<'_>], n: usize) -> f64 {
    if n <= 1 || filter.len() < n || row.len() < n {
        return 0.0;
    }
    let filter_ranks = ranks_by_value(&filter[..n]);
    let row_ranks = ranks_by_value(&row[..n]);

    let d: f64 = filter_ranks
        .iter()
        .zip(&row_ranks)
        .map(|(&f, &r)| {
            let diff = r as f64 - f as f64;
            diff * diff
        })
        .sum();

    let n = n as f64;
    1.0 - 6.0 * d / (n * (n * n - 1.0))
}

/// Series positions in ascending value order.
fn ranks_by_value(columns: &[Column<'_>]) -> Vec<usize> {
    let mut ranks: Vec<usize> = (0..columns.len()).collect();
    ranks.sort_by(|&a, &b| columns[a].value.total_cmp(&columns[b].value));
    ranks
}

fn valid_series<'a>(columns: &[Column<'a>], pass: Pass) -> Vec<Column<'a>> {
    columns.iter().filter(|c| c.is_valid_in(pass)).copied().collect()
}

/// Correlate every data row against the row at `filter_row`, writing into the `pass` block.
///
/// The filter row is copied before the walk, so it is correlated against itself as well.
/// Nothing happens if `filter_row` is out of range.
pub fn correlate_table(table: &mut Table<'_>, filter_row: usize, pass: Pass) -> PassSummary {
    let Some(filter) = table.rows.get(filter_row).cloned() else {
        return PassSummary::default();
    };
    let filter_stats = *filter.stats(pass);
    let filter_columns = filter.data_columns();
    let filter_series = valid_series(filter_columns, pass);
    let n = filter_stats.valid_column_count;

    let mut summary = PassSummary::default();
    for row in table.rows.iter_mut().filter(|r| !r.is_header()) {
        if row.stats(pass).valid_column_count != n {
            summary.skipped += 1;
            continue;
        }

        let xy = sum_xy(filter_columns, row.data_columns());
        let r2 = pearson(&filter_stats, row.stats(pass), xy, n);
        let rho = spearman(&filter_series, &valid_series(row.data_columns(), pass), n);

        let stats = row.stats_mut(pass);
        stats.sum_xy = xy;
        stats.pearson = r2;
        stats.spearman = rho;
        summary.correlated += 1;
    }
    summary
}
