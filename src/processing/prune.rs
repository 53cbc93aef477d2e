//! Column pruning driven by the filter row.

use serde::Serialize;

use crate::types::{column_id, Column, Pass, Row, Table, LABEL_COLUMNS};

/// What a pruning pass removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneOutcome {
    /// Field positions (relative to the filter row before compaction) that were removed.
    pub removed: Vec<usize>,
    /// Data columns the filter row kept.
    pub retained: usize,
}

/// Per-field keep flags derived from `filter_row`.
///
/// Label columns are always kept; a data column is kept only if the filter row's value there
/// is positive.
pub fn pruning_mask(filter_row: &Row<'_>) -> Vec<bool> {
    filter_row
        .fields
        .iter()
        .enumerate()
        .map(|(position, column)| position < LABEL_COLUMNS || column.value > 0.0)
        .collect()
}

/// Remove every column the filter row at index `filter_row` disqualifies, from every row.
///
/// The filter row is compacted with its own mask like any other row. Surviving columns shift
/// left and take the id of their new position; removed values are subtracted from the
/// minimized sums. Positions past the end of the mask are kept.
///
/// Returns `None` (and leaves the table untouched) if `filter_row` is out of range.
pub fn prune_columns(table: &mut Table<'_>, filter_row: usize) -> Option<PruneOutcome> {
    let mask = pruning_mask(table.rows.get(filter_row)?);

    for row in &mut table.rows {
        compact_row(row, &mask);
    }

    let retained = table.rows[filter_row].data_columns().len();
    table.retained_column_count = retained;

    Some(PruneOutcome {
        removed: mask
            .iter()
            .enumerate()
            .filter_map(|(position, keep)| (!keep).then_some(position))
            .collect(),
        retained,
    })
}

fn compact_row(row: &mut Row<'_>, mask: &[bool]) {
    let is_header = row.is_header();
    let mut write = 0;

    for read in 0..row.fields.len() {
        let column = row.fields[read];
        if mask.get(read).copied().unwrap_or(true) {
            let id = if write >= LABEL_COLUMNS {
                column_id(write)
            } else {
                column.id
            };
            row.fields[write] = Column { id, ..column };
            write += 1;
        } else if !is_header {
            row.min.sum_x -= column.value;
            row.min.sum_xx -= column.value * column.value;
        }
    }
    row.fields.truncate(write);

    if !is_header {
        row.min.column_count = row.data_columns().len();
        row.min.valid_column_count = row
            .data_columns()
            .iter()
            .filter(|c| c.is_valid_in(Pass::Minimized))
            .count();
    }
}
