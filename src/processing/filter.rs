//! Filter row selection for [`crate::types::Table`].

use crate::types::Table;

/// Returns the index of the first data row whose field at `column` equals `value` exactly.
///
/// - `None` or an empty `value` means no filtering was requested and yields `None`.
/// - Rows too short to have `column` simply do not match.
/// - The header row is never selected; it carries no statistics to correlate against.
pub fn find_filter_row(table: &Table<'_>, column: usize, value: Option<&str>) -> Option<usize> {
    let value = value.filter(|v| !v.is_empty())?;
    table
        .rows
        .iter()
        .position(|row| !row.is_header() && row.field_text(column) == Some(value))
}
