//! Whitespace/tab tokenizer.
//!
//! Rules:
//!
//! - Fields are separated by runs of spaces, tabs or NUL bytes; empty runs are not fields.
//! - Lines end at `\n`, `\r\n` or a lone `\r`. A final line without a terminator still counts.
//! - A field that is exactly `"0"` is a placeholder: it is emitted with value 0 and left out
//!   of the sums and the valid count.
//! - Data fields (position >= [`LABEL_COLUMNS`]) of non-header rows are parsed as `f64`;
//!   non-numeric or non-finite text becomes 0.
//! - Every line becomes a row, blank ones included, so output lines match input lines. A blank
//!   line is a data row without fields and keeps zeroed statistics. A terminator at the very end
//!   of the buffer does not start another line.

use crate::types::{column_id, Column, Row, RowKind, Table, LABEL_COLUMNS};

/// Result of parsing one line.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow<'a> {
    pub row: Row<'a>,
    /// Offset of the next line, or `None` if the end of the buffer was reached.
    pub next: Option<usize>,
}

/// Count the fields of the header line without building a row.
///
/// Uses the same scanner as [`parse_row`], so the count always matches a real parse of that
/// line.
pub fn probe_field_count(input: &str) -> usize {
    scan_line(input, 0, |_, _| {}).0
}

/// Parse the line starting at `offset` into a [`Row`] with room for `capacity` fields.
///
/// Header rows keep their fields as labels and carry no statistics. For data rows the full and
/// minimized statistic blocks both start from the parsed sums.
pub fn parse_row<'a>(
    input: &'a str,
    offset: usize,
    is_header: bool,
    capacity: usize,
) -> ParsedRow<'a> {
    let kind = if is_header {
        RowKind::Header
    } else {
        RowKind::Data
    };
    let mut row = Row::new(kind, capacity);
    let mut zero_count = 0;
    let mut sum_x = 0.0;
    let mut sum_xx = 0.0;

    let (count, next) = scan_line(input, offset, |position, text| {
        let mut column = Column {
            id: column_id(position),
            value: 0.0,
            text,
        };
        if position >= LABEL_COLUMNS {
            if column.is_zero_placeholder() {
                zero_count += 1;
            } else if !is_header {
                let value = parse_value(text);
                column.value = value;
                sum_x += value;
                sum_xx += value * value;
            }
        }
        row.fields.push(column);
    });

    row.total_field_count = count;
    if !is_header {
        let column_count = count.saturating_sub(LABEL_COLUMNS);
        row.zero_count = zero_count;
        row.full.column_count = column_count;
        row.full.valid_column_count = column_count - zero_count;
        row.full.sum_x = sum_x;
        row.full.sum_xx = sum_xx;
        row.min = row.full;
    }

    ParsedRow { row, next }
}

/// Parse a whole buffer, one row per line. The first line becomes the header row.
pub fn parse_table(input: &str) -> Table<'_> {
    let total_columns = probe_field_count(input);
    let mut table = Table::new(total_columns);

    let mut offset = next_line(input.as_bytes(), 0);
    while let Some(at) = offset {
        let parsed = parse_row(input, at, table.rows.is_empty(), total_columns);
        offset = parsed.next;
        table.rows.push(parsed.row);
    }

    table
}

fn parse_value(text: &str) -> f64 {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Walk one line starting at `offset`, calling `on_field(position, text)` for every field.
///
/// Returns the field count and the offset of the next line.
fn scan_line<'a, F>(input: &'a str, offset: usize, mut on_field: F) -> (usize, Option<usize>)
where
    F: FnMut(usize, &'a str),
{
    let bytes = input.as_bytes();
    let mut count = 0;
    let mut start = offset;

    for pos in offset..bytes.len() {
        let b = bytes[pos];
        if !matches!(b, b' ' | b'\t' | b'\0' | b'\r' | b'\n') {
            continue;
        }
        // Delimiters are ASCII, so `start..pos` always falls on char boundaries.
        if pos > start {
            on_field(count, &input[start..pos]);
            count += 1;
        }
        match b {
            b'\n' => return (count, next_line(bytes, pos + 1)),
            b'\r' => {
                let after = if bytes.get(pos + 1) == Some(&b'\n') {
                    pos + 2
                } else {
                    pos + 1
                };
                return (count, next_line(bytes, after));
            }
            _ => start = pos + 1,
        }
    }

    if bytes.len() > start {
        on_field(count, &input[start..]);
        count += 1;
    }
    (count, None)
}

fn next_line(bytes: &[u8], at: usize) -> Option<usize> {
    (at < bytes.len()).then_some(at)
}
