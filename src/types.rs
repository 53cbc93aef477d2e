//! Core table model.
//!
//! A [`Table`] borrows every field's text from the input buffer it was parsed from, so the
//! buffer must outlive the table. Each [`Row`] keeps two statistic blocks side by side: the
//! full block (all data columns, filled by the tokenizer and the full correlation pass) and the
//! minimized block (only the columns that survive pruning).

/// Number of leading identifying/label columns in every row. They never take part in numeric
/// aggregation and are never pruned.
pub const LABEL_COLUMNS: usize = 2;

/// Literal field text counted as a zero placeholder.
pub const ZERO_PLACEHOLDER: &str = "0";

/// Column id for the field at `position`.
///
/// Data columns start at position [`LABEL_COLUMNS`], so the first data column has id 1.
pub fn column_id(position: usize) -> usize {
    position.saturating_sub(1)
}

/// A single field of a row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column<'a> {
    /// Position id, derived from the field position via [`column_id`].
    pub id: usize,
    /// Parsed numeric value; 0 for label columns, header cells, placeholders and non-numeric text.
    pub value: f64,
    /// Raw field text, rendered verbatim on output.
    pub text: &'a str,
}

impl Column<'_> {
    /// Returns `true` if the field is the literal `"0"` placeholder.
    pub fn is_zero_placeholder(&self) -> bool {
        self.text == ZERO_PLACEHOLDER
    }

    /// Whether the column counts towards `valid_column_count` in `pass`: any non-placeholder
    /// field for the full pass, a positive value for the minimized pass.
    pub fn is_valid_in(&self, pass: Pass) -> bool {
        match pass {
            Pass::Full => !self.is_zero_placeholder(),
            Pass::Minimized => self.value > 0.0,
        }
    }
}

/// Selects which statistic block of a [`Row`] an operation reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    /// All data columns, before pruning.
    Full,
    /// Only the columns the filter row retained.
    Minimized,
}

/// Aggregate statistics of one row for one [`Pass`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RowStats {
    /// Data columns present in this pass (label columns excluded).
    pub column_count: usize,
    /// Data columns counted as valid. For the full pass: every non-placeholder field. For the
    /// minimized pass: every retained field with a positive value.
    pub valid_column_count: usize,
    pub sum_x: f64,
    pub sum_xx: f64,
    /// Sum of products against the filter row.
    pub sum_xy: f64,
    pub spearman: f64,
    /// Coefficient of determination (`r²`), always non-negative.
    pub pearson: f64,
}

impl RowStats {
    /// `sum_x` averaged over every data column of the pass, or 0 when there are none.
    pub fn avg_all(&self) -> f64 {
        if self.column_count == 0 {
            0.0
        } else {
            self.sum_x / self.column_count as f64
        }
    }

    /// `sum_x` averaged over the valid columns of the pass, or 0 when there are none.
    pub fn avg_valid(&self) -> f64 {
        if self.valid_column_count == 0 {
            0.0
        } else {
            self.sum_x / self.valid_column_count as f64
        }
    }
}

/// Whether a row carries column labels or observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The first row of a table. Carries no statistics.
    Header,
    /// An observation.
    Data,
}

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<'a> {
    pub kind: RowKind,
    /// Fields in input order. Shrinks when columns are pruned.
    pub fields: Vec<Column<'a>>,
    /// Number of fields found when the line was parsed.
    pub total_field_count: usize,
    /// Data fields that were the literal `"0"` placeholder.
    pub zero_count: usize,
    pub full: RowStats,
    pub min: RowStats,
}

impl<'a> Row<'a> {
    /// Create an empty row with room for `capacity` fields.
    pub fn new(kind: RowKind, capacity: usize) -> Self {
        Self {
            kind,
            fields: Vec::with_capacity(capacity),
            total_field_count: 0,
            zero_count: 0,
            full: RowStats::default(),
            min: RowStats::default(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.kind == RowKind::Header
    }

    /// Fields after the label columns.
    pub fn data_columns(&self) -> &[Column<'a>] {
        self.fields.get(LABEL_COLUMNS..).unwrap_or(&[])
    }

    /// Raw text of the field at `index`, if the row has one.
    pub fn field_text(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).map(|c| c.text)
    }

    pub fn stats(&self, pass: Pass) -> &RowStats {
        match pass {
            Pass::Full => &self.full,
            Pass::Minimized => &self.min,
        }
    }

    pub fn stats_mut(&mut self, pass: Pass) -> &mut RowStats {
        match pass {
            Pass::Full => &mut self.full,
            Pass::Minimized => &mut self.min,
        }
    }
}

/// In-memory table. Row order is input line order, blank lines included; row 0 is the header.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table<'a> {
    pub rows: Vec<Row<'a>>,
    /// Field count of the header line; used to size every row.
    pub total_columns: usize,
    /// Data columns the filter row retained after pruning (0 until pruned).
    pub retained_column_count: usize,
}

impl<'a> Table<'a> {
    /// Create an empty table whose rows hold `total_columns` fields.
    pub fn new(total_columns: usize) -> Self {
        Self {
            rows: Vec::new(),
            total_columns,
            retained_column_count: 0,
        }
    }

    /// Number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Iterate the observation rows (everything but the header).
    pub fn data_rows(&self) -> impl Iterator<Item = &Row<'a>> {
        self.rows.iter().filter(|r| !r.is_header())
    }

    /// Zero both statistic blocks of every row.
    pub fn reset_statistics(&mut self) {
        for row in &mut self.rows {
            row.full = RowStats::default();
            row.min = RowStats::default();
        }
        self.retained_column_count = 0;
    }
}
