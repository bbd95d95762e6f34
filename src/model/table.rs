//! Table types.

use super::Line;
use serde::{Deserialize, Serialize};

/// A table structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in order of first appearance in the source cells
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (widest row, counting column spans).
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.column_span as usize).sum::<usize>())
            .max()
            .unwrap_or(0)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the table has complex structure (merged cells).
    pub fn has_merged_cells(&self) -> bool {
        self.cells().any(|c| c.is_merged())
    }

    /// Iterate over all cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.rows.iter().flat_map(|r| &r.cells)
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Source row index
    pub index: u32,

    /// Cells in source encounter order
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(index: u32, cells: Vec<TableCell>) -> Self {
        Self { index, cells }
    }

    /// Whether every cell in the row is a header cell.
    pub fn is_header(&self) -> bool {
        !self.cells.is_empty() && self.cells.iter().all(|c| c.is_header())
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Row index (0-indexed)
    pub row_index: u32,

    /// Column index (0-indexed)
    pub column_index: u32,

    /// Number of rows this cell spans
    pub row_span: u32,

    /// Number of columns this cell spans
    pub column_span: u32,

    /// Cell role
    pub kind: CellKind,

    /// Reconstructed lines of the cell
    pub lines: Vec<Line>,
}

impl TableCell {
    /// Create an empty single-span cell.
    pub fn new(row_index: u32, column_index: u32) -> Self {
        Self {
            row_index,
            column_index,
            row_span: 1,
            column_span: 1,
            kind: CellKind::Content,
            lines: Vec::new(),
        }
    }

    /// Create a cell with one line of text.
    pub fn text(row_index: u32, column_index: u32, text: impl Into<String>) -> Self {
        let mut line = Line::new(0.0);
        line.add_text(text);
        Self {
            lines: vec![line],
            ..Self::new(row_index, column_index)
        }
    }

    /// Set spans and return self.
    pub fn spanning(mut self, row_span: u32, column_span: u32) -> Self {
        self.row_span = row_span;
        self.column_span = column_span;
        self
    }

    /// Set kind and return self.
    pub fn with_kind(mut self, kind: CellKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the cell renders as a header cell.
    pub fn is_header(&self) -> bool {
        self.kind.is_header()
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.plain_text())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.is_empty())
    }

    /// Check if this cell spans multiple rows or columns.
    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.column_span > 1
    }
}

/// Role of a table cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellKind {
    /// Regular data cell
    #[default]
    Content,
    /// Column header
    ColumnHeader,
    /// Row header
    RowHeader,
    /// Top-left header cell
    StubHead,
    /// Table description
    Description,
}

impl CellKind {
    /// Whether the cell renders as a header cell.
    pub fn is_header(&self) -> bool {
        matches!(self, CellKind::ColumnHeader | CellKind::RowHeader)
    }
}
