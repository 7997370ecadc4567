//! Reconstructed table grid.
//!
//! Rows are sparse: a row only holds cells for columns whose trap range
//! received at least one fragment. Consumers interpret a missing column as an
//! empty cell.

use serde::Serialize;

/// A table rebuilt from one page (or one line window of a page).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Zero-based page the table came from
    pub page_index: usize,
    /// Number of column trap ranges
    pub column_count: usize,
    /// Rows, top to bottom
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    pub fn new(page_index: usize, column_count: usize) -> Self {
        Self {
            page_index,
            column_count,
            rows: Vec::new(),
        }
    }

    /// Create an empty table for a page with no usable content.
    pub fn empty(page_index: usize) -> Self {
        Self::new(page_index, 0)
    }

    /// Append a row, re-indexing it to its position.
    pub fn add_row(&mut self, mut row: Row) {
        row.index = self.rows.len();
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the cell at a row index and column index, if one was filled.
    pub fn get_cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cell_at(column))
    }
}

/// A row of a table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    /// Position of the row in its table
    pub index: usize,
    /// Cells ascending by column index, possibly with gaps
    pub cells: Vec<Cell>,
}

impl Row {
    /// Create a row with cells.
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    /// Add a cell to the row.
    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Cell occupying `column`, if any.
    pub fn cell_at(&self, column: usize) -> Option<&Cell> {
        self.cells.iter().find(|c| c.column_index == column)
    }

    /// Content of the cell at `column`, or `""` for a gap.
    pub fn content_at(&self, column: usize) -> &str {
        self.cell_at(column).map(|c| c.content.as_str()).unwrap_or("")
    }

    /// Whether every cell in the row is blank.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.content.trim().is_empty())
    }
}

/// A cell of a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Column trap range the content fell into
    pub column_index: usize,
    /// Concatenated fragment text
    pub content: String,
}

impl Cell {
    /// Create a cell.
    pub fn new(column_index: usize, content: impl Into<String>) -> Self {
        Self {
            column_index,
            content: content.into(),
        }
    }
}
