//! Table types.

use super::inline::plain_text_of;
use super::Inline;
use serde::{Deserialize, Serialize};

/// A pipe table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header row
    pub header: TableRow,

    /// Alignment for each column (same length as the header)
    pub alignments: Vec<Alignment>,

    /// Body rows, each normalized to the header width
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a table from a header row and column alignments.
    pub fn new(header: TableRow, alignments: Vec<Alignment>) -> Self {
        Self {
            header,
            alignments,
            rows: Vec::new(),
        }
    }

    /// Add a body row, padding or truncating it to the header width.
    pub fn add_row(&mut self, mut row: TableRow) {
        let width = self.column_count();
        row.cells.truncate(width);
        while row.cells.len() < width {
            row.cells.push(TableCell::empty());
        }
        self.rows.push(row);
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.header.cells.len()
    }

    /// Get the number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the alignment of a column.
    pub fn alignment(&self, column: usize) -> Alignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self { cells }
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
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub content: Vec<Inline>,
}

impl TableCell {
    /// Create a cell from inline content.
    pub fn new(content: Vec<Inline>) -> Self {
        Self { content }
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        plain_text_of(&self.content)
    }
}

/// Column alignment derived from the delimiter row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// No explicit alignment (`---`)
    #[default]
    None,
    /// Left alignment (`:--`)
    Left,
    /// Center alignment (`:-:`)
    Center,
    /// Right alignment (`--:`)
    Right,
}

impl Alignment {
    /// CSS `text-align` value, if any.
    pub fn as_css(&self) -> Option<&'static str> {
        match self {
            Alignment::None => None,
            Alignment::Left => Some("left"),
            Alignment::Center => Some("center"),
            Alignment::Right => Some("right"),
        }
    }
}
