//! Presentation converters for reconstructed tables.
//!
//! - **CSV**: delimiter-separated fields, gaps as empty fields
//! - **HTML**: `<table>` markup, gaps as empty cells
//!
//! Both expand sparse rows through the same column walk, so every rendered
//! row has exactly `column_count` positions.
//!
//! # Examples
//!
//! ```
//! use pdf_table_kv::converters::{CsvConverter, HtmlConverter, TableConverter};
//! use pdf_table_kv::elements::{Cell, Row, Table};
//!
//! let mut table = Table::new(0, 2);
//! table.add_row(Row::new(0, vec![Cell::new(0, "Name"), Cell::new(1, "Age")]));
//! table.add_row(Row::new(1, vec![Cell::new(1, "5")]));
//!
//! assert_eq!(CsvConverter::new().convert(&table), "Name,Age\n,5\n");
//! assert!(HtmlConverter::new().convert(&table).contains("<td></td><td>5</td>"));
//! ```

pub mod column_walk;
pub mod csv;
pub mod html;

// Re-export main types
pub use column_walk::pad_row;
pub use csv::CsvConverter;
pub use html::{escape_html, HtmlConverter};

use crate::elements::table::Table;

/// Renders a [`Table`] into a textual format.
pub trait TableConverter {
    /// Render the whole table.
    fn convert(&self, table: &Table) -> String;
}
