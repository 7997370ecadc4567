//! CSV rendering of reconstructed tables.

use crate::converters::column_walk::pad_row;
use crate::converters::TableConverter;
use crate::elements::table::Table;

/// Renders a table as delimiter-separated text, one line per row.
///
/// Every line carries exactly `column_count` fields; gaps become empty
/// fields. Fields holding the delimiter, a quote or a line break are quoted
/// with doubled inner quotes.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::converters::{CsvConverter, TableConverter};
/// use pdf_table_kv::elements::{Cell, Row, Table};
///
/// let mut table = Table::new(0, 3);
/// table.add_row(Row::new(0, vec![Cell::new(0, "a"), Cell::new(2, "c, d")]));
///
/// assert_eq!(CsvConverter::new().convert(&table), "a,,\"c, d\"\n");
/// ```
#[derive(Debug, Clone)]
pub struct CsvConverter {
    delimiter: char,
}

impl Default for CsvConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConverter {
    /// Create a comma-separated converter.
    pub fn new() -> Self {
        Self { delimiter: ',' }
    }

    /// Use another field delimiter, such as `;`.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn quote(&self, field: &str) -> String {
        let needs_quotes = field.contains(self.delimiter)
            || field.contains('"')
            || field.contains('\n')
            || field.contains('\r');
        if needs_quotes {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }
}

impl TableConverter for CsvConverter {
    fn convert(&self, table: &Table) -> String {
        let mut output = String::new();
        let delimiter = self.delimiter.to_string();
        for row in &table.rows {
            let fields: Vec<String> = pad_row(row, table.column_count)
                .iter()
                .map(|field| self.quote(field))
                .collect();
            output.push_str(&fields.join(&delimiter));
            output.push('\n');
        }
        output
    }
}
