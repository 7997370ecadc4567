//! HTML rendering of reconstructed tables.

use crate::converters::column_walk::pad_row;
use crate::converters::TableConverter;
use crate::elements::table::Table;

/// Renders a table as an HTML `<table>`.
///
/// Every `<tr>` carries exactly `column_count` cells; gaps become empty
/// `<td></td>`. Line breaks inside a cell become `<br>`.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::converters::{HtmlConverter, TableConverter};
/// use pdf_table_kv::elements::{Cell, Row, Table};
///
/// let mut table = Table::new(0, 2);
/// table.add_row(Row::new(0, vec![Cell::new(1, "R&D")]));
///
/// let html = HtmlConverter::new().convert(&table);
/// assert!(html.contains("<tr><td></td><td>R&amp;D</td></tr>"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HtmlConverter {
    header_row: bool,
}

impl HtmlConverter {
    /// Create a converter that renders every row with `<td>`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the first row with `<th>` cells.
    pub fn with_header_row(mut self, enable: bool) -> Self {
        self.header_row = enable;
        self
    }
}

impl TableConverter for HtmlConverter {
    fn convert(&self, table: &Table) -> String {
        let mut html = String::from("<table>\n");
        for (position, row) in table.rows.iter().enumerate() {
            let tag = if self.header_row && position == 0 {
                "th"
            } else {
                "td"
            };
            html.push_str("<tr>");
            for field in pad_row(row, table.column_count) {
                html.push_str(&format!(
                    "<{tag}>{}</{tag}>",
                    escape_html(&field).replace('\n', "<br>"),
                    tag = tag
                ));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
        html
    }
}

/// Escape HTML special characters.
///
/// Replaces &, <, >, ", and ' with their HTML entity equivalents.
///
/// # Examples
///
/// ```
/// # use pdf_table_kv::converters::html::escape_html;
/// let text = "AT&T <Company>";
/// let escaped = escape_html(text);
/// assert_eq!(escaped, "AT&amp;T &lt;Company&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::table::{Cell, Row};

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("AT&T"), "AT&amp;T");
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
        assert_eq!(escape_html("'apostrophe'"), "&#x27;apostrophe&#x27;");
    }

    #[test]
    fn test_gaps_padded_with_empty_cells() {
        let mut table = Table::new(3, 3);
        table.add_row(Row::new(0, vec![Cell::new(0, "a"), Cell::new(1, "b"), Cell::new(2, "c")]));
        table.add_row(Row::new(0, vec![Cell::new(2, "z")]));

        let html = HtmlConverter::new().convert(&table);
        assert_eq!(
            html,
            "<table>\n<tr><td>a</td><td>b</td><td>c</td></tr>\n<tr><td></td><td></td><td>z</td></tr>\n</table>\n"
        );
    }

    #[test]
    fn test_header_row() {
        let mut table = Table::new(0, 1);
        table.add_row(Row::new(0, vec![Cell::new(0, "Name")]));
        table.add_row(Row::new(0, vec![Cell::new(0, "Ann")]));

        let html = HtmlConverter::new().with_header_row(true).convert(&table);
        assert!(html.contains("<tr><th>Name</th></tr>"));
        assert!(html.contains("<tr><td>Ann</td></tr>"));
    }

    #[test]
    fn test_multiline_cell() {
        let mut table = Table::new(0, 1);
        table.add_row(Row::new(0, vec![Cell::new(0, "one\ntwo")]));
        assert!(HtmlConverter::new().convert(&table).contains("<td>one<br>two</td>"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(HtmlConverter::new().convert(&Table::empty(0)), "<table>\n</table>\n");
    }
}
