//! Grid assembly from line clusters and column trap ranges.
//!
//! Each line becomes a row. Its fragments are walked left to right while a
//! column pointer advances through the trap ranges; fragments enclosed by the
//! current range accumulate into one pending cell, and the first fragment
//! that is not enclosed flushes that cell and moves the pointer on. Columns
//! that receive nothing are simply absent from the row.

use crate::elements::table::{Cell, Row, Table};
use crate::geometry::Interval;
use crate::layout::fragment::TextFragment;
use crate::layout::lines::LineCluster;
use crate::utils::safe_float_cmp;

/// Default horizontal gap, in page units, above which two fragments of the
/// same cell are separated by a space.
pub const DEFAULT_WORD_GAP: f32 = 1.0;

/// Builds [`Table`]s from clustered lines.
#[derive(Debug, Clone)]
pub struct TableBuilder {
    word_gap: f32,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_GAP)
    }
}

impl TableBuilder {
    /// Create a builder with the given word gap.
    pub fn new(word_gap: f32) -> Self {
        Self { word_gap }
    }

    /// Assemble the rows of `lines` into a table with one column per range.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::layout::{cluster_lines, column_trap_ranges, TableBuilder, TextFragment};
    ///
    /// let fragments = vec![
    ///     TextFragment::new("Name", 10.0, 0.0, 30.0, 10.0),
    ///     TextFragment::new("Age", 100.0, 0.0, 20.0, 10.0),
    ///     TextFragment::new("Ann", 10.0, 20.0, 20.0, 10.0),
    /// ];
    /// let lines = cluster_lines(&fragments, 4);
    /// let columns = column_trap_ranges(&lines);
    ///
    /// let table = TableBuilder::default().build(0, &lines, &columns);
    /// assert_eq!(table.column_count, 2);
    /// assert_eq!(table.rows[1].cells.len(), 1);
    /// assert_eq!(table.rows[1].content_at(1), "");
    /// ```
    pub fn build(&self, page_index: usize, lines: &[LineCluster], columns: &[Interval]) -> Table {
        let mut table = Table::new(page_index, columns.len());
        if columns.is_empty() {
            return table;
        }

        for (line_index, line) in lines.iter().enumerate() {
            let row = self.build_row(line_index, line, columns);
            if row.is_blank() {
                log::debug!("page {}: dropping blank line {}", page_index, line_index);
                continue;
            }
            table.add_row(row);
        }

        log::debug!(
            "page {}: built table with {} rows x {} columns",
            page_index,
            table.row_count(),
            table.column_count
        );
        table
    }

    fn build_row(&self, line_index: usize, line: &LineCluster, columns: &[Interval]) -> Row {
        let mut row = Row::default();
        let mut column = 0;
        let mut pending: Vec<&TextFragment> = Vec::new();

        for fragment in &line.fragments {
            let target = locate_column(columns, column, fragment, line_index);
            if target != column {
                self.flush(&mut row, column, &mut pending);
                column = target;
            }
            pending.push(fragment);
        }
        self.flush(&mut row, column, &mut pending);
        row
    }

    fn flush(&self, row: &mut Row, column: usize, pending: &mut Vec<&TextFragment>) {
        if pending.is_empty() {
            return;
        }
        let content = cell_text(pending, self.word_gap);
        pending.clear();
        if !content.is_empty() {
            row.add_cell(Cell::new(column, content));
        }
    }
}

/// Build a table with the default word gap.
pub fn build_table(page_index: usize, lines: &[LineCluster], columns: &[Interval]) -> Table {
    TableBuilder::default().build(page_index, lines, columns)
}

/// Find the column for `fragment`, never moving left of `from`.
///
/// A fragment enclosed by no remaining range goes to the first remaining
/// range that reaches its left edge, or to the last column.
fn locate_column(
    columns: &[Interval],
    from: usize,
    fragment: &TextFragment,
    line_index: usize,
) -> usize {
    let extent = fragment.horizontal_interval();
    if let Some(found) = (from..columns.len()).find(|&c| columns[c].encloses(&extent)) {
        return found;
    }

    let boundary = (from..columns.len())
        .find(|&c| columns[c].upper >= extent.lower)
        .unwrap_or(columns.len() - 1);
    log::debug!(
        "line {}: fragment {:?} at {} not enclosed by any column, assigned to column {}",
        line_index,
        fragment.text,
        extent,
        boundary
    );
    boundary
}

/// Concatenate the fragments of one cell.
///
/// Fragments are ordered by y, then grouped into visual sub-lines (a fragment
/// starting at or below the current sub-line's bottom opens a new one), and
/// each sub-line is ordered by x. Sub-lines are joined with newlines.
fn cell_text(fragments: &[&TextFragment], word_gap: f32) -> String {
    let mut ordered: Vec<&TextFragment> = fragments.to_vec();
    ordered.sort_by(|a, b| safe_float_cmp(a.y, b.y).then_with(|| safe_float_cmp(a.x, b.x)));

    let mut sub_lines: Vec<Vec<&TextFragment>> = Vec::new();
    let mut bottom = f32::NEG_INFINITY;
    for fragment in ordered {
        let bbox = fragment.bbox();
        match sub_lines.last_mut() {
            Some(current) if bbox.top() < bottom => {
                current.push(fragment);
                bottom = bottom.max(bbox.bottom());
            },
            _ => {
                sub_lines.push(vec![fragment]);
                bottom = bbox.bottom();
            },
        }
    }

    sub_lines
        .into_iter()
        .map(|mut sub_line| {
            sub_line.sort_by(|a, b| safe_float_cmp(a.x, b.x));
            join_fragments(&sub_line, word_gap)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_fragments(fragments: &[&TextFragment], word_gap: f32) -> String {
    let mut text = String::new();
    let mut previous: Option<&TextFragment> = None;
    for fragment in fragments {
        if let Some(prev) = previous {
            let gap = fragment.bbox().left() - prev.bbox().right();
            let spaced = text.ends_with(char::is_whitespace)
                || fragment.text.starts_with(char::is_whitespace);
            if gap > word_gap && !spaced {
                text.push(' ');
            }
        }
        text.push_str(&fragment.text);
        previous = Some(fragment);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::columns::column_trap_ranges;
    use crate::layout::lines::cluster_lines;

    fn frag(text: &str, x: f32, y: f32, width: f32) -> TextFragment {
        TextFragment::new(text, x, y, width, 10.0)
    }

    fn table_from(fragments: &[TextFragment]) -> Table {
        let lines = cluster_lines(fragments, 4);
        let columns = column_trap_ranges(&lines);
        build_table(0, &lines, &columns)
    }

    #[test]
    fn test_empty_input_empty_table() {
        let table = table_from(&[]);
        assert!(table.is_empty());
        assert_eq!(table.column_count, 0);
    }

    #[test]
    fn test_simple_grid() {
        let table = table_from(&[
            frag("Name", 10.0, 0.0, 30.0),
            frag("Age", 100.0, 0.0, 20.0),
            frag("Ann", 10.0, 20.0, 20.0),
            frag("5", 105.0, 20.0, 5.0),
        ]);
        assert_eq!(table.column_count, 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0].content_at(0), "Name");
        assert_eq!(table.rows[0].content_at(1), "Age");
        assert_eq!(table.rows[1].content_at(0), "Ann");
        assert_eq!(table.rows[1].content_at(1), "5");
    }

    #[test]
    fn test_sparse_row_keeps_column_index() {
        let table = table_from(&[
            frag("A", 0.0, 0.0, 10.0),
            frag("B", 50.0, 0.0, 10.0),
            frag("C", 100.0, 0.0, 10.0),
            frag("c2", 100.0, 20.0, 10.0),
        ]);
        assert_eq!(table.column_count, 3);
        let second = &table.rows[1];
        assert_eq!(second.cells.len(), 1);
        assert_eq!(second.cells[0].column_index, 2);
        assert_eq!(second.cells[0].content, "c2");
    }

    #[test]
    fn test_glyph_fragments_concatenate_without_spaces() {
        let table = table_from(&[
            frag("T", 0.0, 0.0, 5.0),
            frag("o", 5.0, 0.0, 5.0),
            frag("t", 10.0, 0.0, 5.0),
            frag("42", 80.0, 0.0, 10.0),
        ]);
        assert_eq!(table.rows[0].content_at(0), "Tot");
        assert_eq!(table.rows[0].content_at(1), "42");
    }

    #[test]
    fn test_words_in_one_cell_get_spaces() {
        // "Due" and "Date" sit 2 units apart, bridged into one column by the wide row below
        let table = table_from(&[
            frag("Due", 0.0, 0.0, 15.0),
            frag("Date", 17.0, 0.0, 20.0),
            frag("2024-01-31", 0.0, 20.0, 40.0),
        ]);
        assert_eq!(table.column_count, 1);
        assert_eq!(table.rows[0].content_at(0), "Due Date");
    }

    #[test]
    fn test_cell_text_splits_visual_sub_lines() {
        let upper = frag("first", 0.0, 0.0, 20.0);
        let lower = frag("second", 0.0, 12.0, 25.0);
        let text = cell_text(&[&lower, &upper], DEFAULT_WORD_GAP);
        assert_eq!(text, "first\nsecond");
    }

    #[test]
    fn test_cell_text_jittered_baseline_orders_by_x() {
        let left = frag("ab", 0.0, 100.4, 10.0);
        let right = frag("cd", 10.0, 100.0, 10.0);
        assert_eq!(cell_text(&[&right, &left], DEFAULT_WORD_GAP), "abcd");
    }

    #[test]
    fn test_fragment_outside_columns_goes_to_boundary() {
        let line = LineCluster {
            range: Interval::new(0, 10),
            fragments: vec![frag("x", 0.0, 0.0, 10.0), frag("stray", 500.0, 0.0, 20.0)],
        };
        let columns = vec![Interval::new(0, 10), Interval::new(50, 60)];
        let table = build_table(0, &[line], &columns);
        let row = &table.rows[0];
        assert_eq!(row.cells.len(), 2);
        assert_eq!(row.cells[1].column_index, 1);
        assert_eq!(row.cells[1].content, "stray");
    }

    #[test]
    fn test_straddling_fragment_does_not_shift_later_cells() {
        let line = LineCluster {
            range: Interval::new(0, 10),
            fragments: vec![
                frag("straddle", 5.0, 0.0, 50.0),
                frag("third", 100.0, 0.0, 10.0),
            ],
        };
        let columns = vec![Interval::new(0, 20), Interval::new(30, 60), Interval::new(100, 110)];
        let table = build_table(0, &[line], &columns);
        let row = &table.rows[0];
        assert_eq!(row.cells[0].column_index, 0);
        assert_eq!(row.cells[1].column_index, 2);
        assert_eq!(row.cells[1].content, "third");
    }

    #[test]
    fn test_cells_ascending_and_in_bounds() {
        let table = table_from(&[
            frag("a", 0.0, 0.0, 10.0),
            frag("b", 40.0, 0.0, 10.0),
            frag("c", 80.0, 30.0, 10.0),
            frag("d", 0.0, 30.0, 10.0),
        ]);
        for row in &table.rows {
            assert!(row.cells.windows(2).all(|w| w[0].column_index < w[1].column_index));
            assert!(row.cells.iter().all(|c| c.column_index < table.column_count));
        }
    }
}
