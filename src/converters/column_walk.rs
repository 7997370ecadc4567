//! Dense traversal of sparse rows, shared by the presentation converters.

use crate::elements::table::Row;

/// Expand a sparse row into exactly `column_count` slots, gaps empty.
///
/// A cell whose column index is past the last column lands in the last
/// column; a cell that lands on an occupied slot is appended to it with a
/// space. Both are logged.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::converters::pad_row;
/// use pdf_table_kv::elements::{Cell, Row};
///
/// let row = Row::new(0, vec![Cell::new(0, "a"), Cell::new(2, "c")]);
/// assert_eq!(pad_row(&row, 3), vec!["a", "", "c"]);
/// ```
pub fn pad_row(row: &Row, column_count: usize) -> Vec<String> {
    let mut slots = vec![String::new(); column_count];
    if column_count == 0 {
        if !row.cells.is_empty() {
            log::warn!("row {}: {} cells in a table without columns", row.index, row.cells.len());
        }
        return slots;
    }

    for cell in &row.cells {
        let slot = if cell.column_index < column_count {
            cell.column_index
        } else {
            log::debug!(
                "row {}: cell {:?} at column {} beyond {} columns, placed in last column",
                row.index,
                cell.content,
                cell.column_index,
                column_count
            );
            column_count - 1
        };

        let target = &mut slots[slot];
        if !target.is_empty() {
            log::debug!("row {}: column {} filled twice, appending {:?}", row.index, slot, cell.content);
            target.push(' ');
        }
        target.push_str(&cell.content);
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::table::Cell;

    #[test]
    fn test_dense_row_unchanged() {
        let row = Row::new(0, vec![Cell::new(0, "a"), Cell::new(1, "b")]);
        assert_eq!(pad_row(&row, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_gaps_filled() {
        let row = Row::new(0, vec![Cell::new(1, "b")]);
        assert_eq!(pad_row(&row, 4), vec!["", "b", "", ""]);
        assert_eq!(pad_row(&Row::default(), 2), vec!["", ""]);
    }

    #[test]
    fn test_out_of_range_goes_to_last_column() {
        let row = Row::new(0, vec![Cell::new(0, "a"), Cell::new(7, "z")]);
        assert_eq!(pad_row(&row, 2), vec!["a", "z"]);
    }

    #[test]
    fn test_collision_appends() {
        let row = Row::new(0, vec![Cell::new(1, "x"), Cell::new(1, "y")]);
        assert_eq!(pad_row(&row, 2), vec!["", "x y"]);
    }

    #[test]
    fn test_no_columns() {
        let row = Row::new(0, vec![Cell::new(0, "a")]);
        assert!(pad_row(&row, 0).is_empty());
    }
}
