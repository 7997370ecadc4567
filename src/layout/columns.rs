//! Column trap ranges for a selection of lines.
//!
//! Column boundaries are global to the selection: every fragment of every
//! selected line contributes its horizontal extent, regardless of which line
//! it sits on.

use crate::geometry::{Interval, RangeBuilder};
use crate::layout::lines::LineCluster;

/// Merge the horizontal extents of all fragments on `lines` into ordered,
/// mutually exclusive column ranges.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::geometry::Interval;
/// use pdf_table_kv::layout::{cluster_lines, column_trap_ranges, TextFragment};
///
/// let fragments = vec![
///     TextFragment::new("Name", 10.0, 0.0, 30.0, 10.0),
///     TextFragment::new("Age", 100.0, 0.0, 20.0, 10.0),
///     TextFragment::new("Annabel", 5.0, 20.0, 40.0, 10.0),
/// ];
/// let lines = cluster_lines(&fragments, 4);
///
/// let columns = column_trap_ranges(&lines);
/// assert_eq!(columns, vec![Interval::new(5, 45), Interval::new(100, 120)]);
/// ```
pub fn column_trap_ranges(lines: &[LineCluster]) -> Vec<Interval> {
    let mut builder = RangeBuilder::new();
    builder.add_ranges(
        lines
            .iter()
            .flat_map(|line| line.fragments.iter())
            .map(|f| f.horizontal_interval()),
    );
    let columns = builder.build();
    log::debug!("{} lines produced {} column trap ranges", lines.len(), columns.len());
    columns
}
