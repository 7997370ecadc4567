//! Layout analysis: from positioned fragments to a table grid.
//!
//! - Line clustering by vertical position with a tolerance merge pass
//! - Column trap ranges pooled over a selection of lines
//! - Grid assembly walking each line against the column ranges

pub mod columns;
pub mod fragment;
pub mod lines;
pub mod selection;
pub mod table_builder;

// Re-export main types
pub use columns::column_trap_ranges;
pub use fragment::TextFragment;
pub use lines::{cluster_lines, merge_adjacent_lines, select_lines, LineCluster, DEFAULT_LINE_MERGE_TOLERANCE};
pub use selection::{LineRange, PageRange};
pub use table_builder::{build_table, TableBuilder, DEFAULT_WORD_GAP};
