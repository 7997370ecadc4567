// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::enum_variant_names)]
#![allow(clippy::should_implement_trait)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # pdf_table_kv
//!
//! Table reconstruction and key/value harvesting from positioned text.
//!
//! ## Core Features
//!
//! - **Line clustering**: fragments grouped by vertical extent, with nearby
//!   lines folded together under a configurable tolerance
//! - **Column trapping**: horizontal extents merged into column ranges,
//!   scoped to the selected line window
//! - **Table building**: sparse rows of cells, multi-line cells preserved
//! - **Key/value strategies**: header-only, alternating rows, alternating
//!   cells and shared `key:value` cells, resolved from a named registry
//! - **Format Conversion**: CSV and HTML with gaps rendered as empty cells
//!
//! ## Pipeline
//!
//! ```text
//! FragmentSource -> cluster_lines -> select_lines -> column_trap_ranges
//!                -> TableBuilder -> MapFormatter | CsvConverter | HtmlConverter
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use pdf_table_kv::{KeyValueStrategy, LineRange, PageRange, TableExtractor, TextFragment};
//! use pdf_table_kv::source::MemorySource;
//!
//! # fn main() -> pdf_table_kv::Result<()> {
//! let source = MemorySource::single_page(vec![
//!     TextFragment::new("Invoice: 42", 10.0, 10.0, 60.0, 10.0),
//!     TextFragment::new("Due: May", 10.0, 30.0, 45.0, 10.0),
//! ]);
//!
//! let strategy = KeyValueStrategy::shared_cell(true, None);
//! let values = TableExtractor::default().extract_form_values(
//!     source,
//!     PageRange::all(),
//!     LineRange::all(),
//!     &strategy,
//! )?;
//!
//! assert_eq!(values["Invoice"].as_text(), Some("42"));
//! assert_eq!(values["Due"].as_text(), Some("May"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Geometry and layout analysis
pub mod geometry;
pub mod layout;

/// Reconstructed table model
pub mod elements;

// Key/value harvesting
pub mod keyvalue;

// Format converters
pub mod converters;

// Fragment input and extraction entry point
pub mod extractor;
pub mod source;

// Configuration
pub mod config;

// Re-exports
pub use config::ExtractionConfig;
pub use converters::{CsvConverter, HtmlConverter, TableConverter};
pub use elements::{Cell, Row, Table};
pub use error::{Error, Result};
pub use extractor::TableExtractor;
pub use keyvalue::{FormValue, FormValues, KeyValueLayout, KeyValueStrategy, StrategyRegistry};
pub use layout::{LineRange, PageRange, TextFragment};
pub use source::{FragmentSource, JsonFragmentSource, MemorySource};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Total order over `f32` for sorting coordinates.
    ///
    /// NaN compares equal to NaN and greater than every number, so sorts
    /// never panic on malformed fragment geometry.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
