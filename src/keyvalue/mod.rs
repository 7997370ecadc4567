//! Key/value harvesting from reconstructed tables.
//!
//! - [`KeyValueStrategy`]: where keys sit (header row, alternating rows,
//!   alternating cells, shared cells) and how text is cleaned up
//! - [`MapFormatter`]: applies a strategy to a [`Table`](crate::elements::Table)
//! - [`StrategyRegistry`]: named presets, extensible from configuration pairs

pub mod formatter;
pub mod registry;
pub mod strategy;
pub mod value;

pub use formatter::MapFormatter;
pub use registry::{
    parse_properties, StrategyRegistry, ALTERNATING_CELL, ALTERNATING_ROW, HEADER_ROW_ONLY,
    SHARE_CELL,
};
pub use strategy::{Fallback, KeyValueLayout, KeyValueStrategy, DEFAULT_DELIMITER, DEFAULT_KEY_PATTERN};
pub use value::{
    insert_unique, push_unmatched, FormValue, FormValues, MAX_DUPLICATE_KEYS, UNMATCHED_TEXT_KEY,
};
