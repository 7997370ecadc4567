//! Reconstructed content elements.

pub mod table;

pub use table::{Cell, Row, Table};
