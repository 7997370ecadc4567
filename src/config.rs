//! Configuration for table reconstruction and rendering.

use crate::converters::{CsvConverter, HtmlConverter};
use crate::layout::lines::DEFAULT_LINE_MERGE_TOLERANCE;
use crate::layout::table_builder::{TableBuilder, DEFAULT_WORD_GAP};

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Maximum distance between vertical lower bounds of lines that merge.
    pub line_merge_tolerance: i32,

    /// Horizontal gap above which adjacent fragments in a cell get a space.
    pub word_gap: f32,

    /// Field delimiter for CSV output.
    pub csv_delimiter: char,

    /// Render the first row of HTML output as a header.
    pub html_header_row: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            line_merge_tolerance: DEFAULT_LINE_MERGE_TOLERANCE,
            word_gap: DEFAULT_WORD_GAP,
            csv_delimiter: ',',
            html_header_row: false,
        }
    }

    /// Set the line merge tolerance.
    pub fn with_line_merge_tolerance(mut self, tolerance: i32) -> Self {
        self.line_merge_tolerance = tolerance.max(0);
        self
    }

    /// Set the word gap.
    pub fn with_word_gap(mut self, gap: f32) -> Self {
        self.word_gap = gap;
        self
    }

    /// Set the CSV delimiter.
    pub fn with_csv_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Enable an HTML header row.
    pub fn with_html_header_row(mut self, enable: bool) -> Self {
        self.html_header_row = enable;
        self
    }

    pub(crate) fn table_builder(&self) -> TableBuilder {
        TableBuilder::new(self.word_gap)
    }

    /// CSV converter honoring this configuration.
    pub fn csv_converter(&self) -> CsvConverter {
        CsvConverter::new().with_delimiter(self.csv_delimiter)
    }

    /// HTML converter honoring this configuration.
    pub fn html_converter(&self) -> HtmlConverter {
        HtmlConverter::new().with_header_row(self.html_header_row)
    }
}
