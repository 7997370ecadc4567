//! Positioned text fragments, the atomic input to clustering.

use serde::{Deserialize, Serialize};

use crate::geometry::{Interval, Rect};

/// One positioned unit of glyph content on a page.
///
/// Fragments come from an external extractor in extraction order, which is
/// not guaranteed to be top-to-bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// X coordinate of the left edge
    pub x: f32,
    /// Y coordinate of the top edge (grows downward)
    pub y: f32,
    /// Width in page units
    pub width: f32,
    /// Height in page units
    pub height: f32,
    /// One or more glyphs
    pub text: String,
}

impl TextFragment {
    /// Create a fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::layout::TextFragment;
    ///
    /// let fragment = TextFragment::new("Total", 72.0, 700.0, 30.0, 10.0);
    /// assert_eq!(fragment.text, "Total");
    /// ```
    pub fn new(text: impl Into<String>, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: text.into(),
        }
    }

    /// Bounding box of the fragment.
    pub fn bbox(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Rounded horizontal extent used for column trapping.
    pub fn horizontal_interval(&self) -> Interval {
        self.bbox().horizontal_interval()
    }

    /// Rounded vertical extent used for line clustering.
    pub fn vertical_interval(&self) -> Interval {
        self.bbox().vertical_interval()
    }

    /// Whether the fragment carries only whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
