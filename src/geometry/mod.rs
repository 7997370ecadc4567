//! Geometric primitives for layout analysis.
//!
//! Page coordinates are floating point with y growing downward. Clustering
//! works on pixel-rounded closed [`Interval`]s.

pub mod interval;

pub use interval::{Interval, RangeBuilder};

/// A rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Pixel-rounded horizontal extent `[round(x), round(x) + round(width)]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::geometry::{Interval, Rect};
    ///
    /// let rect = Rect::new(10.4, 0.0, 20.6, 5.0);
    /// assert_eq!(rect.horizontal_interval(), Interval::new(10, 31));
    /// ```
    pub fn horizontal_interval(&self) -> Interval {
        let lower = self.x.round() as i32;
        Interval::new(lower, lower.saturating_add(self.width.round() as i32))
    }

    /// Pixel-rounded vertical extent `[round(y), round(y) + round(height)]`.
    ///
    /// Coordinates beyond the `i32` range saturate at its bounds.
    pub fn vertical_interval(&self) -> Interval {
        let lower = self.y.round() as i32;
        Interval::new(lower, lower.saturating_add(self.height.round() as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn test_rect_intervals_round_each_component() {
        let r = Rect::new(99.6, 200.4, 12.5, 9.4);
        // round(12.5) rounds half away from zero
        assert_eq!(r.horizontal_interval(), Interval::new(100, 113));
        assert_eq!(r.vertical_interval(), Interval::new(200, 209));
    }

    #[test]
    fn test_rect_zero_size() {
        let r = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert_eq!(r.horizontal_interval(), Interval::new(5, 5));
        assert_eq!(r.vertical_interval(), Interval::new(5, 5));
    }

    #[test]
    fn test_rect_far_outside_i32_saturates() {
        let r = Rect::new(3.0e9, -3.0e9, 10.0, 10.0);
        assert_eq!(r.horizontal_interval(), Interval::new(i32::MAX, i32::MAX));
        assert_eq!(r.vertical_interval(), Interval::new(i32::MIN, i32::MIN + 10));

        let nan = Rect::new(f32::NAN, 0.0, 4.0, 4.0);
        assert_eq!(nan.horizontal_interval(), Interval::new(0, 4));
    }
}
