//! Closed integer intervals and maximal interval merging.
//!
//! Rows and columns of a reconstructed table are "trap ranges": merged,
//! mutually exclusive intervals that enclose every fragment belonging to one
//! row or one column. [`RangeBuilder`] produces them with a single sweep over
//! the intervals sorted by lower bound.

use std::fmt;

/// A closed interval `[lower, upper]` over pixel-rounded coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    /// Inclusive lower bound
    pub lower: i32,
    /// Inclusive upper bound
    pub upper: i32,
}

impl Interval {
    /// Create an interval. Bounds given in the wrong order are swapped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::geometry::Interval;
    ///
    /// let a = Interval::new(10, 20);
    /// assert_eq!(a, Interval::new(20, 10));
    /// ```
    pub fn new(lower: i32, upper: i32) -> Self {
        if lower <= upper {
            Self { lower, upper }
        } else {
            Self {
                lower: upper,
                upper: lower,
            }
        }
    }

    /// Whether the two intervals overlap or share an endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::geometry::Interval;
    ///
    /// assert!(Interval::new(1, 3).is_connected(&Interval::new(3, 5)));
    /// assert!(!Interval::new(1, 3).is_connected(&Interval::new(4, 6)));
    /// ```
    pub fn is_connected(&self, other: &Interval) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }

    /// Smallest interval enclosing both.
    pub fn span(&self, other: &Interval) -> Interval {
        Interval {
            lower: self.lower.min(other.lower),
            upper: self.upper.max(other.upper),
        }
    }

    /// Whether `other` lies entirely inside this interval.
    pub fn encloses(&self, other: &Interval) -> bool {
        self.lower <= other.lower && other.upper <= self.upper
    }

    /// Whether `value` lies inside this interval.
    pub fn contains(&self, value: i32) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// Number of integer units covered, `upper - lower`.
    pub fn length(&self) -> i32 {
        self.upper.saturating_sub(self.lower)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}..{}]", self.lower, self.upper)
    }
}

/// Collects intervals and merges them into the minimal ordered set of
/// non-connected intervals.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::geometry::{Interval, RangeBuilder};
///
/// let ranges = RangeBuilder::new()
///     .add_range(Interval::new(50, 60))
///     .add_range(Interval::new(0, 10))
///     .add_range(Interval::new(8, 20))
///     .build();
///
/// assert_eq!(ranges, vec![Interval::new(0, 20), Interval::new(50, 60)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RangeBuilder {
    ranges: Vec<Interval>,
}

impl RangeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one interval.
    pub fn add_range(&mut self, range: Interval) -> &mut Self {
        self.ranges.push(range);
        self
    }

    /// Add every interval from an iterator.
    pub fn add_ranges<I: IntoIterator<Item = Interval>>(&mut self, ranges: I) -> &mut Self {
        self.ranges.extend(ranges);
        self
    }

    /// Merge everything added so far.
    ///
    /// The result is sorted by lower bound and no two of its intervals are
    /// connected.
    pub fn build(&self) -> Vec<Interval> {
        let mut sorted = self.ranges.clone();
        sorted.sort_by_key(|r| (r.lower, r.upper));

        let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if last.is_connected(&range) => *last = last.span(&range),
                _ => merged.push(range),
            }
        }
        merged
    }
}
