//! Page and line windows applied before column clustering.
//!
//! Both windows are zero-based and half-open internally. The textual form
//! used on the command line is inclusive: `"2-5"` selects indices 2, 3, 4
//! and 5, `"4-"` selects index 4 onward and `"3"` selects only index 3.

use std::str::FromStr;

use crate::error::{Error, Result};

/// A window of line indices within a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineRange {
    /// First selected line
    pub start: usize,
    /// One past the last selected line; `None` means through the last line
    pub end: Option<usize>,
}

impl LineRange {
    /// Create a window `[start, end)`.
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// Every line of the page.
    pub fn all() -> Self {
        Self::default()
    }

    /// Clamp the window to `total` lines, returning `(start, end)`.
    pub fn bounds(&self, total: usize) -> (usize, usize) {
        clamp(self.start, self.end, total)
    }
}

impl FromStr for LineRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = parse_index_range(s)?;
        Ok(Self { start, end })
    }
}

/// A window of page indices within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageRange {
    /// First selected page
    pub start: usize,
    /// One past the last selected page; `None` means through the last page
    pub end: Option<usize>,
}

impl PageRange {
    /// Create a window `[start, end)`.
    pub fn new(start: usize, end: Option<usize>) -> Self {
        Self { start, end }
    }

    /// A single page.
    pub fn single(page: usize) -> Self {
        Self {
            start: page,
            end: Some(page + 1),
        }
    }

    /// Every page of the document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Page indices that exist in a document of `page_count` pages.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::layout::PageRange;
    ///
    /// let pages: Vec<usize> = "1-".parse::<PageRange>().unwrap().pages(3).collect();
    /// assert_eq!(pages, vec![1, 2]);
    /// ```
    pub fn pages(&self, page_count: usize) -> std::ops::Range<usize> {
        let (start, end) = clamp(self.start, self.end, page_count);
        start..end
    }
}

impl FromStr for PageRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (start, end) = parse_index_range(s)?;
        Ok(Self { start, end })
    }
}

fn clamp(start: usize, end: Option<usize>, total: usize) -> (usize, usize) {
    let end = end.unwrap_or(total).min(total);
    (start.min(end), end)
}

/// Parse `"N"`, `"N-M"`, `"N-"`, `"*"` or `""` into a half-open window.
fn parse_index_range(text: &str) -> Result<(usize, Option<usize>)> {
    let text = text.trim();
    if text.is_empty() || text == "*" {
        return Ok((0, None));
    }

    let parse = |part: &str| -> Result<usize> {
        part.trim()
            .parse::<usize>()
            .map_err(|_| Error::InvalidRange(text.to_string()))
    };

    match text.split_once('-') {
        None => {
            let index = parse(text)?;
            Ok((index, Some(index + 1)))
        },
        Some((from, to)) => {
            let start = if from.trim().is_empty() { 0 } else { parse(from)? };
            if to.trim().is_empty() {
                return Ok((start, None));
            }
            let last = parse(to)?;
            if last < start {
                return Err(Error::InvalidRange(text.to_string()));
            }
            Ok((start, Some(last + 1)))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single() {
        let range: LineRange = "3".parse().unwrap();
        assert_eq!(range, LineRange::new(3, Some(4)));
    }

    #[test]
    fn test_parse_inclusive_span() {
        let range: LineRange = "2-5".parse().unwrap();
        assert_eq!(range, LineRange::new(2, Some(6)));
    }

    #[test]
    fn test_parse_open_ended() {
        assert_eq!("4-".parse::<PageRange>().unwrap(), PageRange::new(4, None));
        assert_eq!("-2".parse::<PageRange>().unwrap(), PageRange::new(0, Some(3)));
        assert_eq!("*".parse::<PageRange>().unwrap(), PageRange::all());
        assert_eq!("".parse::<LineRange>().unwrap(), LineRange::all());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("x".parse::<LineRange>(), Err(Error::InvalidRange(_))));
        assert!(matches!("5-2".parse::<LineRange>(), Err(Error::InvalidRange(_))));
        assert!(matches!("1-b".parse::<PageRange>(), Err(Error::InvalidRange(_))));
    }

    #[test]
    fn test_bounds_clamped() {
        assert_eq!(LineRange::new(2, Some(10)).bounds(5), (2, 5));
        assert_eq!(LineRange::new(7, None).bounds(5), (5, 5));
        assert_eq!(LineRange::all().bounds(0), (0, 0));
    }

    #[test]
    fn test_pages_outside_document_empty() {
        assert_eq!(PageRange::single(9).pages(3).count(), 0);
        assert_eq!(PageRange::single(1).pages(3).collect::<Vec<_>>(), vec![1]);
    }
}
