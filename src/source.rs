//! Providers of positioned text fragments, one page at a time.
//!
//! The crate never parses documents itself. Anything able to yield
//! [`TextFragment`]s per page implements [`FragmentSource`]; two sources ship
//! with the crate: an in-memory one and a JSON file reader.

use std::fs::File;
use std::io::BufReader;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::fragment::TextFragment;

/// A paginated supply of text fragments.
pub trait FragmentSource {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Fragments of the zero-based `page`, in extraction order.
    fn fragments(&mut self, page: usize) -> Result<Vec<TextFragment>>;

    /// Release underlying resources. Further reads may fail.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Fragments held in memory, mostly for tests and embedding.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::layout::TextFragment;
/// use pdf_table_kv::source::{FragmentSource, MemorySource};
///
/// let mut source = MemorySource::new(vec![vec![TextFragment::new("A", 0.0, 0.0, 5.0, 5.0)]]);
/// assert_eq!(source.page_count(), 1);
/// assert_eq!(source.fragments(0).unwrap().len(), 1);
/// assert!(source.fragments(3).unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<Vec<TextFragment>>,
}

impl MemorySource {
    /// Create a source from per-page fragment lists.
    pub fn new(pages: Vec<Vec<TextFragment>>) -> Self {
        Self { pages }
    }

    /// Create a single-page source.
    pub fn single_page(fragments: Vec<TextFragment>) -> Self {
        Self::new(vec![fragments])
    }
}

impl FragmentSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&mut self, page: usize) -> Result<Vec<TextFragment>> {
        Ok(self.pages.get(page).cloned().unwrap_or_default())
    }
}

/// On-disk layout read by [`JsonFragmentSource`].
///
/// ```json
/// { "pages": [ [ { "x": 10.0, "y": 20.0, "width": 30.0, "height": 10.0, "text": "Name" } ] ] }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentDocument {
    /// Fragments of each page, in page order
    pub pages: Vec<Vec<TextFragment>>,
}

/// Fragments loaded from a JSON file produced by an upstream text extractor.
#[derive(Debug)]
pub struct JsonFragmentSource {
    path: PathBuf,
    pages: Vec<Vec<TextFragment>>,
    closed: bool,
}

impl JsonFragmentSource {
    /// Read a [`FragmentDocument`] from `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = BufReader::new(File::open(&path)?);
        let document: FragmentDocument = serde_json::from_reader(reader)?;
        log::debug!("loaded {} pages of fragments from {}", document.pages.len(), path.display());
        Ok(Self {
            path,
            pages: document.pages,
            closed: false,
        })
    }

    /// File the fragments were read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether [`FragmentSource::close`] has run.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl FragmentSource for JsonFragmentSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&mut self, page: usize) -> Result<Vec<TextFragment>> {
        if self.closed {
            return Err(Error::Source(format!("{} is closed", self.path.display())));
        }
        Ok(self.pages.get(page).cloned().unwrap_or_default())
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            log::debug!("closing {}", self.path.display());
            self.pages.clear();
            self.closed = true;
        }
        Ok(())
    }
}

/// Owns a source for the duration of one extraction and closes it on drop.
///
/// Close failures are logged, never raised, so the extraction's own result
/// or error reaches the caller.
pub struct SourceGuard<S: FragmentSource> {
    source: S,
}

impl<S: FragmentSource> SourceGuard<S> {
    /// Take ownership of `source`.
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: FragmentSource> Deref for SourceGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.source
    }
}

impl<S: FragmentSource> DerefMut for SourceGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S: FragmentSource> Drop for SourceGuard<S> {
    fn drop(&mut self) {
        if let Err(e) = self.source.close() {
            log::error!("failed to close fragment source: {}", e);
        }
    }
}
