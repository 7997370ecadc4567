//! Extraction entry point: fragments in, tables or form values out.
//!
//! Every public method takes ownership of its [`FragmentSource`] and closes
//! it before returning, whether extraction succeeded or not. Configuration
//! problems (unknown or invalid strategy) are reported before the source is
//! read at all.

use crate::config::ExtractionConfig;
use crate::elements::table::Table;
use crate::error::Result;
use crate::keyvalue::{FormValues, KeyValueStrategy, MapFormatter, StrategyRegistry};
use crate::layout::{cluster_lines, column_trap_ranges, select_lines, LineRange, PageRange, TextFragment};
use crate::source::{FragmentSource, SourceGuard};

/// Name reported for strategies passed in directly rather than by name.
const INLINE_STRATEGY: &str = "<inline>";

/// Reconstructs tables and harvests key/value pairs from fragment sources.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::extractor::TableExtractor;
/// use pdf_table_kv::keyvalue::{FormValue, KeyValueStrategy};
/// use pdf_table_kv::layout::{LineRange, PageRange, TextFragment};
/// use pdf_table_kv::source::MemorySource;
///
/// let source = MemorySource::single_page(vec![
///     TextFragment::new("Name:", 10.0, 0.0, 30.0, 10.0),
///     TextFragment::new("Ann", 100.0, 0.0, 20.0, 10.0),
/// ]);
///
/// let values = TableExtractor::default()
///     .extract_form_values(
///         source,
///         PageRange::all(),
///         LineRange::all(),
///         &KeyValueStrategy::alternating_cell(true),
///     )
///     .unwrap();
/// assert_eq!(values["Name"], FormValue::Text("Ann".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    config: ExtractionConfig,
}

impl TableExtractor {
    /// Create an extractor with the given configuration.
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Reconstruct the table of one page.
    ///
    /// A page index past the end of the document yields an empty table.
    pub fn extract_table<S: FragmentSource>(
        &self,
        source: S,
        page: usize,
        lines: &LineRange,
    ) -> Result<Table> {
        let mut source = SourceGuard::new(source);
        self.read_page_table(&mut *source, page, lines)
    }

    /// Reconstruct one table per selected page.
    pub fn extract_tables<S: FragmentSource>(
        &self,
        source: S,
        pages: PageRange,
        lines: LineRange,
    ) -> Result<Vec<Table>> {
        let mut source = SourceGuard::new(source);
        let page_count = source.page_count();
        let mut tables = Vec::new();
        for page in pages.pages(page_count) {
            tables.push(self.read_page_table(&mut *source, page, &lines)?);
        }
        Ok(tables)
    }

    /// Harvest form values from the selected pages into one mapping.
    ///
    /// Pages are processed in order and accumulate into the same mapping, so
    /// a header-only table that continues across pages keeps extending its
    /// value lists.
    pub fn extract_form_values<S: FragmentSource>(
        &self,
        source: S,
        pages: PageRange,
        lines: LineRange,
        strategy: &KeyValueStrategy,
    ) -> Result<FormValues> {
        let mut source = SourceGuard::new(source);
        self.harvest(&mut *source, pages, lines, strategy, INLINE_STRATEGY)
    }

    /// Like [`extract_form_values`](Self::extract_form_values), with the
    /// strategy looked up in `registry` by `name`.
    pub fn extract_form_values_by_name<S: FragmentSource>(
        &self,
        source: S,
        pages: PageRange,
        lines: LineRange,
        registry: &StrategyRegistry,
        name: &str,
    ) -> Result<FormValues> {
        // Guard the source first so an unknown name still closes it.
        let mut source = SourceGuard::new(source);
        let strategy = registry.resolve(name)?;
        self.harvest(&mut *source, pages, lines, strategy, name)
    }

    /// Build the table for an already-loaded page of fragments.
    pub fn build_page_table(
        &self,
        page_index: usize,
        fragments: &[TextFragment],
        lines: &LineRange,
    ) -> Table {
        let clusters = cluster_lines(fragments, self.config.line_merge_tolerance);
        let selected = select_lines(clusters, lines);
        if selected.is_empty() {
            log::debug!("page {}: no lines selected", page_index);
            return Table::empty(page_index);
        }

        let columns = column_trap_ranges(&selected);
        log::debug!(
            "page {}: {} lines, {} columns",
            page_index,
            selected.len(),
            columns.len()
        );
        self.config.table_builder().build(page_index, &selected, &columns)
    }

    fn harvest<S: FragmentSource + ?Sized>(
        &self,
        source: &mut S,
        pages: PageRange,
        lines: LineRange,
        strategy: &KeyValueStrategy,
        name: &str,
    ) -> Result<FormValues> {
        strategy.validate(name)?;

        let formatter = MapFormatter::new(strategy);
        let mut values = FormValues::new();
        for page in pages.pages(source.page_count()) {
            let table = self.read_page_table(source, page, &lines)?;
            formatter.format_into(&table, &mut values);
        }
        log::debug!("strategy {}: harvested {} keys", name, values.len());
        Ok(values)
    }

    fn read_page_table<S: FragmentSource + ?Sized>(
        &self,
        source: &mut S,
        page: usize,
        lines: &LineRange,
    ) -> Result<Table> {
        let page_count = source.page_count();
        if page >= page_count {
            log::warn!("page {} out of range (document has {} pages)", page, page_count);
            return Ok(Table::empty(page));
        }
        let fragments = source.fragments(page)?;
        Ok(self.build_page_table(page, &fragments, lines))
    }
}
