//! Harvesting key/value pairs from a reconstructed table.
//!
//! [`MapFormatter`] dispatches on the strategy layout. Orphaned rows and cells
//! are logged with their position and raw content, and harvesting continues
//! with whatever could be paired.

use std::collections::HashSet;

use crate::elements::table::{Row, Table};
use crate::keyvalue::strategy::{Fallback, KeyValueLayout, KeyValueStrategy};
use crate::keyvalue::value::{insert_unique, push_unmatched, FormValue, FormValues};

/// Turns tables into ordered key/value mappings under one strategy.
#[derive(Debug, Clone, Copy)]
pub struct MapFormatter<'a> {
    strategy: &'a KeyValueStrategy,
}

impl<'a> MapFormatter<'a> {
    /// Create a formatter for `strategy`.
    pub fn new(strategy: &'a KeyValueStrategy) -> Self {
        Self { strategy }
    }

    /// Harvest `table` into a fresh mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::elements::{Cell, Row, Table};
    /// use pdf_table_kv::keyvalue::{FormValue, KeyValueStrategy, MapFormatter};
    ///
    /// let mut table = Table::new(0, 2);
    /// table.add_row(Row::new(0, vec![Cell::new(0, "Name:"), Cell::new(1, "Ann")]));
    ///
    /// let strategy = KeyValueStrategy::alternating_cell(true);
    /// let values = MapFormatter::new(&strategy).format(&table);
    /// assert_eq!(values["Name"], FormValue::Text("Ann".into()));
    /// ```
    pub fn format(&self, table: &Table) -> FormValues {
        let mut values = FormValues::new();
        self.format_into(table, &mut values);
        values
    }

    /// Harvest `table` into caller-owned `values`.
    ///
    /// Used to continue a multi-page table: under the header-only layout the
    /// value lists of matching keys are extended rather than replaced. Other
    /// layouts add their pairs with the usual duplicate-key suffixes.
    pub fn format_into(&self, table: &Table, values: &mut FormValues) {
        if table.is_empty() {
            log::debug!("page {}: empty table, nothing to harvest", table.page_index);
            return;
        }

        match self.strategy.layout {
            KeyValueLayout::HeaderOnly => self.harvest_header_only(table, values),
            KeyValueLayout::AlternatingRow { key_then_value } => {
                self.harvest_alternating_rows(table, key_then_value, values)
            },
            KeyValueLayout::AlternatingCell { key_then_value } => {
                for row in &table.rows {
                    self.harvest_alternating_cells(table, row, key_then_value, values);
                }
            },
            KeyValueLayout::SharedCell {
                key_then_value,
                fallback,
            } => self.harvest_shared_cells(table, key_then_value, fallback, values),
        }
    }

    fn harvest_header_only(&self, table: &Table, values: &mut FormValues) {
        let Some((header, data)) = table.rows.split_first() else {
            return;
        };

        // Deduplicate within this table first so repeated header text keeps
        // its columns apart.
        let mut columns = FormValues::new();
        let mut keys: Vec<(usize, String)> = Vec::new();
        for cell in &header.cells {
            let key = self.strategy.format_key(&cell.content);
            if key.is_empty() {
                log::warn!(
                    "page {} column {}: header {:?} yields an empty key, skipping column",
                    table.page_index,
                    cell.column_index,
                    cell.content
                );
                continue;
            }
            if let Some(used) = insert_unique(&mut columns, &key, FormValue::Null) {
                keys.push((cell.column_index, used));
            }
        }

        for (column, key) in keys {
            let items: Vec<String> = data
                .iter()
                .map(|row| self.strategy.format_value(row.content_at(column)))
                .collect();
            merge_list(values, key, items);
        }
    }

    fn harvest_alternating_rows(&self, table: &Table, key_then_value: bool, values: &mut FormValues) {
        let rows = &table.rows;
        let mut i = 0;
        while i < rows.len() {
            let first = &rows[i];
            let second = rows.get(i + 1);
            i += 2;

            let (key_row, value_row) = if key_then_value {
                (first, second)
            } else {
                match second {
                    Some(key_row) => (key_row, Some(first)),
                    None => {
                        log::warn!(
                            "page {} row {}: value row without key row dropped: {:?}",
                            table.page_index,
                            first.index,
                            row_text(first)
                        );
                        continue;
                    },
                }
            };

            if value_row.is_none() {
                log::warn!(
                    "page {} row {}: key row without value row: {:?}",
                    table.page_index,
                    key_row.index,
                    row_text(key_row)
                );
            }

            for cell in &key_row.cells {
                let key = self.strategy.format_key(&cell.content);
                if key.is_empty() {
                    log::debug!(
                        "page {} row {} column {}: empty key from {:?}",
                        table.page_index,
                        key_row.index,
                        cell.column_index,
                        cell.content
                    );
                    continue;
                }
                let value = match value_row {
                    Some(row) => {
                        FormValue::Text(self.strategy.format_value(row.content_at(cell.column_index)))
                    },
                    None => FormValue::Null,
                };
                insert_unique(values, &key, value);
            }
        }
    }

    /// Pair columns `(0, 1)`, `(2, 3)`, ... of `row`. Gaps in the sparse row
    /// count as empty cells, so a missing value never shifts later pairs.
    fn harvest_alternating_cells(
        &self,
        table: &Table,
        row: &Row,
        key_then_value: bool,
        values: &mut FormValues,
    ) {
        let width = row
            .cells
            .last()
            .map_or(0, |cell| cell.column_index + 1)
            .max(table.column_count);

        for first in (0..width).step_by(2) {
            let second = first + 1;
            if second >= width {
                self.harvest_trailing_cell(table.page_index, row, first, key_then_value, values);
                break;
            }
            let (key_column, value_column) = if key_then_value {
                (first, second)
            } else {
                (second, first)
            };
            self.insert_pair(table.page_index, row, key_column, value_column, values);
        }
    }

    /// Last column of a row with no partner. A key cell is split inline when
    /// it carries the delimiter, otherwise recorded as null. A value cell is
    /// dropped.
    fn harvest_trailing_cell(
        &self,
        page_index: usize,
        row: &Row,
        column: usize,
        key_then_value: bool,
        values: &mut FormValues,
    ) {
        let content = row.content_at(column);
        if content.trim().is_empty() {
            return;
        }

        if !key_then_value {
            log::warn!(
                "page {} row {} column {}: value cell without key dropped: {:?}",
                page_index,
                row.index,
                column,
                content
            );
            return;
        }

        if let Some((key, value)) = self.strategy.split_pair(content) {
            let key = self.strategy.format_key(key);
            if !key.is_empty() {
                insert_unique(values, &key, FormValue::Text(self.strategy.format_value(value)));
                return;
            }
        }

        log::warn!(
            "page {} row {} column {}: key cell without value: {:?}",
            page_index,
            row.index,
            column,
            content
        );
        let key = self.strategy.format_key(content);
        if !key.is_empty() {
            insert_unique(values, &key, FormValue::Null);
        }
    }

    fn insert_pair(
        &self,
        page_index: usize,
        row: &Row,
        key_column: usize,
        value_column: usize,
        values: &mut FormValues,
    ) {
        let raw_key = row.content_at(key_column);
        let raw_value = row.content_at(value_column);
        if raw_key.trim().is_empty() && raw_value.trim().is_empty() {
            return;
        }

        let key = self.strategy.format_key(raw_key);
        if key.is_empty() {
            log::debug!(
                "page {} row {} column {}: empty key from {:?}, value {:?} dropped",
                page_index,
                row.index,
                key_column,
                raw_key,
                raw_value
            );
            return;
        }
        insert_unique(values, &key, FormValue::Text(self.strategy.format_value(raw_value)));
    }

    fn harvest_shared_cells(
        &self,
        table: &Table,
        key_then_value: bool,
        fallback: Option<Fallback>,
        values: &mut FormValues,
    ) {
        // (row position, cell position) pairs borrowed by a fallback
        let mut consumed: HashSet<(usize, usize)> = HashSet::new();

        for (r, row) in table.rows.iter().enumerate() {
            for (c, cell) in row.cells.iter().enumerate() {
                if consumed.contains(&(r, c)) {
                    continue;
                }
                let text = cell.content.trim();
                if text.is_empty() {
                    continue;
                }

                // The half of the pair present in this cell, if incomplete
                let partial = match self.strategy.split_pair(text) {
                    Some((left, right)) => {
                        let (key, value) = if key_then_value {
                            (left, right)
                        } else {
                            (right, left)
                        };
                        let key = self.strategy.format_key(key);
                        let value = self.strategy.format_value(value);
                        match (key.is_empty(), value.is_empty()) {
                            (false, false) => {
                                insert_unique(values, &key, FormValue::Text(value));
                                continue;
                            },
                            (false, true) => Some(Partial::Key(key)),
                            (true, false) => Some(Partial::Value(value)),
                            (true, true) => continue,
                        }
                    },
                    None if key_then_value => Some(Partial::Key(self.strategy.format_key(text))),
                    None => Some(Partial::Value(self.strategy.format_value(text))),
                };

                let paired = match (partial, fallback) {
                    (Some(partial), Some(fallback)) => {
                        self.borrow_neighbour(table, r, c, fallback, &mut consumed)
                            .map(|neighbour| partial.complete(self.strategy, neighbour))
                    },
                    _ => None,
                };

                match paired {
                    Some((key, value)) if !key.is_empty() => {
                        insert_unique(values, &key, FormValue::Text(value));
                    },
                    _ if self.strategy.skip_key_without_delim => {
                        log::warn!(
                            "page {} row {} column {}: unpaired text skipped: {:?}",
                            table.page_index,
                            row.index,
                            cell.column_index,
                            text
                        );
                    },
                    _ => {
                        log::debug!(
                            "page {} row {} column {}: unpaired text collected: {:?}",
                            table.page_index,
                            row.index,
                            cell.column_index,
                            text
                        );
                        push_unmatched(values, text);
                    },
                }
            }
        }
    }

    /// Take the neighbour of cell `(r, c)` named by `fallback`, provided it is
    /// unused and is not a complete pair of its own.
    fn borrow_neighbour<'t>(
        &self,
        table: &'t Table,
        r: usize,
        c: usize,
        fallback: Fallback,
        consumed: &mut HashSet<(usize, usize)>,
    ) -> Option<&'t str> {
        let column = table.rows[r].cells[c].column_index;
        let position = match fallback {
            Fallback::AlternatingCell => table.rows[r]
                .cells
                .iter()
                .position(|cell| cell.column_index == column + 1)
                .map(|pos| (r, pos)),
            Fallback::AlternatingRow => {
                table.rows.get(r + 1).and_then(|next| {
                    next.cells
                        .iter()
                        .position(|cell| cell.column_index == column)
                        .map(|pos| (r + 1, pos))
                })
            },
        }?;

        if consumed.contains(&position) {
            return None;
        }
        let content = table.rows[position.0].cells[position.1].content.as_str();
        if content.trim().is_empty() || self.strategy.has_delimiter(content) {
            return None;
        }
        consumed.insert(position);
        Some(content)
    }
}

/// The half of a shared-cell pair found in the current cell.
enum Partial {
    Key(String),
    Value(String),
}

impl Partial {
    fn complete(self, strategy: &KeyValueStrategy, neighbour: &str) -> (String, String) {
        match self {
            Partial::Key(key) => (key, strategy.format_value(neighbour)),
            Partial::Value(value) => (strategy.format_key(neighbour), value),
        }
    }
}

/// Merge one column of header-only values into `values`.
fn merge_list(values: &mut FormValues, key: String, items: Vec<String>) {
    let Some(existing) = values.get_mut(&key) else {
        values.insert(key, FormValue::List(items));
        return;
    };

    match existing {
        FormValue::List(list) => list.extend(items),
        FormValue::Text(text) => {
            let mut merged = vec![std::mem::take(text)];
            merged.extend(items);
            *existing = FormValue::List(merged);
        },
        FormValue::Null => {
            log::error!(
                "existing value for '{}' is null, cannot append {} values",
                key,
                items.len()
            );
        },
    }
}

fn row_text(row: &Row) -> String {
    row.cells
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}
