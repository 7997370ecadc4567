//! Key/value identification strategies.
//!
//! A strategy says where keys live in a reconstructed table (the layout) and
//! how raw cell text is cleaned up into keys and values (the options).

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

/// Default pattern isolating a key from trailing punctuation. The first
/// capture group is the key.
pub const DEFAULT_KEY_PATTERN: &str = r#"^([0-9A-Za-z/ .,"'()\[\]#-]+):?\s*$"#;

/// Default separator between a key and its value inside one cell.
pub const DEFAULT_DELIMITER: &str = ":";

lazy_static! {
    static ref RE_DEFAULT_KEY: Regex = Regex::new(DEFAULT_KEY_PATTERN).unwrap();

    /// Runs of whitespace other than line breaks
    static ref RE_INLINE_SPACE: Regex = Regex::new(r"[^\S\r\n]+").unwrap();

    /// Line breaks in any convention
    static ref RE_LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
}

/// Neighbour consulted when a shared cell lacks half of its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Borrow the next cell of the same row
    AlternatingCell,
    /// Borrow the cell in the same column of the next row
    AlternatingRow,
}

impl FromStr for Fallback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ALTERNATING_CELL" | "KEYVALUEALTERNATINGCELL" | "CELL" => Ok(Fallback::AlternatingCell),
            "ALTERNATING_ROW" | "KEYVALUEALTERNATINGROW" | "ROW" => Ok(Fallback::AlternatingRow),
            other => Err(Error::InvalidConfig(format!("unknown fallback '{}'", other))),
        }
    }
}

/// Where keys and values sit in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyValueLayout {
    /// Row 0 holds the keys; every later row adds one value per key
    HeaderOnly,
    /// Rows alternate between keys and values
    AlternatingRow {
        /// Key row comes before its value row
        key_then_value: bool,
    },
    /// Cells of a row alternate between keys and values
    AlternatingCell {
        /// Key cell comes before its value cell
        key_then_value: bool,
    },
    /// Each cell holds `key<delimiter>value`
    SharedCell {
        /// Key comes before the delimiter
        key_then_value: bool,
        /// Neighbour consulted when a cell holds only half a pair
        fallback: Option<Fallback>,
    },
}

impl KeyValueLayout {
    /// Whether keys precede values. Always true for [`KeyValueLayout::HeaderOnly`].
    pub fn key_then_value(&self) -> bool {
        match *self {
            KeyValueLayout::HeaderOnly => true,
            KeyValueLayout::AlternatingRow { key_then_value }
            | KeyValueLayout::AlternatingCell { key_then_value }
            | KeyValueLayout::SharedCell { key_then_value, .. } => key_then_value,
        }
    }
}

impl fmt::Display for KeyValueLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyValueLayout::HeaderOnly => "header-only",
            KeyValueLayout::AlternatingRow { .. } => "alternating-row",
            KeyValueLayout::AlternatingCell { .. } => "alternating-cell",
            KeyValueLayout::SharedCell { .. } => "shared-cell",
        };
        f.write_str(name)
    }
}

/// A complete key/value strategy: layout plus text clean-up options.
///
/// Strategies are values. Derived configurations are built with the `with_*`
/// methods, which consume and return the strategy.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::keyvalue::{Fallback, KeyValueStrategy};
///
/// let strategy = KeyValueStrategy::shared_cell(true, Some(Fallback::AlternatingCell))
///     .with_delimiter("=")
///     .with_value_as_one_line(true);
///
/// assert_eq!(strategy.split_pair("Total = 42"), Some(("Total ", " 42")));
/// assert_eq!(strategy.format_key("Total "), "Total");
/// ```
#[derive(Debug, Clone)]
pub struct KeyValueStrategy {
    /// Where keys and values sit
    pub layout: KeyValueLayout,
    /// Separator between key and value inside one cell
    pub delimiter: Option<String>,
    key_pattern: Regex,
    /// Trim surrounding whitespace from keys
    pub trim_key: bool,
    /// Trim surrounding whitespace from values
    pub trim_value: bool,
    /// Collapse internal whitespace runs in keys
    pub normalize_key: bool,
    /// Collapse internal whitespace runs in values
    pub normalize_value: bool,
    /// Replace line breaks in values with spaces
    pub value_as_one_line: bool,
    /// Drop, rather than collect, shared-cell text that cannot be paired
    pub skip_key_without_delim: bool,
}

impl KeyValueStrategy {
    /// Create a strategy for `layout` with default options.
    pub fn new(layout: KeyValueLayout) -> Self {
        Self {
            layout,
            delimiter: Some(DEFAULT_DELIMITER.to_string()),
            key_pattern: RE_DEFAULT_KEY.clone(),
            trim_key: true,
            trim_value: true,
            normalize_key: true,
            normalize_value: true,
            value_as_one_line: false,
            skip_key_without_delim: false,
        }
    }

    /// Keys in the first row only.
    pub fn header_only() -> Self {
        Self::new(KeyValueLayout::HeaderOnly)
    }

    /// Alternating key and value rows.
    pub fn alternating_row(key_then_value: bool) -> Self {
        Self::new(KeyValueLayout::AlternatingRow { key_then_value })
    }

    /// Alternating key and value cells.
    pub fn alternating_cell(key_then_value: bool) -> Self {
        Self::new(KeyValueLayout::AlternatingCell { key_then_value })
    }

    /// Key and value sharing one cell.
    pub fn shared_cell(key_then_value: bool, fallback: Option<Fallback>) -> Self {
        Self::new(KeyValueLayout::SharedCell {
            key_then_value,
            fallback,
        })
    }

    /// Replace the layout, keeping the options.
    pub fn with_layout(mut self, layout: KeyValueLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the key/value delimiter.
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        let delimiter = delimiter.into();
        self.delimiter = if delimiter.is_empty() {
            None
        } else {
            Some(delimiter)
        };
        self
    }

    /// Remove the delimiter.
    pub fn without_delimiter(mut self) -> Self {
        self.delimiter = None;
        self
    }

    /// Set the key extraction pattern. The first capture group is the key.
    pub fn with_key_pattern(mut self, pattern: &str) -> Result<Self> {
        self.key_pattern = Regex::new(pattern)?;
        Ok(self)
    }

    /// Set key and value trimming.
    pub fn with_trim(mut self, key: bool, value: bool) -> Self {
        self.trim_key = key;
        self.trim_value = value;
        self
    }

    /// Set key and value whitespace normalization.
    pub fn with_normalize(mut self, key: bool, value: bool) -> Self {
        self.normalize_key = key;
        self.normalize_value = value;
        self
    }

    /// Replace line breaks in values with spaces.
    pub fn with_value_as_one_line(mut self, enable: bool) -> Self {
        self.value_as_one_line = enable;
        self
    }

    /// Drop unpairable shared-cell text instead of collecting it.
    pub fn with_skip_key_without_delim(mut self, enable: bool) -> Self {
        self.skip_key_without_delim = enable;
        self
    }

    /// The key extraction pattern.
    pub fn key_pattern(&self) -> &Regex {
        &self.key_pattern
    }

    /// Whether keys precede values.
    pub fn key_then_value(&self) -> bool {
        self.layout.key_then_value()
    }

    /// Fallback of a shared-cell layout.
    pub fn fallback(&self) -> Option<Fallback> {
        match self.layout {
            KeyValueLayout::SharedCell { fallback, .. } => fallback,
            _ => None,
        }
    }

    /// Reject configurations that cannot harvest anything.
    pub fn validate(&self, name: &str) -> Result<()> {
        if matches!(self.layout, KeyValueLayout::SharedCell { .. }) && self.delimiter.is_none() {
            return Err(Error::InvalidStrategy {
                name: name.to_string(),
                reason: "shared-cell layout requires a key/value delimiter".to_string(),
            });
        }
        if self.key_pattern.captures_len() < 2 {
            return Err(Error::InvalidStrategy {
                name: name.to_string(),
                reason: format!("key pattern '{}' has no capture group", self.key_pattern),
            });
        }
        Ok(())
    }

    /// Split `text` at the first delimiter into its left and right parts.
    pub fn split_pair<'t>(&self, text: &'t str) -> Option<(&'t str, &'t str)> {
        self.delimiter
            .as_deref()
            .and_then(|delimiter| text.split_once(delimiter))
    }

    /// Whether `text` contains the delimiter.
    pub fn has_delimiter(&self, text: &str) -> bool {
        self.split_pair(text).is_some()
    }

    /// Clean raw text into a key.
    ///
    /// Steps: keep the text before the first delimiter, take the first
    /// capture group of the key pattern (raw text when it does not match),
    /// trim, then collapse whitespace runs.
    pub fn format_key(&self, raw: &str) -> String {
        let mut key = match self.split_pair(raw) {
            Some((before, _)) => before,
            None => raw,
        };

        if let Some(captured) = self.key_pattern.captures(key).and_then(|c| c.get(1)) {
            key = captured.as_str();
        } else {
            log::trace!("key pattern did not match {:?}, keeping raw key", key);
        }

        let mut key = key.to_string();
        if self.trim_key {
            key = key.trim().to_string();
        }
        if self.normalize_key {
            key = RE_INLINE_SPACE.replace_all(&key, " ").into_owned();
        }
        key
    }

    /// Clean raw text into a value.
    ///
    /// Steps: drop one leading delimiter, fold line breaks when
    /// `value_as_one_line` is set, trim, then collapse whitespace runs.
    pub fn format_value(&self, raw: &str) -> String {
        let mut value = raw.trim_start();
        if let Some(rest) = self
            .delimiter
            .as_deref()
            .and_then(|delimiter| value.strip_prefix(delimiter))
        {
            value = rest;
        } else {
            value = raw;
        }

        let mut value = value.to_string();
        if self.value_as_one_line {
            value = RE_LINE_BREAK.replace_all(&value, " ").into_owned();
        }
        if self.trim_value {
            value = value.trim().to_string();
        }
        if self.normalize_value {
            value = RE_INLINE_SPACE.replace_all(&value, " ").into_owned();
        }
        value
    }
}

impl Default for KeyValueStrategy {
    fn default() -> Self {
        Self::alternating_cell(true)
    }
}
