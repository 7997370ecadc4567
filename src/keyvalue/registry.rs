//! Named, reusable key/value strategies.
//!
//! The registry is an ordinary value handed to the extraction call. It starts
//! from the built-in presets and can be extended or overridden from
//! `NAME.property=value` configuration pairs.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::keyvalue::strategy::{Fallback, KeyValueLayout, KeyValueStrategy};

/// Preset: keys in the first row only.
pub const HEADER_ROW_ONLY: &str = "HEADER_ROW_ONLY";
/// Preset: key row followed by value row.
pub const ALTERNATING_ROW: &str = "ALTERNATING_ROW";
/// Preset: key cell followed by value cell.
pub const ALTERNATING_CELL: &str = "ALTERNATING_CELL";
/// Preset: `key:value` in one cell, falling back to the next cell.
pub const SHARE_CELL: &str = "SHARE_CELL";

const LAYOUT_FLAGS: [&str; 4] = [
    "keyInHeaderRowOnly",
    "keyValueAlternatingRow",
    "keyValueAlternatingCell",
    "keyValueShareCell",
];

/// Lookup table of strategies by name.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: IndexMap<String, KeyValueStrategy>,
}

impl StrategyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in presets.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::keyvalue::StrategyRegistry;
    ///
    /// let registry = StrategyRegistry::with_defaults();
    /// assert!(registry.lookup("SHARE_CELL").is_some());
    /// assert!(registry.lookup("NOPE").is_none());
    /// ```
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(HEADER_ROW_ONLY, KeyValueStrategy::header_only());
        registry.register(ALTERNATING_ROW, KeyValueStrategy::alternating_row(true));
        registry.register(ALTERNATING_CELL, KeyValueStrategy::alternating_cell(true));
        registry.register(
            SHARE_CELL,
            KeyValueStrategy::shared_cell(true, Some(Fallback::AlternatingCell)),
        );
        registry
    }

    /// Register or replace a strategy.
    pub fn register(&mut self, name: impl Into<String>, strategy: KeyValueStrategy) {
        self.strategies.insert(name.into(), strategy);
    }

    /// Strategy registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&KeyValueStrategy> {
        self.strategies.get(name)
    }

    /// Strategy registered under `name`, or [`Error::UnknownStrategy`].
    pub fn resolve(&self, name: &str) -> Result<&KeyValueStrategy> {
        self.lookup(name)
            .ok_or_else(|| Error::UnknownStrategy(name.to_string()))
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.strategies.keys().map(|k| k.as_str())
    }

    /// Number of registered strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Overlay `NAME.property=value` pairs.
    ///
    /// Properties of an existing name adjust that strategy; a new name must
    /// set exactly one layout flag. Setting more than one layout flag to
    /// `true` for one name is rejected. Nothing is registered unless every
    /// name in the batch is valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_table_kv::keyvalue::StrategyRegistry;
    ///
    /// let mut registry = StrategyRegistry::with_defaults();
    /// registry
    ///     .merge_properties([
    ///         ("INVOICE.keyValueShareCell", "true"),
    ///         ("INVOICE.keyValueDelimiter", "="),
    ///         ("INVOICE.fallback", "ALTERNATING_ROW"),
    ///     ])
    ///     .unwrap();
    ///
    /// let invoice = registry.resolve("INVOICE").unwrap();
    /// assert_eq!(invoice.delimiter.as_deref(), Some("="));
    /// ```
    pub fn merge_properties<I, K, V>(&mut self, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut grouped: IndexMap<String, IndexMap<String, String>> = IndexMap::new();
        for (key, value) in properties {
            let key = key.as_ref().trim();
            let (name, property) = key.rsplit_once('.').ok_or_else(|| {
                Error::InvalidConfig(format!("strategy property '{}' has no name prefix", key))
            })?;
            grouped
                .entry(name.to_string())
                .or_default()
                .insert(property.to_string(), property_value(value.as_ref()).to_string());
        }

        let mut built = Vec::with_capacity(grouped.len());
        for (name, props) in grouped {
            let strategy = build_strategy(&name, self.lookup(&name), &props)?;
            built.push((name, strategy));
        }
        for (name, strategy) in built {
            log::debug!("registered strategy {} ({})", name, strategy.layout);
            self.register(name, strategy);
        }
        Ok(())
    }
}

/// Parse `key=value` lines, ignoring blanks and `#`/`!` comments.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::keyvalue::parse_properties;
///
/// let pairs = parse_properties("# strategies\nFORM.keyThenValue = false\n").unwrap();
/// assert_eq!(pairs, vec![("FORM.keyThenValue".to_string(), "false".to_string())]);
/// ```
pub fn parse_properties(text: &str) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let content = line.trim_start();
        if content.trim_end().is_empty() || content.starts_with('#') || content.starts_with('!') {
            continue;
        }
        let (key, value) = content.split_once('=').ok_or_else(|| {
            Error::InvalidConfig(format!(
                "line {}: expected key=value, found '{}'",
                number + 1,
                content.trim_end()
            ))
        })?;
        pairs.push((key.trim().to_string(), property_value(value).to_string()));
    }
    Ok(pairs)
}

/// Trimmed property value. A value made only of whitespace is kept as is,
/// so a space or tab can be configured as the delimiter.
fn property_value(raw: &str) -> &str {
    match raw.trim() {
        "" => raw,
        trimmed => trimmed,
    }
}

fn build_strategy(
    name: &str,
    base: Option<&KeyValueStrategy>,
    props: &IndexMap<String, String>,
) -> Result<KeyValueStrategy> {
    let invalid = |reason: String| Error::InvalidStrategy {
        name: name.to_string(),
        reason,
    };

    let mut selected = Vec::new();
    for flag in LAYOUT_FLAGS {
        if let Some(value) = props.get(flag) {
            if parse_bool(name, flag, value)? {
                selected.push(flag);
            }
        }
    }
    if selected.len() > 1 {
        return Err(invalid(format!("more than one layout flag set: {}", selected.join(", "))));
    }

    let key_then_value = match props.get("keyThenValue") {
        Some(value) => parse_bool(name, "keyThenValue", value)?,
        None => base.map(|b| b.key_then_value()).unwrap_or(true),
    };
    let fallback = match props.get("fallback") {
        Some(value) if value.trim().is_empty() || value.eq_ignore_ascii_case("none") => None,
        Some(value) => Some(value.parse::<Fallback>()?),
        None => base.and_then(|b| b.fallback()),
    };

    let layout = match selected.first().copied() {
        Some("keyInHeaderRowOnly") => KeyValueLayout::HeaderOnly,
        Some("keyValueAlternatingRow") => KeyValueLayout::AlternatingRow { key_then_value },
        Some("keyValueAlternatingCell") => KeyValueLayout::AlternatingCell { key_then_value },
        Some(_) => KeyValueLayout::SharedCell {
            key_then_value,
            fallback,
        },
        None => match base.map(|b| b.layout) {
            Some(KeyValueLayout::HeaderOnly) => KeyValueLayout::HeaderOnly,
            Some(KeyValueLayout::AlternatingRow { .. }) => {
                KeyValueLayout::AlternatingRow { key_then_value }
            },
            Some(KeyValueLayout::AlternatingCell { .. }) => {
                KeyValueLayout::AlternatingCell { key_then_value }
            },
            Some(KeyValueLayout::SharedCell { .. }) => KeyValueLayout::SharedCell {
                key_then_value,
                fallback,
            },
            None => return Err(invalid("no layout flag set".to_string())),
        },
    };

    if props.contains_key("fallback") && !matches!(layout, KeyValueLayout::SharedCell { .. }) {
        log::warn!("strategy {}: fallback only applies to the shared-cell layout, ignored", name);
    }

    let mut strategy = match base {
        Some(base) => base.clone().with_layout(layout),
        None => KeyValueStrategy::new(layout),
    };

    for (property, value) in props {
        match property.as_str() {
            "keyValueDelimiter" => strategy = strategy.with_delimiter(value.as_str()),
            "extractKeyPattern" => strategy = strategy.with_key_pattern(value)?,
            "trimKey" => strategy.trim_key = parse_bool(name, property, value)?,
            "trimValue" => strategy.trim_value = parse_bool(name, property, value)?,
            "normalizeKey" => strategy.normalize_key = parse_bool(name, property, value)?,
            "normalizeValue" => strategy.normalize_value = parse_bool(name, property, value)?,
            "valueAsOneLine" => strategy.value_as_one_line = parse_bool(name, property, value)?,
            "skipKeyWithoutDelim" => {
                strategy.skip_key_without_delim = parse_bool(name, property, value)?
            },
            "keyThenValue" | "fallback" => {},
            flag if LAYOUT_FLAGS.contains(&flag) => {},
            other => log::warn!("strategy {}: unknown property '{}' ignored", name, other),
        }
    }

    strategy.validate(name)?;
    Ok(strategy)
}

fn parse_bool(name: &str, property: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(Error::InvalidConfig(format!(
            "strategy {}: '{}' is not a boolean for {}",
            name, value, property
        ))),
    }
}
