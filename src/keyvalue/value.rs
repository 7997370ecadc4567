//! Harvested form values.

use indexmap::IndexMap;
use serde::Serialize;

/// Reserved key collecting text the shared-cell layout could not pair.
pub const UNMATCHED_TEXT_KEY: &str = "__unmatched_text__";

/// Highest numeric suffix tried when disambiguating a repeated key.
pub const MAX_DUPLICATE_KEYS: usize = 999;

/// A harvested value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    /// A key whose value row or cell never appeared
    Null,
    /// A single value
    Text(String),
    /// One value per data row (header-only layout) or the unmatched bucket
    List(Vec<String>),
}

impl FormValue {
    /// The single text value, if this is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The list of values, if this is one.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FormValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Whether this is [`FormValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, FormValue::Null)
    }
}

impl From<&str> for FormValue {
    fn from(text: &str) -> Self {
        FormValue::Text(text.to_string())
    }
}

impl From<String> for FormValue {
    fn from(text: String) -> Self {
        FormValue::Text(text)
    }
}

impl From<Vec<String>> for FormValue {
    fn from(items: Vec<String>) -> Self {
        FormValue::List(items)
    }
}

/// Insertion-ordered mapping of harvested keys to values.
pub type FormValues = IndexMap<String, FormValue>;

/// Insert `value` under `key`, or under `key.1`, `key.2`, … when the key is
/// already taken.
///
/// Returns the key actually used. Past [`MAX_DUPLICATE_KEYS`] suffixes the
/// entry is dropped and `None` is returned.
///
/// # Examples
///
/// ```
/// use pdf_table_kv::keyvalue::{insert_unique, FormValues};
///
/// let mut values = FormValues::new();
/// insert_unique(&mut values, "Date", "2024-01-01".into());
/// let used = insert_unique(&mut values, "Date", "2024-02-01".into());
/// assert_eq!(used.as_deref(), Some("Date.1"));
/// ```
pub fn insert_unique(values: &mut FormValues, key: &str, value: FormValue) -> Option<String> {
    if !values.contains_key(key) {
        values.insert(key.to_string(), value);
        return Some(key.to_string());
    }

    for suffix in 1..=MAX_DUPLICATE_KEYS {
        let candidate = format!("{}.{}", key, suffix);
        if !values.contains_key(&candidate) {
            values.insert(candidate.clone(), value);
            return Some(candidate);
        }
    }

    log::warn!(
        "key '{}' repeated more than {} times, dropping value {:?}",
        key,
        MAX_DUPLICATE_KEYS,
        value
    );
    None
}

/// Append raw text to the unmatched bucket, creating it on first use.
pub fn push_unmatched(values: &mut FormValues, text: &str) {
    let bucket = values
        .entry(UNMATCHED_TEXT_KEY.to_string())
        .or_insert_with(|| FormValue::List(Vec::new()));
    match bucket {
        FormValue::List(items) => items.push(text.to_string()),
        other => log::error!(
            "unmatched bucket holds {:?} instead of a list, dropping {:?}",
            other,
            text
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_unique_suffixes() {
        let mut values = FormValues::new();
        assert_eq!(insert_unique(&mut values, "Date", "a".into()).as_deref(), Some("Date"));
        assert_eq!(insert_unique(&mut values, "Date", "b".into()).as_deref(), Some("Date.1"));
        assert_eq!(insert_unique(&mut values, "Date", "c".into()).as_deref(), Some("Date.2"));
        let keys: Vec<&str> = values.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Date", "Date.1", "Date.2"]);
        assert_eq!(values["Date.1"].as_text(), Some("b"));
    }

    #[test]
    fn test_insert_unique_cap() {
        let mut values = FormValues::new();
        for _ in 0..=MAX_DUPLICATE_KEYS {
            assert!(insert_unique(&mut values, "K", FormValue::Null).is_some());
        }
        assert!(values.contains_key("K.999"));
        assert_eq!(insert_unique(&mut values, "K", "late".into()), None);
        assert_eq!(values.len(), MAX_DUPLICATE_KEYS + 1);
    }

    #[test]
    fn test_push_unmatched_creates_bucket_lazily() {
        let mut values = FormValues::new();
        assert!(!values.contains_key(UNMATCHED_TEXT_KEY));
        push_unmatched(&mut values, "stray");
        push_unmatched(&mut values, "text");
        assert_eq!(
            values[UNMATCHED_TEXT_KEY].as_list(),
            Some(&["stray".to_string(), "text".to_string()][..])
        );
    }

    #[test]
    fn test_serialize_untagged() {
        let mut values = FormValues::new();
        values.insert("a".into(), FormValue::Null);
        values.insert("b".into(), "x".into());
        values.insert("c".into(), vec!["1".to_string(), "2".to_string()].into());
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"a":null,"b":"x","c":["1","2"]}"#);
    }
}
