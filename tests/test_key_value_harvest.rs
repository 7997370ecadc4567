//! Integration tests for key/value harvesting.
//!
//! Each test starts from positioned fragments, runs the full pipeline and
//! checks the ordered mapping produced under one strategy.

use pdf_table_kv::keyvalue::{
    parse_properties, Fallback, FormValue, FormValues, KeyValueStrategy, StrategyRegistry,
    UNMATCHED_TEXT_KEY,
};
use pdf_table_kv::layout::{LineRange, PageRange, TextFragment};
use pdf_table_kv::source::MemorySource;
use pdf_table_kv::{Error, TableExtractor};

// ============================================================================
// Helper Functions for Creating Mock Data
// ============================================================================

fn word(text: &str, x: f32, y: f32) -> TextFragment {
    TextFragment::new(text, x, y, 6.0 * text.chars().count() as f32, 10.0)
}

/// Lay out `rows` on a grid with 20 units between lines and 100 between columns.
fn page(rows: &[&[&str]]) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    for (r, cells) in rows.iter().enumerate() {
        for (c, text) in cells.iter().enumerate() {
            if !text.is_empty() {
                fragments.push(word(text, 10.0 + 100.0 * c as f32, 20.0 * r as f32));
            }
        }
    }
    fragments
}

fn harvest(pages: Vec<Vec<TextFragment>>, strategy: &KeyValueStrategy) -> FormValues {
    TableExtractor::default()
        .extract_form_values(
            MemorySource::new(pages),
            PageRange::all(),
            LineRange::all(),
            strategy,
        )
        .unwrap()
}

fn list(items: &[&str]) -> FormValue {
    FormValue::List(items.iter().map(|s| s.to_string()).collect())
}

fn text(value: &str) -> FormValue {
    FormValue::Text(value.to_string())
}

// ============================================================================
// Header-only
// ============================================================================

#[test]
fn test_header_only_round_trip() {
    let fragments = page(&[&["Name", "Age"], &["Ann", "5"], &["Bo", "9"]]);
    let values = harvest(vec![fragments], &KeyValueStrategy::header_only());

    assert_eq!(values.len(), 2);
    assert_eq!(values["Name"], list(&["Ann", "Bo"]));
    assert_eq!(values["Age"], list(&["5", "9"]));
    let keys: Vec<&str> = values.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["Name", "Age"]);
}

#[test]
fn test_header_only_continues_across_pages() {
    let first = page(&[&["Name", "Age"], &["Ann", "5"]]);
    let second = page(&[&["Name", "Age"], &["Bo", "9"], &["Cy", ""]]);
    let values = harvest(vec![first, second], &KeyValueStrategy::header_only());

    assert_eq!(values["Name"], list(&["Ann", "Bo", "Cy"]));
    assert_eq!(values["Age"], list(&["5", "9", ""]));
}

#[test]
fn test_header_only_serializes_as_json_object() {
    let fragments = page(&[&["Name", "Age"], &["Ann", "5"]]);
    let values = harvest(vec![fragments], &KeyValueStrategy::header_only());

    let json = serde_json::to_string(&values).unwrap();
    assert_eq!(json, r#"{"Name":["Ann"],"Age":["5"]}"#);
}

// ============================================================================
// Alternating rows and cells
// ============================================================================

#[test]
fn test_alternating_row_pairing_with_orphan_key_row() {
    let fragments = page(&[&["K1", "K2"], &["V1", "V2"], &["K3"]]);
    let values = harvest(vec![fragments], &KeyValueStrategy::alternating_row(true));

    assert_eq!(values["K1"], text("V1"));
    assert_eq!(values["K2"], text("V2"));
    assert_eq!(values["K3"], FormValue::Null);
    assert_eq!(values.len(), 3);
}

#[test]
fn test_alternating_cell_duplicate_keys() {
    let fragments = vec![
        word("Date", 10.0, 0.0),
        word("2024-01-01", 60.0, 0.0),
        word("Date", 140.0, 0.0),
        word("2024-02-01", 180.0, 0.0),
    ];
    let values = harvest(vec![fragments], &KeyValueStrategy::alternating_cell(true));

    assert_eq!(values["Date"], text("2024-01-01"));
    assert_eq!(values["Date.1"], text("2024-02-01"));
    assert_eq!(values.len(), 2);
}

#[test]
fn test_alternating_cell_key_pattern_strips_colon() {
    let fragments = page(&[&["Name:", "Ann"], &["City :", "Oslo"]]);
    let values = harvest(vec![fragments], &KeyValueStrategy::alternating_cell(true));

    assert_eq!(values["Name"], text("Ann"));
    assert_eq!(values["City"], text("Oslo"));
}

#[test]
fn test_alternating_cell_empty_value_keeps_alignment() {
    let fragments = page(&[&["Name", "Ann", "City", "Oslo"], &["Phone", "", "Zip", "0150"]]);
    let values = harvest(vec![fragments], &KeyValueStrategy::alternating_cell(true));

    assert_eq!(values["Phone"], text(""));
    assert_eq!(values["Zip"], text("0150"));
    assert_eq!(values.len(), 4);
}

// ============================================================================
// Shared cell
// ============================================================================

#[test]
fn test_shared_cell_with_fallback() {
    let fragments = page(&[&["Total", "42"]]);
    let strategy = KeyValueStrategy::shared_cell(true, Some(Fallback::AlternatingCell));
    let values = harvest(vec![fragments], &strategy);

    assert_eq!(values["Total"], text("42"));
    assert_eq!(values.len(), 1);
}

#[test]
fn test_shared_cell_unmatched_bucket() {
    let fragments = vec![
        word("Thank you for your business", 10.0, 0.0),
        word("Ref: 9", 200.0, 0.0),
    ];
    let values = harvest(vec![fragments], &KeyValueStrategy::shared_cell(true, None));

    assert_eq!(values["Ref"], text("9"));
    assert_eq!(values[UNMATCHED_TEXT_KEY], list(&["Thank you for your business"]));
}

#[test]
fn test_shared_cell_custom_delimiter() {
    let fragments = page(&[&["Invoice = 7", "Due = May"]]);
    let strategy = KeyValueStrategy::shared_cell(true, None).with_delimiter("=");
    let values = harvest(vec![fragments], &strategy);

    assert_eq!(values["Invoice"], text("7"));
    assert_eq!(values["Due"], text("May"));
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_registry_override_from_properties() {
    let properties = "\
# invoice header block
INVOICE.keyValueShareCell = true
INVOICE.keyValueDelimiter = =
INVOICE.fallback = ALTERNATING_CELL
";
    let mut registry = StrategyRegistry::with_defaults();
    registry
        .merge_properties(parse_properties(properties).unwrap())
        .unwrap();

    let fragments = page(&[&["Invoice = 7", "Total", "42"]]);
    let values = TableExtractor::default()
        .extract_form_values_by_name(
            MemorySource::single_page(fragments),
            PageRange::all(),
            LineRange::all(),
            &registry,
            "INVOICE",
        )
        .unwrap();

    assert_eq!(values["Invoice"], text("7"));
    assert_eq!(values["Total"], text("42"));
}

#[test]
fn test_conflicting_layout_flags_rejected() {
    let mut registry = StrategyRegistry::with_defaults();
    let result = registry.merge_properties([
        ("BROKEN.keyInHeaderRowOnly", "true"),
        ("BROKEN.keyValueAlternatingRow", "true"),
    ]);

    assert!(matches!(result, Err(Error::InvalidStrategy { ref name, .. }) if name == "BROKEN"));
    assert!(registry.lookup("BROKEN").is_none());
}

#[test]
fn test_empty_page_yields_empty_mapping() {
    let values = harvest(vec![Vec::new()], &KeyValueStrategy::shared_cell(true, None));
    assert!(values.is_empty());
}
