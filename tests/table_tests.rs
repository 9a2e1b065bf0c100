use serde_json::{json, Value};
use vex2doc::report::{ColumnPolicy, VulnerabilityTable};
use vex2doc::vex::Record;

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_uniform_records_keep_first_seen_order() {
    let records = vec![
        record(json!({"id": "CVE-1", "status": "affected", "product": "app"})),
        record(json!({"id": "CVE-2", "status": "fixed", "product": "lib"})),
    ];

    for policy in [ColumnPolicy::Accumulate, ColumnPolicy::Union] {
        let table = VulnerabilityTable::build(&records, policy);
        assert_eq!(table.headings(), strings(&["id", "status", "product"]).as_slice());
        assert_eq!(table.display_headings(), strings(&["Id", "Status", "Product"]));
        assert_eq!(
            table.rows(),
            &[
                strings(&["CVE-1", "affected", "app"]),
                strings(&["CVE-2", "fixed", "lib"]),
            ]
        );
    }
}

#[test]
fn test_uniform_keys_in_different_order_align_to_headings() {
    let records = vec![
        record(json!({"id": "CVE-1", "status": "affected"})),
        record(json!({"status": "fixed", "id": "CVE-2"})),
    ];

    let table = VulnerabilityTable::build(&records, ColumnPolicy::Accumulate);
    assert_eq!(table.rows()[1], strings(&["CVE-2", "fixed"]));
}

#[test]
fn test_accumulate_leaves_earlier_rows_short() {
    let records = vec![
        record(json!({"id": "CVE-1", "severity": "high"})),
        record(json!({"id": "CVE-2", "severity": "low", "fixed": "yes"})),
    ];

    let table = VulnerabilityTable::build(&records, ColumnPolicy::Accumulate);
    assert_eq!(table.display_headings(), strings(&["Id", "Severity", "Fixed"]));
    assert_eq!(table.rows()[0], strings(&["CVE-1", "high"]));
    assert_eq!(table.rows()[1], strings(&["CVE-2", "low", "yes"]));
}

#[test]
fn test_accumulate_backfills_known_headings_for_later_rows() {
    let records = vec![
        record(json!({"id": "CVE-1", "detail": "not built"})),
        record(json!({"id": "CVE-2", "fixed": "yes"})),
        record(json!({"id": "CVE-3"})),
    ];

    let table = VulnerabilityTable::build(&records, ColumnPolicy::Accumulate);
    assert_eq!(table.headings(), strings(&["id", "detail", "fixed"]).as_slice());
    assert_eq!(table.rows()[0], strings(&["CVE-1", "not built"]));
    assert_eq!(table.rows()[1], strings(&["CVE-2", "", "yes"]));
    assert_eq!(table.rows()[2], strings(&["CVE-3", "", ""]));
}

#[test]
fn test_union_gives_every_row_full_width() {
    let records = vec![
        record(json!({"id": "CVE-1", "severity": "high"})),
        record(json!({"id": "CVE-2", "severity": "low", "fixed": "yes"})),
    ];

    let table = VulnerabilityTable::build(&records, ColumnPolicy::Union);
    assert_eq!(table.display_headings(), strings(&["Id", "Severity", "Fixed"]));
    assert_eq!(table.rows()[0], strings(&["CVE-1", "high", ""]));
    assert_eq!(table.rows()[1], strings(&["CVE-2", "low", "yes"]));
}

#[test]
fn test_values_are_stringified() {
    let records = vec![record(json!({"id": "CVE-1", "score": 7.5, "refs": ["a", "b"], "note": null}))];

    let table = VulnerabilityTable::build(&records, ColumnPolicy::Accumulate);
    assert_eq!(table.rows()[0], strings(&["CVE-1", "7.5", "a, b", ""]));
}

#[test]
fn test_empty_input_produces_empty_table() {
    let table = VulnerabilityTable::build(&[], ColumnPolicy::Union);
    assert!(table.headings().is_empty());
    assert!(table.rows().is_empty());
}
