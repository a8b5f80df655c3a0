//! Parsing behaviour for partial and malformed dataset documents.

use yijing_dataset::{Dataset, DatasetError, Table};

#[test]
fn missing_bagua_table_is_an_error() {
    let err = Dataset::from_json(r#"{ "hexagrams": { "1": { "name": "乾", "binary": "111111" } } }"#)
        .unwrap_err();
    assert!(matches!(err, DatasetError::MissingTable("bagua")));
}

#[test]
fn missing_hexagram_table_is_an_error() {
    let err = Dataset::from_json(r#"{ "bagua": {} }"#).unwrap_err();
    assert!(matches!(err, DatasetError::MissingTable("hexagrams")));
}

#[test]
fn empty_hexagram_table_is_an_error() {
    let err = Dataset::from_json(r#"{ "bagua": {}, "hexagrams": {} }"#).unwrap_err();
    assert!(matches!(err, DatasetError::Empty));
}

#[test]
fn invalid_json_is_an_error() {
    let err = Dataset::from_json("{ not json").unwrap_err();
    assert!(matches!(err, DatasetError::Json(_)));
}

#[test]
fn unreadable_entries_are_rejected_not_fatal() {
    let doc = r#"{
        "bagua": {
            "乾": { "binary": "111" },
            "坤": { "symbol": "☷" }
        },
        "hexagrams": {
            "1": { "name": "乾", "binary": "111111" },
            "2": { "binary": "000000" },
            "3": 42
        }
    }"#;
    let dataset = Dataset::from_json(doc).unwrap();
    assert_eq!(dataset.trigram_count(), 1);
    assert_eq!(dataset.hexagram_count(), 1);

    let rejected: Vec<(Table, &str)> = dataset
        .rejected
        .iter()
        .map(|r| (r.table, r.key.as_str()))
        .collect();
    assert_eq!(
        rejected,
        vec![
            (Table::Bagua, "坤"),
            (Table::Hexagrams, "2"),
            (Table::Hexagrams, "3")
        ]
    );
}

#[test]
fn all_entries_rejected_means_empty() {
    let doc = r#"{ "bagua": {}, "hexagrams": { "1": { "binary": "111111" } } }"#;
    assert!(matches!(Dataset::from_json(doc), Err(DatasetError::Empty)));
}

#[test]
fn insertion_order_is_kept() {
    let doc = r#"{
        "bagua": {
            "坤": { "binary": "000" },
            "乾": { "binary": "111" }
        },
        "hexagrams": {
            "12": { "name": "否", "binary": "111000" },
            "11": { "name": "泰", "binary": "000111" }
        }
    }"#;
    let dataset = Dataset::from_json(doc).unwrap();
    let names: Vec<&str> = dataset.trigrams.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["坤", "乾"]);
    let keys: Vec<&str> = dataset.hexagrams.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["12", "11"]);
}

#[test]
fn missing_file_reports_path() {
    let path = std::path::Path::new("/nonexistent/yijing/hexagrams.json");
    match Dataset::from_path(path) {
        Err(DatasetError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io error, got {other:?}"),
    }
}
