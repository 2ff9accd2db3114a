//! Tests for decode module

use super::*;
use crate::error::Error;
use serde_json::json;
use std::io::Write;

#[test]
fn test_single_object() {
    let records = read_records(r#"{"id": 1, "name": "Alice"}"#.as_bytes()).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Alice");
}

#[test]
fn test_top_level_array() {
    let input = r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;
    let records = read_records(input.as_bytes()).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_empty_array() {
    let records = read_records("[]".as_bytes()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_empty_input() {
    let records = read_records("  \n".as_bytes()).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_json_lines() {
    let input = "{\"a\": 1}\n\n{\"a\": 2}\n[{\"a\": 3}]\n";
    let records = read_records(input.as_bytes()).unwrap();
    let values: Vec<_> = records.iter().map(|r| r["a"].clone()).collect();
    assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
}

#[test]
fn test_non_object_element() {
    let mut reader = RecordReader::new(r#"[{"a": 1}, 42, {"a": 2}]"#.as_bytes());

    assert!(reader.next().unwrap().is_ok());
    let err = reader.next().unwrap().unwrap_err();
    assert!(matches!(err, Error::NotAnObject { index: 1, .. }));
    // Shape errors do not end the stream
    assert!(reader.next().unwrap().is_ok());
    assert!(reader.next().is_none());
    assert_eq!(reader.records_read(), 3);
}

#[test]
fn test_parse_error_ends_stream() {
    let mut reader = RecordReader::new(r#"{"a": 1} {"a": "#.as_bytes());

    assert!(reader.next().unwrap().is_ok());
    assert!(matches!(reader.next(), Some(Err(Error::JsonParse(_)))));
    assert!(reader.next().is_none());
}

#[test]
fn test_open_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"[{{"x": true}}, {{"x": false}}]"#).unwrap();

    let records: Vec<_> = RecordReader::open(file.path())
        .unwrap()
        .collect::<crate::Result<_>>()
        .unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_open_missing_file() {
    let result = RecordReader::open("/nonexistent/records.json");
    assert!(matches!(result, Err(Error::FileNotFound { .. })));
}

#[test]
fn test_open_unreadable_path_is_io_error() {
    let file = tempfile::NamedTempFile::new().unwrap();
    // A regular file cannot have children
    let result = open_file(&file.path().join("records.json"));
    assert!(matches!(result, Err(Error::Io(_))));
}
