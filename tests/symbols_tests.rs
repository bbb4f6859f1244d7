// tests/symbols_tests.rs

use rulengine::convert::json_to_value;
use rulengine::{Record, SymbolError, SymbolTable, Value};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct Arg {
    #[serde(rename = "S")]
    s: i64,
}

#[derive(Serialize)]
struct Wrap {
    #[serde(rename = "Arg")]
    arg: Arg,
}

// ============================================================================
// Bindings
// ============================================================================

#[test]
fn test_later_writes_win() {
    let table = SymbolTable::new().with_int("x", 1).with_string("x", "one");
    assert_eq!(table.get("x"), Some(&Value::String("one".into())));
}

#[test]
fn test_merge_is_right_biased() {
    let global = SymbolTable::new().with_int("limit", 10).with_int("only_global", 1);
    let call = SymbolTable::new().with_int("limit", 20);

    let merged = global.merged(&call);
    assert_eq!(merged.get("limit"), Some(&Value::Integer(20)));
    assert_eq!(merged.get("only_global"), Some(&Value::Integer(1)));
    assert_eq!(global.get("limit"), Some(&Value::Integer(10)));
}

#[test]
fn test_append_overwrites_in_place() {
    let mut table = SymbolTable::new().with_int("a", 1);
    table.append(&SymbolTable::new().with_int("a", 2).with_bool("b", true));
    assert_eq!(table.len(), 2);
    assert_eq!(table.get("a"), Some(&Value::Integer(2)));
}

// ============================================================================
// Records
// ============================================================================

#[test]
fn test_struct_exposes_field_names() {
    let table = SymbolTable::new().with_struct("arg", &Arg { s: 100 }).unwrap();
    let record = table.get("arg").and_then(Value::as_record).unwrap();
    assert_eq!(record.get("S"), Some(&Value::Integer(100)));
    assert_eq!(table.get("S"), Some(&Value::String("S".into())));
}

#[test]
fn test_nested_struct_becomes_nested_record() {
    let table = SymbolTable::new()
        .with_struct("ws", &Wrap { arg: Arg { s: 7 } })
        .unwrap();
    let inner = table
        .get("ws")
        .and_then(Value::as_record)
        .and_then(|r| r.get("Arg"))
        .and_then(Value::as_record)
        .unwrap();
    assert_eq!(inner.get("S"), Some(&Value::Integer(7)));
}

#[test]
fn test_non_struct_is_rejected_eagerly() {
    let err = SymbolTable::new().with_struct("n", &5).unwrap_err();
    assert_eq!(
        err,
        SymbolError::NotARecord {
            name: "n".into(),
            found: "number"
        }
    );
}

#[test]
fn test_invalid_field_name_is_rejected() {
    let record = Record::new().with_field("not valid", 1);
    let err = SymbolTable::new().with_record("r", record).unwrap_err();
    assert_eq!(err, SymbolError::InvalidFieldName("not valid".into()));
}

// ============================================================================
// JSON conversion
// ============================================================================

#[test]
fn test_nested_objects_become_records() {
    let value = json_to_value(json!({"user": {"age": 3, "score": 1.5}}), "").unwrap();
    let user = value.as_record().unwrap().get("user").unwrap();
    assert_eq!(user.as_record().unwrap().get("age"), Some(&Value::Integer(3)));
    assert_eq!(user.as_record().unwrap().get("score"), Some(&Value::Float(1.5)));
}

#[test]
fn test_array_reports_path() {
    let err = json_to_value(json!({"user": {"tags": []}}), "").unwrap_err();
    assert_eq!(
        err,
        SymbolError::UnsupportedField {
            path: "user.tags".into(),
            kind: "array"
        }
    );
}
