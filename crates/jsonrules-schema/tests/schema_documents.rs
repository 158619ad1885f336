//! Integration test: validate payloads against records declared in schema
//! documents rather than in Rust.

use jsonrules_schema::{
    validate_slice, validate_value, SchemaDocument, ValidationError, ValidationOptions,
};
use serde_json::json;

const SCHEMA: &str = r#"
root: TestStruct
records:
  TestStruct:
    fields:
      - ident: ID
        tag: "id"
        type: number
      - ident: NotNullID
        tag: "not_null_id,omitempty,not_null"
        type: number
      - ident: NotZeroID
        tag: "not_zero_id,not_zero"
        type: number
      - ident: RequiredID
        tag: "required_id,required"
        type: number
      - ident: Embed
        tag: "embed,required"
        type: "*Embed"
  Embed:
    fields:
      - ident: NotNullID
        tag: "not_null_id,omitempty,not_null"
        type: number
      - ident: NotZeroID
        tag: "not_zero_id,not_zero"
        type: number
      - ident: RequiredID
        tag: "required_id,required"
        type: number
"#;

#[test]
fn test_document_schema_matches_derived_semantics() {
    let schema = SchemaDocument::from_yaml_str(SCHEMA).unwrap().compile().unwrap();
    let root = schema.root().unwrap();
    let open = ValidationOptions::default();

    let ok = br#"{"id": null, "not_null_id": 0, "not_zero_id": 1, "required_id": 0,
                 "embed": {"not_null_id": 0, "not_zero_id": 1, "required_id": 0}}"#;
    validate_slice(ok, &root, &open).unwrap();

    let err = validate_slice(
        br#"{"required_id": 0, "embed": {"not_null_id": null, "required_id": 0}}"#,
        &root,
        &open,
    )
    .unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotNullViolation {
            path: "/embed".into(),
            field: "not_null_id".into(),
        }
    );

    let err = validate_value(
        &json!({"required_id": 0, "embed": null, "extra": true}),
        &root,
        &open.closed_set(),
    )
    .unwrap_err();
    assert_eq!(err.field(), Some("extra"));
}

#[test]
fn test_named_record_lookup() {
    let schema = SchemaDocument::from_yaml_str(SCHEMA).unwrap().compile().unwrap();
    let embed = schema.handle("Embed").unwrap();
    validate_value(&json!({"required_id": 1}), &embed, &ValidationOptions::default()).unwrap();
    assert!(schema.handle("Missing").is_err());
}

#[test]
fn test_duplicate_names_in_document() {
    let schema = SchemaDocument::from_yaml_str(
        r#"
root: A
records:
  A:
    fields:
      - ident: First
        tag: "x,required"
      - ident: Second
        tag: "x,not_zero"
"#,
    )
    .unwrap()
    .compile()
    .unwrap();
    let root = schema.root().unwrap();

    // Last declared wins: `x` is not_zero but no longer required.
    validate_value(&json!({}), &root, &ValidationOptions::default()).unwrap();
    let err = validate_value(&json!({"x": 0}), &root, &ValidationOptions::default()).unwrap_err();
    assert!(matches!(err, ValidationError::NotZeroViolation { .. }));

    let err = validate_value(
        &json!({}),
        &root,
        &ValidationOptions::default().deny_duplicate_names(),
    )
    .unwrap_err();
    assert!(matches!(err, ValidationError::Schema(_)), "{err}");
}
