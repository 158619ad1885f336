//! # Tree Validator
//!
//! Walks a decoded JSON object against a [`SchemaTable`], recursing into
//! nested records. Each level runs two passes:
//!
//! 1. **Presence.** Every `required` field's key must exist. A `null` value
//!    counts as present.
//! 2. **Entries.** Every key in the object is checked against its field:
//!    unknown keys (closed-set only), `not_null`, `not_zero`, then descent
//!    into nested records.
//!
//! The first failure is returned unchanged; there is no aggregation.
//!
//! ## Depth
//!
//! Recursion depth equals the nesting depth of the input document. Type
//! graphs may be cyclic; bounding document depth is the caller's job.

use jsonrules_core::{
    is_zero_value, pointer_segment, FieldRule, SchemaError, ValidationError, ValidationOptions,
    ValueKind,
};
use serde_json::{Map, Value};

use crate::shape::{Described, TypeHandle};
use crate::table::SchemaTable;

/// Validate raw JSON bytes against the Rust type `T`.
///
/// ```
/// use jsonrules_schema::{validate, Record, ValidationOptions};
///
/// #[derive(Record)]
/// struct Login {
///     #[record("user,required,not_zero")]
///     user: String,
/// }
///
/// let opts = ValidationOptions::default();
/// assert!(validate::<Login>(br#"{"user": "ada"}"#, &opts).is_ok());
/// assert!(validate::<Login>(br#"{"user": ""}"#, &opts).is_err());
/// ```
///
/// # Errors
///
/// See [`validate_slice`].
pub fn validate<T: Described + ?Sized>(
    data: &[u8],
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    validate_slice(data, &TypeHandle::of::<T>(), options)
}

/// Validate raw JSON bytes against the type behind `target`.
///
/// # Errors
///
/// - [`ValidationError::InvalidJson`] if `data` is not JSON or its top-level
///   value is neither an object nor `null`. A top-level `null` is walked as
///   an empty object.
/// - [`ValidationError::InvalidObjectType`] if `target` is not a record.
/// - Any field-level error raised while walking the document.
pub fn validate_slice(
    data: &[u8],
    target: &TypeHandle,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    let value: Value = serde_json::from_slice(data).map_err(|e| ValidationError::InvalidJson {
        reason: e.to_string(),
    })?;
    validate_value(&value, target, options)
}

/// Validate an already decoded JSON value against the type behind `target`.
///
/// # Errors
///
/// Same as [`validate_slice`]; `InvalidJson` is raised only when `value`
/// is neither an object nor `null`.
pub fn validate_value(
    value: &Value,
    target: &TypeHandle,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    let empty;
    let map = match value {
        Value::Object(map) => map,
        // A top-level `null` decodes to an absent object.
        Value::Null => {
            empty = Map::new();
            &empty
        }
        other => {
            return Err(ValidationError::InvalidJson {
                reason: format!(
                    "top-level value must be an object, found {}",
                    ValueKind::of(other)
                ),
            });
        }
    };

    let table = SchemaTable::build(target, options).map_err(|e| match e {
        SchemaError::InvalidSchemaType { type_name } => {
            ValidationError::InvalidObjectType { type_name }
        }
        other => ValidationError::Schema(other),
    })?;

    validate_tree(map, &table, options).map_err(|e| {
        tracing::debug!(record = %table.type_name(), error = %e, "document rejected");
        e
    })
}

/// Validate one JSON object against a prebuilt table, recursing into nested
/// records.
///
/// # Errors
///
/// The first rule violation found, or a [`ValidationError::Schema`] error if
/// a nested table cannot be built.
pub fn validate_tree(
    map: &Map<String, Value>,
    table: &SchemaTable,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    walk(map, table, options, "")
}

fn walk(
    map: &Map<String, Value>,
    table: &SchemaTable,
    options: &ValidationOptions,
    path: &str,
) -> Result<(), ValidationError> {
    tracing::trace!(path, record = %table.type_name(), keys = map.len(), "validating object");

    for field in table.fields() {
        if field.has(FieldRule::Required) && !map.contains_key(&field.external_name) {
            return Err(ValidationError::RequiredFieldMissing {
                path: path.to_string(),
                field: field.external_name.clone(),
            });
        }
    }

    for (key, value) in map {
        let Some(field) = table.get(key) else {
            if options.closed_set {
                return Err(ValidationError::RedundantField {
                    path: path.to_string(),
                    field: key.clone(),
                });
            }
            continue;
        };

        if field.has(FieldRule::NotNull) && value.is_null() {
            return Err(ValidationError::NotNullViolation {
                path: path.to_string(),
                field: key.clone(),
            });
        }

        if field.has(FieldRule::NotZero) && is_zero_value(value) {
            return Err(ValidationError::NotZeroViolation {
                path: path.to_string(),
                field: key.clone(),
            });
        }

        let Some(nested) = &field.nested_type else {
            continue;
        };

        match value {
            Value::Null => {}
            Value::Object(child) => {
                let child_table = SchemaTable::build(nested, options)?;
                let child_path = format!("{path}/{}", pointer_segment(key));
                walk(child, &child_table, options, &child_path)?;
            }
            other => {
                return Err(ValidationError::TypeMismatch {
                    path: path.to_string(),
                    field: key.clone(),
                    expected: ValueKind::Object,
                    actual: ValueKind::of(other),
                });
            }
        }
    }

    Ok(())
}
