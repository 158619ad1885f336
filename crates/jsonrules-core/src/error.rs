//! # Error Types — Validation Error Taxonomy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Every error is terminal. Validation stops at the first failure and
//!   returns it unchanged, across any number of nested descents.
//! - Field-level errors carry the JSON Pointer of the object that holds the
//!   offending key (`""` for the document root) and the key itself.
//! - Schema construction errors are kept in their own enum so the schema
//!   builder can be used without a document.

use thiserror::Error;

use crate::value::ValueKind;

/// Error while building a schema table from a type description.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The type is not a record after unwrapping optional and indirection
    /// layers.
    #[error("invalid schema type '{type_name}': not a record")]
    InvalidSchemaType {
        /// Name of the offending type.
        type_name: String,
    },

    /// Two sibling fields share an external name and duplicates are denied.
    #[error("record '{type_name}' declares external name '{name}' more than once")]
    DuplicateExternalName {
        /// Record declaring the duplicate.
        type_name: String,
        /// The repeated external name.
        name: String,
    },
}

/// Error returned by a validation call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input bytes are not JSON, or the top-level value is neither an
    /// object nor `null`.
    #[error("invalid json: {reason}")]
    InvalidJson {
        /// Decoder message or shape description.
        reason: String,
    },

    /// The target type is not a record after unwrapping.
    #[error("invalid object type '{type_name}': not a record")]
    InvalidObjectType {
        /// Name of the target type.
        type_name: String,
    },

    /// A nested schema could not be built.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// A `required` field's key is absent.
    #[error("{}: field '{field}' is required", display_path(.path))]
    RequiredFieldMissing {
        /// JSON Pointer of the enclosing object.
        path: String,
        /// External name of the missing field.
        field: String,
    },

    /// A `not_null` field is `null`.
    #[error("{}: field '{field}' cannot be null", display_path(.path))]
    NotNullViolation {
        /// JSON Pointer of the enclosing object.
        path: String,
        /// Offending key.
        field: String,
    },

    /// A `not_zero` field is `null` or the zero value of its kind.
    #[error("{}: field '{field}' cannot be zero", display_path(.path))]
    NotZeroViolation {
        /// JSON Pointer of the enclosing object.
        path: String,
        /// Offending key.
        field: String,
    },

    /// An input key has no schema field and closed-set mode is on.
    #[error("{}: redundant field '{field}'", display_path(.path))]
    RedundantField {
        /// JSON Pointer of the enclosing object.
        path: String,
        /// The unknown key.
        field: String,
    },

    /// A nested-record field holds a non-null value that is not an object.
    #[error("{}: invalid field '{field}', expected {expected} but got {actual}", display_path(.path))]
    TypeMismatch {
        /// JSON Pointer of the enclosing object.
        path: String,
        /// Offending key.
        field: String,
        /// Kind the schema expects.
        expected: ValueKind,
        /// Kind found in the document.
        actual: ValueKind,
    },
}

impl ValidationError {
    /// The offending key, for field-level errors.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::RequiredFieldMissing { field, .. }
            | Self::NotNullViolation { field, .. }
            | Self::NotZeroViolation { field, .. }
            | Self::RedundantField { field, .. }
            | Self::TypeMismatch { field, .. } => Some(field),
            Self::InvalidJson { .. } | Self::InvalidObjectType { .. } | Self::Schema(_) => None,
        }
    }

    /// JSON Pointer of the object holding the offending key, for
    /// field-level errors.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::RequiredFieldMissing { path, .. }
            | Self::NotNullViolation { path, .. }
            | Self::NotZeroViolation { path, .. }
            | Self::RedundantField { path, .. }
            | Self::TypeMismatch { path, .. } => Some(path),
            Self::InvalidJson { .. } | Self::InvalidObjectType { .. } | Self::Schema(_) => None,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_path_display() {
        let e = ValidationError::RequiredFieldMissing {
            path: String::new(),
            field: "required_id".into(),
        };
        assert_eq!(e.to_string(), "(root): field 'required_id' is required");
    }

    #[test]
    fn test_nested_path_display() {
        let e = ValidationError::TypeMismatch {
            path: "/embed".into(),
            field: "inner".into(),
            expected: ValueKind::Object,
            actual: ValueKind::String,
        };
        assert_eq!(
            e.to_string(),
            "/embed: invalid field 'inner', expected object but got string"
        );
    }

    #[test]
    fn test_field_accessors() {
        let e = ValidationError::NotZeroViolation {
            path: "/a".into(),
            field: "b".into(),
        };
        assert_eq!(e.field(), Some("b"));
        assert_eq!(e.path(), Some("/a"));

        let e = ValidationError::InvalidJson {
            reason: "eof".into(),
        };
        assert_eq!(e.field(), None);
        assert_eq!(e.path(), None);
    }

    #[test]
    fn test_schema_error_converts() {
        let e: ValidationError = SchemaError::InvalidSchemaType {
            type_name: "i64".into(),
        }
        .into();
        assert!(matches!(e, ValidationError::Schema(_)));
        assert!(e.to_string().contains("i64"));
    }
}
