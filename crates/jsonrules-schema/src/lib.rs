//! # jsonrules-schema — Schema Builder & Tree Validator
//!
//! Checks a JSON payload against the field rules declared on a record type
//! without deserializing into that type.
//!
//! ## Type Descriptions (`shape`)
//!
//! The [`shape`] module defines [`Described`], [`TypeHandle`] and [`Shape`].
//! Rust types describe themselves through `#[derive(Record)]`; schema
//! documents describe records at runtime.
//!
//! ## Schema Builder (`table`)
//!
//! [`SchemaTable::build`] turns a type handle into a field-rule table keyed
//! by external name.
//!
//! ## Tree Validator (`validate`)
//!
//! [`validate`], [`validate_slice`] and [`validate_value`] decode the input,
//! build the table, and walk the object tree with fail-fast semantics.
//!
//! ## Schema Documents (`document`)
//!
//! [`SchemaDocument`] loads record declarations from YAML or JSON and
//! compiles them into a [`DocumentSchema`] that hands out type handles.
//!
//! ## Example
//!
//! ```
//! use jsonrules_schema::{validate, Record, ValidationError, ValidationOptions};
//!
//! #[derive(Record)]
//! struct Embed {
//!     #[record("not_null_id,omitempty,not_null")]
//!     not_null_id: i64,
//!     #[record("not_zero_id,not_zero")]
//!     not_zero_id: i64,
//!     #[record("required_id,required")]
//!     required_id: i64,
//! }
//!
//! #[derive(Record)]
//! struct Payload {
//!     #[record("id")]
//!     id: i64,
//!     #[record("required_id,required")]
//!     required_id: i64,
//!     #[record("embed,required")]
//!     embed: Embed,
//! }
//!
//! let opts = ValidationOptions::default();
//! let ok = br#"{"id": null, "required_id": 0,
//!              "embed": {"not_null_id": 0, "not_zero_id": 1, "required_id": 0}}"#;
//! assert!(validate::<Payload>(ok, &opts).is_ok());
//!
//! let err = validate::<Payload>(br#"{"required_id": 0, "embed": {}}"#, &opts).unwrap_err();
//! assert!(matches!(err, ValidationError::RequiredFieldMissing { .. }));
//! ```

pub mod document;
pub mod shape;
pub mod table;
pub mod validate;

pub use document::{DocumentError, DocumentSchema, FieldDef, RecordDef, SchemaDocument};
pub use shape::{Described, FieldDecl, LeafKind, RecordShape, Shape, TypeHandle, TypeInfo};
pub use table::{FieldDescriptor, SchemaTable};
pub use validate::{validate, validate_slice, validate_tree, validate_value};

pub use jsonrules_core::{
    FieldAnnotation, FieldRule, SchemaError, ValidationError, ValidationOptions, ValueKind,
};

#[cfg(feature = "derive")]
pub use jsonrules_derive::Record;
