//! # jsonrules-core — Foundational Types for jsonrules
//!
//! This crate is the leaf of the jsonrules workspace. It defines the
//! vocabulary shared by the schema builder, the tree validator, the derive
//! macro and the CLI:
//!
//! 1. **`FieldRule`.** The closed set of per-field rules: `required`,
//!    `not_null`, `not_zero`. Unknown annotation tokens are ignored, never
//!    rejected.
//!
//! 2. **`FieldAnnotation`.** The parsed form of a comma-separated field
//!    declaration such as `"embed,required,not_null"`.
//!
//! 3. **`ValueKind`.** A name for each variant of `serde_json::Value`, plus
//!    the zero-value test used by `not_zero`.
//!
//! 4. **`ValidationOptions`.** Plain configuration passed by reference.
//!
//! 5. **`ValidationError` / `SchemaError`.** The terminal, first-failure-wins
//!    error taxonomy.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsonrules-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod options;
pub mod rule;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use error::{SchemaError, ValidationError};
pub use options::ValidationOptions;
pub use rule::{FieldAnnotation, FieldRule, RuleSet};
pub use value::{is_zero_value, pointer_segment, ValueKind};
