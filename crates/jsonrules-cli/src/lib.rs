//! # jsonrules-cli — Command-Line Interface
//!
//! Checks JSON documents against records declared in schema documents.
//!
//! ## Subcommands
//!
//! - `check` — validate one or more JSON documents
//! - `describe` — print the field-rule table built for a record
//!
//! ## Crate Policy
//!
//! - Argument parsing lives beside each handler; handlers return an exit
//!   code and leave process exit to `main`.
//! - Validation logic lives in `jsonrules-schema`; nothing here
//!   reimplements a rule.

pub mod check;
pub mod config;
pub mod describe;

use std::path::Path;

use anyhow::{Context, Result};
use jsonrules_schema::{SchemaDocument, TypeHandle};

/// Load and compile the schema document at `path`, then resolve `record`
/// (or the document's root when `None`).
pub(crate) fn load_target(path: &Path, record: Option<&str>) -> Result<TypeHandle> {
    let schema = SchemaDocument::load(path)?
        .compile()
        .with_context(|| format!("compiling schema document: {}", path.display()))?;

    let target = match record {
        Some(name) => schema.handle(name)?,
        None => schema.root()?,
    };

    tracing::debug!(schema = %path.display(), record = %target.name(), "resolved target record");
    Ok(target)
}
