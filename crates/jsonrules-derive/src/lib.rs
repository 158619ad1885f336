//! Derive macro that describes a struct to the jsonrules schema builder.
//!
//! `#[derive(Record)]` implements `jsonrules_schema::Described` for a struct
//! with named fields. Each field is declared with its identifier, its
//! annotation and a handle to its type:
//!
//! ```ignore
//! use jsonrules_schema::Record;
//!
//! #[derive(Record)]
//! struct Payload {
//!     #[record("id")]
//!     id: i64,
//!     #[record("required_id,required")]
//!     required_id: i64,
//!     #[record("embed,required")]
//!     embed: Embed,
//!     #[record(skip)]
//!     cache: Vec<u8>,
//! }
//! ```
//!
//! # Field attributes
//!
//! - `#[record("name,rule,...")]` - annotation parsed by the schema builder.
//!   An empty name (`",required"`) falls back to the serde name, then to the
//!   field identifier.
//! - `#[record(skip)]` - leave the field out of the record.
//! - `#[record(opaque)]` or `#[record("name,rule,...", opaque)]` - keep the
//!   field and its rules, but do not require its type to implement
//!   `Described`. The value is treated as any JSON value.
//!
//! A generic record's type name includes its type arguments, e.g.
//! `Envelope<Embed>`.
//!
//! Without a `#[record]` attribute, `#[serde(rename = "...")]` supplies the
//! external name and `#[serde(skip)]` / `#[serde(skip_deserializing)]` leave
//! the field out.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod record;

/// Derive `jsonrules_schema::Described` for a struct with named fields.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::derive(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
