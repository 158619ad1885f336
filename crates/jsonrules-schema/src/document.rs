//! # Schema Documents
//!
//! Records declared in a YAML or JSON file instead of in Rust. A document
//! names its records and, for each field, the identifier, the annotation
//! and a type expression:
//!
//! ```yaml
//! root: Order
//! records:
//!   Order:
//!     fields:
//!       - ident: ID
//!         tag: "id,required,not_zero"
//!         type: number
//!       - ident: Customer
//!         tag: "customer,required"
//!         type: Customer
//!       - ident: Parent
//!         tag: "parent"
//!         type: "?Order"
//!   Customer:
//!     fields:
//!       - ident: Name
//!         tag: "name,not_zero"
//!         type: string
//! ```
//!
//! ## Type Expressions
//!
//! | Expression | Meaning |
//! |------------|---------|
//! | `bool`, `number`, `string`, `array`, `object`, `any` | leaf kinds |
//! | `integer`, `float`, `boolean`, `map` | aliases |
//! | `Name` | a record declared in the same document |
//! | `?T`, `*T` | optional / indirection layer around `T` |
//! | `[]T` | sequence of `T` (elements are not validated) |
//!
//! Every record reference is resolved when the document is compiled, so a
//! [`DocumentSchema`] never holds a dangling name. Records may refer to
//! themselves or to each other.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shape::{FieldDecl, LeafKind, RecordShape, Shape, TypeHandle, TypeInfo};

/// Error loading or compiling a schema document.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The document file could not be read.
    #[error("cannot read schema document '{path}': {reason}")]
    Load {
        /// Path of the document.
        path: String,
        /// Underlying IO error message.
        reason: String,
    },

    /// The document is not valid YAML or JSON, or does not match the
    /// document format.
    #[error("invalid schema document: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },

    /// A field's type expression is empty or malformed.
    #[error("record '{record}' field '{field}': invalid type expression '{expr}'")]
    InvalidTypeExpr {
        record: String,
        field: String,
        expr: String,
    },

    /// A field refers to a record the document does not declare.
    #[error("record '{record}' field '{field}': unknown type '{type_name}'")]
    UnknownType {
        record: String,
        field: String,
        type_name: String,
    },

    /// A lookup named a record the document does not declare.
    #[error("unknown record '{name}'")]
    UnknownRecord { name: String },

    /// No record was named and the document has no `root`.
    #[error("schema document declares no root record")]
    NoRoot,
}

/// Serialized form of a schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Record used when no type is named explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Records by name.
    #[serde(default)]
    pub records: BTreeMap<String, RecordDef>,
}

/// Serialized form of one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordDef {
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// Serialized form of one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    /// Identifier, used as the external name when the tag gives none.
    pub ident: String,
    /// Annotation, e.g. `"embed,required"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Type expression. Defaults to `any`.
    #[serde(rename = "type", default = "default_type")]
    pub ty: String,
}

fn default_type() -> String {
    "any".to_string()
}

impl SchemaDocument {
    /// Parse a YAML document. JSON is a subset of YAML and is accepted too.
    pub fn from_yaml_str(source: &str) -> Result<Self, DocumentError> {
        serde_yaml::from_str(source).map_err(|e| DocumentError::Parse {
            reason: e.to_string(),
        })
    }

    /// Parse a JSON document.
    pub fn from_json_str(source: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(source).map_err(|e| DocumentError::Parse {
            reason: e.to_string(),
        })
    }

    /// Load a document from disk. `.json` files are parsed as JSON,
    /// everything else as YAML.
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path).map_err(|e| DocumentError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "json" => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Resolve every type expression and produce a schema that hands out
    /// [`TypeHandle`]s.
    pub fn compile(self) -> Result<DocumentSchema, DocumentError> {
        let mut records = BTreeMap::new();

        for (name, def) in &self.records {
            let mut fields = Vec::with_capacity(def.fields.len());
            for field in &def.fields {
                let expr = TypeExpr::parse(&field.ty).ok_or_else(|| {
                    DocumentError::InvalidTypeExpr {
                        record: name.clone(),
                        field: field.ident.clone(),
                        expr: field.ty.clone(),
                    }
                })?;
                if let Some(missing) = expr.record_name().filter(|r| !self.records.contains_key(*r))
                {
                    return Err(DocumentError::UnknownType {
                        record: name.clone(),
                        field: field.ident.clone(),
                        type_name: missing.to_string(),
                    });
                }
                fields.push(CompiledField {
                    ident: field.ident.clone(),
                    tag: field.tag.clone(),
                    expr,
                });
            }
            records.insert(name.clone(), fields);
        }

        if let Some(root) = &self.root {
            if !records.contains_key(root) {
                return Err(DocumentError::UnknownRecord { name: root.clone() });
            }
        }

        tracing::debug!(records = records.len(), root = ?self.root, "compiled schema document");

        Ok(DocumentSchema {
            inner: Arc::new(Compiled {
                root: self.root,
                records,
            }),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeExpr {
    Leaf(LeafKind),
    Record(String),
    Indirect(Box<TypeExpr>),
    Sequence(Box<TypeExpr>),
}

impl TypeExpr {
    fn parse(source: &str) -> Option<Self> {
        let source = source.trim();
        if let Some(rest) = source.strip_prefix('?').or_else(|| source.strip_prefix('*')) {
            return Self::parse(rest).map(|inner| Self::Indirect(Box::new(inner)));
        }
        if let Some(rest) = source.strip_prefix("[]") {
            return Self::parse(rest).map(|inner| Self::Sequence(Box::new(inner)));
        }

        let leaf = match source {
            "" => return None,
            "bool" | "boolean" => LeafKind::Bool,
            "number" | "integer" | "float" => LeafKind::Number,
            "string" => LeafKind::String,
            "array" => LeafKind::Sequence,
            "object" | "map" => LeafKind::Map,
            "any" => LeafKind::Any,
            name if name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.') => {
                return Some(Self::Record(name.to_string()));
            }
            _ => return None,
        };
        Some(Self::Leaf(leaf))
    }

    /// The record named by this expression, including inside sequences.
    fn record_name(&self) -> Option<&str> {
        match self {
            Self::Leaf(_) => None,
            Self::Record(name) => Some(name),
            Self::Indirect(inner) | Self::Sequence(inner) => inner.record_name(),
        }
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(LeafKind::Bool) => f.write_str("bool"),
            Self::Leaf(LeafKind::Number) => f.write_str("number"),
            Self::Leaf(LeafKind::String) => f.write_str("string"),
            Self::Leaf(LeafKind::Sequence) => f.write_str("array"),
            Self::Leaf(LeafKind::Map) => f.write_str("object"),
            Self::Leaf(LeafKind::Any) => f.write_str("any"),
            Self::Record(name) => f.write_str(name),
            Self::Indirect(inner) => write!(f, "?{inner}"),
            Self::Sequence(inner) => write!(f, "[]{inner}"),
        }
    }
}

#[derive(Debug)]
struct CompiledField {
    ident: String,
    tag: Option<String>,
    expr: TypeExpr,
}

#[derive(Debug)]
struct Compiled {
    root: Option<String>,
    records: BTreeMap<String, Vec<CompiledField>>,
}

/// A compiled schema document. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DocumentSchema {
    inner: Arc<Compiled>,
}

impl DocumentSchema {
    /// Handle for the record called `name`.
    pub fn handle(&self, name: &str) -> Result<TypeHandle, DocumentError> {
        if !self.inner.records.contains_key(name) {
            return Err(DocumentError::UnknownRecord {
                name: name.to_string(),
            });
        }
        Ok(self.handle_for(TypeExpr::Record(name.to_string())))
    }

    /// Handle for the document's `root` record.
    pub fn root(&self) -> Result<TypeHandle, DocumentError> {
        let root = self.inner.root.as_deref().ok_or(DocumentError::NoRoot)?;
        self.handle(root)
    }

    /// Names of all declared records, sorted.
    pub fn record_names(&self) -> Vec<&str> {
        self.inner.records.keys().map(String::as_str).collect()
    }

    fn handle_for(&self, expr: TypeExpr) -> TypeHandle {
        TypeHandle::new(DocumentType {
            schema: Arc::clone(&self.inner),
            expr,
        })
    }
}

struct DocumentType {
    schema: Arc<Compiled>,
    expr: TypeExpr,
}

impl DocumentType {
    fn child(&self, expr: TypeExpr) -> TypeHandle {
        TypeHandle::new(DocumentType {
            schema: Arc::clone(&self.schema),
            expr,
        })
    }
}

impl TypeInfo for DocumentType {
    fn type_name(&self) -> String {
        self.expr.to_string()
    }

    fn shape(&self) -> Shape {
        match &self.expr {
            TypeExpr::Leaf(kind) => Shape::Leaf(*kind),
            TypeExpr::Sequence(_) => Shape::Leaf(LeafKind::Sequence),
            TypeExpr::Indirect(inner) => Shape::Indirect(self.child((**inner).clone())),
            TypeExpr::Record(name) => match self.schema.records.get(name) {
                Some(fields) => Shape::Record(RecordShape::new(
                    name.clone(),
                    fields
                        .iter()
                        .map(|f| FieldDecl::new(&f.ident, f.tag.as_deref(), self.child(f.expr.clone())))
                        .collect(),
                )),
                // References are checked at compile time.
                None => Shape::Leaf(LeafKind::Any),
            },
        }
    }
}
