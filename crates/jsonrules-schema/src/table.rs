//! # Schema Builder
//!
//! Turns a type description into a [`SchemaTable`]: for each field declared
//! on the record, its external name, its rule set, and its nested record
//! type if it has one.
//!
//! Tables are rebuilt on every call and on every nested descent. Nothing is
//! cached, so a table never outlives the validation that built it.

use std::collections::HashMap;

use jsonrules_core::{FieldAnnotation, FieldRule, RuleSet, SchemaError, ValidationOptions};
use serde::Serialize;

use crate::shape::TypeHandle;

/// Rules and nesting information for one field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDescriptor {
    /// Identifier of the field in the declaring type.
    pub ident: String,
    /// Key of the field in the JSON document.
    pub external_name: String,
    /// Declared rules.
    pub rules: RuleSet,
    /// Set only when the field's type is a record, possibly behind
    /// optional or pointer-like layers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nested_type: Option<TypeHandle>,
}

impl FieldDescriptor {
    pub fn has(&self, rule: FieldRule) -> bool {
        self.rules.contains(&rule)
    }
}

/// Field-rule table for one record type, keyed by external name.
///
/// Iteration follows declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct SchemaTable {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl SchemaTable {
    /// Build the table for `target`.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::InvalidSchemaType`] if `target` is not a record after
    ///   unwrapping every optional or indirection layer.
    /// - [`SchemaError::DuplicateExternalName`] if two fields share an
    ///   external name and `options.deny_duplicate_names` is set. Otherwise
    ///   the later field replaces the earlier one.
    pub fn build(target: &TypeHandle, options: &ValidationOptions) -> Result<Self, SchemaError> {
        let record = target.record().ok_or_else(|| SchemaError::InvalidSchemaType {
            type_name: target.name(),
        })?;

        let mut table = Self {
            type_name: record.name,
            fields: Vec::with_capacity(record.fields.len()),
            index: HashMap::with_capacity(record.fields.len()),
        };

        for decl in record.fields {
            let annotation = FieldAnnotation::parse(&decl.ident, decl.annotation.as_deref());
            let nested_type = decl.ty.is_record().then_some(decl.ty);
            let descriptor = FieldDescriptor {
                ident: decl.ident,
                external_name: annotation.external_name,
                rules: annotation.rules,
                nested_type,
            };
            table.insert(descriptor, options)?;
        }

        Ok(table)
    }

    fn insert(
        &mut self,
        descriptor: FieldDescriptor,
        options: &ValidationOptions,
    ) -> Result<(), SchemaError> {
        match self.index.get(&descriptor.external_name) {
            Some(&slot) => {
                if options.deny_duplicate_names {
                    return Err(SchemaError::DuplicateExternalName {
                        type_name: self.type_name.clone(),
                        name: descriptor.external_name,
                    });
                }
                tracing::warn!(
                    record = %self.type_name,
                    name = %descriptor.external_name,
                    replaced = %self.fields[slot].ident,
                    by = %descriptor.ident,
                    "duplicate external name, last declared field wins"
                );
                self.fields[slot] = descriptor;
            }
            None => {
                self.index
                    .insert(descriptor.external_name.clone(), self.fields.len());
                self.fields.push(descriptor);
            }
        }
        Ok(())
    }

    /// Name of the record this table describes.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Look up a field by external name.
    pub fn get(&self, external_name: &str) -> Option<&FieldDescriptor> {
        self.index.get(external_name).map(|&slot| &self.fields[slot])
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
