//! # Field Rules and Field Annotations
//!
//! A field annotation is a comma-separated declaration attached to a record
//! field:
//!
//! ```text
//! "not_null_id,omitempty,not_null"
//!  ^^^^^^^^^^^ ^^^^^^^^^ ^^^^^^^^
//!  external    ignored   rule
//!  name
//! ```
//!
//! The first token is the external (serialized) name. An empty first token
//! falls back to the field identifier. The remaining tokens are trimmed and
//! matched against the known rule names; anything else is ignored.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A single per-field constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRule {
    /// The field's key must be present in the input object. A `null` value
    /// still counts as present.
    Required,
    /// The field's value, when present, must not be `null`.
    NotNull,
    /// The field's value, when present, must be neither `null` nor the zero
    /// value of its own kind.
    NotZero,
}

impl FieldRule {
    /// Returns every rule in declaration order.
    pub fn all() -> &'static [FieldRule] {
        &[Self::Required, Self::NotNull, Self::NotZero]
    }

    /// Returns the annotation token for this rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::NotNull => "not_null",
            Self::NotZero => "not_zero",
        }
    }
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a token does not name a [`FieldRule`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRule(pub String);

impl fmt::Display for UnknownRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field rule: {}", self.0)
    }
}

impl std::error::Error for UnknownRule {}

impl FromStr for FieldRule {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(Self::Required),
            "not_null" => Ok(Self::NotNull),
            "not_zero" => Ok(Self::NotZero),
            other => Err(UnknownRule(other.to_string())),
        }
    }
}

/// Order-insensitive set of rules. Duplicates collapse.
pub type RuleSet = BTreeSet<FieldRule>;

/// The parsed form of a field annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAnnotation {
    /// Key used for the field in the JSON document.
    pub external_name: String,
    /// Rules declared on the field.
    pub rules: RuleSet,
}

impl FieldAnnotation {
    /// Parse an annotation for the field named `ident`.
    ///
    /// `None` behaves like an empty annotation: the external name is the
    /// identifier and no rules apply.
    pub fn parse(ident: &str, annotation: Option<&str>) -> Self {
        let annotation = annotation.unwrap_or("");
        let mut tokens = annotation.split(',');

        let external_name = match tokens.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => ident.to_string(),
        };

        let rules = tokens
            .filter_map(|token| token.trim().parse::<FieldRule>().ok())
            .collect();

        Self {
            external_name,
            rules,
        }
    }

    /// Returns true if `rule` was declared.
    pub fn has(&self, rule: FieldRule) -> bool {
        self.rules.contains(&rule)
    }
}
