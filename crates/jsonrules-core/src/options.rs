//! # Validation Options
//!
//! Options are a plain struct passed by reference into every validation
//! call. They deserialize from YAML or JSON so tools can keep them in a
//! config file; unknown keys are rejected so a typo does not silently
//! disable a check.

use serde::{Deserialize, Serialize};

/// Configuration for one validation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationOptions {
    /// Reject any input key that has no matching field in the schema,
    /// at every nesting level. Off by default: unknown keys are ignored.
    pub closed_set: bool,

    /// Fail schema construction when two sibling fields share an external
    /// name. Off by default: the last declared field wins.
    pub deny_duplicate_names: bool,
}

impl ValidationOptions {
    /// Default options: open set, permissive duplicate names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `closed_set` enabled.
    pub fn closed_set(mut self) -> Self {
        self.closed_set = true;
        self
    }

    /// Returns a copy with `deny_duplicate_names` enabled.
    pub fn deny_duplicate_names(mut self) -> Self {
        self.deny_duplicate_names = true;
        self
    }
}
