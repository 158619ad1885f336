//! # Validation Config
//!
//! Loads [`ValidationOptions`] from a YAML or JSON file and applies
//! command-line overrides on top. Flags can only switch a check on.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use jsonrules_core::ValidationOptions;

/// Flags shared by every subcommand that builds schema tables.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Options file (YAML or JSON). Flags below override it.
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Reject keys that the schema does not declare.
    #[arg(long)]
    pub closed_set: bool,

    /// Fail when a record declares the same external name twice.
    #[arg(long)]
    pub deny_duplicate_names: bool,
}

impl OptionArgs {
    /// Resolve the effective options.
    pub fn resolve(&self) -> Result<ValidationOptions> {
        let mut options = match &self.config {
            Some(path) => load_options(path)?,
            None => ValidationOptions::default(),
        };
        options.closed_set |= self.closed_set;
        options.deny_duplicate_names |= self.deny_duplicate_names;
        tracing::debug!(?options, "effective validation options");
        Ok(options)
    }
}

/// Read options from `path`. `.json` files are parsed as JSON, everything
/// else as YAML.
pub fn load_options(path: &Path) -> Result<ValidationOptions> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading options file: {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let options = match ext {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("parsing options JSON: {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("parsing options YAML: {}", path.display()))?,
    };
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config() {
        let opts = OptionArgs::default().resolve().unwrap();
        assert_eq!(opts, ValidationOptions::default());
    }

    #[test]
    fn test_config_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opts.yaml");
        std::fs::write(&path, "deny_duplicate_names: true\n").unwrap();

        let args = OptionArgs {
            config: Some(path),
            closed_set: true,
            deny_duplicate_names: false,
        };
        let opts = args.resolve().unwrap();
        assert!(opts.closed_set);
        assert!(opts.deny_duplicate_names);
    }

    #[test]
    fn test_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opts.json");
        std::fs::write(&path, r#"{"closed_set": true}"#).unwrap();
        assert!(load_options(&path).unwrap().closed_set);
    }

    #[test]
    fn test_bad_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("opts.yaml");
        std::fs::write(&path, "closed: yes\n").unwrap();
        let err = load_options(&path).unwrap_err();
        assert!(format!("{err:#}").contains("opts.yaml"));
    }
}
