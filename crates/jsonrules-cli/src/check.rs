//! # Check Subcommand
//!
//! Validates JSON documents against a record from a schema document.
//!
//! ```bash
//! jsonrules check --schema orders.yaml order-1.json order-2.json
//! jsonrules check --schema orders.yaml --type Customer --closed-set customer.json
//! cat order.json | jsonrules check --schema orders.yaml -
//! ```
//!
//! Prints one line per document. Exit code 0 when every document passes,
//! 1 otherwise.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use jsonrules_schema::{validate_slice, ValidationError};

use crate::config::OptionArgs;

/// Arguments for the check subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schema document (YAML or JSON).
    #[arg(long)]
    pub schema: PathBuf,

    /// Record to validate against. Defaults to the document's root.
    #[arg(long = "type")]
    pub record: Option<String>,

    #[command(flatten)]
    pub options: OptionArgs,

    /// JSON documents to check. `-` reads standard input.
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,
}

/// Outcome for one document.
///
/// A failure is either a [`ValidationError`] or the error that kept the
/// document from being read.
#[derive(Debug)]
pub struct CheckOutcome {
    pub document: PathBuf,
    pub result: Result<()>,
}

impl CheckOutcome {
    /// The validation error, if the document was read and rejected.
    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.result.as_ref().err()?.downcast_ref()
    }
}

/// Execute the check subcommand.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let outcomes = check_documents(args)?;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("ok   {}", outcome.document.display()),
            Err(e) => println!("FAIL {}: {e:#}", outcome.document.display()),
        }
    }

    tracing::info!(total = outcomes.len(), failed, "check finished");
    Ok(if failed == 0 { 0 } else { 1 })
}

/// Validate every document named in `args`.
///
/// Read and validation failures are reported per document; only schema
/// document and option errors abort the run.
pub fn check_documents(args: &CheckArgs) -> Result<Vec<CheckOutcome>> {
    let options = args.options.resolve()?;
    let target = crate::load_target(&args.schema, args.record.as_deref())?;

    let outcomes = args
        .documents
        .iter()
        .map(|document| {
            let result = read_document(document)
                .and_then(|data| Ok(validate_slice(&data, &target, &options)?));
            if let Err(e) = &result {
                tracing::debug!(document = %document.display(), error = %format!("{e:#}"), "document failed");
            }
            CheckOutcome {
                document: document.clone(),
                result,
            }
        })
        .collect();
    Ok(outcomes)
}

fn read_document(path: &Path) -> Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("reading document from stdin")?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("reading document: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
root: Order
records:
  Order:
    fields:
      - ident: ID
        tag: "id,required,not_zero"
        type: number
      - ident: Customer
        tag: "customer"
        type: "?Customer"
  Customer:
    fields:
      - ident: Name
        tag: "name,required,not_null"
        type: string
"#;

    fn args(dir: &Path, docs: &[(&str, &str)], closed_set: bool) -> CheckArgs {
        let schema = dir.join("schema.yaml");
        std::fs::write(&schema, SCHEMA).unwrap();
        let documents = docs
            .iter()
            .map(|(name, body)| {
                let path = dir.join(name);
                std::fs::write(&path, body).unwrap();
                path
            })
            .collect();
        CheckArgs {
            schema,
            record: None,
            options: OptionArgs {
                closed_set,
                ..OptionArgs::default()
            },
            documents,
        }
    }

    #[test]
    fn test_reports_each_document() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(
            dir.path(),
            &[
                ("good.json", r#"{"id": 1, "customer": {"name": "ada"}}"#),
                ("bad.json", r#"{"id": 1, "customer": {"name": null}}"#),
            ],
            false,
        );

        let outcomes = check_documents(&args).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].result.is_ok());
        assert!(matches!(
            outcomes[1].validation_error(),
            Some(ValidationError::NotNullViolation { .. })
        ));
        assert_eq!(run_check(&args).unwrap(), 1);
    }

    #[test]
    fn test_closed_set_flag() {
        let dir = tempfile::tempdir().unwrap();
        let open = args(dir.path(), &[("doc.json", r#"{"id": 3, "note": "x"}"#)], false);
        assert_eq!(run_check(&open).unwrap(), 0);

        let closed = args(dir.path(), &[("doc.json", r#"{"id": 3, "note": "x"}"#)], true);
        let outcomes = check_documents(&closed).unwrap();
        assert!(matches!(
            outcomes[0].validation_error(),
            Some(ValidationError::RedundantField { .. })
        ));
    }

    #[test]
    fn test_named_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(dir.path(), &[("c.json", r#"{"name": "x"}"#)], true);
        args.record = Some("Customer".into());
        assert_eq!(run_check(&args).unwrap(), 0);

        args.record = Some("Nope".into());
        assert!(check_documents(&args).is_err());
    }

    #[test]
    fn test_unreadable_document_is_a_failed_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = args(
            dir.path(),
            &[("first.json", r#"{"id": 1}"#), ("last.json", r#"{"id": 2}"#)],
            false,
        );
        args.documents.insert(1, dir.path().join("absent.json"));

        let outcomes = check_documents(&args).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[2].result.is_ok());

        let err = outcomes[1].result.as_ref().unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
        assert!(outcomes[1].validation_error().is_none());
        assert_eq!(run_check(&args).unwrap(), 1);
    }

    #[test]
    fn test_invalid_json_is_a_failed_document() {
        let dir = tempfile::tempdir().unwrap();
        let args = args(dir.path(), &[("broken.json", "{\"id\": ")], false);
        let outcomes = check_documents(&args).unwrap();
        assert!(matches!(
            outcomes[0].validation_error(),
            Some(ValidationError::InvalidJson { .. })
        ));
    }
}
