//! # Describe Subcommand
//!
//! Prints the field-rule table the schema builder derives for a record, as
//! pretty JSON. Useful for checking how annotations were read.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use jsonrules_schema::SchemaTable;

use crate::config::OptionArgs;

/// Arguments for the describe subcommand.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Schema document (YAML or JSON).
    #[arg(long)]
    pub schema: PathBuf,

    /// Record to describe. Defaults to the document's root.
    #[arg(long = "type")]
    pub record: Option<String>,

    #[command(flatten)]
    pub options: OptionArgs,
}

/// Execute the describe subcommand.
pub fn run_describe(args: &DescribeArgs) -> Result<u8> {
    println!("{}", describe(args)?);
    Ok(0)
}

/// Build the table for the selected record and render it.
pub fn describe(args: &DescribeArgs) -> Result<String> {
    let options = args.options.resolve()?;
    let target = crate::load_target(&args.schema, args.record.as_deref())?;
    let table = SchemaTable::build(&target, &options)?;
    Ok(serde_json::to_string_pretty(&table)?)
}
