use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::io_utils::SchemaFormat;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Build record schemas from ServiceNow column descriptors",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Construct a record schema from a column descriptor file
    Build(BuildArgs),
    /// List the fields a descriptor file produces in a formatted table
    Columns(ColumnsArgs),
    /// Print the ServiceNow type name to field type mapping
    Types,
}

#[derive(Debug, Args)]
pub struct DescriptorArgs {
    /// Column descriptor file (YAML or JSON, '-' for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Table name for the schema (defaults to the document's `table` key)
    #[arg(short = 't', long = "table")]
    pub table: Option<String>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: DescriptorArgs,
    /// Output schema file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Output format (defaults from the output extension, else yaml)
    #[arg(long, value_enum)]
    pub format: Option<SchemaFormat>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub source: DescriptorArgs,
}
