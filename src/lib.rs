pub mod cli;
pub mod columns;
pub mod io_utils;
pub mod schema;
pub mod schema_cmd;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

pub use crate::columns::{ColumnDescriptor, ColumnSet};
pub use crate::schema::{DecimalSpec, FieldType, RecordSchema, SchemaField, construct_schema};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("servicenow_schema", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Build(args) => schema_cmd::execute(&args),
        Commands::Columns(args) => schema_cmd::execute_columns(&args),
        Commands::Types => schema_cmd::execute_types(),
    }
}
