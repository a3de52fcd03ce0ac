use anyhow::{Context, Result, anyhow};
use log::info;

use crate::{
    cli::{BuildArgs, ColumnsArgs, DescriptorArgs},
    columns::ColumnSet,
    io_utils,
    schema::{FieldType, KNOWN_SOURCE_TYPES, RecordSchema, construct_schema},
    table,
};

pub fn execute(args: &BuildArgs) -> Result<()> {
    let (schema, skipped) = build_from_source(&args.source)?;
    let format = io_utils::resolve_output_format(args.output.as_deref(), args.format);
    let rendered = schema.render(format)?;
    io_utils::write_output_text(args.output.as_deref(), &rendered)
        .with_context(|| format!("Writing schema for table '{}'", schema.name))?;

    info!(
        "Constructed schema '{}' with {} field(s) ({} column(s) skipped)",
        schema.name,
        schema.len(),
        skipped
    );
    Ok(())
}

pub fn execute_columns(args: &ColumnsArgs) -> Result<()> {
    let (schema, skipped) = build_from_source(&args.source)?;
    if schema.is_empty() {
        info!("Table '{}' does not produce any fields", schema.name);
        return Ok(());
    }
    print!("{}", table::render_fields(&schema));
    info!(
        "Listed {} field(s) for table '{}' ({} column(s) skipped)",
        schema.len(),
        schema.name,
        skipped
    );
    Ok(())
}

pub fn execute_types() -> Result<()> {
    let rows = KNOWN_SOURCE_TYPES
        .iter()
        .map(|source| {
            let resolved = FieldType::from_source_type(source)
                .map(|field_type| field_type.to_string())
                .unwrap_or_else(|| "(dropped)".to_string());
            vec![source.to_string(), resolved]
        })
        .chain(std::iter::once(vec![
            "(other)".to_string(),
            FieldType::String.to_string(),
        ]))
        .collect::<Vec<_>>();
    print!("{}", table::render_table(&["source type", "field type"], &rows));
    Ok(())
}

fn build_from_source(source: &DescriptorArgs) -> Result<(RecordSchema, usize)> {
    let encoding = io_utils::resolve_encoding(source.input_encoding.as_deref())?;
    let set = ColumnSet::load(&source.input, encoding)?;
    let table = set.resolve_table(source.table.as_deref()).ok_or_else(|| {
        anyhow!(
            "No table name given: pass --table or add a `table` key to {:?}",
            source.input
        )
    })?;
    let schema = construct_schema(table, &set.columns);
    let skipped = set.columns.len() - schema.len();
    Ok((schema, skipped))
}
