//! ServiceNow column descriptors and descriptor documents.
//!
//! A descriptor document is YAML or JSON holding either a bare list of
//! descriptors or a mapping with an optional `table` name and a `columns` list.
//! Keys are accepted in snake_case as well as the camelCase used by ServiceNow
//! table exports.

use std::path::Path;

use anyhow::{Context, Result};
use encoding_rs::Encoding;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::io_utils::{self, SchemaFormat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDescriptor {
    #[serde(
        default,
        alias = "fieldName",
        alias = "name",
        skip_serializing_if = "Option::is_none"
    )]
    pub field_name: Option<String>,
    #[serde(default, alias = "typeName", alias = "type")]
    pub type_name: String,
}

impl ColumnDescriptor {
    pub fn new(field_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            field_name: Some(field_name.into()),
            type_name: type_name.into(),
        }
    }

    pub fn unnamed(type_name: impl Into<String>) -> Self {
        Self {
            field_name: None,
            type_name: type_name.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TableDocument {
    #[serde(default)]
    table: Option<String>,
    columns: Vec<ColumnDescriptor>,
}

/// Column descriptors loaded from a descriptor document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSet {
    pub table: Option<String>,
    pub columns: Vec<ColumnDescriptor>,
}

impl ColumnSet {
    /// Parses a descriptor document, deciding between the bare list and the
    /// `{table, columns}` mapping from the top-level node before deserializing.
    pub fn parse(text: &str, format: SchemaFormat) -> Result<Self> {
        match format {
            SchemaFormat::Yaml => {
                let value: serde_yaml::Value =
                    serde_yaml::from_str(text).context("Parsing column descriptor YAML")?;
                if value.is_sequence() {
                    let columns = serde_yaml::from_value(value)
                        .context("Reading column descriptor list")?;
                    Ok(ColumnSet::from_columns(columns))
                } else {
                    let document = serde_yaml::from_value(value)
                        .context("Reading column descriptor document")?;
                    Ok(ColumnSet::from_document(document))
                }
            }
            SchemaFormat::Json => {
                let value: serde_json::Value =
                    serde_json::from_str(text).context("Parsing column descriptor JSON")?;
                if value.is_array() {
                    let columns = serde_json::from_value(value)
                        .context("Reading column descriptor list")?;
                    Ok(ColumnSet::from_columns(columns))
                } else {
                    let document = serde_json::from_value(value)
                        .context("Reading column descriptor document")?;
                    Ok(ColumnSet::from_document(document))
                }
            }
        }
    }

    fn from_columns(columns: Vec<ColumnDescriptor>) -> Self {
        ColumnSet {
            table: None,
            columns,
        }
    }

    fn from_document(document: TableDocument) -> Self {
        ColumnSet {
            table: document.table.filter(|name| !name.trim().is_empty()),
            columns: document.columns,
        }
    }

    /// Reads a descriptor document from `path` (`-` for stdin).
    pub fn load(path: &Path, encoding: &'static Encoding) -> Result<Self> {
        let text = io_utils::read_input_text(path, encoding)?;
        let format = SchemaFormat::detect(Some(path), &text);
        debug!("Reading column descriptors from {:?} as {:?}", path, format);
        let set = Self::parse(&text, format)
            .with_context(|| format!("Loading column descriptors from {path:?}"))?;
        debug!("Loaded {} column descriptor(s)", set.columns.len());
        Ok(set)
    }

    /// Table name to use, preferring an explicit override over the document's.
    pub fn resolve_table<'a>(&'a self, explicit: Option<&'a str>) -> Option<&'a str> {
        explicit
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .or(self.table.as_deref())
    }
}
