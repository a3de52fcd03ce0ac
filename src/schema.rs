//! Record schema model and the ServiceNow type dispatch.
//!
//! This module owns the [`RecordSchema`] struct (the typed record definition
//! handed to downstream pipeline stages), the [`FieldType`] enum (the closed set
//! of semantic value kinds), [`SchemaField`] per-field metadata, and
//! [`construct_schema`], which turns ServiceNow column descriptors into a
//! record schema.
//!
//! ## Responsibilities
//!
//! - Case-insensitive mapping of ServiceNow type names onto [`FieldType`]
//! - Uniform nullability: every field is nullable unless typed [`FieldType::Null`]
//! - Decimal precision/scale specification and validation
//! - YAML/JSON persistence of the constructed schema

use std::{collections::HashSet, fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

use crate::{columns::ColumnDescriptor, io_utils::SchemaFormat};

pub const DECIMAL_MAX_PRECISION: u32 = 38;
pub const DEFAULT_DECIMAL_PRECISION: u32 = 38;
pub const DEFAULT_DECIMAL_SCALE: u32 = 10;

/// ServiceNow type names with an explicit entry in the dispatch table.
pub const KNOWN_SOURCE_TYPES: &[&str] = &[
    "decimal",
    "integer",
    "boolean",
    "glide_date",
    "glide_date_time",
    "glide_time",
    "reference",
    "currency",
    "sys_class_name",
    "domain_id",
    "domain_path",
    "guid",
    "translated_html",
    "journal",
    "string",
];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseFieldTypeError {
    #[error("Unknown field type '{0}'. Supported types: {supported}", supported = FieldType::variants().join(", "))]
    Unknown(String),
    #[error("Malformed decimal type '{0}', expected the form decimal(precision,scale)")]
    MalformedDecimal(String),
    #[error("Decimal precision must be between 1 and {max}, got {0}", max = DECIMAL_MAX_PRECISION)]
    InvalidPrecision(u32),
    #[error("Decimal scale ({scale}) cannot exceed precision ({precision})")]
    ScaleExceedsPrecision { precision: u32, scale: u32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DecimalSpec {
    pub precision: u32,
    pub scale: u32,
}

impl DecimalSpec {
    pub fn new(precision: u32, scale: u32) -> Result<Self, ParseFieldTypeError> {
        let spec = Self { precision, scale };
        spec.ensure_valid()?;
        Ok(spec)
    }

    /// Precision and scale assigned to every ServiceNow `decimal` column.
    pub const fn default_servicenow() -> Self {
        Self {
            precision: DEFAULT_DECIMAL_PRECISION,
            scale: DEFAULT_DECIMAL_SCALE,
        }
    }

    pub fn ensure_valid(&self) -> Result<(), ParseFieldTypeError> {
        if self.precision == 0 || self.precision > DECIMAL_MAX_PRECISION {
            return Err(ParseFieldTypeError::InvalidPrecision(self.precision));
        }
        if self.scale > self.precision {
            return Err(ParseFieldTypeError::ScaleExceedsPrecision {
                precision: self.precision,
                scale: self.scale,
            });
        }
        Ok(())
    }

    pub fn signature(&self) -> String {
        format!("decimal({},{})", self.precision, self.scale)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Marker for a column that can only ever hold null; never wrapped as nullable.
    Null,
    Decimal(DecimalSpec),
    Integer,
    Boolean,
    Date,
    DateTime,
    /// Time of day with microsecond precision.
    Time,
    String,
}

impl FieldType {
    /// Resolves a ServiceNow column type name.
    ///
    /// Matching ignores ASCII case. Names outside the table fall back to
    /// [`FieldType::String`], so every input currently resolves; `None` is
    /// reserved for table entries that should drop the column entirely.
    pub fn from_source_type(type_name: &str) -> Option<FieldType> {
        let normalized = type_name.to_ascii_lowercase();
        let field_type = match normalized.as_str() {
            "decimal" => FieldType::Decimal(DecimalSpec::default_servicenow()),
            "integer" => FieldType::Integer,
            "boolean" => FieldType::Boolean,
            "glide_date" => FieldType::Date,
            "glide_date_time" => FieldType::DateTime,
            "glide_time" => FieldType::Time,
            "reference" | "currency" | "sys_class_name" | "domain_id" | "domain_path" | "guid"
            | "translated_html" | "journal" | "string" => FieldType::String,
            _ => FieldType::String,
        };
        Some(field_type)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Null => "null",
            FieldType::Decimal(_) => "decimal",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time_micros",
            FieldType::String => "string",
        }
    }

    pub fn variants() -> &'static [&'static str] {
        &[
            "null",
            "decimal(precision,scale)",
            "integer",
            "boolean",
            "date",
            "datetime",
            "time_micros",
            "string",
        ]
    }

    pub fn signature_token(&self) -> String {
        match self {
            FieldType::Decimal(spec) => spec.signature(),
            _ => self.as_str().to_string(),
        }
    }

    pub fn decimal_spec(&self) -> Option<&DecimalSpec> {
        match self {
            FieldType::Decimal(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldType::Null)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature_token())
    }
}

impl FromStr for FieldType {
    type Err = ParseFieldTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "null" => Ok(FieldType::Null),
            "integer" => Ok(FieldType::Integer),
            "boolean" => Ok(FieldType::Boolean),
            "date" => Ok(FieldType::Date),
            "datetime" => Ok(FieldType::DateTime),
            "time_micros" => Ok(FieldType::Time),
            "string" => Ok(FieldType::String),
            other if other.starts_with("decimal") => parse_decimal_type(other),
            _ => Err(ParseFieldTypeError::Unknown(value.to_string())),
        }
    }
}

fn parse_decimal_type(token: &str) -> Result<FieldType, ParseFieldTypeError> {
    let malformed = || ParseFieldTypeError::MalformedDecimal(token.to_string());
    let inner = token["decimal".len()..]
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(malformed)?;
    let (precision, scale) = inner.split_once(',').ok_or_else(malformed)?;
    let precision: u32 = precision.trim().parse().map_err(|_| malformed())?;
    let scale: u32 = scale.trim().parse().map_err(|_| malformed())?;
    Ok(FieldType::Decimal(DecimalSpec::new(precision, scale)?))
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.signature_token())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        FieldType::from_str(&token).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "SchemaFieldRecord")]
pub struct SchemaField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub nullable: bool,
}

/// On-disk shape of a field; a missing `nullable` follows the field type.
#[derive(Deserialize)]
struct SchemaFieldRecord {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    nullable: Option<bool>,
}

impl From<SchemaFieldRecord> for SchemaField {
    fn from(record: SchemaFieldRecord) -> Self {
        let nullable = record.nullable.unwrap_or(!record.field_type.is_null());
        SchemaField {
            name: record.name,
            field_type: record.field_type,
            nullable,
        }
    }
}

impl SchemaField {
    /// Builds a field, marking it nullable unless it is typed [`FieldType::Null`].
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let nullable = !field_type.is_null();
        Self {
            name: name.into(),
            field_type,
            nullable,
        }
    }

    /// Derives the field for one column, or `None` when the column has no name
    /// or its type resolves to nothing.
    pub fn from_descriptor(column: &ColumnDescriptor) -> Option<Self> {
        let name = column.field_name.as_deref().filter(|name| !name.is_empty())?;
        let field_type = FieldType::from_source_type(&column.type_name)?;
        Some(Self::new(name, field_type))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordSchema {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>, fields: Vec<SchemaField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|field| field.name.as_str()).collect()
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing record schema to YAML")
    }

    pub fn to_json_string(&self) -> Result<String> {
        let mut rendered =
            serde_json::to_string_pretty(self).context("Serializing record schema to JSON")?;
        rendered.push('\n');
        Ok(rendered)
    }

    pub fn render(&self, format: SchemaFormat) -> Result<String> {
        match format {
            SchemaFormat::Yaml => self.to_yaml_string(),
            SchemaFormat::Json => self.to_json_string(),
        }
    }

    pub fn save(&self, path: &Path, format: SchemaFormat) -> Result<()> {
        let rendered = self.render(format)?;
        fs::write(path, rendered).with_context(|| format!("Writing schema file {path:?}"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let format = SchemaFormat::detect(Some(path), &text);
        Self::parse(&text, format).with_context(|| format!("Parsing schema file {path:?}"))
    }

    pub fn parse(text: &str, format: SchemaFormat) -> Result<Self> {
        let schema: RecordSchema = match format {
            SchemaFormat::Yaml => {
                serde_yaml::from_str(text).context("Parsing record schema YAML")?
            }
            SchemaFormat::Json => {
                serde_json::from_str(text).context("Parsing record schema JSON")?
            }
        };
        Ok(schema)
    }
}

/// Builds the record schema for `table_name` from its column descriptors.
///
/// Columns without a field name are dropped; every other column keeps its
/// input position relative to the retained columns. Duplicate names are kept
/// as given.
pub fn construct_schema(table_name: &str, columns: &[ColumnDescriptor]) -> RecordSchema {
    let mut fields = Vec::with_capacity(columns.len());
    let mut seen = HashSet::new();
    for (idx, column) in columns.iter().enumerate() {
        let Some(field) = SchemaField::from_descriptor(column) else {
            debug!(
                "Skipping column {} of '{}' (field name {:?}, type '{}')",
                idx + 1,
                table_name,
                column.field_name,
                column.type_name
            );
            continue;
        };
        if !seen.insert(field.name.clone()) {
            warn!(
                "Column '{}' appears more than once in table '{}'",
                field.name, table_name
            );
        }
        fields.push(field);
    }
    RecordSchema::new(table_name, fields)
}
