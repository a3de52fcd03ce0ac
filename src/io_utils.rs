//! I/O utilities for descriptor input, schema output, and format resolution.
//!
//! - **Format resolution**: extension-based detection (`.json` → JSON,
//!   `.yml`/`.yaml` → YAML) with content sniffing for stdin and unknown
//!   extensions, plus manual override for output.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use encoding_rs::{Encoding, UTF_8};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaFormat {
    Yaml,
    Json,
}

impl SchemaFormat {
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(SchemaFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                Some(SchemaFormat::Yaml)
            }
            _ => None,
        }
    }

    /// Picks the format of an input document, sniffing the text when the path
    /// does not settle it.
    pub fn detect(path: Option<&Path>, text: &str) -> Self {
        if let Some(format) = path.filter(|p| !is_dash(p)).and_then(Self::from_extension) {
            return format;
        }
        match text.trim_start().chars().next() {
            Some('{') | Some('[') => SchemaFormat::Json,
            _ => SchemaFormat::Yaml,
        }
    }
}

pub fn resolve_output_format(path: Option<&Path>, provided: Option<SchemaFormat>) -> SchemaFormat {
    if let Some(format) = provided {
        return format;
    }
    path.filter(|p| !is_dash(p))
        .and_then(SchemaFormat::from_extension)
        .unwrap_or(SchemaFormat::Yaml)
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn read_input_text(path: &Path, encoding: &'static Encoding) -> Result<String> {
    let bytes = if is_dash(path) {
        let mut buffer = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buffer)
            .context("Reading descriptors from stdin")?;
        buffer
    } else {
        fs::read(path).with_context(|| format!("Opening input file {path:?}"))?
    };
    decode_bytes(&bytes, encoding).with_context(|| format!("Decoding input {path:?}"))
}

pub fn write_output_text(path: Option<&Path>, text: &str) -> Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(io::stdout().lock()),
    };
    writer
        .write_all(text.as_bytes())
        .context("Writing schema output")?;
    writer.flush().context("Flushing schema output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_follows_extension_unless_overridden() {
        assert_eq!(
            resolve_output_format(Some(Path::new("out.JSON")), None),
            SchemaFormat::Json
        );
        assert_eq!(
            resolve_output_format(Some(Path::new("out.json")), Some(SchemaFormat::Yaml)),
            SchemaFormat::Yaml
        );
        assert_eq!(resolve_output_format(Some(Path::new("-")), None), SchemaFormat::Yaml);
        assert_eq!(resolve_output_format(None, None), SchemaFormat::Yaml);
    }

    #[test]
    fn detect_sniffs_stdin_content() {
        assert_eq!(
            SchemaFormat::detect(Some(Path::new("-")), "  [{\"fieldName\": \"a\"}]"),
            SchemaFormat::Json
        );
        assert_eq!(
            SchemaFormat::detect(Some(Path::new("columns.yml")), "[]"),
            SchemaFormat::Yaml
        );
        assert_eq!(SchemaFormat::detect(None, "- name: a"), SchemaFormat::Yaml);
    }

    #[test]
    fn decodes_latin1_input() {
        let encoding = resolve_encoding(Some("latin1")).expect("known label");
        let text = decode_bytes(b"caf\xe9", encoding).expect("decoded");
        assert_eq!(text, "café");
        assert!(resolve_encoding(Some("not-an-encoding")).is_err());
    }
}
