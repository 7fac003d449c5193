//! File-based OpenAPI spec loader
//!
//! This loader handles only file I/O and format detection. The actual parsing
//! is done by the [`OpenApiParser`].

use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

use super::parser::OpenApiParser;
use crate::core::error::{Error, Result};
use crate::generation::{SpecDocument, SpecLoader};

/// Loads OpenAPI specifications from local JSON or YAML files
#[derive(Debug, Default)]
pub struct FileSpecLoader;

impl FileSpecLoader {
    pub fn new() -> Self {
        Self
    }
}

impl SpecLoader for FileSpecLoader {
    fn load(&self, source: &Path) -> Result<SpecDocument> {
        let content = fs::read_to_string(source).map_err(|e| {
            Error::config(format!(
                "cannot read specification document {}: {e}",
                source.display()
            ))
        })?;
        tracing::debug!(source = %source.display(), bytes = content.len(), "Loaded specification");

        let value = parse_document(source, &content)?;
        OpenApiParser::new(value).parse()
    }
}

/// Parse raw document text as JSON or YAML, chosen by extension
fn parse_document(source: &Path, content: &str) -> Result<JsonValue> {
    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(content)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
        // Try JSON first, then YAML
        _ => serde_json::from_str(content).or_else(|json_err| {
            serde_yaml::from_str(content).map_err(|yaml_err| {
                Error::spec_parse(format!(
                    "document is neither JSON ({json_err}) nor YAML ({yaml_err})"
                ))
            })
        }),
    }
}
