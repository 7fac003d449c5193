//! Run configuration
//!
//! Settings come from an optional TOML file; command-line flags are applied
//! on top by the binary. Every field has a default, so an empty file (or no
//! file at all) generates the Vault transform endpoints into `generated/`.
//!
//! ```toml
//! output_dir = "generated"
//! provider_name = "vault"
//! emit_docs = true
//!
//! [eligibility]
//! strategy = "exact"
//!
//! [eligibility.paths]
//! "/transform/role/{name}" = "resource"
//! "/transform/encode/{role_name}" = "data_source"
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Error, Result};
use crate::generation::{EligibilityPolicy, PipelineOptions};

static PROVIDER_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the generated trees
    pub output_dir: PathBuf,
    /// Provider prefix of generated type names
    pub provider_name: String,
    /// Extension of code artifacts, without the dot
    pub code_extension: String,
    /// Extension of doc stubs, without the dot
    pub doc_extension: String,
    pub emit_docs: bool,
    pub keep_going: bool,
    /// Directory with template overrides
    pub template_dir: Option<PathBuf>,
    pub eligibility: EligibilityPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("generated"),
            provider_name: "vault".to_string(),
            code_extension: "go".to_string(),
            doc_extension: "md".to_string(),
            emit_docs: true,
            keep_going: false,
            template_dir: None,
            eligibility: EligibilityPolicy::default(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// The file was asked for explicitly, so a missing file is an error
    /// rather than a silent fallback to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "cannot read configuration file {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(config = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde alone can't
    pub fn validate(&self) -> Result<()> {
        if !PROVIDER_NAME_RE.is_match(&self.provider_name) {
            return Err(Error::config(format!(
                "provider_name {:?} must be lower-case letters, digits and underscores",
                self.provider_name
            )));
        }
        for (key, extension) in [
            ("code_extension", &self.code_extension),
            ("doc_extension", &self.doc_extension),
        ] {
            if extension.is_empty() || extension.contains(['.', '/', '\\']) {
                return Err(Error::config(format!(
                    "{key} {extension:?} must be a non-empty extension without dots or separators"
                )));
            }
        }
        self.eligibility.validate()
    }

    /// Options the pipeline needs from this configuration
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            provider_name: self.provider_name.clone(),
            emit_docs: self.emit_docs,
            keep_going: self.keep_going,
        }
    }
}
