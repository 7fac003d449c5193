//! providergen CLI entrypoint
//! Parses command-line arguments, resolves configuration and runs generation.
#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use providergen::application::GenerateProviderUseCase;
use providergen::core::Config;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "providergen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the OpenAPI document (JSON or YAML)
    #[arg(long)]
    openapi_doc: PathBuf,
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Root directory of the generated trees
    #[arg(long, env = "PROVIDERGEN_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
    /// Directory with template overrides
    #[arg(long)]
    template_dir: Option<PathBuf>,
    /// Skip documentation stubs
    #[arg(long)]
    no_docs: bool,
    /// Skip failing endpoints instead of aborting, exit non-zero at the end
    #[arg(long)]
    keep_going: bool,
    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// File configuration with command-line overrides applied
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(output_dir) = &self.output_dir {
            config.output_dir = output_dir.clone();
        }
        if let Some(template_dir) = &self.template_dir {
            config.template_dir = Some(template_dir.clone());
        }
        if self.no_docs {
            config.emit_docs = false;
        }
        if self.keep_going {
            config.keep_going = true;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level.as_str())),
        )
        .init();

    let config = cli.resolve_config()?;
    info!(
        output_dir = %config.output_dir.display(),
        emit_docs = config.emit_docs,
        keep_going = config.keep_going,
        "Starting providergen"
    );

    let use_case =
        GenerateProviderUseCase::from_config(&config).context("Invalid generator setup")?;
    let report = use_case
        .execute(&cli.openapi_doc)
        .with_context(|| format!("Generation from {} failed", cli.openapi_doc.display()))?;

    if !report.is_success() {
        for failure in &report.failures {
            error!(path = %failure.path, kind = %failure.kind, "{}", failure.error);
        }
        anyhow::bail!(
            "{} endpoint(s) failed, {} file(s) written",
            report.failures.len(),
            report.written.len()
        );
    }

    info!(
        files = report.written.len(),
        output_dir = %config.output_dir.display(),
        "✅ Generation complete"
    );
    Ok(())
}
