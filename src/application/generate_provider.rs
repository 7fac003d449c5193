//! Use case for generating provider sources from a specification document

use std::path::Path;
use std::sync::Arc;

use crate::core::Config;
use crate::core::error::Result;
use crate::generation::{EligibilityPolicy, Pipeline, RunReport, SpecLoader};
use crate::infrastructure::{FileSink, FileSpecLoader, TemplateSet, TeraArtifactRenderer};

/// Loads a specification and runs the generation pipeline over it
pub struct GenerateProviderUseCase {
    spec_loader: Arc<dyn SpecLoader>,
    pipeline: Pipeline,
    eligibility: EligibilityPolicy,
}

impl GenerateProviderUseCase {
    pub fn new(
        spec_loader: Arc<dyn SpecLoader>,
        pipeline: Pipeline,
        eligibility: EligibilityPolicy,
    ) -> Self {
        Self {
            spec_loader,
            pipeline,
            eligibility,
        }
    }

    /// Wire the filesystem loader, Tera renderer and file sink for `config`.
    ///
    /// Templates are compiled here, so a broken override fails before any
    /// document is read.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let templates = match &config.template_dir {
            Some(dir) => TemplateSet::from_dir(dir)?,
            None => TemplateSet::builtin(),
        };
        let renderer = Arc::new(TeraArtifactRenderer::new(&templates)?);
        let sink = Arc::new(FileSink::new(
            &config.output_dir,
            &config.code_extension,
            &config.doc_extension,
        ));

        Ok(Self::new(
            Arc::new(FileSpecLoader::new()),
            Pipeline::new(renderer, sink, config.pipeline_options()),
            config.eligibility.clone(),
        ))
    }

    pub fn execute(&self, openapi_doc: &Path) -> Result<RunReport> {
        let spec = self.spec_loader.load(openapi_doc)?;
        tracing::info!(
            document = %openapi_doc.display(),
            openapi = %spec.version,
            paths = spec.endpoints.len(),
            "Loaded specification"
        );
        self.pipeline.run(&spec, &self.eligibility)
    }
}
