//! Port interfaces for the generation domain

use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::generation::{Artifact, ArtifactKind, SpecDocument, ViewModel};

/// Loads a specification document
pub trait SpecLoader: Send + Sync {
    /// Load and parse the document at `source`
    fn load(&self, source: &Path) -> Result<SpecDocument>;
}

/// Turns a view model into artifact text using the template for `kind`
pub trait ArtifactRenderer: Send + Sync {
    /// Render one artifact. Must be deterministic for identical input.
    fn render(&self, view: &ViewModel, kind: ArtifactKind) -> Result<String>;
}

/// Persists rendered artifacts
pub trait ArtifactSink: Send + Sync {
    /// Write `artifact`, overwriting any previous content, and return where it went
    fn write(&self, artifact: &Artifact) -> Result<PathBuf>;
}
