//! Infrastructure layer - concrete implementations of domain ports

pub mod generation;
pub mod openapi;
pub mod output;

pub use generation::{TemplateSet, TeraArtifactRenderer};
pub use openapi::FileSpecLoader;
pub use output::FileSink;
