//! Generation infrastructure implementations

pub mod reference_check;
pub mod template_renderer;

pub use template_renderer::{TemplateSet, TeraArtifactRenderer};
