//! Tera-based artifact renderer and the template set it renders from

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::core::error::{Error, Result};
use crate::generation::sanitizers::{escape_go_string, escape_markdown};
use crate::generation::{
    ArtifactKind, ArtifactRenderer, Parameter, ParameterLocation, ParameterType, ViewModel,
};
use crate::infrastructure::generation::reference_check::check_references;

const RESOURCE_TEMPLATE: &str = include_str!("../../../templates/resource.go.tera");
const DATA_SOURCE_TEMPLATE: &str = include_str!("../../../templates/data_source.go.tera");
const DOC_TEMPLATE: &str = include_str!("../../../templates/doc.md.tera");

/// One template source per artifact kind.
///
/// Built once before a run and handed to the renderer; nothing reads
/// templates from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    resource: String,
    data_source: String,
    doc: String,
}

impl TemplateSet {
    /// The templates compiled into the binary
    pub fn builtin() -> Self {
        Self {
            resource: RESOURCE_TEMPLATE.to_string(),
            data_source: DATA_SOURCE_TEMPLATE.to_string(),
            doc: DOC_TEMPLATE.to_string(),
        }
    }

    /// Built-in templates, overridden by any same-named file in `dir`
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::config(format!(
                "template directory {} does not exist",
                dir.display()
            )));
        }

        let mut set = Self::builtin();
        for kind in ArtifactKind::all() {
            let candidate = dir.join(Self::file_name(kind));
            if candidate.is_file() {
                let source = fs::read_to_string(&candidate).map_err(|e| Error::io(&candidate, e))?;
                tracing::debug!(kind = %kind, template = %candidate.display(), "Using template override");
                *set.slot_mut(kind) = source;
            }
        }
        Ok(set)
    }

    /// Template file name for `kind`, also its name inside Tera
    pub fn file_name(kind: ArtifactKind) -> &'static str {
        match kind {
            ArtifactKind::Resource => "resource.go.tera",
            ArtifactKind::DataSource => "data_source.go.tera",
            ArtifactKind::Doc => "doc.md.tera",
        }
    }

    pub fn source(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Resource => &self.resource,
            ArtifactKind::DataSource => &self.data_source,
            ArtifactKind::Doc => &self.doc,
        }
    }

    fn slot_mut(&mut self, kind: ArtifactKind) -> &mut String {
        match kind {
            ArtifactKind::Resource => &mut self.resource,
            ArtifactKind::DataSource => &mut self.data_source,
            ArtifactKind::Doc => &mut self.doc,
        }
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Renders view models with Tera.
///
/// Autoescaping is off since the output is Go and Markdown, not HTML. Every
/// name a template references, in conditions as well as output, must be a
/// view model field; this is checked once when the renderer is built.
pub struct TeraArtifactRenderer {
    tera: Tera,
}

impl TeraArtifactRenderer {
    /// Compile every template in `templates`.
    ///
    /// A syntax error or a reference to a name the view model lacks fails
    /// here, before anything is rendered.
    pub fn new(templates: &TemplateSet) -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("go_string", go_string_filter);
        tera.register_filter("markdown", markdown_filter);

        tera.add_raw_templates(
            ArtifactKind::all()
                .into_iter()
                .map(|kind| (TemplateSet::file_name(kind), templates.source(kind))),
        )?;

        let shape = serde_json::to_value(reference_view())
            .map_err(|e| Error::template(format!("cannot serialize view model: {e}")))?;
        for kind in ArtifactKind::all() {
            let name = TemplateSet::file_name(kind);
            check_references(name, &tera.get_template(name)?.ast, &shape)?;
        }
        Ok(Self { tera })
    }
}

/// A view model with every field populated, the shape templates are checked against
fn reference_view() -> ViewModel {
    ViewModel {
        endpoint: "/transform/role/{name}".to_string(),
        description: "Read, write, and delete roles.".to_string(),
        dir_name: "role".to_string(),
        exported_prefix: "Name".to_string(),
        private_prefix: "name".to_string(),
        kind: ArtifactKind::Resource,
        kind_label: ArtifactKind::Resource.display_name().to_string(),
        type_name: "vault_transform_role_name".to_string(),
        parameters: vec![Parameter {
            name: "name".to_string(),
            description: "The name of the role.".to_string(),
            location: ParameterLocation::Path,
            param_type: ParameterType::String,
            required: true,
        }],
        supports_read: true,
        supports_write: true,
        supports_delete: true,
    }
}

impl ArtifactRenderer for TeraArtifactRenderer {
    fn render(&self, view: &ViewModel, kind: ArtifactKind) -> Result<String> {
        let context = Context::from_serialize(view)?;
        let rendered = self.tera.render(TemplateSet::file_name(kind), &context)?;
        Ok(rendered)
    }
}

fn string_arg<'a>(value: &'a JsonValue, filter: &str) -> tera::Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| tera::Error::msg(format!("filter `{filter}` expects a string")))
}

fn go_string_filter(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    Ok(JsonValue::String(escape_go_string(string_arg(value, "go_string")?)))
}

fn markdown_filter(value: &JsonValue, _: &HashMap<String, JsonValue>) -> tera::Result<JsonValue> {
    Ok(JsonValue::String(escape_markdown(string_arg(value, "markdown")?)))
}
