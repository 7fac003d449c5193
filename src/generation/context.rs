//! View model - the template-ready projection of one endpoint

use serde::Serialize;

use crate::core::utils::path_to_snake_case;
use crate::generation::sanitizers::sanitize_description;
use crate::generation::{ArtifactKind, DerivedNames, EndpointDescriptor, Parameter};

/// Everything a template may reference for one (endpoint, kind) pair.
///
/// Built immediately before rendering and dropped afterwards. Templates are
/// rendered strictly, so any field a template names must exist here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Endpoint path exactly as declared, braces included
    pub endpoint: String,
    /// Sanitised endpoint description, empty when the document has none
    pub description: String,
    /// Package (directory) name the code artifact lives in
    pub dir_name: String,
    pub exported_prefix: String,
    pub private_prefix: String,
    /// The code kind the endpoint was selected as
    pub kind: ArtifactKind,
    /// Human readable form of `kind`, e.g. `Data Source`
    pub kind_label: String,
    /// Type name users write in configuration, e.g. `vault_transform_role_name`
    pub type_name: String,
    pub parameters: Vec<Parameter>,
    pub supports_read: bool,
    pub supports_write: bool,
    pub supports_delete: bool,
}

impl ViewModel {
    /// Builds the view of `endpoint` selected as `kind`.
    ///
    /// Parameter descriptions are sanitised here so every template sees the
    /// same single-line text.
    pub fn new(
        endpoint: &EndpointDescriptor,
        kind: ArtifactKind,
        names: &DerivedNames,
        parameters: &[Parameter],
        provider_name: &str,
    ) -> Self {
        let parameters = parameters
            .iter()
            .map(|p| Parameter {
                description: sanitize_description(&p.description),
                ..p.clone()
            })
            .collect();

        Self {
            endpoint: endpoint.path.clone(),
            description: endpoint
                .description
                .as_deref()
                .map(sanitize_description)
                .unwrap_or_default(),
            dir_name: names.package_name.clone(),
            exported_prefix: names.exported_prefix.clone(),
            private_prefix: names.private_prefix.clone(),
            kind,
            kind_label: kind.display_name().to_string(),
            type_name: format!("{}_{}", provider_name, path_to_snake_case(&endpoint.path)),
            parameters,
            supports_read: endpoint.capabilities.supports_read,
            supports_write: endpoint.capabilities.supports_write,
            supports_delete: endpoint.capabilities.supports_delete,
        }
    }
}
