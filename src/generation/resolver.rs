//! Parameter resolution: merges path-level declarations with the write
//! operation's request body properties into one validated, sorted list.

use std::collections::BTreeMap;

use crate::core::error::{Error, Result};
use crate::generation::{
    EndpointDescriptor, Parameter, ParameterLocation, ParameterType, Schema,
};

/// Field name the templates reserve for the mount path of every artifact
pub const MOUNT_PATH_FIELD: &str = "path";

/// A parameter seen during the merge, before its type is validated
struct Candidate<'a> {
    description: Option<&'a str>,
    location: ParameterLocation,
    required: bool,
    schema: &'a Schema,
}

/// Resolves the parameters of one endpoint.
///
/// Path-level declarations are taken first and win on name collisions; body
/// properties only fill in names not seen yet. The returned list is sorted by
/// name and every entry has a supported type. A parameter named
/// [`MOUNT_PATH_FIELD`] is rejected, since generated artifacts already declare
/// that field. The endpoint itself is left untouched.
pub fn resolve(endpoint: &EndpointDescriptor) -> Result<Vec<Parameter>> {
    let mut merged: BTreeMap<&str, Candidate<'_>> = BTreeMap::new();

    for param in &endpoint.parameters {
        merged.entry(param.name.as_str()).or_insert(Candidate {
            description: param
                .description
                .as_deref()
                .or(param.schema.description.as_deref()),
            location: param.location,
            required: param.required,
            schema: &param.schema,
        });
    }

    if endpoint.capabilities.supports_write {
        let media_schemas = endpoint
            .request_body
            .iter()
            .flat_map(|body| body.content.values())
            .filter_map(|media| media.schema.as_ref());

        for schema in media_schemas {
            for (name, property) in &schema.properties {
                merged.entry(name.as_str()).or_insert_with(|| Candidate {
                    description: property.description.as_deref(),
                    location: ParameterLocation::Body,
                    required: schema.required.iter().any(|r| r == name),
                    schema: property,
                });
            }
        }
    }

    merged
        .into_iter()
        .map(|(name, candidate)| -> Result<Parameter> {
            if name == MOUNT_PATH_FIELD {
                return Err(Error::ReservedParameterName {
                    path: endpoint.path.clone(),
                    parameter: name.to_string(),
                });
            }
            let param_type = ParameterType::from_schema(candidate.schema).ok_or_else(|| {
                Error::UnsupportedParameterType {
                    path: endpoint.path.clone(),
                    parameter: name.to_string(),
                    found: candidate.schema.type_label(),
                }
            })?;
            Ok(Parameter {
                name: name.to_string(),
                description: candidate.description.unwrap_or_default().to_string(),
                location: candidate.location,
                param_type,
                required: candidate.required,
            })
        })
        .collect()
}
