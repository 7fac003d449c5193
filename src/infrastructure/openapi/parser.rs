//! OpenAPI document parser
//!
//! Walks the raw JSON value of a Vault OpenAPI document and builds the
//! generation domain model from it. Only the parts generation looks at are
//! read:
//! - Path items, with their path-level parameters and description
//! - Presence of `get`, `post` and `delete` operations
//! - The `post` request body, per media type
//! - Local reference resolution (`$ref: "#/..."`)

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

use crate::core::error::{Error, Result};
use crate::generation::{
    Capabilities, DeclaredParameter, EndpointDescriptor, MediaType, ParameterLocation,
    RequestBody, Schema, SpecDocument,
};

/// References nested deeper than this are treated as a cycle
const MAX_REF_DEPTH: usize = 32;

/// OpenAPI specification parser
pub struct OpenApiParser {
    /// The raw JSON value of the OpenAPI spec
    json: JsonValue,
}

impl OpenApiParser {
    /// Create a new parser from JSON content
    pub fn new(json: JsonValue) -> Self {
        Self { json }
    }

    /// Parse the document into a [`SpecDocument`]
    pub fn parse(&self) -> Result<SpecDocument> {
        let version = self
            .json
            .get("openapi")
            .or_else(|| self.json.get("swagger"))
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::spec_parse("missing OpenAPI version"))?
            .to_string();

        let title = self
            .title()
            .ok_or_else(|| Error::spec_parse("missing info.title"))?
            .to_string();

        let paths = self
            .json
            .get("paths")
            .and_then(JsonValue::as_object)
            .ok_or_else(|| Error::spec_parse("missing 'paths' object"))?;

        let endpoints = paths
            .iter()
            .map(|(path, item)| self.parse_endpoint(path, item))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(endpoints = endpoints.len(), "Parsed OpenAPI paths");

        Ok(SpecDocument {
            version,
            title,
            endpoints,
        })
    }

    /// Get the title of the API
    pub fn title(&self) -> Option<&str> {
        self.json.get("info")?.get("title")?.as_str()
    }

    fn parse_endpoint(&self, path: &str, item: &JsonValue) -> Result<EndpointDescriptor> {
        let item = self.resolve(item, 0)?;
        if !item.is_object() {
            return Err(Error::spec_parse(format!(
                "path item {path:?} is not an object"
            )));
        }

        let operation = |method: &str| item.get(method).filter(|op| op.is_object());

        let parameters = match item.get("parameters") {
            Some(JsonValue::Array(params)) => params
                .iter()
                .map(|param| self.parse_parameter(path, param))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(Error::spec_parse(format!(
                    "parameters of {path:?} must be an array"
                )));
            }
            None => Vec::new(),
        };

        let request_body = operation("post")
            .and_then(|post| post.get("requestBody"))
            .map(|body| self.parse_request_body(path, body))
            .transpose()?;

        let description = item
            .get("description")
            .or_else(|| item.get("summary"))
            .and_then(JsonValue::as_str)
            .map(str::to_string);

        Ok(EndpointDescriptor {
            path: path.to_string(),
            description,
            parameters,
            request_body,
            capabilities: Capabilities {
                supports_read: operation("get").is_some(),
                supports_write: operation("post").is_some(),
                supports_delete: operation("delete").is_some(),
            },
        })
    }

    /// Parse a single path-level parameter
    fn parse_parameter(&self, path: &str, param: &JsonValue) -> Result<DeclaredParameter> {
        let param = self.resolve(param, 0)?;
        let name = param
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::spec_parse(format!("parameter of {path:?} is missing a name")))?
            .to_string();

        let location = match param.get("in").and_then(JsonValue::as_str) {
            Some("path") => ParameterLocation::Path,
            Some("query") => ParameterLocation::Query,
            Some("header") => ParameterLocation::Header,
            Some("cookie") => ParameterLocation::Cookie,
            other => {
                return Err(Error::spec_parse(format!(
                    "parameter {name:?} of {path:?} has invalid location {other:?}"
                )));
            }
        };

        let schema = match param.get("schema") {
            Some(schema) => self.parse_schema(schema, 0)?,
            None => Schema::default(),
        };

        Ok(DeclaredParameter {
            description: param
                .get("description")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            required: param
                .get("required")
                .and_then(JsonValue::as_bool)
                .unwrap_or(location == ParameterLocation::Path),
            name,
            location,
            schema,
        })
    }

    fn parse_request_body(&self, path: &str, body: &JsonValue) -> Result<RequestBody> {
        let body = self.resolve(body, 0)?;
        let Some(content) = body.get("content") else {
            return Ok(RequestBody::default());
        };
        let content = content.as_object().ok_or_else(|| {
            Error::spec_parse(format!("request body content of {path:?} must be an object"))
        })?;

        let mut media_types = BTreeMap::new();
        for (media_type, media) in content {
            let schema = media
                .get("schema")
                .map(|schema| self.parse_schema(schema, 0))
                .transpose()?;
            media_types.insert(media_type.clone(), MediaType { schema });
        }
        Ok(RequestBody {
            content: media_types,
        })
    }

    /// Parse a schema object, following references
    fn parse_schema(&self, schema: &JsonValue, depth: usize) -> Result<Schema> {
        if depth > MAX_REF_DEPTH {
            return Err(Error::spec_parse("schema nesting too deep or cyclic"));
        }
        let schema = self.resolve(schema, depth)?;

        let items = schema
            .get("items")
            .map(|items| self.parse_schema(items, depth + 1).map(Box::new))
            .transpose()?;

        let properties = match schema.get("properties").and_then(JsonValue::as_object) {
            Some(props) => props
                .iter()
                .map(|(name, prop)| -> Result<(String, Schema)> {
                    Ok((name.clone(), self.parse_schema(prop, depth + 1)?))
                })
                .collect::<Result<BTreeMap<_, _>>>()?,
            None => BTreeMap::new(),
        };

        let required = schema
            .get("required")
            .and_then(JsonValue::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(JsonValue::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Schema {
            schema_type: schema
                .get("type")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            description: schema
                .get("description")
                .and_then(JsonValue::as_str)
                .map(str::to_string),
            items,
            properties,
            required,
        })
    }

    /// Follow `$ref` chains until a concrete value is reached
    fn resolve<'a>(&'a self, value: &'a JsonValue, depth: usize) -> Result<&'a JsonValue> {
        let mut current = value;
        for _ in depth..=MAX_REF_DEPTH {
            match current.get("$ref").and_then(JsonValue::as_str) {
                Some(ref_str) => current = self.resolve_ref(ref_str)?,
                None => return Ok(current),
            }
        }
        Err(Error::spec_parse(format!(
            "reference chain starting at {value} is too deep or cyclic"
        )))
    }

    /// Resolve a single `$ref` reference
    fn resolve_ref(&self, ref_str: &str) -> Result<&JsonValue> {
        // Handle JSON pointer references (e.g., "#/components/schemas/TransformRoleRequest")
        if let Some(pointer) = ref_str.strip_prefix('#') {
            self.json
                .pointer(pointer)
                .ok_or_else(|| Error::spec_parse(format!("unable to resolve reference: {ref_str}")))
        } else {
            Err(Error::spec_parse(format!(
                "external references not supported: {ref_str}"
            )))
        }
    }
}
