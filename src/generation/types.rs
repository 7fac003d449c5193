//! Core types for the generation domain

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::error::Error;

/// Category of generated output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// A mutable managed entity
    Resource,
    /// A read-only queryable entity
    DataSource,
    /// Companion documentation stub for a resource or data source
    Doc,
}

impl ArtifactKind {
    /// Returns the kind identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resource => "resource",
            Self::DataSource => "data_source",
            Self::Doc => "doc",
        }
    }

    /// Returns the human readable label used in doc stubs
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Resource => "Resource",
            Self::DataSource => "Data Source",
            Self::Doc => "Doc",
        }
    }

    /// Returns the output subtree this kind's artifacts are written under
    pub fn subtree(&self) -> &'static str {
        match self {
            Self::Resource => "resources",
            Self::DataSource => "datasources",
            Self::Doc => "docs",
        }
    }

    /// Whether an endpoint can be selected as this kind
    pub fn is_code(&self) -> bool {
        !matches!(self, Self::Doc)
    }

    /// Returns all artifact kinds
    pub fn all() -> [ArtifactKind; 3] {
        [Self::Resource, Self::DataSource, Self::Doc]
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "resource" | "resources" => Ok(Self::Resource),
            "data_source" | "datasource" | "datasources" | "data-source" => Ok(Self::DataSource),
            "doc" | "docs" => Ok(Self::Doc),
            _ => Err(Error::config(format!("Unknown artifact kind: {s}"))),
        }
    }
}

/// Where a parameter is declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// A property of the write operation's request body schema
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
            Self::Body => "body",
        }
    }
}

/// Parameter types the templates know how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParameterType {
    #[serde(rename = "string")]
    String,
    #[serde(rename = "boolean")]
    Boolean,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "array-of-string")]
    StringArray,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::StringArray => "array-of-string",
        }
    }

    /// Maps a schema onto a supported type, or `None` when it falls outside the set.
    pub fn from_schema(schema: &Schema) -> Option<Self> {
        match schema.schema_type.as_deref()? {
            "string" => Some(Self::String),
            "boolean" => Some(Self::Boolean),
            "integer" => Some(Self::Integer),
            "array" => match schema.items.as_deref()?.schema_type.as_deref()? {
                "string" => Some(Self::StringArray),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The subset of a JSON schema the generator looks at
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub schema_type: Option<String>,
    pub description: Option<String>,
    pub items: Option<Box<Schema>>,
    pub properties: BTreeMap<String, Schema>,
    pub required: Vec<String>,
}

impl Schema {
    pub fn of_type(schema_type: &str) -> Self {
        Self {
            schema_type: Some(schema_type.to_string()),
            ..Default::default()
        }
    }

    /// Describes the schema's type for diagnostics, e.g. `array<integer>` or `<none>`.
    pub fn type_label(&self) -> String {
        match (self.schema_type.as_deref(), self.items.as_deref()) {
            (None, _) => "<none>".to_string(),
            (Some("array"), Some(items)) => format!("array<{}>", items.type_label()),
            (Some(t), _) => t.to_string(),
        }
    }
}

/// A parameter exactly as declared at path level in the specification
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredParameter {
    pub name: String,
    pub description: Option<String>,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: Schema,
}

/// One media type entry of a request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaType {
    pub schema: Option<Schema>,
}

/// Request body of the write operation, keyed by media type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    pub content: BTreeMap<String, MediaType>,
}

/// Which operations an endpoint defines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub supports_read: bool,
    pub supports_write: bool,
    pub supports_delete: bool,
}

/// One specification path entry
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointDescriptor {
    pub path: String,
    pub description: Option<String>,
    pub parameters: Vec<DeclaredParameter>,
    /// Request body of the write operation, if it declares one
    pub request_body: Option<RequestBody>,
    pub capabilities: Capabilities,
}

/// A parsed specification document
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    pub version: String,
    pub title: String,
    pub endpoints: Vec<EndpointDescriptor>,
}

impl SpecDocument {
    /// Looks up an endpoint by its exact path
    pub fn endpoint(&self, path: &str) -> Option<&EndpointDescriptor> {
        self.endpoints.iter().find(|e| e.path == path)
    }
}

/// A resolved, validated parameter ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub description: String,
    pub location: ParameterLocation,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub required: bool,
}

/// Generated artifact
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// What was rendered: a code kind or `Doc`
    pub kind: ArtifactKind,
    /// The code kind this artifact belongs to; equal to `kind` for code artifacts
    pub subject: ArtifactKind,
    /// Endpoint path the artifact was generated from
    pub endpoint: String,
    pub content: String,
}
