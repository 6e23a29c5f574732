#![allow(non_snake_case)]

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const OPENAPI_VERSION: &str = "3.0.3";
pub const DEFAULT_TITLE: &str = "Converted API";
pub const DEFAULT_API_VERSION: &str = "1.0.0";
pub const DEFAULT_SERVER_URL: &str = "https://postman-echo.com";

/// Mapping from lower-cased HTTP method to its operation
pub type PathItem = IndexMap<String, Operation>;

/// Represents a complete OpenAPI 3.0.3 document produced from a collection
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct OpenAPI {
    pub openapi: String,
    pub info: Info,
    pub servers: Vec<Server>,
    pub paths: IndexMap<String, PathItem>,
    pub components: Components,
    pub tags: Vec<Tag>,
}

impl OpenAPI {
    /// Create an empty document with the fixed header sections filled in
    pub fn new(title: Option<&str>, description: Option<&str>) -> Self {
        Self {
            openapi: OPENAPI_VERSION.to_string(),
            info: Info {
                title: title
                    .filter(|t| !t.is_empty())
                    .unwrap_or(DEFAULT_TITLE)
                    .to_string(),
                description: description.unwrap_or_default().to_string(),
                version: DEFAULT_API_VERSION.to_string(),
                contact: Contact::default(),
            },
            servers: vec![Server {
                url: DEFAULT_SERVER_URL.to_string(),
            }],
            paths: IndexMap::new(),
            components: Components::default(),
            tags: Vec::new(),
        }
    }

    /// Register a tag unless one with the same name already exists.
    /// Returns true if the tag was added.
    pub fn add_tag(&mut self, name: &str, description: &str) -> bool {
        if self.tags.iter().any(|t| t.name == name) {
            return false;
        }
        self.tags.push(Tag {
            name: name.to_string(),
            description: description.to_string(),
        });
        true
    }
}

/// Information about the API
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Info {
    pub title: String,
    pub description: String,
    pub version: String,
    pub contact: Contact,
}

/// Contact information, always emitted empty
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct Contact {}

/// Server object used for API endpoints
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Server {
    pub url: String,
}

/// Components object; schemas stay empty, security schemes are fixed
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Components {
    pub schemas: IndexMap<String, Schema>,
    pub securitySchemes: SecuritySchemes,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            schemas: IndexMap::new(),
            securitySchemes: SecuritySchemes {
                basicAuth: SecurityScheme::http("basic"),
                digestAuth: SecurityScheme::http("digest"),
            },
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SecuritySchemes {
    pub basicAuth: SecurityScheme,
    pub digestAuth: SecurityScheme,
}

/// Security scheme object
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub type_: String,
    pub scheme: String,
}

impl SecurityScheme {
    fn http(scheme: &str) -> Self {
        Self {
            type_: "http".to_string(),
            scheme: scheme.to_string(),
        }
    }
}

/// Tag information for API operations
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    pub description: String,
}

/// An operation (endpoint) of the API
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub summary: String,
    pub description: String,
    pub operationId: String,
    pub parameters: Vec<Parameter>,
    pub responses: BTreeMap<String, Response>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requestBody: Option<RequestBody>,
}

/// Location of a parameter
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
}

/// Parameter for an operation
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub in_type: ParameterLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    pub schema: Schema,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body object
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct RequestBody {
    pub required: bool,
    pub content: IndexMap<String, MediaType>,
}

/// Media type object; `schema` is absent when the body shape is not understood
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// API response
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Response {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Minimal schema object covering the shapes a collection can describe
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Schema {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,
}

impl Schema {
    pub fn string() -> Self {
        Self::typed("string")
    }

    pub fn typed(type_: &str) -> Self {
        Self {
            type_: type_.to_string(),
            example: None,
            properties: None,
        }
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }
}
