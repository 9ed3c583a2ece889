use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use super::operation::{HttpMethod, Operation, PathItem};
use super::schema::Schema;
use super::security::{SecurityRequirement, SecurityScheme};

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    pub version: String,
}

/// Top-level Swagger 2.0 specification.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SwaggerSpec {
    pub swagger: String,

    #[serde(default)]
    pub info: Info,

    pub host: Option<String>,

    #[serde(rename = "basePath")]
    pub base_path: Option<String>,

    #[serde(default)]
    pub schemes: Vec<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,

    /// Shared parameters, decoded by the operations that reference them.
    #[serde(default)]
    pub parameters: IndexMap<String, Value>,

    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(rename = "securityDefinitions", default)]
    pub security_definitions: IndexMap<String, SecurityScheme>,
}

impl SwaggerSpec {
    /// Look up the operation for a path/method pair.
    pub fn operation(&self, path: &str, method: HttpMethod) -> Option<&Operation> {
        self.paths.get(path)?.operation(method)
    }

    /// The URL scheme used for generated requests.
    pub fn scheme(&self) -> &str {
        self.schemes.first().map(String::as_str).unwrap_or("https")
    }
}
