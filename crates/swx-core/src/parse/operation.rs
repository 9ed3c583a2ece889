use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::response::Response;
use super::security::SecurityRequirement;

/// HTTP methods recognized as operations inside a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 6] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    /// Match a path-item key. Keys are case sensitive, as in the document.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "get" => Some(HttpMethod::Get),
            "put" => Some(HttpMethod::Put),
            "post" => Some(HttpMethod::Post),
            "delete" => Some(HttpMethod::Delete),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// The lowercase path-item key.
    pub fn key(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Raw entries, decoded by `merge_parameters` so a bad one fails only
    /// this operation.
    #[serde(default)]
    pub parameters: Vec<Value>,

    #[serde(default)]
    pub responses: IndexMap<String, Response>,

    #[serde(default)]
    pub consumes: Vec<String>,

    #[serde(default)]
    pub produces: Vec<String>,

    pub deprecated: Option<bool>,
    pub security: Option<Vec<SecurityRequirement>>,
}

/// One keyed entry of a path item other than `parameters`.
#[derive(Debug, Clone, PartialEq)]
pub enum PathEntry {
    Operation(Box<Operation>),
    /// An object that does not decode as an operation.
    Invalid {
        operation_id: Option<String>,
        error: String,
    },
    /// A value that is not an object (`null`, vendor extension scalars, ...).
    Other(Value),
}

impl PathEntry {
    pub fn decode(raw: Value) -> Self {
        if !raw.is_object() {
            return PathEntry::Other(raw);
        }
        let operation_id = raw
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string);
        match serde_json::from_value::<Operation>(raw) {
            Ok(operation) => PathEntry::Operation(Box::new(operation)),
            Err(err) => PathEntry::Invalid {
                operation_id,
                error: err.to_string(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for PathEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(PathEntry::decode)
    }
}

/// A path item: shared parameters plus entries keyed by HTTP method, in
/// document order.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub parameters: Vec<Value>,

    #[serde(flatten)]
    pub entries: IndexMap<String, PathEntry>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match self.entries.get(method.key()) {
            Some(PathEntry::Operation(op)) => Some(op),
            _ => None,
        }
    }
}
