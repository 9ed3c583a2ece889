use serde::Deserialize;
use serde_json::{Map, Value};

use super::schema::Schema;

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ParameterLocation {
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "formData")]
    FormData,
    #[serde(rename = "body")]
    Body,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::FormData => "formData",
            ParameterLocation::Body => "body",
        }
    }

    /// Whether the parameter travels in the request body.
    pub fn is_body(&self) -> bool {
        matches!(self, ParameterLocation::Body | ParameterLocation::FormData)
    }
}

/// An operation parameter.
///
/// Body parameters carry a `schema`; every other location describes its value
/// with the primitive keywords (`type`, `items`, `enum`, ...) kept in `shape`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    pub schema: Option<Schema>,

    #[serde(flatten)]
    pub shape: Map<String, Value>,
}

impl Parameter {
    /// An optional `string` parameter, as synthesized for security schemes.
    pub fn optional_string(name: &str, location: ParameterLocation) -> Self {
        let mut shape = Map::new();
        shape.insert("type".to_string(), Value::String("string".to_string()));
        Self {
            name: name.to_string(),
            location,
            description: None,
            required: false,
            schema: None,
            shape,
        }
    }

    /// The declared `type` keyword of a non-body parameter.
    pub fn type_name(&self) -> Option<&str> {
        self.shape.get("type").and_then(Value::as_str)
    }

    pub fn is_array(&self) -> bool {
        self.type_name() == Some("array")
    }

    /// The schema describing this parameter's value.
    pub fn value_schema(&self) -> Schema {
        match self.schema {
            Some(ref schema) => schema.clone(),
            None => Schema::decode(&Value::Object(self.shape.clone())),
        }
    }
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterOrRef {
    Ref { ref_path: String },
    Parameter(Parameter),
}

impl ParameterOrRef {
    /// Decode one raw `parameters` entry. A `$ref` wins over inline keywords.
    pub fn decode(raw: &Value) -> Result<Self, serde_json::Error> {
        match raw.get("$ref").and_then(Value::as_str) {
            Some(ref_path) => Ok(ParameterOrRef::Ref {
                ref_path: ref_path.to_string(),
            }),
            None => Parameter::deserialize(raw).map(ParameterOrRef::Parameter),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parse::schema::ArrayItems;

    #[test]
    fn test_query_array_shape() {
        let param: Parameter = serde_json::from_value(json!({
            "name": "limit",
            "in": "query",
            "type": "array",
            "items": {"type": "number"},
            "collectionFormat": "multi"
        }))
        .unwrap();
        assert!(param.is_array());
        assert!(!param.required);
        assert_eq!(
            param.value_schema(),
            Schema::Array(Some(ArrayItems::Single(Box::new(Schema::Number))))
        );
    }

    #[test]
    fn test_body_schema() {
        let param: Parameter = serde_json::from_value(json!({
            "name": "pet",
            "in": "body",
            "required": true,
            "schema": {"$ref": "#/definitions/Pet"}
        }))
        .unwrap();
        assert!(param.location.is_body());
        assert_eq!(
            param.value_schema(),
            Schema::Ref("#/definitions/Pet".to_string())
        );
    }

    #[test]
    fn test_parameter_ref() {
        let param = ParameterOrRef::decode(&json!({"$ref": "#/parameters/PageSize"})).unwrap();
        assert_eq!(
            param,
            ParameterOrRef::Ref {
                ref_path: "#/parameters/PageSize".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_location_names_the_field() {
        let err = ParameterOrRef::decode(&json!({"name": "sid", "in": "cookie"})).unwrap_err();
        assert!(err.to_string().contains("unknown variant `cookie`"), "{err}");
    }
}
