pub mod operation;
pub mod parameter;
pub mod response;
pub mod schema;
pub mod security;
pub mod spec;

use serde_json::Value;

use crate::error::ParseError;
use spec::SwaggerSpec;

/// Parse a Swagger spec from YAML.
pub fn from_yaml(input: &str) -> Result<SwaggerSpec, ParseError> {
    let raw: Value = serde_yaml_ng::from_str(input)?;
    from_value(raw)
}

/// Parse a Swagger spec from JSON.
pub fn from_json(input: &str) -> Result<SwaggerSpec, ParseError> {
    let raw: Value = serde_json::from_str(input)?;
    from_value(raw)
}

/// Parse a Swagger spec from YAML, replacing top-level keys with `overrides` first.
pub fn from_yaml_with_overrides(
    input: &str,
    overrides: Option<&Value>,
) -> Result<SwaggerSpec, ParseError> {
    let raw: Value = serde_yaml_ng::from_str(input)?;
    from_value(apply_overrides(raw, overrides)?)
}

/// Parse a Swagger spec from JSON, replacing top-level keys with `overrides` first.
pub fn from_json_with_overrides(
    input: &str,
    overrides: Option<&Value>,
) -> Result<SwaggerSpec, ParseError> {
    let raw: Value = serde_json::from_str(input)?;
    from_value(apply_overrides(raw, overrides)?)
}

/// Decode an already-loaded document.
pub fn from_value(mut raw: Value) -> Result<SwaggerSpec, ParseError> {
    match raw.get_mut("swagger") {
        None => return Err(ParseError::NotSwagger),
        // Unquoted `swagger: 2.0` in YAML arrives as a number.
        Some(version) if version.is_number() => *version = Value::String(version.to_string()),
        Some(_) => {}
    }
    let spec: SwaggerSpec = serde_json::from_value(raw)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Shallow merge: each top-level key of `overrides` replaces the document's.
pub fn apply_overrides(mut raw: Value, overrides: Option<&Value>) -> Result<Value, ParseError> {
    let Some(overrides) = overrides else {
        return Ok(raw);
    };
    let Value::Object(patch) = overrides else {
        return Err(ParseError::InvalidOverrides(overrides.to_string()));
    };
    if let Value::Object(ref mut doc) = raw {
        for (key, value) in patch {
            doc.insert(key.clone(), value.clone());
        }
    }
    Ok(raw)
}

fn validate_version(spec: &SwaggerSpec) -> Result<(), ParseError> {
    if !spec.swagger.starts_with("2.") {
        return Err(ParseError::UnsupportedVersion(spec.swagger.clone()));
    }
    Ok(())
}
