use swx_core::error::ResolveError;
use swx_core::parse::schema::{ArrayItems, Schema};
use swx_core::transform::{SchemaDict, definition_type_name};

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Map a `Schema` to its TypeScript type expression.
///
/// `path` names the node for error messages only (`Pet.owner`, `Pet.tags[]`).
pub fn schema_to_ts(schema: &Schema, path: &str) -> Result<String, ResolveError> {
    let ts = match schema {
        Schema::Ref(reference) => ref_to_ts(reference, path)?,
        Schema::Enum(values) if values.is_empty() => "never".to_string(),
        Schema::Enum(values) => values
            .iter()
            .map(serde_json::Value::to_string)
            .collect::<Vec<_>>()
            .join(" | "),
        Schema::Boolean => "boolean".to_string(),
        Schema::Number | Schema::Integer => "number".to_string(),
        Schema::String => "string".to_string(),
        Schema::File => "Blob".to_string(),
        Schema::Array(None) => "any[]".to_string(),
        Schema::Array(Some(ArrayItems::Single(item))) => {
            format!("Array<{}>", schema_to_ts(item, &format!("{path}[]"))?)
        }
        Schema::Array(Some(ArrayItems::Tuple(slots))) if slots.is_empty() => "any[]".to_string(),
        Schema::Array(Some(ArrayItems::Tuple(slots))) => {
            let variants = slots
                .iter()
                .enumerate()
                .map(|(idx, slot)| schema_to_ts(slot, &format!("{path}[{idx}]")))
                .collect::<Result<Vec<_>, _>>()?;
            format!("Array<{}>", variants.join(" | "))
        }
        Schema::Object {
            properties: None, ..
        } => "any".to_string(),
        Schema::Object {
            properties: Some(properties),
            ..
        } if properties.is_empty() => "{}".to_string(),
        Schema::Object {
            properties: Some(properties),
            required,
        } => {
            let fields = properties
                .iter()
                .map(|(name, property)| {
                    let ts_type = schema_to_ts(property, &format!("{path}.{name}"))?;
                    let optional = if required.contains(name) { "" } else { "?" };
                    Ok(format!("{}{optional}: {ts_type}", property_key(name)))
                })
                .collect::<Result<Vec<_>, ResolveError>>()?;
            format!("{{ {} }}", fields.join("; "))
        }
        Schema::Unknown | Schema::Malformed { .. } => "void".to_string(),
    };
    Ok(ts)
}

/// Declarations for every entry of `dict`, in insertion order.
pub fn schema_dict_to_ts(dict: &SchemaDict) -> Result<Vec<String>, ResolveError> {
    dict.iter()
        .map(|(name, schema)| {
            let ts = schema_to_ts(schema, name)?;
            Ok(if is_record(&ts) {
                format!("export interface {name} {ts}")
            } else {
                format!("export type {name} = {ts};")
            })
        })
        .collect()
}

fn ref_to_ts(reference: &str, path: &str) -> Result<String, ResolveError> {
    match reference.strip_prefix(DEFINITIONS_PREFIX) {
        Some(name) if !name.is_empty() && !name.contains('/') => Ok(definition_type_name(name)),
        _ => Err(ResolveError::InvalidReference {
            reference: reference.to_string(),
            path: path.to_string(),
        }),
    }
}

fn is_record(ts: &str) -> bool {
    ts.starts_with('{')
}

/// A property name as written in a type literal; quoted unless it is an identifier.
pub fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        serde_json::Value::String(name.to_string()).to_string()
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}
