use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// A Swagger schema node, decoded from raw JSON into a closed set of shapes.
///
/// Decoding never fails: a node whose shape cannot be understood becomes
/// [`Schema::Malformed`] and is reported, with its access path, by the
/// traversal that reaches it.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// `{"$ref": "#/definitions/Name"}`
    Ref(String),
    Boolean,
    Number,
    Integer,
    String,
    /// A string schema restricted to literal values.
    Enum(Vec<Value>),
    File,
    Array(Option<ArrayItems>),
    Object {
        properties: Option<IndexMap<String, Schema>>,
        required: Vec<String>,
    },
    /// No usable `type` keyword.
    Unknown,
    Malformed {
        reason: String,
    },
}

/// The `items` of an array schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItems {
    Single(Box<Schema>),
    /// Positional tuple form (`items: [...]`).
    Tuple(Vec<Schema>),
}

impl Schema {
    /// An object schema with the given properties.
    pub fn object(properties: IndexMap<String, Schema>, required: Vec<String>) -> Self {
        Schema::Object {
            properties: Some(properties),
            required,
        }
    }

    /// An object schema without declared properties.
    pub fn any_object() -> Self {
        Schema::Object {
            properties: None,
            required: Vec::new(),
        }
    }

    /// Decode a raw JSON node.
    pub fn decode(value: &Value) -> Schema {
        let Some(node) = value.as_object() else {
            return malformed(format!("expected a schema object, got {}", kind_of(value)));
        };

        if let Some(reference) = node.get("$ref") {
            return match reference.as_str() {
                Some(r) => Schema::Ref(r.to_string()),
                None => malformed("`$ref` must be a string"),
            };
        }

        match node.get("type").and_then(Value::as_str) {
            Some(type_name) => decode_typed(type_name, node),
            // Properties without a type keyword are an implicit object.
            None if node.contains_key("properties") => decode_object(node),
            None => Schema::Unknown,
        }
    }
}

fn decode_typed(type_name: &str, node: &Map<String, Value>) -> Schema {
    match type_name {
        "string" => match node.get("enum") {
            None => Schema::String,
            Some(Value::Array(values)) => Schema::Enum(values.clone()),
            Some(_) => malformed("`enum` must be an array"),
        },
        // Numeric enums degrade to the bare numeric type.
        "number" => Schema::Number,
        "integer" => Schema::Integer,
        "boolean" => Schema::Boolean,
        "file" => Schema::File,
        "array" => match node.get("items") {
            None => Schema::Array(None),
            Some(Value::Array(slots)) => Schema::Array(Some(ArrayItems::Tuple(
                slots.iter().map(Schema::decode).collect(),
            ))),
            Some(item) if item.is_object() => {
                Schema::Array(Some(ArrayItems::Single(Box::new(Schema::decode(item)))))
            }
            Some(other) => malformed(format!(
                "`items` must be a schema or a list of schemas, got {}",
                kind_of(other)
            )),
        },
        "object" => decode_object(node),
        _ => Schema::Unknown,
    }
}

fn decode_object(node: &Map<String, Value>) -> Schema {
    let required = match node.get("required") {
        None => Vec::new(),
        Some(Value::Array(names)) => {
            let names: Option<Vec<String>> = names
                .iter()
                .map(|n| n.as_str().map(str::to_string))
                .collect();
            match names {
                Some(names) => names,
                None => return malformed("`required` must list property names"),
            }
        }
        Some(_) => return malformed("`required` must be an array"),
    };

    let properties = match node.get("properties") {
        None | Some(Value::Null) => None,
        Some(Value::Object(props)) => Some(
            props
                .iter()
                .map(|(name, prop)| (name.clone(), Schema::decode(prop)))
                .collect(),
        ),
        Some(other) => {
            return malformed(format!(
                "`properties` must be an object, got {}",
                kind_of(other)
            ));
        }
    };

    Schema::Object {
        properties,
        required,
    }
}

fn malformed(reason: impl Into<String>) -> Schema {
    Schema::Malformed {
        reason: reason.into(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Schema::decode(&value))
    }
}
