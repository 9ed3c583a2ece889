use crate::error::ResolveError;
use crate::parse::parameter::Parameter;
use crate::parse::response::Response;
use crate::parse::schema::{ArrayItems, Schema};

/// A node that may mention `$ref` targets somewhere inside it.
pub trait ReferenceSource {
    /// Append every reference target to `refs`. `path` holds the accessors
    /// leading to `self` and is restored before returning.
    fn collect_references(
        &self,
        path: &mut Vec<String>,
        refs: &mut Vec<String>,
    ) -> Result<(), ResolveError>;
}

/// All reference targets mentioned by `node`, in traversal order.
pub fn extract_references<T: ReferenceSource + ?Sized>(node: &T) -> Result<Vec<String>, ResolveError> {
    let mut refs = Vec::new();
    node.collect_references(&mut Vec::new(), &mut refs)?;
    Ok(refs)
}

/// Render an accessor path for diagnostics, e.g. `Pet.owner.tags[]`.
pub fn format_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.concat()
    }
}

fn descend<T: ReferenceSource + ?Sized>(
    node: &T,
    accessor: String,
    path: &mut Vec<String>,
    refs: &mut Vec<String>,
) -> Result<(), ResolveError> {
    path.push(accessor);
    let result = node.collect_references(path, refs);
    path.pop();
    result
}

impl ReferenceSource for Schema {
    fn collect_references(
        &self,
        path: &mut Vec<String>,
        refs: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        match self {
            Schema::Ref(target) => refs.push(target.clone()),
            Schema::Object {
                properties: Some(properties),
                ..
            } => {
                for (name, property) in properties {
                    descend(property, format!(".{name}"), path, refs)?;
                }
            }
            Schema::Array(Some(ArrayItems::Single(item))) => {
                descend(item.as_ref(), "[]".to_string(), path, refs)?;
            }
            Schema::Array(Some(ArrayItems::Tuple(slots))) => {
                for (idx, slot) in slots.iter().enumerate() {
                    descend(slot, format!("[{idx}]"), path, refs)?;
                }
            }
            Schema::Malformed { reason } => {
                return Err(ResolveError::MalformedSchema {
                    path: format_path(path),
                    reason: reason.clone(),
                });
            }
            Schema::Object {
                properties: None, ..
            }
            | Schema::Array(None)
            | Schema::Boolean
            | Schema::Number
            | Schema::Integer
            | Schema::String
            | Schema::Enum(_)
            | Schema::File
            | Schema::Unknown => {}
        }
        Ok(())
    }
}

impl ReferenceSource for Parameter {
    fn collect_references(
        &self,
        path: &mut Vec<String>,
        refs: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        match self.schema {
            Some(ref schema) => descend(schema, "[schema]".to_string(), path, refs),
            None => self.value_schema().collect_references(path, refs),
        }
    }
}

impl ReferenceSource for Response {
    fn collect_references(
        &self,
        path: &mut Vec<String>,
        refs: &mut Vec<String>,
    ) -> Result<(), ResolveError> {
        match self.schema {
            Some(ref schema) => descend(schema, "[schema]".to_string(), path, refs),
            None => Ok(()),
        }
    }
}
