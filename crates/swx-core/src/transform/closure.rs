use indexmap::{IndexMap, IndexSet};
use log::debug;

use crate::error::ResolveError;
use crate::parse::schema::Schema;
use crate::parse::spec::SwaggerSpec;

use super::references::ReferenceSource;

/// Named schemas, in declaration order.
pub type SchemaDict = IndexMap<String, Schema>;

/// The dictionary key a resolved definition is bound under. The prefix keeps
/// definition names apart from operation-derived seed names.
pub fn definition_type_name(name: &str) -> String {
    format!("_{name}")
}

/// Extend `seeds` with every definition reachable from it through `$ref` edges.
///
/// The result is fixpoint-closed: no schema in it references a definition
/// whose key is missing. Each definition is added at most once, so reference
/// cycles terminate.
pub fn resolve_closure(spec: &SwaggerSpec, seeds: SchemaDict) -> Result<SchemaDict, ResolveError> {
    let mut result = seeds;
    loop {
        let mut added = SchemaDict::new();
        for (reference, owner) in collect_references(&result)? {
            let name = target_name(&reference);
            let key = definition_type_name(name);
            if result.contains_key(&key) || added.contains_key(&key) {
                continue;
            }
            let schema = spec.definitions.get(name).ok_or_else(|| {
                ResolveError::UnresolvedReference {
                    reference: reference.clone(),
                    path: owner.clone(),
                }
            })?;
            debug!("resolved {reference} as {key} (required by {owner})");
            added.insert(key, schema.clone());
        }

        if added.is_empty() {
            return Ok(result);
        }
        result.extend(added);
    }
}

/// De-duplicated references of every schema in `dict`, each paired with the
/// first key that needed it.
fn collect_references(dict: &SchemaDict) -> Result<Vec<(String, String)>, ResolveError> {
    let mut seen = IndexSet::new();
    let mut out = Vec::new();
    for (key, schema) in dict {
        let mut refs = Vec::new();
        schema.collect_references(&mut vec![key.clone()], &mut refs)?;
        for reference in refs {
            if seen.insert(reference.clone()) {
                out.push((reference, key.clone()));
            }
        }
    }
    Ok(out)
}

/// Definition name of a reference: its last `/` segment.
fn target_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parse;

    fn spec_with(definitions: serde_json::Value) -> SwaggerSpec {
        parse::from_value(json!({
            "swagger": "2.0",
            "paths": {},
            "definitions": definitions
        }))
        .unwrap()
    }

    fn seed(name: &str, schema: serde_json::Value) -> SchemaDict {
        let mut dict = SchemaDict::new();
        dict.insert(name.to_string(), Schema::decode(&schema));
        dict
    }

    #[test]
    fn test_transitive_closure() {
        let spec = spec_with(json!({
            "Pet": {"type": "object", "properties": {"owner": {"$ref": "#/definitions/User"}}},
            "User": {"type": "object", "properties": {"address": {"$ref": "#/definitions/Address"}}},
            "Address": {"type": "string"},
            "Unused": {"type": "string"}
        }));
        let closed = resolve_closure(
            &spec,
            seed("GetPetRequest", json!({"$ref": "#/definitions/Pet"})),
        )
        .unwrap();
        let keys: Vec<&str> = closed.keys().map(String::as_str).collect();
        assert_eq!(keys, ["GetPetRequest", "_Pet", "_User", "_Address"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let spec = spec_with(json!({
            "A": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B"}}},
            "B": {"type": "object", "properties": {"a": {"$ref": "#/definitions/A"}}}
        }));
        let closed = resolve_closure(&spec, seed("Seed", json!({"$ref": "#/definitions/A"}))).unwrap();
        assert_eq!(closed.len(), 3);
        assert!(closed.contains_key("_A"));
        assert!(closed.contains_key("_B"));
    }

    #[test]
    fn test_self_reference() {
        let spec = spec_with(json!({
            "Node": {"type": "object", "properties": {
                "children": {"type": "array", "items": {"$ref": "#/definitions/Node"}}
            }}
        }));
        let closed = resolve_closure(&spec, seed("Seed", json!({"$ref": "#/definitions/Node"}))).unwrap();
        assert_eq!(closed.len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let spec = spec_with(json!({
            "A": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B"}}},
            "B": {"type": "array", "items": {"$ref": "#/definitions/A"}}
        }));
        let once = resolve_closure(&spec, seed("Seed", json!({"$ref": "#/definitions/A"}))).unwrap();
        let twice = resolve_closure(&spec, once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unresolved_reference() {
        let spec = spec_with(json!({
            "Pet": {"type": "object", "properties": {"owner": {"$ref": "#/definitions/Owner"}}}
        }));
        let err = resolve_closure(&spec, seed("Seed", json!({"$ref": "#/definitions/Pet"})))
            .unwrap_err();
        match err {
            ResolveError::UnresolvedReference { reference, path } => {
                assert_eq!(reference, "#/definitions/Owner");
                assert_eq!(path, "_Pet");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_path_includes_key() {
        let spec = spec_with(json!({}));
        let err = resolve_closure(
            &spec,
            seed("ListRequest", json!({"type": "object", "properties": {"q": 5}})),
        )
        .unwrap_err();
        match err {
            ResolveError::MalformedSchema { path, .. } => assert_eq!(path, "ListRequest.q"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_seeds_without_references_pass_through() {
        let spec = spec_with(json!({}));
        let seeds = seed("Plain", json!({"type": "string"}));
        assert_eq!(resolve_closure(&spec, seeds.clone()).unwrap(), seeds);
    }
}
