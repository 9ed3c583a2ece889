use indexmap::IndexMap;
use log::{debug, warn};
use swx_core::error::TransformError;
use swx_core::parse::operation::HttpMethod;
use swx_core::parse::parameter::Parameter;
use swx_core::parse::schema::Schema;
use swx_core::parse::spec::SwaggerSpec;
use swx_core::transform::{
    SchemaDict, capitalize, merge_parameters, operation_name, resolve_closure,
};

use super::line_comments;
use crate::generator::TypeScriptError;
use crate::type_mapper::schema_dict_to_ts;

/// Type declarations of one operation and the names the executor refers to.
#[derive(Debug, Clone)]
pub struct OperationTypes {
    pub declarations: Vec<String>,
    /// `<OpName>Request`
    pub request_name: String,
    /// `<OpName>Responses`
    pub responses_name: String,
    /// One `<OpName><status>Response` envelope per declared response.
    pub response_names: Vec<String>,
}

/// Build the request type, the per-status response types and every
/// definition they reach.
pub fn build_operation_types(
    spec: &SwaggerSpec,
    path: &str,
    method: HttpMethod,
) -> Result<OperationTypes, TypeScriptError> {
    let operation = spec
        .operation(path, method)
        .ok_or_else(|| TransformError::UnknownOperation {
            path: path.to_string(),
            method: method.as_str().to_string(),
        })?;
    let parameters = merge_parameters(spec, path, method)?;
    let type_prefix = capitalize(&operation_name(operation, method, path));

    let request_name = format!("{type_prefix}Request");
    let mut seeds = SchemaDict::new();
    insert_seed(&mut seeds, request_name.clone(), request_schema(&parameters))?;

    let mut envelopes = Vec::with_capacity(operation.responses.len());
    let mut response_names = Vec::with_capacity(operation.responses.len());
    for (status, response) in &operation.responses {
        let name = format!("{type_prefix}{status}Response");
        let content_name = format!("{name}Content");
        let content = response.schema.clone().unwrap_or_else(Schema::any_object);
        insert_seed(&mut seeds, content_name.clone(), content)?;

        envelopes.push(response_envelope(
            &name,
            status,
            &content_name,
            response.description.as_deref(),
        ));
        response_names.push(name);
    }
    check_definition_collisions(spec, &seeds)?;

    let closed = resolve_closure(spec, seeds).map_err(TransformError::from)?;
    let responses_name = format!("{type_prefix}Responses");
    let union = if response_names.is_empty() {
        "never".to_string()
    } else {
        response_names.join(" | ")
    };

    let mut declarations = schema_dict_to_ts(&closed)?;
    declarations.extend(envelopes);
    declarations.push(format!("export type {responses_name} = {union};"));

    Ok(OperationTypes {
        declarations,
        request_name,
        responses_name,
        response_names,
    })
}

/// The synthetic request object: one property per merged parameter.
fn request_schema(parameters: &[Parameter]) -> Schema {
    let mut properties = IndexMap::new();
    let mut required = Vec::new();
    for param in parameters {
        if properties.contains_key(&param.name) {
            warn!(
                "parameter {} ({}) shares its name with an earlier parameter; keeping the first",
                param.name,
                param.location.as_str()
            );
            continue;
        }
        properties.insert(param.name.clone(), param.value_schema());
        if param.required {
            required.push(param.name.clone());
        }
    }
    Schema::object(properties, required)
}

fn insert_seed(seeds: &mut SchemaDict, name: String, schema: Schema) -> Result<(), TransformError> {
    match seeds.get(&name) {
        Some(existing) if *existing != schema => Err(TransformError::TypeNameCollision(name)),
        Some(_) => {
            debug!("{name} is seeded twice with the same schema");
            Ok(())
        }
        None => {
            seeds.insert(name, schema);
            Ok(())
        }
    }
}

/// A seed named like a resolved definition would shadow it in the closure.
fn check_definition_collisions(spec: &SwaggerSpec, seeds: &SchemaDict) -> Result<(), TransformError> {
    for (name, schema) in seeds {
        let shadowed = name
            .strip_prefix('_')
            .and_then(|definition| spec.definitions.get(definition));
        if let Some(definition) = shadowed
            && definition != schema
        {
            return Err(TransformError::TypeNameCollision(name.clone()));
        }
    }
    Ok(())
}

fn response_envelope(
    name: &str,
    status: &str,
    content_name: &str,
    description: Option<&str>,
) -> String {
    let status_type = match status.parse::<u16>() {
        Ok(code) => code.to_string(),
        Err(_) => "any".to_string(),
    };
    let mut lines = description.map(line_comments).unwrap_or_default();
    lines.push(format!("export interface {name} {{"));
    lines.push(format!("  status: {status_type};"));
    lines.push("  text: string;".to_string());
    lines.push(format!("  json?: {content_name};"));
    lines.push("}".to_string());
    lines.join("\n")
}
