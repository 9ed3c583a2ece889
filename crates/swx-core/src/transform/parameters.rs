use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ResolveError, TransformError};
use crate::parse::operation::HttpMethod;
use crate::parse::parameter::{Parameter, ParameterLocation, ParameterOrRef};
use crate::parse::security::{ApiKeyLocation, SecurityRequirement, SecurityScheme};
use crate::parse::spec::SwaggerSpec;

/// The effective parameter list of an operation.
///
/// Operation-level parameters come first, then path-level ones, then the
/// parameters implied by the operation's security requirements. A later
/// parameter is dropped when an earlier one has the same name and location.
pub fn merge_parameters(
    spec: &SwaggerSpec,
    path: &str,
    method: HttpMethod,
) -> Result<Vec<Parameter>, TransformError> {
    let unknown = || TransformError::UnknownOperation {
        path: path.to_string(),
        method: method.as_str().to_string(),
    };
    let item = spec.paths.get(path).ok_or_else(unknown)?;
    let operation = item.operation(method).ok_or_else(unknown)?;

    let location = format!("paths.{path}.{}", method.key());
    let mut candidates = resolve_parameters(spec, &operation.parameters, &location)?;
    candidates.extend(resolve_parameters(
        spec,
        &item.parameters,
        &format!("paths.{path}"),
    )?);

    let requirements = operation
        .security
        .as_ref()
        .or(spec.security.as_ref())
        .map(Vec::as_slice)
        .unwrap_or_default();
    candidates.extend(security_parameters(spec, requirements));

    let mut merged: Vec<Parameter> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let duplicate = merged
            .iter()
            .any(|p| p.name == candidate.name && p.location == candidate.location);
        if duplicate {
            debug!(
                "{location}: dropping shadowed {} parameter {}",
                candidate.location.as_str(),
                candidate.name
            );
        } else {
            merged.push(candidate);
        }
    }
    Ok(merged)
}

fn resolve_parameters(
    spec: &SwaggerSpec,
    params: &[Value],
    location: &str,
) -> Result<Vec<Parameter>, TransformError> {
    params
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let path = format!("{location}.parameters[{idx}]");
            let invalid = |err: serde_json::Error| TransformError::InvalidParameter {
                path: path.clone(),
                reason: err.to_string(),
            };
            match ParameterOrRef::decode(raw).map_err(invalid)? {
                ParameterOrRef::Parameter(param) => Ok(param),
                ParameterOrRef::Ref { ref_path } => lookup_parameter(spec, &ref_path, &path),
            }
        })
        .collect()
}

fn lookup_parameter(
    spec: &SwaggerSpec,
    ref_path: &str,
    path: &str,
) -> Result<Parameter, TransformError> {
    let unresolved = || ResolveError::UnresolvedReference {
        reference: ref_path.to_string(),
        path: path.to_string(),
    };
    let name = ref_path.strip_prefix("#/parameters/").ok_or_else(unresolved)?;
    let raw = spec.parameters.get(name).ok_or_else(unresolved)?;
    Parameter::deserialize(raw).map_err(|err| TransformError::InvalidParameter {
        path: format!("parameters.{name}"),
        reason: err.to_string(),
    })
}

fn security_parameters(
    spec: &SwaggerSpec,
    requirements: &[SecurityRequirement],
) -> Vec<Parameter> {
    let schemes: Vec<&SecurityScheme> = requirements
        .iter()
        .flat_map(|requirement| requirement.keys())
        .filter_map(|policy| {
            let scheme = spec.security_definitions.get(policy);
            if scheme.is_none() {
                debug!("security policy {policy} is not declared in securityDefinitions");
            }
            scheme
        })
        .collect();

    let api_keys = schemes.iter().filter_map(|scheme| match scheme {
        SecurityScheme::ApiKey { name, location } => {
            let location = match location {
                ApiKeyLocation::Header => ParameterLocation::Header,
                ApiKeyLocation::Query => ParameterLocation::Query,
            };
            Some(Parameter::optional_string(name, location))
        }
        _ => None,
    });
    let basic = schemes
        .iter()
        .filter(|scheme| matches!(scheme, SecurityScheme::Basic))
        .map(|_| Parameter::optional_string("Authorization", ParameterLocation::Header));

    api_keys.chain(basic).collect()
}
