use std::collections::HashSet;

use log::{debug, error, info, warn};
use swx_core::config::SwxConfig;
use swx_core::error::{ResolveError, TransformError};
use swx_core::parse::operation::{HttpMethod, Operation, PathEntry};
use swx_core::parse::spec::SwaggerSpec;
use swx_core::transform::{merge_parameters, name_from_id, operation_name};
use swx_core::{CodeGenerator, GeneratedFile, GenerationReport, OperationFailure};
use thiserror::Error;

use crate::emitters::component::emit_component;
use crate::emitters::executor::{ExecutorInput, emit_executor};
use crate::emitters::request::build_request;
use crate::emitters::types::build_operation_types;

#[derive(Debug, Error)]
pub enum TypeScriptError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("unrecognized request media type {mime:?} for {operation}")]
    UnsupportedMediaType { operation: String, mime: String },

    #[error("{operation} consumes {mime} but declares no body parameter")]
    MissingBodyParameter { operation: String, mime: String },

    #[error("template render failed: {0}")]
    Render(#[from] minijinja::Error),
}

/// Configuration for the TypeScript generator.
#[derive(Debug, Clone)]
pub struct TypeScriptConfig {
    /// Emit the React render-prop component.
    pub component: bool,
    /// Emit the executor's `debug` flag and console logging.
    pub debug: bool,
    /// Extension of generated files, without the dot.
    pub extension: String,
}

impl Default for TypeScriptConfig {
    fn default() -> Self {
        Self {
            component: true,
            debug: true,
            extension: "tsx".to_string(),
        }
    }
}

impl From<&SwxConfig> for TypeScriptConfig {
    fn from(config: &SwxConfig) -> Self {
        Self {
            component: config.typescript.component,
            debug: config.typescript.debug,
            extension: config.extension.clone(),
        }
    }
}

/// The source generated for one operation.
#[derive(Debug, Clone)]
pub struct GeneratedOperation {
    pub operation_name: String,
    pub path: String,
    pub method: HttpMethod,
    pub source: String,
}

/// Generate every operation of `spec`, paths then methods in document order.
///
/// A failing operation is yielded as an error and iteration continues.
pub fn generate<'a>(
    spec: &'a SwaggerSpec,
    config: &'a TypeScriptConfig,
) -> impl Iterator<Item = Result<GeneratedOperation, OperationFailure<TypeScriptError>>> + 'a {
    spec.paths.iter().flat_map(move |(path, item)| {
        item.entries.iter().filter_map(move |(key, entry)| {
            let Some(method) = HttpMethod::from_key(key) else {
                debug!("{path}: skipping {key}");
                return None;
            };
            match entry {
                PathEntry::Operation(operation) => {
                    Some(generate_operation(spec, path, method, operation, config))
                }
                PathEntry::Invalid {
                    operation_id,
                    error: reason,
                } => {
                    let op_name = name_from_id(operation_id.as_deref(), method, path);
                    error!("{method} {path} ({op_name}): {reason}");
                    Some(Err(OperationFailure {
                        path: path.to_string(),
                        method,
                        operation_name: Some(op_name),
                        error: TypeScriptError::Transform(TransformError::MalformedOperation {
                            path: path.to_string(),
                            method: method.as_str().to_string(),
                            reason: reason.clone(),
                        }),
                    }))
                }
                PathEntry::Other(_) => {
                    warn!("{method} {path} is not an operation");
                    None
                }
            }
        })
    })
}

fn generate_operation(
    spec: &SwaggerSpec,
    path: &str,
    method: HttpMethod,
    operation: &Operation,
    config: &TypeScriptConfig,
) -> Result<GeneratedOperation, OperationFailure<TypeScriptError>> {
    let op_name = operation_name(operation, method, path);
    match render_operation(spec, path, method, operation, &op_name, config) {
        Ok(source) => {
            info!("{method} {path} → {op_name}");
            Ok(GeneratedOperation {
                operation_name: op_name,
                path: path.to_string(),
                method,
                source,
            })
        }
        Err(err) => {
            error!("{method} {path} ({op_name}): {err}");
            Err(OperationFailure {
                path: path.to_string(),
                method,
                operation_name: Some(op_name),
                error: err,
            })
        }
    }
}

fn render_operation(
    spec: &SwaggerSpec,
    path: &str,
    method: HttpMethod,
    operation: &Operation,
    op_name: &str,
    config: &TypeScriptConfig,
) -> Result<String, TypeScriptError> {
    let parameters = merge_parameters(spec, path, method)?;
    let types = build_operation_types(spec, path, method)?;
    let fragments = build_request(spec, path, method, &parameters)?;

    let mut blocks = vec!["// tslint:disable".to_string()];
    if config.component {
        blocks.push("import * as React from 'react';".to_string());
    }
    blocks.extend(types.declarations.iter().cloned());
    blocks.push(emit_executor(&ExecutorInput {
        op_name,
        method,
        operation,
        types: &types,
        fragments: &fragments,
        debug: config.debug,
    })?);
    if config.component {
        blocks.push(emit_component(op_name, &types, &parameters)?);
    }

    Ok(join_blocks(blocks))
}

/// Join source blocks with a blank line; whitespace-only blocks become empty.
fn join_blocks(blocks: Vec<String>) -> String {
    let mut source = blocks
        .into_iter()
        .map(|block| {
            if block.trim().is_empty() {
                String::new()
            } else {
                block.trim_end().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    source.push('\n');
    source
}

/// TypeScript client generator: one file per operation.
pub struct TypeScriptGenerator;

impl CodeGenerator for TypeScriptGenerator {
    type Config = TypeScriptConfig;
    type Error = TypeScriptError;

    fn generate(
        &self,
        spec: &SwaggerSpec,
        config: &Self::Config,
    ) -> GenerationReport<Self::Error> {
        let mut files = Vec::new();
        let mut failures = Vec::new();
        let mut seen_paths = HashSet::new();

        for result in generate(spec, config) {
            match result {
                Ok(op) => {
                    let file_path = format!("{}.{}", op.operation_name, config.extension);
                    if !seen_paths.insert(file_path.clone()) {
                        warn!("{} {} overwrites {file_path}", op.method, op.path);
                        files.retain(|f: &GeneratedFile| f.path != file_path);
                    }
                    files.push(GeneratedFile {
                        path: file_path,
                        content: op.source,
                    });
                }
                Err(failure) => failures.push(failure),
            }
        }

        GenerationReport { files, failures }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use swx_core::parse;

    use super::*;

    fn spec(value: serde_json::Value) -> SwaggerSpec {
        parse::from_value(value).unwrap()
    }

    #[test]
    fn test_join_blocks() {
        let joined = join_blocks(vec!["a".to_string(), "  \n ".to_string(), "b\n".to_string()]);
        assert_eq!(joined, "a\n\n\n\nb\n");
    }

    #[test]
    fn test_enumeration_order_and_skips() {
        let spec = spec(json!({
            "swagger": "2.0",
            "paths": {
                "/b": {"post": {"operationId": "second"}, "get": {"operationId": "first"}},
                "/a": {"x-internal": {"operationId": "hidden"}, "patch": {"operationId": "p"}, "get": null, "delete": {"operationId": "third"}}
            }
        }));
        let config = TypeScriptConfig::default();
        let names: Vec<String> = generate(&spec, &config)
            .map(|r| r.unwrap().operation_name)
            .collect();
        assert_eq!(names, ["second", "first", "third"]);
    }

    #[test]
    fn test_artifact_layout() {
        let spec = spec(json!({
            "swagger": "2.0",
            "paths": {"/ping": {"get": {"operationId": "pingUsingGET", "responses": {"200": {"description": "pong"}}}}}
        }));
        let config = TypeScriptConfig::default();
        let op = generate(&spec, &config).next().unwrap().unwrap();
        assert_eq!(op.operation_name, "ping");
        assert!(op.source.starts_with("// tslint:disable\n\nimport * as React from 'react';\n\nexport interface PingRequest {}\n\n"));
        assert!(op.source.contains("export type PingResponses = Ping200Response;"));
        assert!(op.source.contains("function pingExecutor("));
        assert!(op.source.contains("export class Ping extends React.PureComponent"));
        assert!(op.source.ends_with("}\n"));
    }

    #[test]
    fn test_without_component() {
        let spec = spec(json!({
            "swagger": "2.0",
            "paths": {"/ping": {"get": {"operationId": "ping"}}}
        }));
        let config = TypeScriptConfig {
            component: false,
            ..TypeScriptConfig::default()
        };
        let op = generate(&spec, &config).next().unwrap().unwrap();
        assert!(!op.source.contains("React"));
        assert!(op.source.starts_with("// tslint:disable\n\nexport interface PingRequest {}"));
    }

    #[test]
    fn test_generator_report() {
        let spec = spec(json!({
            "swagger": "2.0",
            "paths": {
                "/ok": {"get": {"operationId": "ok"}},
                "/bad": {"get": {"operationId": "bad", "responses": {"200": {"schema": {"$ref": "#/definitions/Nope"}}}}}
            }
        }));
        let config = TypeScriptConfig {
            extension: "ts".to_string(),
            ..TypeScriptConfig::default()
        };
        let report = TypeScriptGenerator.generate(&spec, &config);
        assert!(!report.is_success());
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].path, "ok.ts");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "/bad");
        assert_eq!(report.failures[0].operation_name.as_deref(), Some("bad"));
    }

    #[test]
    fn test_undecodable_operation_is_reported() {
        let spec = spec(json!({
            "swagger": "2.0",
            "paths": {
                "/ok": {"get": {"operationId": "ok"}},
                "/bad": {"post": {"operationId": "addBadUsingPOST", "responses": []}},
                "/skipped": {"get": null}
            }
        }));
        let report = TypeScriptGenerator.generate(&spec, &TypeScriptConfig::default());
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.path, "/bad");
        assert_eq!(failure.method, HttpMethod::Post);
        assert_eq!(failure.operation_name.as_deref(), Some("addBad"));
        assert!(matches!(
            failure.error,
            TypeScriptError::Transform(TransformError::MalformedOperation { .. })
        ));
    }

    #[test]
    fn test_duplicate_names_keep_last() {
        let spec = spec(json!({
            "swagger": "2.0",
            "paths": {
                "/v1/pets": {"get": {"operationId": "listPets"}},
                "/v2/pets": {"get": {"operationId": "listPets"}}
            }
        }));
        let report = TypeScriptGenerator.generate(&spec, &TypeScriptConfig::default());
        assert_eq!(report.files.len(), 1);
        assert!(report.files[0].content.contains("'/v2/pets'"));
    }

    #[test]
    fn test_config_from_project() {
        let project: SwxConfig =
            serde_json::from_value(json!({"extension": "ts", "typescript": {"debug": false}}))
                .unwrap();
        let config = TypeScriptConfig::from(&project);
        assert_eq!(config.extension, "ts");
        assert!(config.component);
        assert!(!config.debug);
    }
}
