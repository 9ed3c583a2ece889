use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported Swagger version: {0}")]
    UnsupportedVersion(String),

    #[error("document is not a Swagger specification (no `swagger` field)")]
    NotSwagger,

    #[error("overrides must be an object, got {0}")]
    InvalidOverrides(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("unresolved reference {reference} (required by {path})")]
    UnresolvedReference { reference: String, path: String },

    #[error("{reference} is not a definitions reference (at {path})")]
    InvalidReference { reference: String, path: String },

    #[error("error retrieving references from {path}: {reason}")]
    MalformedSchema { path: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("no operation for {method} {path}")]
    UnknownOperation { path: String, method: String },

    #[error("type name {0} is synthesized twice with different schemas")]
    TypeNameCollision(String),

    #[error("invalid parameter at {path}: {reason}")]
    InvalidParameter { path: String, reason: String },

    #[error("{method} {path} is not a valid operation: {reason}")]
    MalformedOperation {
        path: String,
        method: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
