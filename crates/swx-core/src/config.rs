use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// Top-level project configuration loaded from `.swx.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwxConfig {
    /// Directory receiving one file per operation.
    pub output: String,
    /// Extension of the generated files.
    pub extension: String,
    pub swaggers: Vec<SwaggerSource>,
    pub typescript: TypeScriptOptions,
}

impl Default for SwxConfig {
    fn default() -> Self {
        Self {
            output: "src/generated".to_string(),
            extension: "tsx".to_string(),
            swaggers: Vec::new(),
            typescript: TypeScriptOptions::default(),
        }
    }
}

/// One spec to generate from.
#[derive(Debug, Clone, Deserialize)]
pub struct SwaggerSource {
    pub name: String,
    /// Spec file, relative to the config file's directory.
    pub file: String,
    /// Top-level keys replacing the document's before generation
    /// (`host`, `basePath`, `schemes`, ...).
    #[serde(default)]
    pub overrides: Option<serde_json::Value>,
    /// Where to download `file` from when it is missing locally.
    #[serde(default)]
    pub remote: Option<RemoteSource>,
}

/// A spec served over HTTP, optionally behind basic auth.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSource {
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Options of the TypeScript emitter.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypeScriptOptions {
    /// Emit the React wrapper component next to each executor.
    pub component: bool,
    /// Emit the `debug` request/response console logging.
    pub debug: bool,
}

impl Default for TypeScriptOptions {
    fn default() -> Self {
        Self {
            component: true,
            debug: true,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".swx.yaml";

/// Load config from a YAML (or JSON) file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<SwxConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let config: SwxConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# swx configuration
output: src/generated
extension: tsx          # generated files are <operationName>.<extension>

swaggers:
  - name: petstore
    file: swagger.json
    # remote:             # downloaded into `file` when it is missing
    #   url: https://api.example.com/v2/swagger.json
    #   username: user
    #   password: secret
    # overrides:          # replace top-level keys of the document
    #   host: api.example.com
    #   basePath: /v2

typescript:
  component: true       # React render-prop component per operation
  debug: true           # `<operation>.debug = true` logs requests and responses
"#
}
