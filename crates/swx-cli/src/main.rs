mod loader;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use log::debug;

use swx_core::config::{self, CONFIG_FILE_NAME, SwaggerSource};
use swx_core::parse;
use swx_core::parse::operation::{HttpMethod, PathEntry};
use swx_core::parse::spec::SwaggerSpec;
use swx_core::transform::{merge_parameters, name_from_id, operation_name};
use swx_core::{CodeGenerator, GeneratedFile};
use swx_typescript::{TypeScriptConfig, TypeScriptGenerator};

#[derive(Parser)]
#[command(name = "swx", about = "Swagger 2.0 to TypeScript client generator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one TypeScript file per operation for every configured spec
    Generate {
        /// Path to the config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
    },

    /// Parse a Swagger spec and check every operation generates
    Validate {
        /// Path to the Swagger spec file (YAML or JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the operations of a Swagger spec with their merged parameters
    Inspect {
        /// Path to the Swagger spec file
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Initialize a new swx configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { config } => cmd_generate(&config).await,

        Commands::Validate { input } => cmd_validate(&input),

        Commands::Inspect { input, format } => cmd_inspect(&input, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "swx", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Read and parse a local spec file.
fn load_spec(path: &Path) -> Result<SwaggerSpec> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_spec(path, &content, None)
}

/// Parse spec content, picking the format from `path`'s extension and
/// applying `overrides` first.
fn parse_spec(
    path: &Path,
    content: &str,
    overrides: Option<&serde_json::Value>,
) -> Result<SwaggerSpec> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("yaml");

    let spec = match ext {
        "json" => parse::from_json_with_overrides(content, overrides),
        _ => parse::from_yaml_with_overrides(content, overrides),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(spec)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

/// Generate the "do not edit" README.
fn readme_content() -> &'static str {
    r#"# Generated Code: Do Not Edit

This directory is **auto-generated** by [swx](https://github.com/swx-rs/swx).
Any manual changes will be overwritten the next time `swx generate` is run.

To regenerate, run:
```
swx generate
```

To change which specs are generated, edit your `.swx.yaml` configuration file.
"#
}

/// Directory that relative paths in the config file are resolved against.
fn config_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Outcome of generating one configured spec.
struct SpecOutcome {
    written: usize,
    failed: usize,
}

async fn generate_source(
    client: &reqwest::Client,
    source: &SwaggerSource,
    base: &Path,
    output_dir: &Path,
    ts_config: &TypeScriptConfig,
) -> Result<SpecOutcome> {
    let spec_path = base.join(&source.file);
    let content = loader::read_source(client, source, &spec_path).await?;
    let spec = parse_spec(&spec_path, &content, source.overrides.as_ref())?;
    let report = TypeScriptGenerator.generate(&spec, ts_config);

    for failure in &report.failures {
        eprintln!("  failed {failure}");
    }
    write_files(output_dir, &report.files)?;

    Ok(SpecOutcome {
        written: report.files.len(),
        failed: report.failures.len(),
    })
}

async fn cmd_generate(config_path: &Path) -> Result<()> {
    let cfg = config::load_config(config_path)?.with_context(|| {
        format!(
            "{} not found. Run `swx init` to create one.",
            config_path.display()
        )
    })?;

    if cfg.swaggers.is_empty() {
        eprintln!("No swaggers configured. Add a `swaggers` section to your config.");
        return Ok(());
    }

    let base = config_dir(config_path);
    let output_dir = base.join(&cfg.output);
    fs::create_dir_all(&output_dir).with_context(|| {
        format!("failed to create output directory {}", output_dir.display())
    })?;
    let ts_config = TypeScriptConfig::from(&cfg);
    let client = loader::http_client()?;

    let mut written = 0;
    let mut failed_operations = 0;
    let mut failed_specs = Vec::new();
    for source in &cfg.swaggers {
        eprintln!("Generating {} ({}) → {}", source.name, source.file, output_dir.display());
        match generate_source(&client, source, &base, &output_dir, &ts_config).await {
            Ok(outcome) => {
                written += outcome.written;
                failed_operations += outcome.failed;
            }
            Err(err) => {
                eprintln!("  error: {err:#}");
                failed_specs.push(source.name.as_str());
            }
        }
    }

    let readme_path = output_dir.join("README.md");
    fs::write(&readme_path, readme_content())
        .with_context(|| format!("failed to write {}", readme_path.display()))?;
    eprintln!("  wrote {}", readme_path.display());

    eprintln!(
        "Generated {} files in {}",
        written + 1, // +1 for README
        output_dir.display()
    );

    if !failed_specs.is_empty() {
        anyhow::bail!("failed to generate specs: {}", failed_specs.join(", "));
    }
    if failed_operations > 0 {
        anyhow::bail!("{failed_operations} operation(s) failed to generate");
    }
    Ok(())
}

fn cmd_validate(input: &Path) -> Result<()> {
    let spec = load_spec(input)?;

    eprintln!("Valid Swagger {} spec: {}", spec.swagger, spec.info.title);
    eprintln!("  Version: {}", spec.info.version);
    eprintln!("  Paths: {}", spec.paths.len());
    eprintln!("  Definitions: {}", spec.definitions.len());

    // Also check that every operation generates
    let report = TypeScriptGenerator.generate(&spec, &TypeScriptConfig::default());
    eprintln!("  Operations: {}", report.files.len() + report.failures.len());
    for failure in &report.failures {
        eprintln!("  failed {failure}");
    }

    if !report.is_success() {
        anyhow::bail!("{} operation(s) cannot be generated", report.failures.len());
    }
    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(input: &Path, format: InspectFormat) -> Result<()> {
    let spec = load_spec(input)?;

    let summary = build_inspect_summary(&spec);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(spec: &SwaggerSpec) -> serde_json::Value {
    let mut operations = Vec::new();
    for (path, item) in &spec.paths {
        for (key, entry) in &item.entries {
            let Some(method) = HttpMethod::from_key(key) else {
                debug!("{path}: skipping {key}");
                continue;
            };
            let operation = match entry {
                PathEntry::Operation(operation) => operation,
                PathEntry::Invalid {
                    operation_id,
                    error,
                } => {
                    operations.push(serde_json::json!({
                        "name": name_from_id(operation_id.as_deref(), method, path),
                        "method": method.as_str(),
                        "path": path,
                        "error": error,
                    }));
                    continue;
                }
                PathEntry::Other(_) => {
                    debug!("{path}: {key} is not an operation");
                    continue;
                }
            };

            let parameters = match merge_parameters(spec, path, method) {
                Ok(params) => params
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "name": p.name,
                            "in": p.location.as_str(),
                            "required": p.required,
                        })
                    })
                    .collect(),
                Err(err) => vec![serde_json::json!({ "error": err.to_string() })],
            };

            operations.push(serde_json::json!({
                "name": operation_name(operation, method, path),
                "method": method.as_str(),
                "path": path,
                "parameters": parameters,
                "responses": operation.responses.keys().collect::<Vec<_>>(),
                "tags": operation.tags,
            }));
        }
    }

    serde_json::json!({
        "info": {
            "title": spec.info.title,
            "version": spec.info.version,
        },
        "url": format!(
            "{}://{}{}",
            spec.scheme(),
            spec.host.as_deref().unwrap_or(""),
            spec.base_path.as_deref().unwrap_or("")
        ),
        "definitions": spec.definitions.keys().collect::<Vec<_>>(),
        "operations": operations,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"{
        "swagger": "2.0",
        "info": {"title": "T", "version": "1"},
        "host": "prod.test",
        "paths": {
            "/pets/{id}": {"get": {
                "operationId": "getPet",
                "parameters": [{"name": "id", "in": "path", "required": true, "type": "string"}],
                "responses": {"200": {"description": "ok"}}
            }},
            "/raw": {"put": {
                "operationId": "putRaw",
                "consumes": ["application/octet-stream"],
                "parameters": [{"name": "data", "in": "body", "schema": {"type": "string"}}]
            }}
        }
    }"#;

    #[test]
    fn test_write_files_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let files = vec![
            GeneratedFile {
                path: "getPet.tsx".to_string(),
                content: "// a".to_string(),
            },
            GeneratedFile {
                path: "nested/listPets.tsx".to_string(),
                content: "// b".to_string(),
            },
        ];
        write_files(dir.path(), &files).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("getPet.tsx")).unwrap(), "// a");
        assert_eq!(
            fs::read_to_string(dir.path().join("nested/listPets.tsx")).unwrap(),
            "// b"
        );
    }

    #[test]
    fn test_load_spec_with_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spec.json");
        fs::write(&path, SPEC).unwrap();

        let overrides = serde_json::json!({"host": "localhost:3000", "schemes": ["http"]});
        let spec = parse_spec(&path, SPEC, Some(&overrides)).unwrap();
        assert_eq!(spec.host.as_deref(), Some("localhost:3000"));
        assert_eq!(spec.scheme(), "http");

        assert_eq!(load_spec(&path).unwrap().host.as_deref(), Some("prod.test"));
        assert!(load_spec(&dir.path().join("missing.json")).is_err());
    }

    #[tokio::test]
    async fn test_generate_writes_operations_and_reports_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("spec.json"), SPEC).unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            "output: out\nswaggers:\n  - name: t\n    file: spec.json\n    overrides:\n      basePath: /v1\n",
        )
        .unwrap();

        let err = cmd_generate(&config_path).await.unwrap_err();
        assert!(err.to_string().contains("1 operation(s) failed"), "{err}");

        let generated = fs::read_to_string(dir.path().join("out/getPet.tsx")).unwrap();
        assert!(generated.contains("'https://prod.test/v1/pets/{id}'"));
        assert!(dir.path().join("out/README.md").exists());
        assert!(!dir.path().join("out/putRaw.tsx").exists());
    }

    #[tokio::test]
    async fn test_generate_missing_spec_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &config_path,
            "output: out\nswaggers:\n  - name: gone\n    file: gone.json\n",
        )
        .unwrap();

        let err = cmd_generate(&config_path).await.unwrap_err();
        assert!(err.to_string().contains("failed to generate specs: gone"), "{err}");
        assert!(dir.path().join("out/README.md").exists());
    }

    #[tokio::test]
    async fn test_generate_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_generate(&dir.path().join(CONFIG_FILE_NAME)).await.unwrap_err();
        assert!(err.to_string().contains("swx init"), "{err}");
    }

    #[test]
    fn test_inspect_summary() {
        let spec = parse::from_json(SPEC).unwrap();
        let summary = build_inspect_summary(&spec);
        assert_eq!(summary["url"], "https://prod.test");
        let ops = summary["operations"].as_array().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0]["name"], "getPet");
        assert_eq!(ops[0]["method"], "GET");
        assert_eq!(ops[0]["parameters"][0]["in"], "path");
        assert_eq!(ops[0]["responses"][0], "200");
    }

    #[test]
    fn test_inspect_reports_undecodable_operations() {
        let spec = parse::from_json(
            r#"{"swagger": "2.0", "paths": {"/a": {"get": {"operationId": "getA", "tags": 1}}}}"#,
        )
        .unwrap();
        let summary = build_inspect_summary(&spec);
        let op = &summary["operations"][0];
        assert_eq!(op["name"], "getA");
        assert!(op["error"].as_str().unwrap().contains("invalid type"));
    }

    #[test]
    fn test_config_dir() {
        assert_eq!(config_dir(Path::new(".swx.yaml")), PathBuf::from("."));
        assert_eq!(
            config_dir(Path::new("project/.swx.yaml")),
            PathBuf::from("project")
        );
    }
}
