pub mod config;
pub mod error;
pub mod parse;
pub mod transform;

use std::fmt;

use parse::operation::HttpMethod;
use parse::spec::SwaggerSpec;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

/// An operation that could not be generated. Sibling operations are unaffected.
#[derive(Debug)]
pub struct OperationFailure<E> {
    pub path: String,
    pub method: HttpMethod,
    pub operation_name: Option<String>,
    pub error: E,
}

impl<E: fmt::Display> fmt::Display for OperationFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operation_name {
            Some(ref name) => write!(f, "{} {} ({name}): {}", self.method, self.path, self.error),
            None => write!(f, "{} {}: {}", self.method, self.path, self.error),
        }
    }
}

/// Files produced for a spec, plus the operations that failed.
#[derive(Debug)]
pub struct GenerationReport<E> {
    pub files: Vec<GeneratedFile>,
    pub failures: Vec<OperationFailure<E>>,
}

impl<E> GenerationReport<E> {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Trait for code generators that produce files from a Swagger spec.
pub trait CodeGenerator {
    type Config;
    type Error: std::error::Error;
    fn generate(&self, spec: &SwaggerSpec, config: &Self::Config) -> GenerationReport<Self::Error>;
}
