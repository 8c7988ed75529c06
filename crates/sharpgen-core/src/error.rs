use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("circular reference detected: {0}")]
    CircularRef(String),

    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),
}

/// Failure while assembling one client. Aborts that client only.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("too many similar method names for '{name}' in {client}")]
    TooManyCollisions { client: String, name: String },
}

/// Failure while persisting a generated file.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("invalid tag filter: {0}")]
    InvalidFilter(#[from] regex::Error),

    #[error("code generation failed: {0}")]
    Generator(Box<dyn std::error::Error + Send + Sync>),

    #[error(transparent)]
    Emit(#[from] EmitError),
}
