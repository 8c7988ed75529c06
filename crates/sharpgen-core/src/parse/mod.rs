pub mod components;
pub mod content;
pub mod merge;
pub mod operation;
pub mod ref_resolve;
pub mod reference;
pub mod schema;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an already-loaded (and possibly merged) document tree.
pub fn from_value(value: serde_json::Value) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_value(value)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Load a raw document tree from YAML or JSON text, ready for merging.
pub fn value_from_str(input: &str, json: bool) -> Result<serde_json::Value, ParseError> {
    if json {
        Ok(serde_json::from_str(input)?)
    } else {
        Ok(serde_yaml_ng::from_str(input)?)
    }
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    match spec.openapi.as_deref() {
        Some(v) if !v.starts_with("3.") => Err(ParseError::UnsupportedVersion(v.to_string())),
        _ => Ok(()),
    }
}
