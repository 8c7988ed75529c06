use indexmap::IndexMap;
use serde::Deserialize;

use super::components::Components;
use super::operation::PathItem;

/// Info object describing the API. Every field is optional because several
/// producers leave the block half filled.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// Top-level OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: Option<String>,

    #[serde(default)]
    pub info: Info,

    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,

    pub components: Option<Components>,
}
