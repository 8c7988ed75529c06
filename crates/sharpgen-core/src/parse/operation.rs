use indexmap::IndexMap;
use serde::Deserialize;

use super::content::{RequestBody, Response};
use super::reference::RefOr;
use super::schema::SchemaOrRef;
use crate::model::HttpMethod;

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    /// Absent in sloppy documents; such parameters are taken as strings.
    pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,

    #[serde(rename = "requestBody")]
    pub request_body: Option<RefOr<RequestBody>>,

    /// Status code → response.
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,

    #[serde(default)]
    pub deprecated: bool,
}

/// One path: shared parameters plus an operation per verb.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PathItem {
    pub summary: Option<String>,

    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,

    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub delete: Option<Operation>,
    pub patch: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub trace: Option<Operation>,
}

impl PathItem {
    /// Declared operations, always in `get, post, put, delete, patch,
    /// options, head, trace` order.
    pub fn operations(&self) -> impl Iterator<Item = (HttpMethod, &Operation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| Some((method, op.as_ref()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operations_in_verb_order() {
        let item: PathItem = serde_json::from_str(
            r#"{
                "post": { "operationId": "create" },
                "get": { "operationId": "list", "deprecated": true }
            }"#,
        )
        .unwrap();
        let ops: Vec<(HttpMethod, Option<&str>, bool)> = item
            .operations()
            .map(|(m, op)| (m, op.operation_id.as_deref(), op.deprecated))
            .collect();
        assert_eq!(
            ops,
            [
                (HttpMethod::Get, Some("list"), true),
                (HttpMethod::Post, Some("create"), false),
            ]
        );
    }
}
