use indexmap::IndexMap;
use serde::Deserialize;

use super::content::{RequestBody, Response};
use super::operation::Parameter;
use super::reference::RefOr;
use super::schema::SchemaOrRef;

/// Reusable definitions, each addressable as `#/components/<section>/<name>`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,

    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,

    #[serde(rename = "requestBodies", default)]
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
}
