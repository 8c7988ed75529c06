//! Request and response payloads, reduced to the content type the client
//! will actually speak.

use indexmap::IndexMap;
use serde::Deserialize;

use super::schema::SchemaOrRef;

pub const JSON: &str = "application/json";
pub const JSON_API: &str = "application/vnd.api+json";
pub const MULTIPART: &str = "multipart/form-data";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Media type → payload, in document order.
pub type Content = IndexMap<String, MediaType>;

/// A media type object. Only the schema matters to the generator.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: Content,

    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub content: Content,
}

/// How a payload travels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Multipart,
    OctetStream,
    Json,
}

/// The content type without parameters such as `; charset=utf-8`.
pub fn essence(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

/// `application/json`, `application/vnd.api+json`, or any `*+json` suffix type.
pub fn is_json(content_type: &str) -> bool {
    let essence = essence(content_type);
    essence == JSON || essence == JSON_API || essence.ends_with("+json")
}

/// The entry the generator knows how to marshal: multipart, then octet
/// stream, then JSON (exact types before `+json` suffixes).
pub fn preferred(content: &Content) -> Option<(ContentKind, &MediaType)> {
    let exact = move |wanted: &str| {
        content
            .iter()
            .find(|(ct, _)| essence(ct) == wanted)
            .map(|(_, mt)| mt)
    };
    if let Some(mt) = exact(MULTIPART) {
        return Some((ContentKind::Multipart, mt));
    }
    if let Some(mt) = exact(OCTET_STREAM) {
        return Some((ContentKind::OctetStream, mt));
    }
    exact(JSON)
        .or_else(|| exact(JSON_API))
        .or_else(|| content.iter().find(|(ct, _)| is_json(ct)).map(|(_, mt)| mt))
        .map(|mt| (ContentKind::Json, mt))
}
