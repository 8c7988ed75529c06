//! Flat, read-only records derived from the parsed document.
//!
//! Schema references stay by-key (`PropertyDescriptor::reference`,
//! `CompositeDefinition::parents`); inheritance is resolved later by lookup,
//! never by nesting.

pub mod build;

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

pub use crate::parse::operation::ParameterLocation;
pub use build::build_document;

/// The document after loading: schemas by key plus one descriptor per
/// (path, verb).
#[derive(Debug, Clone, Default)]
pub struct ApiDocument {
    pub info: ApiInfo,
    pub schemas: IndexMap<String, SchemaDefinition>,
    pub operations: Vec<OperationDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiInfo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub key: String,
    pub description: Option<String>,
    pub kind: SchemaKind,
}

/// Enum and composite are mutually exclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Enum(EnumDefinition),
    Composite(CompositeDefinition),
    Empty,
}

impl SchemaDefinition {
    pub fn as_enum(&self) -> Option<&EnumDefinition> {
        match &self.kind {
            SchemaKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeDefinition> {
        match &self.kind {
            SchemaKind::Composite(c) => Some(c),
            _ => None,
        }
    }

    pub fn parents(&self) -> &[String] {
        self.as_composite().map_or(&[], |c| c.parents.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDefinition {
    /// Raw values in document order; may contain `null`.
    pub values: Vec<Value>,
    /// `x-enumNames`, parallel to `values`.
    pub display_names: Option<Vec<String>>,
    /// Separator marker when the enum is a bit-flag set.
    pub flagged: Option<String>,
}

impl EnumDefinition {
    pub fn is_flagged(&self) -> bool {
        self.flagged.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositeDefinition {
    pub properties: IndexMap<String, PropertyDescriptor>,
    /// Keys of the schemas named by `allOf` references, in order.
    pub parents: Vec<String>,
    pub discriminator: Option<DiscriminatorDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorDescriptor {
    pub property_name: String,
    /// Wire value → schema key.
    pub mapping: IndexMap<String, String>,
}

/// The type-bearing part of a property, parameter or body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyDescriptor {
    pub type_token: Option<String>,
    pub format: Option<String>,
    /// Key of the referenced schema.
    pub reference: Option<String>,
    pub nullable: bool,
    /// Named in the owning schema's `required` list.
    pub required: bool,
    pub default: Option<Value>,
    pub items: Option<Box<PropertyDescriptor>>,
    pub additional: Option<Box<PropertyDescriptor>>,
    pub description: Option<String>,
}

impl PropertyDescriptor {
    pub fn typed(token: &str) -> Self {
        Self {
            type_token: Some(token.to_string()),
            ..Default::default()
        }
    }

    pub fn reference(key: &str) -> Self {
        Self {
            reference: Some(key.to_string()),
            ..Default::default()
        }
    }

    /// A binary payload.
    pub fn binary() -> Self {
        Self {
            type_token: Some("string".to_string()),
            format: Some("binary".to_string()),
            ..Default::default()
        }
    }

    /// Every schema key this descriptor mentions, containers included.
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        if let Some(r) = &self.reference {
            out.push(r);
        }
        if let Some(items) = &self.items {
            items.collect_references(out);
        }
        if let Some(additional) = &self.additional {
            additional.collect_references(out);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }

    /// `Get`, `Post`, ... as used in method names.
    pub fn pascal(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Get",
            HttpMethod::Post => "Post",
            HttpMethod::Put => "Put",
            HttpMethod::Delete => "Delete",
            HttpMethod::Patch => "Patch",
            HttpMethod::Options => "Options",
            HttpMethod::Head => "Head",
            HttpMethod::Trace => "Trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationDescriptor {
    pub path: String,
    pub method: HttpMethod,
    pub tags: Vec<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub body: Option<RequestBodyDescriptor>,
    pub response: Option<PropertyDescriptor>,
    pub deprecated: bool,
    pub operation_id: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    pub schema: PropertyDescriptor,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBodyDescriptor {
    Json(PropertyDescriptor),
    OctetStream,
    /// Form field name → part schema.
    Multipart(IndexMap<String, PropertyDescriptor>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_walk_containers() {
        let desc = PropertyDescriptor {
            type_token: Some("array".to_string()),
            items: Some(Box::new(PropertyDescriptor {
                type_token: Some("object".to_string()),
                additional: Some(Box::new(PropertyDescriptor::reference("Pet"))),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(desc.references(), ["Pet"]);
        assert!(PropertyDescriptor::typed("string").references().is_empty());
    }
}
