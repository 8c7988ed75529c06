use std::fmt;

use super::schema_graph::SchemaGraph;
use crate::diagnostics::Diagnostics;
use crate::model::PropertyDescriptor;

/// Built-in scalar types every target knows how to spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    DateTime,
    Duration,
    Bool,
    Int32,
    Int64,
    Float32,
    Float64,
    String,
    Uri,
    Uuid,
    Stream,
}

impl Primitive {
    /// Map a `type` or `format` token to a primitive, if it names one.
    pub fn from_token(token: &str) -> Option<Self> {
        let primitive = match token {
            "date" | "date-time" => Primitive::DateTime,
            "date-span" | "duration" => Primitive::Duration,
            "boolean" => Primitive::Bool,
            "int32" | "integer" => Primitive::Int32,
            "int64" => Primitive::Int64,
            "float" => Primitive::Float32,
            "double" | "number" => Primitive::Float64,
            "string" | "json" => Primitive::String,
            "uri" => Primitive::Uri,
            "uuid" => Primitive::Uuid,
            "binary" | "file" => Primitive::Stream,
            _ => return None,
        };
        Some(primitive)
    }
}

/// A resolved type, independent of how a target spells it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    Sequence(Box<TypeRef>),
    /// String-keyed map.
    Map(Box<TypeRef>),
    /// A generated type, by its unique type name.
    Named(String),
    Object,
}

impl TypeRef {
    pub fn sequence(inner: TypeRef) -> Self {
        TypeRef::Sequence(Box::new(inner))
    }

    pub fn map(inner: TypeRef) -> Self {
        TypeRef::Map(Box::new(inner))
    }

    /// The generated type at the bottom of any container nesting.
    pub fn component_name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Sequence(inner) | TypeRef::Map(inner) => inner.component_name(),
            TypeRef::Primitive(_) | TypeRef::Object => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, TypeRef::Primitive(Primitive::String))
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, TypeRef::Primitive(Primitive::Stream))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeRef::Sequence(_))
    }
}

impl fmt::Display for TypeRef {
    /// Target-neutral notation, used in diagnostics and plan summaries.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{p:?}"),
            TypeRef::Sequence(inner) => write!(f, "Sequence<{inner}>"),
            TypeRef::Map(inner) => write!(f, "Map<{inner}>"),
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::Object => f.write_str("Object"),
        }
    }
}

/// Maps property descriptors to [`TypeRef`]s against one schema graph.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'g, 'd> {
    graph: &'g SchemaGraph<'d>,
}

impl<'g, 'd> TypeResolver<'g, 'd> {
    pub fn new(graph: &'g SchemaGraph<'d>) -> Self {
        Self { graph }
    }

    /// Resolve a descriptor. `None` means no applicable mapping.
    ///
    /// With `fallback` disabled only concrete primitives and containers
    /// resolve; references and untyped descriptors yield `None`. Header and
    /// query coercion use that to detect "not a plain primitive".
    pub fn resolve(&self, desc: &PropertyDescriptor, fallback: bool) -> Option<TypeRef> {
        if let Some(primitive) = desc.format.as_deref().and_then(Primitive::from_token) {
            return Some(TypeRef::Primitive(primitive));
        }

        match desc.type_token.as_deref() {
            Some("array") => {
                let inner = desc
                    .items
                    .as_deref()
                    .and_then(|items| self.resolve(items, true))
                    .unwrap_or(TypeRef::Object);
                return Some(TypeRef::sequence(inner));
            }
            Some("object") => {
                if let Some(additional) = desc.additional.as_deref() {
                    let inner = self.resolve(additional, true).unwrap_or(TypeRef::Object);
                    return Some(TypeRef::map(inner));
                }
            }
            Some(token) => {
                if let Some(primitive) = Primitive::from_token(token) {
                    return Some(TypeRef::Primitive(primitive));
                }
            }
            None => {}
        }

        if !fallback {
            return None;
        }
        if let Some(key) = desc.reference.as_deref() {
            return self
                .graph
                .type_name(key)
                .map(|name| TypeRef::Named(name.to_string()));
        }
        match desc.type_token.as_deref() {
            None | Some("object") => Some(TypeRef::Object),
            Some(_) => None,
        }
    }

    /// Resolve with fallback, degrading to `Object` when nothing applies.
    pub fn resolve_or_object(
        &self,
        desc: &PropertyDescriptor,
        context: &str,
        diagnostics: &mut dyn Diagnostics,
    ) -> TypeRef {
        self.resolve(desc, true).unwrap_or_else(|| {
            diagnostics.verbose(format!(
                "{context}: cannot resolve type (type: {:?}, format: {:?}, ref: {:?}); using object",
                desc.type_token, desc.format, desc.reference
            ));
            TypeRef::Object
        })
    }

    /// The schema key of an enum the descriptor refers to directly.
    pub fn enum_key(&self, desc: &PropertyDescriptor) -> Option<&'d str> {
        let key = desc.reference.as_deref()?;
        let found = self.graph.get(key)?;
        found.as_enum().map(|_| found.key.as_str())
    }

    pub fn graph(&self) -> &'g SchemaGraph<'d> {
        self.graph
    }
}
