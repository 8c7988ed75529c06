use indexmap::IndexSet;

use crate::model::{HttpMethod, ParameterLocation};
use crate::transform::types::TypeRef;

/// Everything needed to render one operation's methods.
#[derive(Debug, Clone)]
pub struct MethodPlan {
    /// Unique within the client, without the `Async` suffix.
    pub name: String,
    pub method: HttpMethod,
    pub path: Vec<PathSegment>,
    /// Single-line summary; falls back to `HTTP <Verb> on /<path>`.
    pub summary: String,
    pub deprecated: bool,
    /// Signature order: required before optional, path first within each
    /// group. The body (or multipart parts) precedes these.
    pub parameters: Vec<ParameterPlan>,
    pub body: Option<BodyPlan>,
    pub query: Vec<QueryArgument>,
    pub headers: Vec<HeaderArgument>,
    pub response: ResponsePlan,
    /// Types the method signature mentions; seeds tree shaking.
    pub used_components: IndexSet<TypeRef>,
}

impl MethodPlan {
    /// Whether both the raw-transport and the deserializing method exist.
    pub fn has_http_info(&self) -> bool {
        !matches!(self.response, ResponsePlan::Void)
    }

    /// Variables passed through when one method delegates to another, in
    /// signature order.
    pub fn argument_names(&self) -> Vec<&str> {
        let mut out = Vec::new();
        match &self.body {
            Some(BodyPlan::Json { .. }) | Some(BodyPlan::Stream) => out.push(BODY_VARIABLE),
            Some(BodyPlan::Multipart(parts)) => {
                out.extend(parts.iter().map(|p| p.variable.as_str()));
            }
            None => {}
        }
        out.extend(self.parameters.iter().map(|p| p.variable.as_str()));
        out
    }
}

/// Name of the request body argument.
pub const BODY_VARIABLE: &str = "body";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Literal(String),
    /// Substituted from the named variable.
    Variable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPlan {
    pub wire_name: String,
    pub variable: String,
    pub location: ParameterLocation,
    /// Declared required; path parameters always are.
    pub required: bool,
    pub type_ref: TypeRef,
    pub default: ParameterDefault,
    pub description: Option<String>,
}

impl ParameterPlan {
    pub fn is_optional(&self) -> bool {
        !matches!(self.default, ParameterDefault::None)
    }

    /// The generated parameter type admits "absent".
    pub fn is_nullable(&self) -> bool {
        matches!(self.default, ParameterDefault::Absent)
    }
}

/// Default value in the generated signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterDefault {
    /// Mandatory argument.
    None,
    /// Optional, nullable, defaults to "absent".
    Absent,
    /// A string literal.
    Quoted(String),
    /// Emitted verbatim (numbers, booleans), lower-cased.
    Raw(String),
    EnumMember { type_name: String, member: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyPlan {
    Json { type_ref: TypeRef },
    Stream,
    Multipart(Vec<MultipartPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
    pub variable: String,
    pub field_name: String,
    pub type_ref: TypeRef,
}

impl MultipartPart {
    pub fn is_stream(&self) -> bool {
        self.type_ref.is_stream()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryArgument {
    pub variable: String,
    pub wire_name: String,
    /// Enum type whose wire lookup encodes the value.
    pub enum_type: Option<String>,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderArgument {
    pub wire_name: String,
    pub variable: String,
    pub coercion: HeaderCoercion,
    pub nullable: bool,
}

/// How a header argument becomes a string (or list of strings).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderCoercion {
    PassThrough,
    EachToString,
    EnumWire(String),
    ToString,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePlan {
    Typed(TypeRef),
    Stream,
    Void,
}
