use std::collections::HashSet;

use indexmap::IndexSet;
use serde_json::Value;

use super::enums::member_for_value;
use super::names::{KeywordTable, Uniquifier, to_method_name, to_variable_name};
use super::types::{Primitive, TypeRef, TypeResolver};
use crate::diagnostics::Diagnostics;
use crate::error::AssemblyError;
use crate::ir::{
    BODY_VARIABLE, BodyPlan, HeaderArgument, HeaderCoercion, MethodPlan, MultipartPart,
    ParameterDefault, ParameterPlan, PathSegment, QueryArgument, ResponsePlan,
};
use crate::model::{
    OperationDescriptor, ParameterDescriptor, ParameterLocation, PropertyDescriptor,
    RequestBodyDescriptor,
};

/// Collisions tolerated per method name before the client is abandoned.
pub const MAX_NAME_COLLISIONS: usize = 1000;

/// Variable names the generated methods use for themselves.
pub const RESERVED_VARIABLES: [&str; 3] = [BODY_VARIABLE, "options", "token"];

/// Method name before per-client deduplication: the operation id, or the
/// verb followed by the path, minus a trailing `Async`.
pub fn apriori_method_name(op: &OperationDescriptor) -> String {
    let name = match op.operation_id.as_deref().map(to_method_name) {
        Some(id) if !id.is_empty() => id,
        _ => {
            let path = to_method_name(op.path.trim_start_matches('/'));
            format!("{}{}", op.method.pascal(), path.trim_start_matches('_'))
        }
    };
    match name.strip_suffix("Async") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => name,
    }
}

/// Method names already handed out within one client.
#[derive(Debug, Default)]
pub struct MethodNames {
    taken: HashSet<String>,
}

impl MethodNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// `name`, or `name__1__`, `name__2__`, ... on collision.
    pub fn claim(&mut self, name: &str, client: &str) -> Result<String, AssemblyError> {
        if self.taken.insert(name.to_string()) {
            return Ok(name.to_string());
        }
        for counter in 1..=MAX_NAME_COLLISIONS {
            let candidate = format!("{name}__{counter}__");
            if self.taken.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
        Err(AssemblyError::TooManyCollisions {
            client: client.to_string(),
            name: name.to_string(),
        })
    }
}

/// Builds [`MethodPlan`]s for single operations.
#[derive(Clone, Copy)]
pub struct OperationAssembler<'a, 'd> {
    types: TypeResolver<'a, 'd>,
    keywords: &'a KeywordTable,
}

impl<'a, 'd> OperationAssembler<'a, 'd> {
    pub fn new(types: TypeResolver<'a, 'd>, keywords: &'a KeywordTable) -> Self {
        Self { types, keywords }
    }

    pub fn assemble(
        &self,
        op: &OperationDescriptor,
        name: String,
        diagnostics: &mut dyn Diagnostics,
    ) -> MethodPlan {
        let context = format!("{} {}", op.method, op.path);
        let mut variables = Uniquifier::with_reserved(RESERVED_VARIABLES);

        // Body parts precede the parameters in the signature, so they claim
        // their variable names first.
        let body = op
            .body
            .as_ref()
            .map(|b| self.body_plan(b, &context, &mut variables, diagnostics));

        let mut described = Vec::new();
        let mut planned = Vec::new();
        for param in &op.parameters {
            if param.location == ParameterLocation::Cookie {
                diagnostics.verbose(format!(
                    "{context}: cookie parameter '{}' is not supported and was skipped",
                    param.name
                ));
                continue;
            }
            planned.push(self.parameter_plan(param, &context, &mut variables, diagnostics));
            described.push(param);
        }
        let order = signature_order(&mut planned);

        // Query string and headers keep document order.
        let mut query = Vec::new();
        let mut headers = Vec::new();
        for (param, plan) in described.iter().zip(&planned) {
            match plan.location {
                ParameterLocation::Query => query.push(QueryArgument {
                    variable: plan.variable.clone(),
                    wire_name: plan.wire_name.clone(),
                    enum_type: self.enum_type(&param.schema),
                    nullable: plan.is_nullable(),
                }),
                ParameterLocation::Header => headers.push(HeaderArgument {
                    wire_name: plan.wire_name.clone(),
                    variable: plan.variable.clone(),
                    coercion: self.header_coercion(&param.schema, &plan.type_ref),
                    nullable: plan.is_nullable(),
                }),
                ParameterLocation::Path | ParameterLocation::Cookie => {}
            }
        }
        let parameters: Vec<ParameterPlan> = order.iter().map(|&i| planned[i].clone()).collect();

        let path = path_segments(&op.path, &parameters, &context, diagnostics);
        let response = self.response_plan(op.response.as_ref(), &context, diagnostics);
        let used_components = used_components(&parameters, body.as_ref(), &response);

        MethodPlan {
            name,
            method: op.method,
            path,
            summary: summary_line(op),
            deprecated: op.deprecated,
            parameters,
            body,
            query,
            headers,
            response,
            used_components,
        }
    }

    fn parameter_plan(
        &self,
        param: &ParameterDescriptor,
        context: &str,
        variables: &mut Uniquifier,
        diagnostics: &mut dyn Diagnostics,
    ) -> ParameterPlan {
        let type_ref = self.types.resolve_or_object(
            &param.schema,
            &format!("{context} parameter '{}'", param.name),
            diagnostics,
        );
        let variable = variables.claim(&to_variable_name(&param.name, self.keywords));
        let required = param.required || param.location == ParameterLocation::Path;

        let default = match &param.schema.default {
            Some(value) => self
                .declared_default(&param.schema, &type_ref, value)
                .unwrap_or_else(|| {
                    diagnostics.verbose(format!(
                        "{context}: default {value} of parameter '{}' has no literal form; \
                         made optional instead",
                        param.name
                    ));
                    ParameterDefault::Absent
                }),
            None if !required
                || param.location == ParameterLocation::Query
                || param.schema.nullable =>
            {
                ParameterDefault::Absent
            }
            None => ParameterDefault::None,
        };

        ParameterPlan {
            wire_name: param.name.clone(),
            variable,
            location: param.location,
            required,
            type_ref,
            default,
            description: param.description.clone(),
        }
    }

    /// A document default the signature can carry as a literal.
    fn declared_default(
        &self,
        schema: &PropertyDescriptor,
        type_ref: &TypeRef,
        value: &Value,
    ) -> Option<ParameterDefault> {
        if let Some(key) = self.types.enum_key(schema) {
            let definition = self.types.graph().get(key)?.as_enum()?;
            let member = member_for_value(definition, self.keywords, value)?;
            let type_name = self.types.graph().type_name(key)?.to_string();
            return Some(ParameterDefault::EnumMember { type_name, member });
        }
        if type_ref.is_string() {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Some(ParameterDefault::Quoted(text));
        }
        let numeric_or_bool = matches!(
            type_ref,
            TypeRef::Primitive(
                Primitive::Bool
                    | Primitive::Int32
                    | Primitive::Int64
                    | Primitive::Float32
                    | Primitive::Float64
            )
        );
        match value {
            Value::Bool(_) | Value::Number(_) if numeric_or_bool => {
                Some(ParameterDefault::Raw(value.to_string().to_lowercase()))
            }
            Value::String(s) if numeric_or_bool => Some(ParameterDefault::Raw(s.to_lowercase())),
            _ => None,
        }
    }

    fn enum_type(&self, schema: &PropertyDescriptor) -> Option<String> {
        let key = self.types.enum_key(schema)?;
        self.types.graph().type_name(key).map(str::to_string)
    }

    fn header_coercion(&self, schema: &PropertyDescriptor, type_ref: &TypeRef) -> HeaderCoercion {
        if let Some(enum_type) = self.enum_type(schema) {
            HeaderCoercion::EnumWire(enum_type)
        } else if type_ref.is_sequence() {
            HeaderCoercion::EachToString
        } else if type_ref.is_string() {
            HeaderCoercion::PassThrough
        } else {
            HeaderCoercion::ToString
        }
    }

    fn body_plan(
        &self,
        body: &RequestBodyDescriptor,
        context: &str,
        variables: &mut Uniquifier,
        diagnostics: &mut dyn Diagnostics,
    ) -> BodyPlan {
        match body {
            RequestBodyDescriptor::Json(desc) => BodyPlan::Json {
                type_ref: self
                    .types
                    .resolve_or_object(desc, &format!("{context} body"), diagnostics),
            },
            RequestBodyDescriptor::OctetStream => BodyPlan::Stream,
            RequestBodyDescriptor::Multipart(fields) => BodyPlan::Multipart(
                fields
                    .iter()
                    .map(|(field, desc)| MultipartPart {
                        variable: variables.claim(&to_variable_name(field, self.keywords)),
                        field_name: field.clone(),
                        type_ref: self.types.resolve_or_object(
                            desc,
                            &format!("{context} form field '{field}'"),
                            diagnostics,
                        ),
                    })
                    .collect(),
            ),
        }
    }

    fn response_plan(
        &self,
        response: Option<&PropertyDescriptor>,
        context: &str,
        diagnostics: &mut dyn Diagnostics,
    ) -> ResponsePlan {
        let Some(desc) = response else {
            return ResponsePlan::Void;
        };
        match self.types.resolve(desc, true) {
            Some(type_ref) if type_ref.is_stream() => ResponsePlan::Stream,
            Some(type_ref) => ResponsePlan::Typed(type_ref),
            None => {
                diagnostics.verbose(format!(
                    "{context}: response schema has no usable type; generating a void method"
                ));
                ResponsePlan::Void
            }
        }
    }
}

/// Signature positions of `parameters`: required before optional, path
/// parameters first within each group, ties in document order.
///
/// A mandatory argument cannot follow one with a default in C#, so any
/// such parameter is relaxed to an absent default.
fn signature_order(parameters: &mut [ParameterPlan]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..parameters.len()).collect();
    order.sort_by_key(|&i| {
        let p = &parameters[i];
        (!p.required, p.location != ParameterLocation::Path)
    });
    let mut defaulted = false;
    for &i in &order {
        let plan = &mut parameters[i];
        if defaulted && plan.default == ParameterDefault::None {
            plan.default = ParameterDefault::Absent;
        }
        defaulted |= plan.is_optional();
    }
    order
}

fn path_segments(
    path: &str,
    parameters: &[ParameterPlan],
    context: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Vec<PathSegment> {
    let mut segments = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|i| open + i) else {
            break;
        };
        if open > 0 {
            segments.push(PathSegment::Literal(rest[..open].to_string()));
        }
        let placeholder = &rest[open + 1..close];
        let bound = parameters
            .iter()
            .find(|p| p.location == ParameterLocation::Path && p.wire_name == placeholder);
        match bound {
            Some(p) => segments.push(PathSegment::Variable(p.variable.clone())),
            None => {
                diagnostics.verbose(format!(
                    "{context}: no path parameter named '{placeholder}'; kept literally"
                ));
                segments.push(PathSegment::Literal(rest[open..=close].to_string()));
            }
        }
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        segments.push(PathSegment::Literal(rest.to_string()));
    }
    segments
}

fn summary_line(op: &OperationDescriptor) -> String {
    let summary = op
        .summary
        .as_deref()
        .map(|s| s.replace(['\r', '\n'], " ").trim().to_string())
        .unwrap_or_default();
    if summary.is_empty() {
        format!(
            "HTTP {} on /{}",
            op.method.pascal(),
            op.path.trim_start_matches('/')
        )
    } else {
        summary
    }
}

/// Types the method surface mentions that lead to generated models.
fn used_components(
    parameters: &[ParameterPlan],
    body: Option<&BodyPlan>,
    response: &ResponsePlan,
) -> IndexSet<TypeRef> {
    let mut used = IndexSet::new();
    if let ResponsePlan::Typed(t) = response {
        used.insert(t.clone());
    }
    for p in parameters {
        used.insert(p.type_ref.clone());
    }
    match body {
        Some(BodyPlan::Json { type_ref }) => {
            used.insert(type_ref.clone());
        }
        Some(BodyPlan::Multipart(parts)) => {
            used.extend(parts.iter().map(|p| p.type_ref.clone()));
        }
        Some(BodyPlan::Stream) | None => {}
    }
    used.retain(|t| t.component_name().is_some());
    used
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::diagnostics::{CollectedDiagnostics, Level};
    use crate::model::{
        ApiDocument, CompositeDefinition, EnumDefinition, HttpMethod, SchemaDefinition, SchemaKind,
    };
    use crate::transform::schema_graph::SchemaGraph;

    fn doc() -> ApiDocument {
        let pet = SchemaDefinition {
            key: "Pet".to_string(),
            description: None,
            kind: SchemaKind::Composite(CompositeDefinition::default()),
        };
        let status = SchemaDefinition {
            key: "Status".to_string(),
            description: None,
            kind: SchemaKind::Enum(EnumDefinition {
                values: vec!["available".into(), "sold-out".into()],
                display_names: None,
                flagged: None,
            }),
        };
        ApiDocument {
            schemas: [pet, status].into_iter().map(|s| (s.key.clone(), s)).collect(),
            ..Default::default()
        }
    }

    fn op(path: &str, params: Vec<ParameterDescriptor>) -> OperationDescriptor {
        OperationDescriptor {
            path: path.to_string(),
            method: HttpMethod::Get,
            tags: vec![],
            parameters: params,
            body: None,
            response: None,
            deprecated: false,
            operation_id: None,
            summary: None,
        }
    }

    fn param(name: &str, location: ParameterLocation, required: bool, schema: PropertyDescriptor) -> ParameterDescriptor {
        ParameterDescriptor {
            name: name.to_string(),
            location,
            required,
            schema,
            description: None,
        }
    }

    fn keywords() -> KeywordTable {
        KeywordTable::new(["string", "class"], "@")
    }

    #[test]
    fn test_apriori_names() {
        let mut o = op("/pets/{id}", vec![]);
        assert_eq!(apriori_method_name(&o), "GetPetsId");
        o.operation_id = Some("listPetsAsync".to_string());
        assert_eq!(apriori_method_name(&o), "ListPets");
        o.operation_id = Some("Async".to_string());
        assert_eq!(apriori_method_name(&o), "Async");
        o.operation_id = Some("pets.get-one".to_string());
        assert_eq!(apriori_method_name(&o), "PetsGetOne");
    }

    #[test]
    fn test_method_name_collisions() {
        let mut names = MethodNames::new();
        assert_eq!(names.claim("Get", "PetsClient").unwrap(), "Get");
        assert_eq!(names.claim("Get", "PetsClient").unwrap(), "Get__1__");
        assert_eq!(names.claim("Get", "PetsClient").unwrap(), "Get__2__");
    }

    #[test]
    fn test_method_name_ceiling() {
        let mut names = MethodNames::new();
        for _ in 0..=MAX_NAME_COLLISIONS {
            names.claim("Get", "PetsClient").unwrap();
        }
        let err = names.claim("Get", "PetsClient").unwrap_err();
        assert!(matches!(err, AssemblyError::TooManyCollisions { .. }));
    }

    #[test]
    fn test_parameter_ordering_and_defaults() {
        let d = doc();
        let graph = SchemaGraph::new(&d);
        let kw = keywords();
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), &kw);
        let limit = PropertyDescriptor {
            default: Some(serde_json::json!(20)),
            ..PropertyDescriptor::typed("integer")
        };
        let sort = PropertyDescriptor {
            default: Some(serde_json::json!("name")),
            ..PropertyDescriptor::typed("string")
        };
        let status = PropertyDescriptor {
            default: Some(serde_json::json!("sold-out")),
            ..PropertyDescriptor::reference("Status")
        };
        let operation = op(
            "/owners/{ownerId}/pets",
            vec![
                param("limit", ParameterLocation::Query, false, limit),
                param("X-Trace", ParameterLocation::Header, true, PropertyDescriptor::typed("string")),
                param("ownerId", ParameterLocation::Path, true, PropertyDescriptor::typed("integer")),
                param("sort", ParameterLocation::Query, false, sort),
                param("status", ParameterLocation::Query, false, status),
                param("q", ParameterLocation::Query, true, PropertyDescriptor::typed("string")),
            ],
        );
        let plan = assembler.assemble(&operation, "ListPets".to_string(), &mut CollectedDiagnostics::new());

        let order: Vec<&str> = plan.parameters.iter().map(|p| p.variable.as_str()).collect();
        assert_eq!(order, ["ownerId", "x_Trace", "q", "limit", "sort", "status"]);
        assert_eq!(plan.parameters[1].default, ParameterDefault::None);
        assert_eq!(plan.parameters[2].default, ParameterDefault::Absent);
        assert_eq!(plan.parameters[3].default, ParameterDefault::Raw("20".to_string()));
        assert_eq!(plan.parameters[4].default, ParameterDefault::Quoted("name".to_string()));
        assert_eq!(
            plan.parameters[5].default,
            ParameterDefault::EnumMember {
                type_name: "Status".to_string(),
                member: "sold_out".to_string()
            }
        );
        assert_eq!(
            plan.path,
            [
                PathSegment::Literal("/owners/".to_string()),
                PathSegment::Variable("ownerId".to_string()),
                PathSegment::Literal("/pets".to_string()),
            ]
        );
        assert_eq!(plan.query.len(), 4);
        assert_eq!(plan.query[2].enum_type.as_deref(), Some("Status"));
        assert_eq!(plan.headers[0].coercion, HeaderCoercion::PassThrough);
        assert!(plan.used_components.contains(&TypeRef::Named("Status".to_string())));
        assert_eq!(plan.summary, "HTTP Get on /owners/{ownerId}/pets");
    }

    #[test]
    fn test_required_flag_orders_parameters() {
        let d = doc();
        let graph = SchemaGraph::new(&d);
        let kw = keywords();
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), &kw);
        let version = PropertyDescriptor {
            default: Some(serde_json::json!(2)),
            ..PropertyDescriptor::typed("integer")
        };
        let operation = op(
            "/items/{version}",
            vec![
                param("optHeader", ParameterLocation::Header, false, PropertyDescriptor::typed("string")),
                param("reqQuery", ParameterLocation::Query, true, PropertyDescriptor::typed("string")),
                param("X-Tenant", ParameterLocation::Header, true, PropertyDescriptor::typed("string")),
                param("version", ParameterLocation::Path, false, version),
            ],
        );
        let plan = assembler.assemble(&operation, "GetItem".to_string(), &mut CollectedDiagnostics::new());

        let order: Vec<&str> = plan.parameters.iter().map(|p| p.variable.as_str()).collect();
        assert_eq!(order, ["version", "reqQuery", "x_Tenant", "optHeader"]);
        assert!(plan.parameters.iter().all(|p| p.required != (p.variable == "optHeader")));
        assert_eq!(plan.parameters[0].default, ParameterDefault::Raw("2".to_string()));
        // Follows a defaulted argument, so it cannot stay mandatory.
        assert_eq!(plan.parameters[2].default, ParameterDefault::Absent);
        assert_eq!(plan.parameters[3].default, ParameterDefault::Absent);

        let headers: Vec<(&str, bool)> = plan
            .headers
            .iter()
            .map(|h| (h.wire_name.as_str(), h.nullable))
            .collect();
        assert_eq!(headers, [("optHeader", true), ("X-Tenant", true)]);
    }

    #[test]
    fn test_reserved_variables_and_keywords() {
        let d = doc();
        let graph = SchemaGraph::new(&d);
        let kw = keywords();
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), &kw);
        let operation = op(
            "/x",
            vec![
                param("body", ParameterLocation::Query, false, PropertyDescriptor::typed("string")),
                param("class", ParameterLocation::Query, false, PropertyDescriptor::typed("string")),
                param("token", ParameterLocation::Header, true, PropertyDescriptor::typed("string")),
            ],
        );
        let plan = assembler.assemble(&operation, "X".to_string(), &mut CollectedDiagnostics::new());
        let vars: Vec<&str> = plan.parameters.iter().map(|p| p.variable.as_str()).collect();
        assert_eq!(vars, ["token_1", "body_1", "@class"]);
    }

    #[test]
    fn test_cookie_parameters_skipped() {
        let d = doc();
        let graph = SchemaGraph::new(&d);
        let kw = keywords();
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), &kw);
        let operation = op(
            "/x",
            vec![param("session", ParameterLocation::Cookie, true, PropertyDescriptor::typed("string"))],
        );
        let mut diag = CollectedDiagnostics::new();
        let plan = assembler.assemble(&operation, "X".to_string(), &mut diag);
        assert!(plan.parameters.is_empty());
        assert_eq!(diag.count(Level::Verbose), 1);
    }

    #[test]
    fn test_multipart_parts_and_header_coercions() {
        let d = doc();
        let graph = SchemaGraph::new(&d);
        let kw = keywords();
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), &kw);
        let mut fields = IndexMap::new();
        fields.insert("file".to_string(), PropertyDescriptor::binary());
        fields.insert("File".to_string(), PropertyDescriptor::typed("string"));
        fields.insert("pet".to_string(), PropertyDescriptor::reference("Pet"));
        let ids = PropertyDescriptor {
            items: Some(Box::new(PropertyDescriptor::typed("integer"))),
            ..PropertyDescriptor::typed("array")
        };
        let mut operation = op(
            "/upload",
            vec![
                param("ids", ParameterLocation::Header, true, ids),
                param("status", ParameterLocation::Header, true, PropertyDescriptor::reference("Status")),
                param("count", ParameterLocation::Header, true, PropertyDescriptor::typed("integer")),
            ],
        );
        operation.method = HttpMethod::Post;
        operation.body = Some(RequestBodyDescriptor::Multipart(fields));
        operation.response = Some(PropertyDescriptor::binary());

        let plan = assembler.assemble(&operation, "Upload".to_string(), &mut CollectedDiagnostics::new());
        let Some(BodyPlan::Multipart(parts)) = &plan.body else {
            panic!("expected multipart body");
        };
        let vars: Vec<&str> = parts.iter().map(|p| p.variable.as_str()).collect();
        assert_eq!(vars, ["file", "file_1", "pet"]);
        assert!(parts[0].is_stream());
        assert_eq!(parts[1].field_name, "File");

        let coercions: Vec<&HeaderCoercion> = plan.headers.iter().map(|h| &h.coercion).collect();
        assert_eq!(
            coercions,
            [
                &HeaderCoercion::EachToString,
                &HeaderCoercion::EnumWire("Status".to_string()),
                &HeaderCoercion::ToString,
            ]
        );
        assert_eq!(plan.response, ResponsePlan::Stream);
        assert!(plan.has_http_info());
        assert_eq!(
            plan.argument_names(),
            ["file", "file_1", "pet", "ids", "status", "count"]
        );
        assert_eq!(
            plan.used_components.iter().collect::<Vec<_>>(),
            [&TypeRef::Named("Status".to_string()), &TypeRef::Named("Pet".to_string())]
        );
    }

    #[test]
    fn test_typed_and_void_responses() {
        let d = doc();
        let graph = SchemaGraph::new(&d);
        let kw = keywords();
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), &kw);
        let mut operation = op("/pets", vec![]);
        operation.response = Some(PropertyDescriptor {
            items: Some(Box::new(PropertyDescriptor::reference("Pet"))),
            ..PropertyDescriptor::typed("array")
        });
        operation.summary = Some("List\nall pets".to_string());
        let plan = assembler.assemble(&operation, "ListPets".to_string(), &mut CollectedDiagnostics::new());
        assert_eq!(
            plan.response,
            ResponsePlan::Typed(TypeRef::sequence(TypeRef::Named("Pet".to_string())))
        );
        assert_eq!(plan.summary, "List all pets");

        operation.response = None;
        let plan = assembler.assemble(&operation, "ListPets".to_string(), &mut CollectedDiagnostics::new());
        assert_eq!(plan.response, ResponsePlan::Void);
        assert!(!plan.has_http_info());
        assert!(plan.used_components.is_empty());
    }

    #[test]
    fn test_unbound_placeholder_kept_literally() {
        let d = doc();
        let graph = SchemaGraph::new(&d);
        let kw = keywords();
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), &kw);
        let mut diag = CollectedDiagnostics::new();
        let plan = assembler.assemble(&op("/a/{b}", vec![]), "A".to_string(), &mut diag);
        assert_eq!(
            plan.path,
            [
                PathSegment::Literal("/a/".to_string()),
                PathSegment::Literal("{b}".to_string())
            ]
        );
        assert_eq!(diag.count(Level::Verbose), 1);
    }
}
