use std::collections::HashSet;

use minijinja::{Environment, Value, context};
use sharpgen_core::GeneratedFile;
use sharpgen_core::config::GeneratorConfig;
use sharpgen_core::ir::{
    BODY_VARIABLE, BodyPlan, ClientPlan, GenerationPlan, HeaderArgument, HeaderCoercion,
    MethodPlan, PathSegment, QueryArgument, ResponsePlan,
};
use sharpgen_core::transform::TypeRef;

use crate::error::GeneratorError;
use crate::type_mapper::{default_literal, nullable_cs, string_literal, type_ref_to_cs};

const INDENT: &str = "        ";

/// Emit `Clients/<Name>.cs` for every client group.
pub fn emit_clients(
    env: &Environment<'_>,
    plan: &GenerationPlan,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let enums: HashSet<&str> = plan.enums().map(|e| e.name.as_str()).collect();
    let tmpl = env.get_template("client.cs.j2")?;

    let mut files = Vec::with_capacity(plan.clients.len());
    for client in &plan.clients {
        if client.methods.is_empty() {
            log::debug!("{} has no methods, skipping", client.name);
            continue;
        }
        let content = tmpl.render(client_context(client, plan, config, &enums))?;
        files.push(GeneratedFile {
            path: format!("Clients/{}.cs", client.name),
            content,
        });
    }
    Ok(files)
}

fn client_context(
    client: &ClientPlan,
    plan: &GenerationPlan,
    config: &GeneratorConfig,
    enums: &HashSet<&str>,
) -> Value {
    let interface = config.include_interfaces.then(|| client.interface_name());
    let mut declaration = format!(
        "{} sealed class {}",
        config.client_visibility().as_str(),
        client.name
    );
    if let Some(interface) = &interface {
        declaration.push_str(" : ");
        declaration.push_str(interface);
    }

    let methods: Vec<Value> = client
        .methods
        .iter()
        .map(|m| method_context(m, enums))
        .collect();

    context! {
        namespace => plan.namespace.clone(),
        visibility => config.visibility.as_str(),
        name => client.name.clone(),
        declaration => declaration,
        interface => interface,
        methods => methods,
    }
}

fn method_context(method: &MethodPlan, enums: &HashSet<&str>) -> Value {
    let (request, request_variable) = request_lines(method, enums);

    let mut arguments = method.argument_names();
    arguments.push("token");

    let (response, read_response, result_binding) = match &method.response {
        ResponsePlan::Typed(type_ref) => (
            nullable_cs(type_ref, true),
            format!(
                "__my_options.DeSerializeContent<{}>(__result, token)",
                type_ref_to_cs(type_ref)
            ),
            "using var",
        ),
        // The caller owns the stream, so the response stays undisposed.
        ResponsePlan::Stream => (
            "System.IO.Stream".to_string(),
            "__result.Content.ReadAsStreamAsync(token)".to_string(),
            "var",
        ),
        ResponsePlan::Void => (String::new(), String::new(), "using var"),
    };

    context! {
        name => method.name.clone(),
        summary => method.summary.clone(),
        obsolete => method.deprecated,
        http_info => method.has_http_info(),
        parameters => signature(method),
        arguments => arguments.join(", "),
        request => request,
        request_variable => request_variable,
        response => response,
        read_response => read_response,
        result_binding => result_binding,
    }
}

/// Parameter list: body (or multipart parts), then the ordered parameters,
/// then the cancellation token.
fn signature(method: &MethodPlan) -> String {
    let mut parts = Vec::new();
    match &method.body {
        Some(BodyPlan::Json { type_ref }) => {
            parts.push(format!("{} {BODY_VARIABLE}", type_ref_to_cs(type_ref)));
        }
        Some(BodyPlan::Stream) => parts.push(format!("System.IO.Stream {BODY_VARIABLE}")),
        Some(BodyPlan::Multipart(multipart)) => {
            parts.extend(
                multipart
                    .iter()
                    .map(|p| format!("{} {}", type_ref_to_cs(&p.type_ref), p.variable)),
            );
        }
        None => {}
    }
    for parameter in &method.parameters {
        let ty = nullable_cs(&parameter.type_ref, parameter.is_nullable());
        parts.push(match default_literal(&parameter.default, &parameter.type_ref) {
            Some(default) => format!("{ty} {} = {default}", parameter.variable),
            None => format!("{ty} {}", parameter.variable),
        });
    }
    parts.push("System.Threading.CancellationToken token = default".to_string());
    parts.join(", ")
}

/// Statements that build the request, and the variable holding it.
fn request_lines(method: &MethodPlan, enums: &HashSet<&str>) -> (Vec<String>, &'static str) {
    let mut lines = Vec::new();
    let mut path = interpolated_path(method, enums);

    if !method.query.is_empty() {
        lines.push(format!("{INDENT}__QueryBuilder __my_queryBuilder = new();"));
        for query in &method.query {
            lines.push(format!(
                "{INDENT}__my_queryBuilder.AddParameter({}, {});",
                query_value(query),
                string_literal(&query.wire_name)
            ));
        }
        lines.push(String::new());
        path.push_str("{__my_queryBuilder}");
    }

    let verb = format!("System.Net.Http.HttpMethod.{}", method.method.pascal());
    match &method.body {
        Some(BodyPlan::Multipart(parts)) => {
            lines.push(format!(
                "{INDENT}using System.Net.Http.HttpRequestMessage __my_request = new({verb}, $\"{path}\");"
            ));
            let mut contents = Vec::with_capacity(parts.len());
            for part in parts {
                let content = format!("__{}", part.variable.trim_start_matches('@'));
                let field = string_literal(&part.field_name);
                if part.is_stream() {
                    lines.push(format!(
                        "{INDENT}using System.Net.Http.StreamContent {content} = new({});",
                        part.variable
                    ));
                    contents.push(format!("{{ {content}, {field}, {field} }}"));
                } else {
                    lines.push(format!(
                        "{INDENT}using var {content} = __my_options.CreateContent({});",
                        part.variable
                    ));
                    contents.push(format!("{{ {content}, {field} }}"));
                }
            }
            lines.push(format!(
                "{INDENT}__my_request.Content = new System.Net.Http.MultipartFormDataContent"
            ));
            lines.push(format!("{INDENT}{{"));
            for content in contents {
                lines.push(format!("{INDENT}    {content},"));
            }
            lines.push(format!("{INDENT}}};"));
            push_headers(&mut lines, &method.headers);
            lines.push(String::new());
            lines.push(format!(
                "{INDENT}using var __my_intercepted_request = await __my_options.InterceptRequest(__my_request, token);"
            ));
            (lines, "__my_intercepted_request")
        }
        body => {
            let call = match body {
                Some(BodyPlan::Json { .. }) => format!(
                    "__my_options.CreateRequest({verb}, $\"{path}\", {BODY_VARIABLE}, token)"
                ),
                Some(BodyPlan::Stream) => format!(
                    "__my_options.CreateStreamRequest({verb}, $\"{path}\", {BODY_VARIABLE}, token)"
                ),
                _ => format!("__my_options.CreateRequest({verb}, $\"{path}\", token)"),
            };
            lines.push(format!("{INDENT}using var __my_request = await {call};"));
            push_headers(&mut lines, &method.headers);
            (lines, "__my_request")
        }
    }
}

fn query_value(query: &QueryArgument) -> String {
    match &query.enum_type {
        Some(enum_type) => format!("{enum_type}Values.ToWire({})", query.variable),
        None => query.variable.clone(),
    }
}

fn push_headers(lines: &mut Vec<String>, headers: &[HeaderArgument]) {
    for header in headers {
        let variable = &header.variable;
        let value = match &header.coercion {
            HeaderCoercion::PassThrough => variable.clone(),
            HeaderCoercion::EachToString => {
                format!("System.Linq.Enumerable.Select({variable}, __item => \"\" + __item)")
            }
            HeaderCoercion::EnumWire(enum_type) => format!("{enum_type}Values.ToWire({variable})"),
            HeaderCoercion::ToString => format!("\"\" + {variable}"),
        };
        let add = format!(
            "__my_request.Headers.Add({}, {value});",
            string_literal(&header.wire_name)
        );
        if header.nullable {
            lines.push(format!("{INDENT}if ({variable} is not null)"));
            lines.push(format!("{INDENT}{{"));
            lines.push(format!("{INDENT}    {add}"));
            lines.push(format!("{INDENT}}}"));
        } else {
            lines.push(format!("{INDENT}{add}"));
        }
    }
}

/// Body of the `$"..."` request path. The leading slash is dropped so the
/// path stays relative to the client's base address.
fn interpolated_path(method: &MethodPlan, enums: &HashSet<&str>) -> String {
    let mut out = String::new();
    for (index, segment) in method.path.iter().enumerate() {
        match segment {
            PathSegment::Literal(text) => {
                let text = if index == 0 {
                    text.trim_start_matches('/')
                } else {
                    text.as_str()
                };
                out.push_str(&escape_interpolated(text));
            }
            PathSegment::Variable(variable) => {
                let type_ref = method
                    .parameters
                    .iter()
                    .find(|p| &p.variable == variable)
                    .map(|p| &p.type_ref);
                let value = match type_ref {
                    Some(t) if t.is_string() => variable.clone(),
                    Some(TypeRef::Named(name)) if enums.contains(name.as_str()) => {
                        format!("{name}Values.ToWire({variable}) ?? \"\"")
                    }
                    _ => format!("\"\" + {variable}"),
                };
                out.push_str(&format!("{{System.Uri.EscapeDataString({value})}}"));
            }
        }
    }
    out
}

fn escape_interpolated(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('{', "{{")
        .replace('}', "}}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharpgen_core::ir::{MultipartPart, ParameterDefault, ParameterPlan};
    use sharpgen_core::model::{HttpMethod, ParameterLocation};
    use sharpgen_core::transform::Primitive;

    fn string() -> TypeRef {
        TypeRef::Primitive(Primitive::String)
    }

    fn method(name: &str) -> MethodPlan {
        MethodPlan {
            name: name.to_string(),
            method: HttpMethod::Get,
            path: vec![
                PathSegment::Literal("/pets/".to_string()),
                PathSegment::Variable("id".to_string()),
            ],
            summary: "Find a pet".to_string(),
            deprecated: false,
            parameters: vec![ParameterPlan {
                wire_name: "id".to_string(),
                variable: "id".to_string(),
                location: ParameterLocation::Path,
                required: true,
                type_ref: string(),
                default: ParameterDefault::None,
                description: None,
            }],
            body: None,
            query: vec![],
            headers: vec![],
            response: ResponsePlan::Void,
            used_components: Default::default(),
        }
    }

    #[test]
    fn test_path_interpolation() {
        let enums = HashSet::from(["Kind"]);
        let mut m = method("Get");
        assert_eq!(
            interpolated_path(&m, &enums),
            "pets/{System.Uri.EscapeDataString(id)}"
        );

        m.parameters[0].type_ref = TypeRef::Primitive(Primitive::Int64);
        m.path.push(PathSegment::Literal("/{raw}".to_string()));
        assert_eq!(
            interpolated_path(&m, &enums),
            "pets/{System.Uri.EscapeDataString(\"\" + id)}/{{raw}}"
        );

        m.parameters[0].type_ref = TypeRef::Named("Kind".to_string());
        assert!(interpolated_path(&m, &enums).contains("KindValues.ToWire(id) ?? \"\""));
    }

    #[test]
    fn test_signature_orders_body_parameters_token() {
        let mut m = method("Create");
        m.body = Some(BodyPlan::Json {
            type_ref: TypeRef::Named("NewPet".to_string()),
        });
        m.parameters.push(ParameterPlan {
            wire_name: "limit".to_string(),
            variable: "limit".to_string(),
            location: ParameterLocation::Query,
            required: false,
            type_ref: TypeRef::Primitive(Primitive::Int32),
            default: ParameterDefault::Absent,
            description: None,
        });
        assert_eq!(
            signature(&m),
            "NewPet body, string id, int? limit = default, System.Threading.CancellationToken token = default"
        );
    }

    #[test]
    fn test_query_and_headers() {
        let mut m = method("List");
        m.query = vec![
            QueryArgument {
                variable: "status".to_string(),
                wire_name: "status".to_string(),
                enum_type: Some("PetStatus".to_string()),
                nullable: true,
            },
            QueryArgument {
                variable: "limit".to_string(),
                wire_name: "limit".to_string(),
                enum_type: None,
                nullable: false,
            },
        ];
        m.headers = vec![
            HeaderArgument {
                wire_name: "X-Ids".to_string(),
                variable: "xIds".to_string(),
                coercion: HeaderCoercion::EachToString,
                nullable: true,
            },
            HeaderArgument {
                wire_name: "X-Count".to_string(),
                variable: "xCount".to_string(),
                coercion: HeaderCoercion::ToString,
                nullable: false,
            },
        ];
        let (lines, variable) = request_lines(&m, &HashSet::new());
        assert_eq!(variable, "__my_request");
        assert_eq!(
            lines,
            [
                "        __QueryBuilder __my_queryBuilder = new();",
                "        __my_queryBuilder.AddParameter(PetStatusValues.ToWire(status), \"status\");",
                "        __my_queryBuilder.AddParameter(limit, \"limit\");",
                "",
                "        using var __my_request = await __my_options.CreateRequest(System.Net.Http.HttpMethod.Get, $\"pets/{System.Uri.EscapeDataString(id)}{__my_queryBuilder}\", token);",
                "        if (xIds is not null)",
                "        {",
                "            __my_request.Headers.Add(\"X-Ids\", System.Linq.Enumerable.Select(xIds, __item => \"\" + __item));",
                "        }",
                "        __my_request.Headers.Add(\"X-Count\", \"\" + xCount);",
            ]
        );
    }

    #[test]
    fn test_multipart_request() {
        let mut m = method("Upload");
        m.method = HttpMethod::Post;
        m.body = Some(BodyPlan::Multipart(vec![
            MultipartPart {
                variable: "file".to_string(),
                field_name: "file".to_string(),
                type_ref: TypeRef::Primitive(Primitive::Stream),
            },
            MultipartPart {
                variable: "@class".to_string(),
                field_name: "class".to_string(),
                type_ref: string(),
            },
        ]));
        let (lines, variable) = request_lines(&m, &HashSet::new());
        assert_eq!(variable, "__my_intercepted_request");
        assert!(lines.contains(&"        using System.Net.Http.StreamContent __file = new(file);".to_string()));
        assert!(lines.contains(&"        using var __class = __my_options.CreateContent(@class);".to_string()));
        assert!(lines.contains(&"            { __file, \"file\", \"file\" },".to_string()));
        assert!(lines.contains(&"            { __class, \"class\" },".to_string()));
        assert_eq!(
            signature(&m),
            "System.IO.Stream file, string @class, string id, System.Threading.CancellationToken token = default"
        );
    }
}
