use indexmap::IndexMap;

use crate::diagnostics::Diagnostics;
use crate::error::ResolveError;
use crate::parse::content::{self, ContentKind, RequestBody, Response};
use crate::parse::operation::{Operation, Parameter, ParameterLocation, PathItem};
use crate::parse::ref_resolve::{ComponentLookup, schema_ref_key};
use crate::parse::reference::RefOr;
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef};
use crate::parse::spec::OpenApiSpec;

use super::*;

/// Build the flat model from a parsed (and already merged) document.
pub fn build_document(
    spec: &OpenApiSpec,
    diagnostics: &mut dyn Diagnostics,
) -> Result<ApiDocument, ResolveError> {
    let lookup = ComponentLookup::new(spec);

    // Phase 1: component schemas, in document order
    let schemas = build_schemas(spec, diagnostics);

    // Phase 2: one descriptor per (path, verb)
    let mut operations = Vec::new();
    for (path, item) in &spec.paths {
        let path_params = resolve_parameters(&lookup, &item.parameters)?;
        collect_operations(&lookup, path, item, &path_params, diagnostics, &mut operations)?;
    }

    let info = ApiInfo {
        title: spec.info.title.clone(),
        description: spec.info.description.clone(),
        version: spec.info.version.clone(),
    };

    log::debug!(
        "model built: {} schemas, {} operations",
        schemas.len(),
        operations.len()
    );

    Ok(ApiDocument {
        info,
        schemas,
        operations,
    })
}

fn build_schemas(
    spec: &OpenApiSpec,
    diagnostics: &mut dyn Diagnostics,
) -> IndexMap<String, SchemaDefinition> {
    let mut schemas = IndexMap::new();
    let Some(components) = &spec.components else {
        return schemas;
    };

    for (key, schema_or_ref) in &components.schemas {
        let definition = match schema_or_ref {
            // `A: {$ref: B}` makes A a plain subtype of B.
            SchemaOrRef::Ref { ref_path } => SchemaDefinition {
                key: key.clone(),
                description: None,
                kind: SchemaKind::Composite(CompositeDefinition {
                    parents: vec![schema_ref_key(ref_path).to_string()],
                    ..Default::default()
                }),
            },
            SchemaOrRef::Schema(schema) => build_definition(key, schema, diagnostics),
        };
        schemas.insert(key.clone(), definition);
    }
    schemas
}

fn build_definition(
    key: &str,
    schema: &Schema,
    diagnostics: &mut dyn Diagnostics,
) -> SchemaDefinition {
    let description = schema.description.clone().or_else(|| schema.title.clone());

    if !schema.enum_values.is_empty() {
        if !schema.properties.is_empty() || !schema.all_of.is_empty() {
            diagnostics.verbose(format!(
                "schema '{key}' declares both enum values and properties; treating it as an enum"
            ));
        }
        return SchemaDefinition {
            key: key.to_string(),
            description,
            kind: SchemaKind::Enum(EnumDefinition {
                values: schema.enum_values.clone(),
                display_names: schema.enum_names.clone(),
                flagged: schema
                    .flagged_enum
                    .as_ref()
                    .map(|f| f.separating_strings.clone()),
            }),
        };
    }

    let mut composite = CompositeDefinition::default();
    let mut required: Vec<&str> = schema.required.iter().map(String::as_str).collect();
    let mut inline_members = Vec::new();

    for member in &schema.all_of {
        match member {
            SchemaOrRef::Ref { ref_path } => {
                composite.parents.push(schema_ref_key(ref_path).to_string());
            }
            SchemaOrRef::Schema(inline) => {
                required.extend(inline.required.iter().map(String::as_str));
                inline_members.push(inline.as_ref());
                // A nested inline member may itself name a parent.
                for nested in &inline.all_of {
                    if let SchemaOrRef::Ref { ref_path } = nested {
                        composite.parents.push(schema_ref_key(ref_path).to_string());
                    }
                }
            }
        }
    }

    let own = schema.properties.iter();
    let inherited_inline = inline_members.iter().flat_map(|s| s.properties.iter());
    for (name, prop) in own.chain(inherited_inline) {
        if composite.properties.contains_key(name) {
            continue;
        }
        let is_required = required.contains(&name.as_str());
        composite
            .properties
            .insert(name.clone(), descriptor(prop, is_required));
    }

    composite.discriminator = schema
        .discriminator
        .as_ref()
        .or_else(|| inline_members.iter().find_map(|s| s.discriminator.as_ref()))
        .map(|d| DiscriminatorDescriptor {
            property_name: d.property_name.clone(),
            mapping: d
                .mapping
                .iter()
                .map(|(wire, target)| (wire.clone(), schema_ref_key(target).to_string()))
                .collect(),
        });

    let kind = if composite.properties.is_empty()
        && composite.parents.is_empty()
        && composite.discriminator.is_none()
    {
        SchemaKind::Empty
    } else {
        SchemaKind::Composite(composite)
    };

    SchemaDefinition {
        key: key.to_string(),
        description,
        kind,
    }
}

/// Convert a property-level schema into a descriptor. Schema references stay
/// references; nothing is inlined.
fn descriptor(schema_or_ref: &SchemaOrRef, required: bool) -> PropertyDescriptor {
    match schema_or_ref {
        SchemaOrRef::Ref { ref_path } => PropertyDescriptor {
            required,
            ..PropertyDescriptor::reference(schema_ref_key(ref_path))
        },
        SchemaOrRef::Schema(schema) => {
            // `allOf: [{$ref: X}]` is the 3.0 idiom for a nullable or
            // described reference.
            let reference = match schema.all_of.as_slice() {
                [SchemaOrRef::Ref { ref_path }] => Some(schema_ref_key(ref_path).to_string()),
                _ => None,
            };
            let additional = match &schema.additional_properties {
                Some(AdditionalProperties::Bool(true)) => {
                    Some(Box::new(PropertyDescriptor::default()))
                }
                Some(AdditionalProperties::Schema(inner)) => Some(Box::new(descriptor(inner, false))),
                Some(AdditionalProperties::Bool(false)) | None => None,
            };
            PropertyDescriptor {
                type_token: schema.type_token().map(str::to_string),
                format: schema.format.clone(),
                reference,
                nullable: schema.is_nullable(),
                required,
                default: schema.default_value.clone(),
                items: schema
                    .items
                    .as_ref()
                    .map(|items| Box::new(descriptor(items, false))),
                additional,
                description: schema.description.clone(),
            }
        }
    }
}

fn collect_operations(
    lookup: &ComponentLookup<'_>,
    path: &str,
    item: &PathItem,
    path_params: &[&Parameter],
    diagnostics: &mut dyn Diagnostics,
    out: &mut Vec<OperationDescriptor>,
) -> Result<(), ResolveError> {
    for (method, op) in item.operations() {
        out.push(build_operation(lookup, method, path, item, op, path_params, diagnostics)?);
    }
    Ok(())
}

fn build_operation(
    lookup: &ComponentLookup<'_>,
    method: HttpMethod,
    path: &str,
    item: &PathItem,
    op: &Operation,
    path_params: &[&Parameter],
    diagnostics: &mut dyn Diagnostics,
) -> Result<OperationDescriptor, ResolveError> {
    let mut merged: Vec<&Parameter> = path_params.to_vec();
    for param in resolve_parameters(lookup, &op.parameters)? {
        match merged
            .iter()
            .position(|p| p.name == param.name && p.location == param.location)
        {
            Some(index) => merged[index] = param,
            None => merged.push(param),
        }
    }

    let parameters = merged
        .into_iter()
        .map(|p| ParameterDescriptor {
            name: p.name.clone(),
            location: p.location,
            // Path parameters are always required, whatever the document says.
            required: p.required || p.location == ParameterLocation::Path,
            schema: p
                .schema
                .as_ref()
                .map(|s| descriptor(s, false))
                .unwrap_or_else(|| PropertyDescriptor::typed("string")),
            description: p.description.clone(),
        })
        .collect();

    let body = match &op.request_body {
        Some(body) => build_request_body(lookup, body, method, path, diagnostics)?,
        None => None,
    };

    let response = build_response(lookup, &op.responses)?;

    Ok(OperationDescriptor {
        path: path.to_string(),
        method,
        tags: op.tags.clone(),
        parameters,
        body,
        response,
        deprecated: op.deprecated,
        operation_id: op.operation_id.clone(),
        summary: op.summary.clone().or_else(|| item.summary.clone()),
    })
}

fn resolve_parameters<'a>(
    lookup: &ComponentLookup<'a>,
    params: &'a [RefOr<Parameter>],
) -> Result<Vec<&'a Parameter>, ResolveError> {
    params.iter().map(|p| lookup.parameter(p)).collect()
}

fn build_request_body(
    lookup: &ComponentLookup<'_>,
    body: &RefOr<RequestBody>,
    method: HttpMethod,
    path: &str,
    diagnostics: &mut dyn Diagnostics,
) -> Result<Option<RequestBodyDescriptor>, ResolveError> {
    let body = lookup.request_body(body)?;
    let Some((kind, media)) = content::preferred(&body.content) else {
        if !body.content.is_empty() {
            diagnostics.verbose(format!(
                "{method} {path}: no supported request content type among {:?}",
                body.content.keys().collect::<Vec<_>>()
            ));
        }
        return Ok(None);
    };

    let descriptor = match kind {
        ContentKind::Multipart => {
            let fields = match &media.schema {
                Some(schema) => multipart_fields(lookup, schema),
                None => IndexMap::new(),
            };
            RequestBodyDescriptor::Multipart(fields)
        }
        ContentKind::OctetStream => RequestBodyDescriptor::OctetStream,
        ContentKind::Json => RequestBodyDescriptor::Json(
            media
                .schema
                .as_ref()
                .map(|s| descriptor(s, body.required))
                .unwrap_or_default(),
        ),
    };
    Ok(Some(descriptor))
}

fn multipart_fields(
    lookup: &ComponentLookup<'_>,
    schema: &SchemaOrRef,
) -> IndexMap<String, PropertyDescriptor> {
    let resolved = match schema {
        SchemaOrRef::Ref { ref_path } => lookup.schema(schema_ref_key(ref_path)),
        SchemaOrRef::Schema(s) => Some(s.as_ref()),
    };
    let Some(resolved) = resolved else {
        return IndexMap::new();
    };
    resolved
        .properties
        .iter()
        .map(|(name, prop)| {
            let required = resolved.required.contains(name);
            (name.clone(), descriptor(prop, required))
        })
        .collect()
}

/// The success response schema: `200`, else the first other 2xx, else
/// `default`.
fn build_response(
    lookup: &ComponentLookup<'_>,
    responses: &IndexMap<String, RefOr<Response>>,
) -> Result<Option<PropertyDescriptor>, ResolveError> {
    let chosen = responses
        .get("200")
        .or_else(|| {
            responses
                .iter()
                .find(|(status, _)| status.starts_with('2'))
                .map(|(_, r)| r)
        })
        .or_else(|| responses.get("default"));
    let Some(response) = chosen else {
        return Ok(None);
    };

    let response = lookup.response(response)?;
    let Some((kind, media)) = content::preferred(&response.content) else {
        return Ok(None);
    };
    if kind == ContentKind::OctetStream {
        return Ok(Some(PropertyDescriptor::binary()));
    }
    Ok(media.schema.as_ref().map(|s| descriptor(s, true)))
}
