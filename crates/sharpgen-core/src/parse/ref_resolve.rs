use indexmap::IndexMap;

use super::components::Components;
use super::content::{RequestBody, Response};
use super::operation::Parameter;
use super::reference::RefOr;
use super::schema::{Schema, SchemaOrRef};
use super::spec::OpenApiSpec;
use crate::error::ResolveError;

/// Chains of `$ref -> $ref -> ...` longer than this are treated as cycles.
const MAX_REF_HOPS: usize = 64;

/// Looks up component-level `$ref` targets by name.
///
/// Schema references are not inlined here: they stay named references so
/// the schema graph can reason about them. Only parameters, request bodies
/// and responses are resolved to their definitions.
pub struct ComponentLookup<'a> {
    components: Option<&'a Components>,
}

impl<'a> ComponentLookup<'a> {
    pub fn new(spec: &'a OpenApiSpec) -> Self {
        Self {
            components: spec.components.as_ref(),
        }
    }

    pub fn parameter(&self, param: &'a RefOr<Parameter>) -> Result<&'a Parameter, ResolveError> {
        self.follow(param, "parameters", |c| &c.parameters)
    }

    pub fn request_body(
        &self,
        body: &'a RefOr<RequestBody>,
    ) -> Result<&'a RequestBody, ResolveError> {
        self.follow(body, "requestBodies", |c| &c.request_bodies)
    }

    pub fn response(&self, response: &'a RefOr<Response>) -> Result<&'a Response, ResolveError> {
        self.follow(response, "responses", |c| &c.responses)
    }

    /// Follow a component schema through alias references (`A: {$ref: B}`)
    /// to its inline definition. `None` when the chain dangles or loops.
    pub fn schema(&self, key: &str) -> Option<&'a Schema> {
        let schemas = &self.components?.schemas;
        let mut current = schemas.get(key)?;
        for _ in 0..MAX_REF_HOPS {
            match current {
                SchemaOrRef::Schema(s) => return Some(s),
                SchemaOrRef::Ref { ref_path } => current = schemas.get(schema_ref_key(ref_path))?,
            }
        }
        None
    }

    /// Walk `$ref`s within one components section until an inline item.
    fn follow<T>(
        &self,
        start: &'a RefOr<T>,
        section: &str,
        table: impl Fn(&'a Components) -> &'a IndexMap<String, RefOr<T>>,
    ) -> Result<&'a T, ResolveError> {
        let mut current = start;
        for _ in 0..MAX_REF_HOPS {
            let ref_path = match current {
                RefOr::Item(item) => return Ok(item),
                RefOr::Ref { ref_path } => ref_path,
            };
            let name = parse_ref_name(ref_path, section)?;
            current = self
                .components
                .and_then(|c| table(c).get(name))
                .ok_or_else(|| ResolveError::RefTargetNotFound(ref_path.clone()))?;
        }
        let origin = start.reference().unwrap_or(section);
        Err(ResolveError::CircularRef(origin.to_string()))
    }
}

/// Parse a `$ref` path like `#/components/parameters/Foo` and extract the name.
pub fn parse_ref_name<'a>(
    ref_path: &'a str,
    expected_section: &str,
) -> Result<&'a str, ResolveError> {
    let stripped = ref_path
        .strip_prefix("#/components/")
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    let (section, name) = stripped
        .split_once('/')
        .ok_or_else(|| ResolveError::InvalidRefFormat(ref_path.to_string()))?;
    if section != expected_section {
        return Err(ResolveError::InvalidRefFormat(format!(
            "expected section '{}', got '{}' in {}",
            expected_section, section, ref_path
        )));
    }
    Ok(name)
}

/// The schema key a schema reference points at.
///
/// Lenient on purpose: `#/components/schemas/Pet`, `#/definitions/Pet` and a
/// bare `Pet` (as used in discriminator mappings) all yield `Pet`.
pub fn schema_ref_key(ref_path: &str) -> &str {
    ref_path.rsplit('/').next().unwrap_or(ref_path)
}
