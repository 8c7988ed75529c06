use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use super::names::{to_type_name, uniquify};
use crate::model::{ApiDocument, CompositeDefinition, SchemaDefinition};

/// Named schema definitions plus the (implicit) edges between them.
///
/// Nodes are document keys. Edges are derived on demand from property
/// references and `allOf` parents; nothing is materialized besides the
/// key/type-name tables and the set of keys used as a parent.
#[derive(Debug)]
pub struct SchemaGraph<'d> {
    schemas: &'d IndexMap<String, SchemaDefinition>,
    names: HashMap<&'d str, String>,
    by_name: HashMap<String, &'d str>,
    parent_targets: HashSet<&'d str>,
}

impl<'d> SchemaGraph<'d> {
    pub fn new(doc: &'d ApiDocument) -> Self {
        let mut names = HashMap::new();
        let mut by_name = HashMap::new();
        for (key, name) in uniquify(doc.schemas.keys(), |key| to_type_name(key)) {
            by_name.insert(name.clone(), key.as_str());
            names.insert(key.as_str(), name);
        }

        let parent_targets = doc
            .schemas
            .values()
            .flat_map(|s| s.parents())
            .map(String::as_str)
            .collect();

        Self {
            schemas: &doc.schemas,
            names,
            by_name,
            parent_targets,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'d SchemaDefinition> {
        self.schemas.get(key)
    }

    pub fn composite(&self, key: &str) -> Option<&'d CompositeDefinition> {
        self.get(key).and_then(SchemaDefinition::as_composite)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.schemas.contains_key(key)
    }

    pub fn is_enum(&self, key: &str) -> bool {
        self.get(key).is_some_and(|s| s.as_enum().is_some())
    }

    /// Every schema key in document order.
    pub fn keys(&self) -> impl Iterator<Item = &'d str> + use<'d> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// The unique type name of a schema key.
    pub fn type_name(&self, key: &str) -> Option<&str> {
        self.names.get(key).map(String::as_str)
    }

    /// Reverse of [`type_name`](Self::type_name).
    pub fn key_for_name(&self, name: &str) -> Option<&'d str> {
        self.by_name.get(name).copied()
    }

    /// `allOf` parents that actually exist in the document. Dangling parents
    /// are skipped silently.
    pub fn parents(&self, key: &str) -> Vec<&'d str> {
        let Some(schema) = self.get(key) else {
            return Vec::new();
        };
        schema
            .parents()
            .iter()
            .filter_map(|p| self.schemas.get_key_value(p.as_str()))
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Outgoing edges: every referenced schema (through any container depth)
    /// followed by the parents. Only keys present in the document.
    pub fn edges(&self, key: &str) -> Vec<&'d str> {
        let mut out: Vec<&'d str> = Vec::new();
        if let Some(composite) = self.composite(key) {
            for prop in composite.properties.values() {
                for reference in prop.references() {
                    if let Some((k, _)) = self.schemas.get_key_value(reference) {
                        out.push(k.as_str());
                    }
                }
            }
        }
        out.extend(self.parents(key));
        out
    }

    /// Not top-level when some other schema uses it as an `allOf` parent.
    /// Top-level types can be sealed.
    pub fn is_top_level(&self, key: &str) -> bool {
        !self.parent_targets.contains(key)
    }
}
