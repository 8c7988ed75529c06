//! Inheritance between composite schemas.
//!
//! Schemas stay flat records with a parent-key list; everything here is
//! answered by walking that list through the [`SchemaGraph`]. The first
//! usable parent becomes the base type, any further parents are flattened
//! into the schema's own properties, so targets without multiple
//! inheritance see a single chain.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use super::schema_graph::SchemaGraph;
use crate::model::{CompositeDefinition, PropertyDescriptor};

/// A property together with the schema that declares it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnedProperty<'d> {
    pub owner: &'d str,
    pub name: &'d str,
    pub descriptor: &'d PropertyDescriptor,
}

/// A constructor argument; `inherited` ones are forwarded to the base
/// constructor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstructorParameter<'d> {
    pub property: OwnedProperty<'d>,
    pub inherited: bool,
}

/// Discriminator associations that survive into the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolymorphismPlan {
    pub property_name: String,
    /// Wire value → schema key, restricted to retained schemas.
    pub mappings: Vec<(String, String)>,
}

/// The properties of one composite that are required: listed as required,
/// or not nullable.
pub fn required_properties(composite: &CompositeDefinition) -> Vec<(&str, &PropertyDescriptor)> {
    composite
        .properties
        .iter()
        .filter(|(_, d)| d.required || !d.nullable)
        .map(|(n, d)| (n.as_str(), d))
        .collect()
}

#[derive(Debug, Clone, Copy)]
pub struct InheritanceComposer<'g, 'd> {
    graph: &'g SchemaGraph<'d>,
}

impl<'g, 'd> InheritanceComposer<'g, 'd> {
    pub fn new(graph: &'g SchemaGraph<'d>) -> Self {
        Self { graph }
    }

    /// First present parent that can act as a class, unless following its
    /// base chain leads back to `key`.
    pub fn base_type(&self, key: &str) -> Option<&'d str> {
        let candidate = self.raw_base(key)?;
        let mut seen = HashSet::new();
        let mut current = Some(candidate);
        while let Some(step) = current {
            if step == key {
                return None;
            }
            if !seen.insert(step) {
                break;
            }
            current = self.raw_base(step);
        }
        Some(candidate)
    }

    fn raw_base(&self, key: &str) -> Option<&'d str> {
        self.graph
            .parents(key)
            .into_iter()
            .find(|p| !self.graph.is_enum(p))
    }

    /// Base chain of `key`, root first, `key` excluded.
    pub fn ancestors(&self, key: &str) -> Vec<&'d str> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.base_type(key);
        while let Some(step) = current {
            if !seen.insert(step) {
                break;
            }
            chain.push(step);
            current = self.base_type(step);
        }
        chain.reverse();
        chain
    }

    /// Discriminator property names declared by `key` or any schema reached
    /// through its parents. These never become regular members.
    pub fn hidden_properties(&self, key: &str) -> HashSet<&'d str> {
        let mut hidden = HashSet::new();
        let mut visited = HashSet::new();
        self.collect_hidden(key, &mut visited, &mut hidden);
        hidden
    }

    fn collect_hidden(
        &self,
        key: &str,
        visited: &mut HashSet<&'d str>,
        hidden: &mut HashSet<&'d str>,
    ) {
        let Some(definition) = self.graph.get(key) else {
            return;
        };
        if !visited.insert(definition.key.as_str()) {
            return;
        }
        if let Some(d) = definition
            .as_composite()
            .and_then(|c| c.discriminator.as_ref())
        {
            hidden.insert(d.property_name.as_str());
        }
        for parent in self.graph.parents(key) {
            self.collect_hidden(parent, visited, hidden);
        }
    }

    /// Every property visible on `key`: parents' first (base first), then
    /// its own. First occurrence of a name wins. Discriminator properties
    /// are left out.
    pub fn all_properties(&self, key: &str) -> Vec<OwnedProperty<'d>> {
        let hidden = self.hidden_properties(key);
        let mut out = IndexMap::new();
        let mut visited = HashSet::new();
        self.collect_properties(key, &mut visited, &mut out);
        out.into_values()
            .filter(|p: &OwnedProperty<'d>| !hidden.contains(p.name))
            .collect()
    }

    fn collect_properties(
        &self,
        key: &str,
        visited: &mut HashSet<&'d str>,
        out: &mut IndexMap<&'d str, OwnedProperty<'d>>,
    ) {
        let Some(definition) = self.graph.get(key) else {
            return;
        };
        let owner = definition.key.as_str();
        if !visited.insert(owner) {
            return;
        }
        let Some(composite) = definition.as_composite() else {
            return;
        };

        // Base first so its order is a prefix of ours.
        let base = self.base_type(key);
        let parents = self.graph.parents(key);
        for parent in base.into_iter().chain(parents.into_iter().filter(|p| Some(*p) != base)) {
            self.collect_properties(parent, visited, out);
        }
        for (name, descriptor) in &composite.properties {
            out.entry(name.as_str()).or_insert(OwnedProperty {
                owner,
                name,
                descriptor,
            });
        }
    }

    /// Properties declared on the base chain.
    pub fn inherited_properties(&self, key: &str) -> Vec<OwnedProperty<'d>> {
        match self.base_type(key) {
            Some(base) => self.all_properties(base),
            None => Vec::new(),
        }
    }

    /// Properties the type for `key` must declare itself: its own plus
    /// everything flattened in from secondary parents, minus whatever the
    /// base chain already provides.
    pub fn own_properties(&self, key: &str) -> Vec<OwnedProperty<'d>> {
        let inherited: HashSet<&str> = self
            .inherited_properties(key)
            .iter()
            .map(|p| p.name)
            .collect();
        self.all_properties(key)
            .into_iter()
            .filter(|p| !inherited.contains(p.name))
            .collect()
    }

    /// Whether the schema declaring `property` counts it as required.
    pub fn is_required(&self, property: &OwnedProperty<'d>) -> bool {
        self.graph.composite(property.owner).is_some_and(|composite| {
            required_properties(composite)
                .iter()
                .any(|(name, _)| *name == property.name)
        })
    }

    /// Own and transitively inherited required properties, inherited ones
    /// first (root first). Missing parents are skipped.
    pub fn compose_constructor_parameters(&self, key: &str) -> Vec<ConstructorParameter<'d>> {
        let inherited: HashSet<&str> = self
            .inherited_properties(key)
            .iter()
            .map(|p| p.name)
            .collect();
        self.all_properties(key)
            .into_iter()
            .filter(|p| self.is_required(p))
            .map(|property| ConstructorParameter {
                inherited: inherited.contains(property.name),
                property,
            })
            .collect()
    }

    /// Properties fed to iteration helpers: inherited first, then own,
    /// without any discriminator property.
    pub fn iterable_properties(&self, key: &str) -> Vec<OwnedProperty<'d>> {
        self.all_properties(key)
    }

    /// Discriminator plan restricted to mappings whose target is retained.
    pub fn resolve_polymorphism(
        &self,
        key: &str,
        retained: &IndexSet<String>,
    ) -> Option<PolymorphismPlan> {
        let discriminator = self.graph.composite(key)?.discriminator.as_ref()?;
        let mappings = discriminator
            .mapping
            .iter()
            .filter(|(_, target)| retained.contains(target.as_str()) && self.graph.contains(target))
            .map(|(wire, target)| (wire.clone(), target.clone()))
            .collect();
        Some(PolymorphismPlan {
            property_name: discriminator.property_name.clone(),
            mappings,
        })
    }

    /// Whether `key` reaches `ancestor` through base types.
    pub fn is_subtype_of(&self, key: &str, ancestor: &str) -> bool {
        self.ancestors(key).iter().any(|a| *a == ancestor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ApiDocument, DiscriminatorDescriptor, SchemaDefinition, SchemaKind};

    fn prop(nullable: bool, required: bool) -> PropertyDescriptor {
        PropertyDescriptor {
            nullable,
            required,
            ..PropertyDescriptor::typed("string")
        }
    }

    fn composite(
        key: &str,
        props: Vec<(&str, PropertyDescriptor)>,
        parents: &[&str],
    ) -> SchemaDefinition {
        SchemaDefinition {
            key: key.to_string(),
            description: None,
            kind: SchemaKind::Composite(CompositeDefinition {
                properties: props.into_iter().map(|(n, d)| (n.to_string(), d)).collect(),
                parents: parents.iter().map(|p| p.to_string()).collect(),
                discriminator: None,
            }),
        }
    }

    fn doc(defs: Vec<SchemaDefinition>) -> ApiDocument {
        ApiDocument {
            schemas: defs.into_iter().map(|d| (d.key.clone(), d)).collect(),
            ..Default::default()
        }
    }

    fn names(props: &[OwnedProperty<'_>]) -> Vec<String> {
        props.iter().map(|p| p.name.to_string()).collect()
    }

    #[test]
    fn test_required_means_flagged_or_not_nullable() {
        let c = CompositeDefinition {
            properties: [
                ("a".to_string(), prop(false, false)),
                ("b".to_string(), prop(true, false)),
                ("c".to_string(), prop(true, true)),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        let required: Vec<&str> = required_properties(&c).into_iter().map(|(n, _)| n).collect();
        assert_eq!(required, ["a", "c"]);
    }

    #[test]
    fn test_is_required_checks_declaring_schema() {
        let d = doc(vec![
            composite("Parent", vec![("id", prop(false, false)), ("tag", prop(true, false))], &[]),
            composite("Child", vec![("note", prop(true, true))], &["Parent"]),
        ]);
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        let required: Vec<(&str, &str)> = composer
            .all_properties("Child")
            .iter()
            .filter(|p| composer.is_required(p))
            .map(|p| (p.owner, p.name))
            .collect();
        assert_eq!(required, [("Parent", "id"), ("Child", "note")]);
    }

    #[test]
    fn test_constructor_inherits_parent_requirements() {
        let d = doc(vec![
            composite("Parent", vec![("id", prop(false, true)), ("name", prop(false, true))], &[]),
            composite("Child", vec![("note", prop(true, false))], &["Parent"]),
        ]);
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        let params = composer.compose_constructor_parameters("Child");
        let names: Vec<&str> = params.iter().map(|p| p.property.name).collect();
        assert_eq!(names, ["id", "name"]);
        assert!(params.iter().all(|p| p.inherited));
        assert_eq!(composer.base_type("Child"), Some("Parent"));
    }

    #[test]
    fn test_transitive_chain_is_root_first() {
        let d = doc(vec![
            composite("C", vec![("c", prop(false, true))], &["B"]),
            composite("B", vec![("b", prop(false, true))], &["A"]),
            composite("A", vec![("a", prop(false, true))], &[]),
        ]);
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        assert_eq!(composer.ancestors("C"), ["A", "B"]);
        let params = composer.compose_constructor_parameters("C");
        let order: Vec<(&str, bool)> = params.iter().map(|p| (p.property.name, p.inherited)).collect();
        assert_eq!(order, [("a", true), ("b", true), ("c", false)]);
    }

    #[test]
    fn test_missing_parent_skipped() {
        let d = doc(vec![composite("Orphan", vec![("x", prop(false, false))], &["Gone"])]);
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        assert_eq!(composer.base_type("Orphan"), None);
        assert_eq!(names(&composer.all_properties("Orphan")), ["x"]);
    }

    #[test]
    fn test_cyclic_all_of_terminates() {
        let d = doc(vec![
            composite("A", vec![("a", prop(false, true))], &["B"]),
            composite("B", vec![("b", prop(false, true))], &["A"]),
        ]);
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        assert_eq!(composer.base_type("A"), None);
        assert_eq!(composer.base_type("B"), None);
        assert_eq!(names(&composer.all_properties("A")), ["b", "a"]);
        assert_eq!(composer.compose_constructor_parameters("B").len(), 2);
    }

    #[test]
    fn test_secondary_parents_are_flattened() {
        let d = doc(vec![
            composite("Base", vec![("id", prop(false, false))], &[]),
            composite("Audit", vec![("created", prop(true, false))], &[]),
            composite("Item", vec![("name", prop(false, false))], &["Base", "Audit"]),
        ]);
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        assert_eq!(composer.base_type("Item"), Some("Base"));
        assert_eq!(names(&composer.inherited_properties("Item")), ["id"]);
        assert_eq!(names(&composer.own_properties("Item")), ["created", "name"]);
    }

    #[test]
    fn test_redeclared_property_not_duplicated() {
        let d = doc(vec![
            composite("Base", vec![("id", prop(false, false))], &[]),
            composite("Derived", vec![("id", prop(true, false)), ("x", prop(false, false))], &["Base"]),
        ]);
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        assert_eq!(names(&composer.own_properties("Derived")), ["x"]);
        assert_eq!(composer.all_properties("Derived")[0].owner, "Base");
    }

    fn zoo() -> ApiDocument {
        let mut animal = composite(
            "Animal",
            vec![("kind", prop(false, true)), ("name", prop(false, true))],
            &[],
        );
        if let SchemaKind::Composite(c) = &mut animal.kind {
            c.discriminator = Some(DiscriminatorDescriptor {
                property_name: "kind".to_string(),
                mapping: [("dog", "Dog"), ("cat", "Cat"), ("fish", "Fish")]
                    .into_iter()
                    .map(|(w, k)| (w.to_string(), k.to_string()))
                    .collect(),
            });
        }
        doc(vec![
            animal,
            composite("Dog", vec![("barks", prop(false, false))], &["Animal"]),
            composite("Cat", vec![("lives", prop(false, false))], &["Animal"]),
        ])
    }

    #[test]
    fn test_polymorphism_keeps_retained_mappings_only() {
        let d = zoo();
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        let retained: IndexSet<String> = ["Animal", "Dog"].iter().map(|s| s.to_string()).collect();
        let plan = composer.resolve_polymorphism("Animal", &retained).unwrap();
        assert_eq!(plan.property_name, "kind");
        assert_eq!(plan.mappings, [("dog".to_string(), "Dog".to_string())]);
        assert!(composer.resolve_polymorphism("Dog", &retained).is_none());
    }

    #[test]
    fn test_discriminator_excluded_from_iteration() {
        let d = zoo();
        let graph = SchemaGraph::new(&d);
        let composer = InheritanceComposer::new(&graph);
        assert_eq!(names(&composer.iterable_properties("Animal")), ["name"]);
        assert_eq!(names(&composer.iterable_properties("Dog")), ["name", "barks"]);
        assert!(composer.is_subtype_of("Dog", "Animal"));
        assert!(!composer.is_subtype_of("Animal", "Dog"));
    }
}
