//! Render plans for the retained schemas.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};

use super::enums::assemble_enum;
use super::inheritance::{InheritanceComposer, OwnedProperty};
use super::names::{KeywordTable, Uniquifier, to_member_name, to_variable_name};
use super::schema_graph::SchemaGraph;
use super::types::{TypeRef, TypeResolver};
use crate::diagnostics::Diagnostics;
use crate::ir::{
    ClassPlan, ConstructorArgument, ConstructorPlan, IterableProperty, ModelPlan,
    PolymorphismSpec, PropertyPlan,
};

/// Property name → member name for every property visible on a class.
type MemberTable<'d> = IndexMap<&'d str, String>;

pub struct ModelAssembler<'g, 'd> {
    graph: &'g SchemaGraph<'d>,
    types: TypeResolver<'g, 'd>,
    composer: InheritanceComposer<'g, 'd>,
    keywords: &'g KeywordTable,
    required_constructor_parameters: bool,
    members: HashMap<&'d str, MemberTable<'d>>,
}

impl<'g, 'd> ModelAssembler<'g, 'd> {
    pub fn new(
        graph: &'g SchemaGraph<'d>,
        keywords: &'g KeywordTable,
        required_constructor_parameters: bool,
    ) -> Self {
        Self {
            graph,
            types: TypeResolver::new(graph),
            composer: InheritanceComposer::new(graph),
            keywords,
            required_constructor_parameters,
            members: HashMap::new(),
        }
    }

    /// Plans for `retained`, in document order.
    pub fn assemble(
        &mut self,
        retained: &IndexSet<String>,
        diagnostics: &mut dyn Diagnostics,
    ) -> Vec<ModelPlan> {
        let graph = self.graph;
        graph
            .keys()
            .filter(|key| retained.contains(*key))
            .filter_map(|key| self.model(key, retained, diagnostics))
            .collect()
    }

    fn model(
        &mut self,
        key: &'d str,
        retained: &IndexSet<String>,
        diagnostics: &mut dyn Diagnostics,
    ) -> Option<ModelPlan> {
        let definition = self.graph.get(key)?;
        let name = self.graph.type_name(key)?.to_string();
        if let Some(enumeration) = definition.as_enum() {
            return Some(ModelPlan::Enum(assemble_enum(
                key,
                &name,
                definition.description.as_deref(),
                enumeration,
                self.keywords,
                diagnostics,
            )));
        }
        Some(ModelPlan::Class(self.class(key, name, retained, diagnostics)))
    }

    fn class(
        &mut self,
        key: &'d str,
        name: String,
        retained: &IndexSet<String>,
        diagnostics: &mut dyn Diagnostics,
    ) -> ClassPlan {
        let members = self.member_table(key).clone();
        let member = |property: &OwnedProperty<'d>| {
            members
                .get(property.name)
                .cloned()
                .unwrap_or_else(|| to_member_name(property.name))
        };

        let base = self
            .composer
            .base_type(key)
            .filter(|b| retained.contains(*b))
            .and_then(|b| self.graph.type_name(b))
            .map(str::to_string);

        let properties = self
            .composer
            .own_properties(key)
            .iter()
            .map(|p| PropertyPlan {
                wire_name: p.name.to_string(),
                member: member(p),
                type_ref: self.types.resolve_or_object(
                    p.descriptor,
                    &format!("{name}.{}", p.name),
                    diagnostics,
                ),
                nullable: p.descriptor.nullable,
                required: self.composer.is_required(p),
                description: p.descriptor.description.clone(),
            })
            .collect();

        let constructor = if self.required_constructor_parameters {
            let mut variables = Uniquifier::new();
            let parameters: Vec<ConstructorArgument> = self
                .composer
                .compose_constructor_parameters(key)
                .iter()
                .map(|c| ConstructorArgument {
                    variable: variables.claim(&to_variable_name(c.property.name, self.keywords)),
                    member: member(&c.property),
                    type_ref: self
                        .types
                        .resolve(c.property.descriptor, true)
                        .unwrap_or(TypeRef::Object),
                    nullable: c.property.descriptor.nullable,
                    inherited: c.inherited,
                })
                .collect();
            (!parameters.is_empty()).then_some(ConstructorPlan { parameters })
        } else {
            None
        };

        let iterable = self
            .composer
            .iterable_properties(key)
            .iter()
            .map(|p| IterableProperty {
                wire_name: p.name.to_string(),
                member: member(p),
                enum_type: self
                    .types
                    .enum_key(p.descriptor)
                    .and_then(|k| self.graph.type_name(k))
                    .map(str::to_string),
            })
            .collect();

        let polymorphism = self.polymorphism(key, &name, retained, diagnostics);

        ClassPlan {
            key: key.to_string(),
            description: self.graph.get(key).and_then(|d| d.description.clone()),
            name,
            base,
            sealed: self.graph.is_top_level(key),
            properties,
            constructor,
            iterable,
            polymorphism,
        }
    }

    fn polymorphism(
        &self,
        key: &str,
        name: &str,
        retained: &IndexSet<String>,
        diagnostics: &mut dyn Diagnostics,
    ) -> Option<PolymorphismSpec> {
        let plan = self.composer.resolve_polymorphism(key, retained)?;
        let mut derived = Vec::new();
        for (wire, target) in plan.mappings {
            if target == key {
                continue;
            }
            if !self.composer.is_subtype_of(&target, key) {
                diagnostics.verbose(format!(
                    "{name}: discriminator value '{wire}' maps to {target}, which does not derive from it; skipped"
                ));
                continue;
            }
            if let Some(type_name) = self.graph.type_name(&target) {
                derived.push((wire, type_name.to_string()));
            }
        }
        Some(PolymorphismSpec {
            property_name: plan.property_name,
            derived,
        })
    }

    /// Member names for `key`, computed root first so each class only
    /// uniquifies its own properties against what it inherits.
    fn member_table(&mut self, key: &'d str) -> &MemberTable<'d> {
        let mut chain = self.composer.ancestors(key);
        chain.push(key);
        let mut inherited = MemberTable::new();
        for step in chain {
            if !self.members.contains_key(step) {
                let table = self.own_members(step, &inherited);
                self.members.insert(step, table);
            }
            if let Some(table) = self.members.get(step) {
                inherited = table.clone();
            }
        }
        self.members.entry(key).or_default()
    }

    fn own_members(&self, key: &'d str, inherited: &MemberTable<'d>) -> MemberTable<'d> {
        let type_name = self.graph.type_name(key).unwrap_or(key);
        let mut names = Uniquifier::with_reserved([type_name.to_string()]);
        for taken in inherited.values() {
            names.reserve(taken.clone());
        }
        let mut table = inherited.clone();
        for property in self.composer.own_properties(key) {
            table
                .entry(property.name)
                .or_insert_with(|| names.claim(&to_member_name(property.name)));
        }
        table
    }
}
