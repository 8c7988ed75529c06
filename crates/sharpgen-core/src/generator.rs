//! Planning and emission for one document.
//!
//! Grouping, method assembly, tree shaking and model assembly run in that
//! order over the immutable [`ApiDocument`]; the resulting
//! [`GenerationPlan`] is handed to a [`CodeGenerator`] and every rendered
//! file is passed to an [`EmissionSink`].

use indexmap::IndexSet;
use regex::Regex;

use crate::config::GeneratorConfig;
use crate::diagnostics::Diagnostics;
use crate::error::GenerateError;
use crate::ir::{ClientPlan, GenerationPlan, MethodPlan};
use crate::model::ApiDocument;
use crate::transform::grouping::{ClientGroup, GroupingOptions, group_operations};
use crate::transform::names::KeywordTable;
use crate::transform::operations::{MethodNames, OperationAssembler, apriori_method_name};
use crate::transform::tree_shake::{retain_all, shake};
use crate::transform::{ModelAssembler, SchemaGraph, TypeRef, TypeResolver};
use crate::{CodeGenerator, EmissionSink};

/// Counts reported after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub clients: usize,
    pub models: usize,
    pub files: Vec<String>,
}

pub struct DocumentGenerator<'c> {
    config: &'c GeneratorConfig,
    keywords: &'c KeywordTable,
}

impl<'c> DocumentGenerator<'c> {
    pub fn new(config: &'c GeneratorConfig, keywords: &'c KeywordTable) -> Self {
        Self { config, keywords }
    }

    /// Build the full plan. Fails only on an invalid tag filter; clients that
    /// can't be assembled are reported and left out.
    pub fn plan(
        &self,
        doc: &ApiDocument,
        diagnostics: &mut dyn Diagnostics,
    ) -> Result<GenerationPlan, GenerateError> {
        let filter = self
            .config
            .tag_filter
            .as_deref()
            .map(Regex::new)
            .transpose()?;

        // Phase 1: group operations into clients
        let groups = group_operations(
            &doc.operations,
            GroupingOptions {
                tag_filter: filter.as_ref(),
                exclude_deprecated: self.config.exclude_deprecated,
            },
            diagnostics,
        );

        // Phase 2: assemble methods per client
        let graph = SchemaGraph::new(doc);
        let assembler = OperationAssembler::new(TypeResolver::new(&graph), self.keywords);
        let mut clients = Vec::with_capacity(groups.len());
        for group in &groups {
            match assemble_client(group, &assembler, diagnostics) {
                Ok(client) => clients.push(client),
                Err(err) => diagnostics.warn(format!("{err}; client {} skipped", group.name)),
            }
        }

        // Phase 3: decide which schemas survive
        let retained = if self.config.tree_shake_effective() {
            let seeds: IndexSet<TypeRef> = clients
                .iter()
                .flat_map(|c| &c.methods)
                .flat_map(|m| m.used_components.iter().cloned())
                .collect();
            let kept = shake(&seeds, &graph);
            diagnostics.info(format!(
                "tree shaking kept {} of {} schemas",
                kept.len(),
                graph.len()
            ));
            kept
        } else {
            if self.config.tree_shake {
                diagnostics.info(
                    "tree shaking needs a tag filter or excluded deprecated operations; keeping every schema"
                        .to_string(),
                );
            }
            retain_all(&graph)
        };

        // Phase 4: model plans
        let models = ModelAssembler::new(
            &graph,
            self.keywords,
            self.config.required_constructor_parameters,
        )
        .assemble(&retained, diagnostics);

        log::debug!(
            "planned {} clients and {} models",
            clients.len(),
            models.len()
        );
        Ok(GenerationPlan {
            info: doc.info.clone(),
            namespace: self.config.namespace(),
            clients,
            models,
        })
    }
}

fn assemble_client(
    group: &ClientGroup<'_>,
    assembler: &OperationAssembler<'_, '_>,
    diagnostics: &mut dyn Diagnostics,
) -> Result<ClientPlan, crate::error::AssemblyError> {
    let mut names = MethodNames::new();
    let mut methods: Vec<MethodPlan> = Vec::with_capacity(group.operations.len());
    for op in &group.operations {
        let name = names.claim(&apriori_method_name(op), &group.name)?;
        methods.push(assembler.assemble(op, name, diagnostics));
    }
    Ok(ClientPlan {
        tag: group.tag.clone(),
        name: group.name.clone(),
        methods,
    })
}

/// Plan, render and emit. Nothing reaches the sink unless every file
/// rendered.
pub fn run<G: CodeGenerator>(
    generator: &G,
    doc: &ApiDocument,
    config: &GeneratorConfig,
    sink: &mut dyn EmissionSink,
    diagnostics: &mut dyn Diagnostics,
) -> Result<GenerationReport, GenerateError> {
    let plan = DocumentGenerator::new(config, generator.keywords()).plan(doc, diagnostics)?;
    let files = generator
        .generate(&plan, config)
        .map_err(|e| GenerateError::Generator(Box::new(e)))?;

    let mut written = Vec::with_capacity(files.len());
    for file in &files {
        sink.emit(file)?;
        written.push(file.path.clone());
    }
    log::info!("generated {} files", written.len());
    Ok(GenerationReport {
        clients: plan.clients.len(),
        models: plan.models.len(),
        files: written,
    })
}
