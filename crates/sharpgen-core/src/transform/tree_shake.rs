use std::collections::HashSet;

use indexmap::IndexSet;

use super::schema_graph::SchemaGraph;
use super::types::TypeRef;

/// Walks deeper than this are cut off; only a malformed document gets here.
pub const MAX_SHAKE_DEPTH: usize = 1000;

/// Schema keys reachable from `seeds`, in document order.
///
/// Containers are unwrapped to their component type, then property
/// references and `allOf` parents are followed transitively. Seeds that
/// name no schema are ignored.
pub fn shake(seeds: &IndexSet<TypeRef>, graph: &SchemaGraph<'_>) -> IndexSet<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    for seed in seeds {
        let Some(key) = seed
            .component_name()
            .and_then(|name| graph.key_for_name(name))
        else {
            continue;
        };
        visit(key, graph, &mut visited, 0);
    }
    retain_in_document_order(graph, |key| visited.contains(key))
}

/// Shake starting from schema keys instead of type references.
pub fn shake_keys<'a>(
    keys: impl IntoIterator<Item = &'a str>,
    graph: &SchemaGraph<'_>,
) -> IndexSet<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    for key in keys {
        if let Some(present) = graph.get(key) {
            visit(&present.key, graph, &mut visited, 0);
        }
    }
    retain_in_document_order(graph, |key| visited.contains(key))
}

/// Every schema key, for runs without shaking.
pub fn retain_all(graph: &SchemaGraph<'_>) -> IndexSet<String> {
    retain_in_document_order(graph, |_| true)
}

fn visit<'d>(key: &'d str, graph: &SchemaGraph<'d>, visited: &mut HashSet<&'d str>, depth: usize) {
    if depth > MAX_SHAKE_DEPTH || !visited.insert(key) {
        return;
    }
    for next in graph.edges(key) {
        visit(next, graph, visited, depth + 1);
    }
}

fn retain_in_document_order(
    graph: &SchemaGraph<'_>,
    keep: impl Fn(&str) -> bool,
) -> IndexSet<String> {
    graph
        .keys()
        .filter(|key| keep(key))
        .map(str::to_string)
        .collect()
}
