use heck::ToUpperCamelCase;
use indexmap::IndexMap;
use regex::Regex;

use super::names::{DotPolicy, Uniquifier, sanitize};
use crate::diagnostics::Diagnostics;
use crate::model::OperationDescriptor;

/// Tag given to operations that declare none.
pub const DEFAULT_TAG: &str = "Default";

/// Operations that end up in one client class.
#[derive(Debug, Clone)]
pub struct ClientGroup<'d> {
    pub tag: String,
    pub name: String,
    /// Document order.
    pub operations: Vec<&'d OperationDescriptor>,
}

/// Which operations take part in generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupingOptions<'a> {
    pub tag_filter: Option<&'a Regex>,
    pub exclude_deprecated: bool,
}

/// Client class name for a tag, e.g. `pet-store` → `PetStoreClient`.
pub fn client_name(tag: &str) -> String {
    let base = sanitize(tag, DotPolicy::Replace).to_upper_camel_case();
    match base.chars().next() {
        None => format!("{DEFAULT_TAG}Client"),
        Some(c) if c.is_ascii_digit() => format!("_{base}Client"),
        Some(_) => format!("{base}Client"),
    }
}

/// Group operations by tag, in order of first appearance. An operation with
/// several tags lands in every matching group.
pub fn group_operations<'d>(
    operations: &'d [OperationDescriptor],
    options: GroupingOptions<'_>,
    diagnostics: &mut dyn Diagnostics,
) -> Vec<ClientGroup<'d>> {
    let mut by_tag: IndexMap<&str, Vec<&'d OperationDescriptor>> = IndexMap::new();
    for op in operations {
        if options.exclude_deprecated && op.deprecated {
            diagnostics.verbose(format!("{} {}: deprecated, skipped", op.method, op.path));
            continue;
        }
        let tags: Vec<&str> = if op.tags.is_empty() {
            vec![DEFAULT_TAG]
        } else {
            op.tags.iter().map(String::as_str).collect()
        };
        for tag in tags {
            if options.tag_filter.is_some_and(|re| !re.is_match(tag)) {
                continue;
            }
            by_tag.entry(tag).or_default().push(op);
        }
    }

    let mut names = Uniquifier::new();
    let groups: Vec<ClientGroup<'d>> = by_tag
        .into_iter()
        .map(|(tag, operations)| ClientGroup {
            name: names.claim(&client_name(tag)),
            tag: tag.to_string(),
            operations,
        })
        .collect();

    if groups.is_empty() && !operations.is_empty() {
        diagnostics.warn(
            "no operations left after filtering; no clients will be generated".to_string(),
        );
    }
    log::debug!("grouped {} operations into {} clients", operations.len(), groups.len());
    groups
}
