use std::collections::HashSet;

use serde_json::Value;

use super::names::{DotPolicy, KeywordTable, sanitize};
use crate::diagnostics::Diagnostics;
use crate::ir::{EnumLookup, EnumMemberPlan, EnumPlan, EnumValue, EnumWire};
use crate::model::EnumDefinition;

/// One enum member as derived from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Text the identifier was derived from (display name or raw value).
    pub display: String,
    /// Legal, escaped identifier.
    pub name: String,
    /// The raw value as it travels on the wire.
    pub wire: String,
    /// Raw value when it is an integer.
    pub integer: Option<i64>,
    /// Sanitizing changed more than a legal-prefix escape.
    pub sanitized_changed: bool,
}

impl EnumMember {
    /// The identifier can't double as the wire value.
    pub fn renamed(&self) -> bool {
        self.name != self.wire
    }
}

/// Lazy, restartable member sequence. Null values are skipped and only the
/// first member per identifier survives.
pub struct EnumMembers<'a> {
    values: &'a [Value],
    display_names: Option<&'a [String]>,
    keywords: &'a KeywordTable,
    index: usize,
    seen: HashSet<String>,
}

pub fn iterate_members<'a>(
    definition: &'a EnumDefinition,
    keywords: &'a KeywordTable,
) -> EnumMembers<'a> {
    EnumMembers {
        values: &definition.values,
        display_names: definition.display_names.as_deref(),
        keywords,
        index: 0,
        seen: HashSet::new(),
    }
}

impl Iterator for EnumMembers<'_> {
    type Item = EnumMember;

    fn next(&mut self) -> Option<EnumMember> {
        while self.index < self.values.len() {
            let index = self.index;
            self.index += 1;

            let raw = &self.values[index];
            if raw.is_null() {
                continue;
            }
            let wire = wire_text(raw);
            let display = self
                .display_names
                .and_then(|names| names.get(index))
                .cloned()
                .unwrap_or_else(|| wire.clone());

            let safe = sanitize(&display, DotPolicy::Replace);
            let sanitized_changed = safe != display;
            let name = if safe.is_empty() {
                format!("Value{index}")
            } else if safe.starts_with(|c: char| c.is_ascii_digit()) {
                format!("_{safe}")
            } else if self.keywords.contains(&safe) {
                self.keywords.escape(&safe)
            } else {
                safe
            };

            if !self.seen.insert(name.clone()) {
                continue;
            }
            return Some(EnumMember {
                display,
                name,
                integer: raw.as_i64(),
                wire,
                sanitized_changed,
            });
        }
        None
    }
}

fn wire_text(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Bit values for a flagged enum: the first member is the empty set (0),
/// every later one takes the next power of two. Members whose text contains
/// the separator are combinations and get no bit.
pub fn assign_flag_values(members: &[EnumMember], separator: &str) -> Vec<(String, EnumValue)> {
    let mut out = Vec::with_capacity(members.len());
    let mut counter = 0u32;
    for member in members {
        if !separator.is_empty()
            && (member.display.contains(separator) || member.name.contains(separator))
        {
            continue;
        }
        let value = if out.is_empty() {
            EnumValue::Zero
        } else {
            let bit = counter;
            counter += 1;
            EnumValue::Bit(bit)
        };
        out.push((member.name.clone(), value));
    }
    out
}

impl EnumValue {
    /// Numeric value, `None` when a bit no longer fits in 64 bits.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            EnumValue::Zero => Some(0),
            EnumValue::Bit(bit) => 1u64.checked_shl(*bit),
            EnumValue::Integer(v) => u64::try_from(*v).ok(),
        }
    }
}

pub fn build_lookup<'a>(members: impl IntoIterator<Item = &'a EnumMember>) -> EnumLookup {
    EnumLookup::new(
        members
            .into_iter()
            .map(|m| (m.name.clone(), m.wire.clone()))
            .collect(),
    )
}

/// Wire encoding: integers only when every non-null value is an integer.
fn wire_kind(definition: &EnumDefinition) -> EnumWire {
    let mut values = definition.values.iter().filter(|v| !v.is_null()).peekable();
    if values.peek().is_some() && values.all(|v| v.is_i64()) {
        EnumWire::Integer
    } else {
        EnumWire::String
    }
}

/// Joins combined flag values when the document names no separator.
pub const DEFAULT_FLAG_SEPARATOR: &str = ", ";

/// Build the render plan for one enum schema, reporting renamed members.
pub fn assemble_enum(
    key: &str,
    name: &str,
    description: Option<&str>,
    definition: &EnumDefinition,
    keywords: &KeywordTable,
    diagnostics: &mut dyn Diagnostics,
) -> EnumPlan {
    let members: Vec<EnumMember> = iterate_members(definition, keywords).collect();
    let wire = wire_kind(definition);
    let plans: Vec<EnumMemberPlan> = match &definition.flagged {
        Some(separator) => assign_flag_values(&members, separator)
            .into_iter()
            .filter_map(|(member_name, value)| {
                let member = members.iter().find(|m| m.name == member_name)?;
                Some(EnumMemberPlan {
                    renamed: member.renamed(),
                    name: member_name,
                    wire: member.wire.clone(),
                    value: Some(value),
                })
            })
            .collect(),
        None => members
            .iter()
            .map(|m| EnumMemberPlan {
                name: m.name.clone(),
                wire: m.wire.clone(),
                value: match wire {
                    EnumWire::Integer => m.integer.map(EnumValue::Integer),
                    EnumWire::String => None,
                },
                renamed: m.renamed(),
            })
            .collect(),
    };

    // Flag combinations are dropped above and need no warning.
    for member in members
        .iter()
        .filter(|m| m.sanitized_changed && plans.iter().any(|p| p.name == m.name))
    {
        diagnostics.warn(format!(
            "enum {name}: value '{}' is not a valid identifier, emitted as '{}'; the wire value is preserved",
            member.display, member.name
        ));
    }

    // Flag combinations are decoded by splitting, not by lookup.
    let lookup = build_lookup(
        members
            .iter()
            .filter(|m| plans.iter().any(|p| p.name == m.name)),
    );
    let separator = definition.flagged.as_deref().map(|s| match s {
        "" => DEFAULT_FLAG_SEPARATOR.to_string(),
        s => s.to_string(),
    });

    EnumPlan {
        key: key.to_string(),
        name: name.to_string(),
        description: description.map(str::to_string),
        flagged: definition.is_flagged(),
        wire,
        members: plans,
        lookup,
        separator,
    }
}

/// The member identifier for a raw value, e.g. to render a default.
pub fn member_for_value(
    definition: &EnumDefinition,
    keywords: &KeywordTable,
    raw: &Value,
) -> Option<String> {
    let wire = wire_text(raw);
    iterate_members(definition, keywords)
        .find(|m| m.wire == wire)
        .map(|m| m.name)
}
