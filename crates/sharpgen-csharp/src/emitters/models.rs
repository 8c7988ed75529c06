use minijinja::{Environment, Value, context};
use sharpgen_core::GeneratedFile;
use sharpgen_core::config::GeneratorConfig;
use sharpgen_core::ir::{ClassPlan, EnumPlan, EnumValue, EnumWire, GenerationPlan, ModelPlan};

use super::doc_lines;
use crate::error::GeneratorError;
use crate::type_mapper::{nullable_cs, string_literal};

/// Emit `Models/<Name>.cs` for every retained schema plus the iteration
/// interface they implement.
pub fn emit_models(
    env: &Environment<'_>,
    plan: &GenerationPlan,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let mut files = Vec::with_capacity(plan.models.len() + 1);
    files.push(GeneratedFile {
        path: "Models/__ICanIterate.cs".to_string(),
        content: env
            .get_template("can_iterate.cs.j2")?
            .render(context! { namespace => plan.namespace.clone() })?,
    });

    for model in &plan.models {
        let content = match model {
            ModelPlan::Enum(e) => emit_enum(env, e, plan, config)?,
            ModelPlan::Class(c) => emit_class(env, c, plan, config)?,
        };
        log::debug!("rendered model {}", model.name());
        files.push(GeneratedFile {
            path: format!("Models/{}.cs", model.name()),
            content,
        });
    }
    Ok(files)
}

fn emit_enum(
    env: &Environment<'_>,
    plan: &EnumPlan,
    generation: &GenerationPlan,
    config: &GeneratorConfig,
) -> Result<String, GeneratorError> {
    let string_wire = plan.wire == EnumWire::String;
    let members: Vec<Value> = plan
        .members
        .iter()
        .map(|m| {
            context! {
                name => m.name.clone(),
                wire => string_literal(&m.wire),
                wire_attribute => string_wire && m.renamed,
                value => m.value.map(|v| format!(" = {}", enum_value(v))).unwrap_or_default(),
            }
        })
        .collect();

    let encode: Vec<Value> = plan
        .lookup
        .pairs()
        .iter()
        .map(|(name, wire)| context! { name => name.clone(), wire => string_literal(wire) })
        .collect();
    let decode: Vec<Value> = plan
        .lookup
        .decodable()
        .map(|(name, wire)| context! { name => name, wire => string_literal(wire) })
        .collect();
    // Single bits a combined value is split into.
    let bits: Vec<Value> = plan
        .members
        .iter()
        .filter(|m| matches!(m.value, Some(EnumValue::Bit(_))))
        .filter_map(|m| {
            let wire = plan.lookup.to_wire(&m.name)?;
            Some(context! { name => m.name.clone(), wire => string_literal(wire) })
        })
        .collect();

    let tmpl = env.get_template("model_enum.cs.j2")?;
    Ok(tmpl.render(context! {
        namespace => generation.namespace.clone(),
        visibility => config.visibility.as_str(),
        name => plan.name.clone(),
        doc => doc_lines(plan.description.as_deref()),
        flagged => plan.flagged,
        integer => !string_wire,
        combined => string_wire && plan.flagged,
        separator => plan.separator.as_deref().map(string_literal),
        underlying => underlying_type(plan),
        members => members,
        encode => encode,
        decode => decode,
        bits => bits,
    })?)
}

fn enum_value(value: EnumValue) -> String {
    match value {
        EnumValue::Zero => "0".to_string(),
        EnumValue::Bit(bit) => format!("1L << {bit}"),
        EnumValue::Integer(v) => v.to_string(),
    }
}

/// Flags and values outside the `int` range need a `long` backing type.
fn underlying_type(plan: &EnumPlan) -> &'static str {
    let wide = plan.members.iter().any(|m| match m.value {
        Some(EnumValue::Bit(_)) => true,
        Some(EnumValue::Integer(v)) => i32::try_from(v).is_err(),
        _ => false,
    });
    if plan.flagged || wide { " : long" } else { "" }
}

fn emit_class(
    env: &Environment<'_>,
    plan: &ClassPlan,
    generation: &GenerationPlan,
    config: &GeneratorConfig,
) -> Result<String, GeneratorError> {
    let mut declaration = format!("{} ", config.visibility.as_str());
    if plan.sealed {
        declaration.push_str("sealed ");
    }
    declaration.push_str("class ");
    declaration.push_str(&plan.name);
    declaration.push_str(" : ");
    if let Some(base) = &plan.base {
        declaration.push_str(base);
        declaration.push_str(", ");
    }
    declaration.push_str("__ICanIterate");

    let properties: Vec<Value> = plan
        .properties
        .iter()
        .map(|p| {
            let required = config.required_properties && !p.nullable;
            context! {
                wire => string_literal(&p.wire_name),
                member => p.member.clone(),
                type_name => nullable_cs(&p.type_ref, p.nullable),
                modifiers => if required { "required " } else { "" },
                doc => doc_lines(p.description.as_deref()),
            }
        })
        .collect();

    let constructor = plan.constructor.as_ref().map(|ctor| {
        let parameters = ctor
            .parameters
            .iter()
            .map(|a| format!("{} {}", nullable_cs(&a.type_ref, a.nullable), a.variable))
            .collect::<Vec<_>>()
            .join(", ");
        // Without a base type every argument is assigned here.
        let forwards_to_base = plan.base.is_some();
        let base_arguments: Vec<&str> = ctor
            .base_arguments()
            .filter(|_| forwards_to_base)
            .map(|a| a.variable.as_str())
            .collect();
        let base_call = if base_arguments.is_empty() {
            String::new()
        } else {
            format!(" : base({})", base_arguments.join(", "))
        };
        let assignments: Vec<Value> = ctor
            .parameters
            .iter()
            .filter(|a| !a.inherited || !forwards_to_base)
            .map(|a| context! { member => a.member.clone(), variable => a.variable.clone() })
            .collect();
        let default_attribute = if config.json_constructor_attribute.trim().is_empty() {
            String::new()
        } else {
            format!("[{}] ", config.json_constructor_attribute.trim())
        };
        let full_attribute = if config.required_properties {
            "[System.Diagnostics.CodeAnalysis.SetsRequiredMembers] "
        } else {
            ""
        };
        context! {
            default_attribute => default_attribute,
            full_attribute => full_attribute,
            parameters => parameters,
            base_call => base_call,
            assignments => assignments,
        }
    });

    let iterable: Vec<Value> = plan
        .iterable
        .iter()
        .map(|item| {
            let value = match &item.enum_type {
                Some(enum_type) => format!("{enum_type}Values.ToWire({})", item.member),
                None => item.member.clone(),
            };
            context! { wire => string_literal(&item.wire_name), value => value }
        })
        .collect();

    let polymorphism = plan
        .polymorphism
        .as_ref()
        .filter(|p| !p.derived.is_empty())
        .map(|p| {
            let derived: Vec<Value> = p
                .derived
                .iter()
                .map(|(wire, ty)| context! { wire => string_literal(wire), type_name => ty.clone() })
                .collect();
            context! { property => string_literal(&p.property_name), derived => derived }
        });

    let tmpl = env.get_template("model_class.cs.j2")?;
    Ok(tmpl.render(context! {
        namespace => generation.namespace.clone(),
        name => plan.name.clone(),
        doc => doc_lines(plan.description.as_deref()),
        declaration => declaration,
        polymorphism => polymorphism,
        constructor => constructor,
        properties => properties,
        iterable => iterable,
    })?)
}
