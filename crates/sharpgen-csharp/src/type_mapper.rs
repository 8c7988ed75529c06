use sharpgen_core::ir::ParameterDefault;
use sharpgen_core::transform::{Primitive, TypeRef};

/// Map a resolved `TypeRef` to its fully qualified C# type.
pub fn type_ref_to_cs(type_ref: &TypeRef) -> String {
    match type_ref {
        TypeRef::Primitive(p) => primitive_to_cs(*p).to_string(),
        TypeRef::Sequence(inner) => {
            format!("System.Collections.Generic.List<{}>", type_ref_to_cs(inner))
        }
        TypeRef::Map(inner) => format!(
            "System.Collections.Generic.Dictionary<string, {}>",
            type_ref_to_cs(inner)
        ),
        TypeRef::Named(name) => name.clone(),
        TypeRef::Object => "object".to_string(),
    }
}

fn primitive_to_cs(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::DateTime => "System.DateTime",
        Primitive::Duration => "System.TimeSpan",
        Primitive::Bool => "bool",
        Primitive::Int32 => "int",
        Primitive::Int64 => "long",
        Primitive::Float32 => "float",
        Primitive::Float64 => "double",
        Primitive::String => "string",
        Primitive::Uri => "System.Uri",
        Primitive::Uuid => "System.Guid",
        Primitive::Stream => "System.IO.Stream",
    }
}

/// The C# type, with `?` appended when the value may be absent.
pub fn nullable_cs(type_ref: &TypeRef, nullable: bool) -> String {
    let ty = type_ref_to_cs(type_ref);
    if nullable { format!("{ty}?") } else { ty }
}

/// Default value written after `=` in a parameter list. `None` for
/// mandatory parameters.
pub fn default_literal(default: &ParameterDefault, type_ref: &TypeRef) -> Option<String> {
    match default {
        ParameterDefault::None => None,
        ParameterDefault::Absent => Some("default".to_string()),
        ParameterDefault::Quoted(value) => Some(string_literal(value)),
        ParameterDefault::Raw(raw) => Some(match type_ref {
            TypeRef::Primitive(Primitive::Float32) if !raw.ends_with('f') => format!("{raw}f"),
            TypeRef::Primitive(Primitive::Int64) if !raw.ends_with('L') => format!("{raw}L"),
            _ => raw.clone(),
        }),
        ParameterDefault::EnumMember { type_name, member } => Some(format!("{type_name}.{member}")),
    }
}

/// A regular (non-verbatim) C# string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives() {
        let cs = |p| type_ref_to_cs(&TypeRef::Primitive(p));
        assert_eq!(cs(Primitive::DateTime), "System.DateTime");
        assert_eq!(cs(Primitive::Duration), "System.TimeSpan");
        assert_eq!(cs(Primitive::Int32), "int");
        assert_eq!(cs(Primitive::Float32), "float");
        assert_eq!(cs(Primitive::Uuid), "System.Guid");
        assert_eq!(cs(Primitive::Stream), "System.IO.Stream");
        assert_eq!(type_ref_to_cs(&TypeRef::Object), "object");
    }

    #[test]
    fn test_nested_containers() {
        let cube = TypeRef::sequence(TypeRef::sequence(TypeRef::sequence(TypeRef::Primitive(
            Primitive::Int32,
        ))));
        assert_eq!(
            type_ref_to_cs(&cube),
            "System.Collections.Generic.List<System.Collections.Generic.List<System.Collections.Generic.List<int>>>"
        );
        let map = TypeRef::map(TypeRef::Named("Order".to_string()));
        assert_eq!(
            nullable_cs(&map, true),
            "System.Collections.Generic.Dictionary<string, Order>?"
        );
    }

    #[test]
    fn test_defaults() {
        let float = TypeRef::Primitive(Primitive::Float32);
        let int = TypeRef::Primitive(Primitive::Int32);
        assert_eq!(default_literal(&ParameterDefault::None, &int), None);
        assert_eq!(
            default_literal(&ParameterDefault::Absent, &int).as_deref(),
            Some("default")
        );
        assert_eq!(
            default_literal(&ParameterDefault::Raw("1.5".to_string()), &float).as_deref(),
            Some("1.5f")
        );
        assert_eq!(
            default_literal(&ParameterDefault::Raw("20".to_string()), &int).as_deref(),
            Some("20")
        );
        assert_eq!(
            default_literal(
                &ParameterDefault::Quoted("say \"hi\"".to_string()),
                &TypeRef::Primitive(Primitive::String)
            )
            .as_deref(),
            Some(r#""say \"hi\"""#)
        );
        let member = ParameterDefault::EnumMember {
            type_name: "PetStatus".to_string(),
            member: "Available".to_string(),
        };
        assert_eq!(
            default_literal(&member, &TypeRef::Named("PetStatus".to_string())).as_deref(),
            Some("PetStatus.Available")
        );
    }
}
