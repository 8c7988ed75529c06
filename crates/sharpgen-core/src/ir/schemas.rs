use crate::transform::types::TypeRef;

/// A retained schema, ready to render.
#[derive(Debug, Clone)]
pub enum ModelPlan {
    Enum(EnumPlan),
    Class(ClassPlan),
}

impl ModelPlan {
    pub fn name(&self) -> &str {
        match self {
            ModelPlan::Enum(e) => &e.name,
            ModelPlan::Class(c) => &c.name,
        }
    }

    pub fn key(&self) -> &str {
        match self {
            ModelPlan::Enum(e) => &e.key,
            ModelPlan::Class(c) => &c.key,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumPlan> {
        match self {
            ModelPlan::Enum(e) => Some(e),
            ModelPlan::Class(_) => None,
        }
    }

    pub fn as_class(&self) -> Option<&ClassPlan> {
        match self {
            ModelPlan::Class(c) => Some(c),
            ModelPlan::Enum(_) => None,
        }
    }
}

/// How enum values travel on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumWire {
    String,
    Integer,
}

#[derive(Debug, Clone)]
pub struct EnumPlan {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub flagged: bool,
    pub wire: EnumWire,
    pub members: Vec<EnumMemberPlan>,
    /// Member to wire value table the generated conversions are built from.
    pub lookup: EnumLookup,
    /// Joins and splits combined values of a flagged enum.
    pub separator: Option<String>,
}

/// Two-way member ↔ wire table, used instead of reflection-based parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumLookup {
    pairs: Vec<(String, String)>,
}

impl EnumLookup {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    pub fn to_wire(&self, member: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, wire)| wire.as_str())
    }

    /// A wire value shared by several members decodes to the first.
    pub fn from_wire(&self, wire: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(_, w)| w == wire)
            .map(|(name, _)| name.as_str())
    }

    /// `(member, wire)` in declaration order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// The pairs `from_wire` can return, one per wire value.
    pub fn decodable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .enumerate()
            .filter(|(i, (_, wire))| !self.pairs[..*i].iter().any(|(_, w)| w == wire))
            .map(|(_, (name, wire))| (name.as_str(), wire.as_str()))
    }
}

/// Explicit value of an enum member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumValue {
    Integer(i64),
    /// A flag bit: `1 << n`.
    Bit(u32),
    /// The empty flag set.
    Zero,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberPlan {
    pub name: String,
    /// Serialized raw value (string values unquoted).
    pub wire: String,
    pub value: Option<EnumValue>,
    /// The identifier differs from the wire value; serialization must use
    /// the lookup table.
    pub renamed: bool,
}

#[derive(Debug, Clone)]
pub struct ClassPlan {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    /// Base type name.
    pub base: Option<String>,
    /// Nothing derives from it.
    pub sealed: bool,
    /// Properties declared by this class (inherited ones live on the base).
    pub properties: Vec<PropertyPlan>,
    pub constructor: Option<ConstructorPlan>,
    /// Values yielded by the iteration helper, inherited first.
    pub iterable: Vec<IterableProperty>,
    pub polymorphism: Option<PolymorphismSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPlan {
    pub wire_name: String,
    pub member: String,
    pub type_ref: TypeRef,
    pub nullable: bool,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorPlan {
    pub parameters: Vec<ConstructorArgument>,
}

impl ConstructorPlan {
    /// Arguments forwarded to the base constructor, in order.
    pub fn base_arguments(&self) -> impl Iterator<Item = &ConstructorArgument> {
        self.parameters.iter().filter(|p| p.inherited)
    }

    /// Arguments assigned to this class's own properties.
    pub fn own_arguments(&self) -> impl Iterator<Item = &ConstructorArgument> {
        self.parameters.iter().filter(|p| !p.inherited)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorArgument {
    pub variable: String,
    pub member: String,
    pub type_ref: TypeRef,
    pub nullable: bool,
    pub inherited: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterableProperty {
    pub wire_name: String,
    pub member: String,
    /// Enum type name when the value goes through the wire lookup.
    pub enum_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolymorphismSpec {
    pub property_name: String,
    /// Wire value → derived type name.
    pub derived: Vec<(String, String)>,
}
