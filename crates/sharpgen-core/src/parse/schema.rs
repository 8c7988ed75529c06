use indexmap::IndexMap;
use serde::Deserialize;

/// The `type` keyword: a single token, or a list of tokens (3.1 style, where
/// `"null"` marks nullability).
///
/// Tokens are kept as raw strings because documents in the wild use values
/// outside the JSON Schema vocabulary (`file`, `json`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeSet {
    /// The first non-`null` token.
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeSet::Single(t) => Some(t.as_str()).filter(|t| *t != "null"),
            TypeSet::Multiple(ts) => ts.iter().map(String::as_str).find(|t| *t != "null"),
        }
    }

    pub fn includes_null(&self) -> bool {
        match self {
            TypeSet::Single(t) => t == "null",
            TypeSet::Multiple(ts) => ts.iter().any(|t| t == "null"),
        }
    }
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,
    #[serde(default)]
    pub mapping: IndexMap<String, String>,
}

/// The `flagged-enum` vendor marker: the enum members are bit flags.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FlaggedEnum {
    /// Members whose name contains this text are combinations, not flags.
    #[serde(rename = "separatingStrings", default)]
    pub separating_strings: String,
}

/// A schema object, restricted to the keywords the generator consumes.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,

    pub format: Option<String>,

    pub title: Option<String>,

    pub description: Option<String>,

    #[serde(rename = "default")]
    pub default_value: Option<serde_json::Value>,

    pub nullable: Option<bool>,

    pub deprecated: Option<bool>,

    // Object properties
    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    pub items: Option<Box<SchemaOrRef>>,

    // Composition
    #[serde(rename = "allOf", default)]
    pub all_of: Vec<SchemaOrRef>,

    pub discriminator: Option<Discriminator>,

    // Enum values
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "x-enumNames")]
    pub enum_names: Option<Vec<String>>,

    #[serde(rename = "flagged-enum")]
    pub flagged_enum: Option<FlaggedEnum>,
}

impl Schema {
    /// Nullable via the 3.0 `nullable` keyword or a 3.1 `null` type token.
    pub fn is_nullable(&self) -> bool {
        self.nullable.unwrap_or(false)
            || self.schema_type.as_ref().is_some_and(TypeSet::includes_null)
    }

    pub fn type_token(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(TypeSet::primary)
    }
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_set_primary_skips_null() {
        let ts: TypeSet = serde_json::from_str(r#"["null", "integer"]"#).unwrap();
        assert_eq!(ts.primary(), Some("integer"));
        assert!(ts.includes_null());
    }

    #[test]
    fn test_vendor_keywords() {
        let schema: Schema = serde_json::from_str(
            r#"{
                "type": "integer",
                "enum": [0, 1, 2, null],
                "x-enumNames": ["None", "Read", "Write", "Unused"],
                "flagged-enum": { "separatingStrings": "|" }
            }"#,
        )
        .unwrap();
        assert_eq!(schema.enum_values.len(), 4);
        assert!(schema.enum_values[3].is_null());
        assert_eq!(schema.enum_names.as_ref().map(Vec::len), Some(4));
        assert_eq!(
            schema.flagged_enum.map(|f| f.separating_strings),
            Some("|".to_string())
        );
    }

    #[test]
    fn test_ref_wins_untagged() {
        let s: SchemaOrRef =
            serde_json::from_str(r##"{"$ref": "#/components/schemas/Pet"}"##).unwrap();
        assert!(matches!(s, SchemaOrRef::Ref { ref_path } if ref_path.ends_with("/Pet")));
    }
}
