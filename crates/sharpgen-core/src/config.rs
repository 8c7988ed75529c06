use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::transform::names::{DotPolicy, sanitize};

/// Access modifier applied to generated types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Internal => "internal",
        }
    }
}

/// Generation options, loaded from `.sharpgen.yaml` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub project_name: String,
    /// Root namespace. Defaults to the sanitized project name.
    pub namespace: Option<String>,
    pub visibility: Visibility,
    /// Access modifier for client classes. Defaults to `visibility`.
    pub client_visibility: Option<Visibility>,
    pub exclude_deprecated: bool,
    /// Regex matched against operation tags; non-matching tags get no client.
    pub tag_filter: Option<String>,
    pub tree_shake: bool,
    pub required_constructor_parameters: bool,
    /// Attribute placed on the parameterless model constructor. Empty to omit.
    pub json_constructor_attribute: String,
    /// Mark non-nullable model properties with the `required` keyword.
    pub required_properties: bool,
    pub include_interfaces: bool,
    pub json_source_generators: bool,
    /// Pooled string builders kept by the query builder. 0 disables pooling.
    pub string_builder_pool_size: u32,
    pub include_project: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            project_name: "Api".to_string(),
            namespace: None,
            visibility: Visibility::Public,
            client_visibility: None,
            exclude_deprecated: false,
            tag_filter: None,
            tree_shake: false,
            required_constructor_parameters: true,
            json_constructor_attribute: "System.Text.Json.Serialization.JsonConstructor"
                .to_string(),
            required_properties: false,
            include_interfaces: false,
            json_source_generators: false,
            string_builder_pool_size: 50,
            include_project: true,
        }
    }
}

impl GeneratorConfig {
    pub fn namespace(&self) -> String {
        match &self.namespace {
            Some(ns) if !ns.trim().is_empty() => sanitize(ns, DotPolicy::Keep),
            _ => sanitize(&self.project_name, DotPolicy::Keep),
        }
    }

    pub fn client_visibility(&self) -> Visibility {
        self.client_visibility.unwrap_or(self.visibility)
    }

    /// Shaking only pays off when something actually removed operations.
    pub fn tree_shake_effective(&self) -> bool {
        self.tree_shake && (self.exclude_deprecated || self.tag_filter.is_some())
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".sharpgen.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<GeneratorConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: GeneratorConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# sharpgen configuration
project_name: Api
# namespace: My.Company.Api       # defaults to project_name
visibility: public                # public | internal
# client_visibility: internal     # defaults to visibility

exclude_deprecated: false
# tag_filter: "^(Pets|Store)$"    # only generate clients for matching tags
tree_shake: false                 # drop unreachable models (needs a filter or exclude_deprecated)

required_constructor_parameters: true
json_constructor_attribute: System.Text.Json.Serialization.JsonConstructor
required_properties: false        # C# 11 `required` members
include_interfaces: false
json_source_generators: false
string_builder_pool_size: 50      # 0 disables pooling
include_project: true
"#
}
