use std::sync::LazyLock;

use minijinja::{Environment, context};
use regex::Regex;
use sharpgen_core::GeneratedFile;
use sharpgen_core::config::GeneratorConfig;
use sharpgen_core::ir::GenerationPlan;

use crate::error::GeneratorError;

const TARGET_FRAMEWORK: &str = "net8.0";
const HTTP_PACKAGE_VERSION: &str = "[8.0.0,)";

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\W*(v(ersion)?)?\W*(?P<major>\d+)(\.(?P<minor>\d+)(\.(?P<build>\d+)(\.(?P<private>\d+))?)?)?\W*$",
    )
    .expect("valid version regex")
});

/// Normalize a document version such as `v1.2` into `1.2.0`. Anything that
/// isn't a dotted number yields `None` and the project carries no version.
pub fn assembly_version(raw: &str) -> Option<String> {
    let caps = VERSION_RE.captures(raw)?;
    let part = |name| caps.name(name).map_or("0", |m| m.as_str());
    let mut version = format!("{}.{}.{}", part("major"), part("minor"), part("build"));
    if let Some(private) = caps.name("private") {
        version.push('.');
        version.push_str(private.as_str());
    }
    Some(version)
}

/// Emit `<project_name>.csproj`, or nothing when project files are disabled.
pub fn emit_project(
    env: &Environment<'_>,
    plan: &GenerationPlan,
    config: &GeneratorConfig,
) -> Result<Option<GeneratedFile>, GeneratorError> {
    if !config.include_project {
        return Ok(None);
    }
    let info = &plan.info;
    let version = info.version.as_deref().and_then(assembly_version);
    if version.is_none() {
        if let Some(raw) = &info.version {
            log::debug!("document version {raw:?} is not numeric; omitting project version");
        }
    }
    let content = env.get_template("project.csproj.j2")?.render(context! {
        target_framework => TARGET_FRAMEWORK,
        http_package_version => HTTP_PACKAGE_VERSION,
        version => version,
        title => info.title.clone(),
        description => info.description.as_deref().map(str::trim),
    })?;
    Ok(Some(GeneratedFile {
        path: format!("{}.csproj", config.project_name),
        content,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;
    use sharpgen_core::model::ApiInfo;

    #[test]
    fn test_assembly_version() {
        assert_eq!(assembly_version("1").as_deref(), Some("1.0.0"));
        assert_eq!(assembly_version("v2.1").as_deref(), Some("2.1.0"));
        assert_eq!(assembly_version("version 3.4.5").as_deref(), Some("3.4.5"));
        assert_eq!(assembly_version("1.2.3.4").as_deref(), Some("1.2.3.4"));
        assert_eq!(assembly_version("1.0-beta"), None);
        assert_eq!(assembly_version("latest"), None);
    }

    fn plan(info: ApiInfo) -> GenerationPlan {
        GenerationPlan {
            info,
            namespace: "Api".to_string(),
            clients: vec![],
            models: vec![],
        }
    }

    #[test]
    fn test_project_file() {
        let env = environment().unwrap();
        let info = ApiInfo {
            title: Some("Pets & Owners".to_string()),
            description: None,
            version: Some("v1.2".to_string()),
        };
        let config = GeneratorConfig {
            project_name: "PetStore".to_string(),
            ..Default::default()
        };
        let file = emit_project(&env, &plan(info), &config).unwrap().unwrap();
        assert_eq!(file.path, "PetStore.csproj");
        insta::assert_snapshot!(file.content, @r#"
        <Project Sdk="Microsoft.NET.Sdk">

          <PropertyGroup>
            <TargetFramework>net8.0</TargetFramework>
            <LangVersion>latest</LangVersion>
            <Nullable>enable</Nullable>
            <AssemblyVersion>1.0.0</AssemblyVersion>
            <Version>1.2.0</Version>
            <Title>Pets &amp; Owners</Title>
            <Product>Pets &amp; Owners</Product>
          </PropertyGroup>

          <ItemGroup>
            <PackageReference Include="Microsoft.Extensions.Http" Version="[8.0.0,)" />
          </ItemGroup>

        </Project>
        "#);
    }

    #[test]
    fn test_project_disabled() {
        let env = environment().unwrap();
        let config = GeneratorConfig {
            include_project: false,
            ..Default::default()
        };
        assert!(
            emit_project(&env, &plan(ApiInfo::default()), &config)
                .unwrap()
                .is_none()
        );
    }
}
