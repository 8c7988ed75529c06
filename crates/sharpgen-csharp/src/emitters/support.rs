use minijinja::{Environment, context};
use sharpgen_core::GeneratedFile;
use sharpgen_core::config::GeneratorConfig;
use sharpgen_core::ir::GenerationPlan;

use crate::error::GeneratorError;

/// Name of the source-generated serializer context, derived from the
/// namespace with separators dropped.
pub fn json_context_name(namespace: &str) -> String {
    let stem: String = namespace.chars().filter(|c| *c != '.' && *c != '_').collect();
    format!("{stem}JsonSerializerContext")
}

/// Emit the fixed runtime files every client depends on: options, the query
/// builder, the optional string builder pool and JSON context, and the
/// dependency injection registrations.
pub fn emit_support(
    env: &Environment<'_>,
    plan: &GenerationPlan,
    config: &GeneratorConfig,
) -> Result<Vec<GeneratedFile>, GeneratorError> {
    let namespace = plan.namespace.clone();
    let visibility = config.visibility.as_str();
    let json_context = config
        .json_source_generators
        .then(|| json_context_name(&namespace));
    let pooled = config.string_builder_pool_size > 0;

    let mut files = vec![
        GeneratedFile {
            path: "Clients/__ClientOptions.cs".to_string(),
            content: env.get_template("client_options.cs.j2")?.render(context! {
                namespace => namespace.clone(),
                visibility => visibility,
                json_context => json_context.clone(),
            })?,
        },
        GeneratedFile {
            path: "Clients/__QueryBuilder.cs".to_string(),
            content: env.get_template("query_builder.cs.j2")?.render(context! {
                namespace => namespace.clone(),
                pooled => pooled,
            })?,
        },
    ];

    if pooled {
        files.push(GeneratedFile {
            path: "Clients/__StringBuilderPool.cs".to_string(),
            content: env.get_template("string_builder_pool.cs.j2")?.render(context! {
                namespace => namespace.clone(),
                pool_size => config.string_builder_pool_size,
            })?,
        });
    }

    if let Some(class_name) = json_context {
        let mut models: Vec<&str> = plan.models.iter().map(|m| m.name()).collect();
        models.sort_unstable();
        files.push(GeneratedFile {
            path: "Clients/__JsonSerializerContext.cs".to_string(),
            content: env.get_template("json_context.cs.j2")?.render(context! {
                namespace => namespace.clone(),
                visibility => visibility,
                class_name => class_name,
                models => models,
            })?,
        });
    }

    let mut clients: Vec<_> = plan
        .clients
        .iter()
        .filter(|c| !c.methods.is_empty())
        .collect();
    clients.sort_by(|a, b| a.name.cmp(&b.name));
    let registrations: Vec<String> = clients
        .iter()
        .map(|c| {
            if config.include_interfaces {
                format!("{}, {}", c.interface_name(), c.name)
            } else {
                c.name.clone()
            }
        })
        .collect();
    files.push(GeneratedFile {
        path: "Registrations.cs".to_string(),
        content: env.get_template("registrations.cs.j2")?.render(context! {
            namespace => namespace,
            visibility => visibility,
            include_interfaces => config.include_interfaces,
            registrations => registrations,
        })?,
    });

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::environment;
    use sharpgen_core::config::Visibility;
    use sharpgen_core::ir::ClientPlan;
    use sharpgen_core::model::ApiInfo;

    fn plan() -> GenerationPlan {
        let client = |name: &str| ClientPlan {
            tag: name.to_lowercase(),
            name: name.to_string(),
            methods: vec![],
        };
        GenerationPlan {
            info: ApiInfo::default(),
            namespace: "Acme.Pet_Store".to_string(),
            clients: vec![client("StoreClient"), client("PetsClient")],
            models: vec![],
        }
    }

    fn paths(files: &[GeneratedFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    #[test]
    fn test_json_context_name() {
        assert_eq!(json_context_name("Acme.Pet_Store"), "AcmePetStoreJsonSerializerContext");
    }

    #[test]
    fn test_default_support_files() {
        let env = environment().unwrap();
        let files = emit_support(&env, &plan(), &GeneratorConfig::default()).unwrap();
        assert_eq!(
            paths(&files),
            [
                "Clients/__ClientOptions.cs",
                "Clients/__QueryBuilder.cs",
                "Clients/__StringBuilderPool.cs",
                "Registrations.cs",
            ]
        );
        assert!(files[1].content.contains("__StringBuilderPool.Acquire()"));
        assert!(files[2].content.contains("s_pool.Count < 50"));
        assert!(!files[0].content.contains("TypeInfoResolver"));
    }

    #[test]
    fn test_unpooled_with_json_context() {
        let env = environment().unwrap();
        let config = GeneratorConfig {
            string_builder_pool_size: 0,
            json_source_generators: true,
            visibility: Visibility::Internal,
            ..Default::default()
        };
        let files = emit_support(&env, &plan(), &config).unwrap();
        assert_eq!(
            paths(&files),
            [
                "Clients/__ClientOptions.cs",
                "Clients/__QueryBuilder.cs",
                "Clients/__JsonSerializerContext.cs",
                "Registrations.cs",
            ]
        );
        assert!(files[0].content.contains("AcmePetStoreJsonSerializerContext.Default"));
        assert!(files[0].content.contains("internal class ClientOptions"));
        assert!(!files[1].content.contains("__StringBuilderPool"));
        assert!(
            files[2]
                .content
                .contains("internal sealed partial class AcmePetStoreJsonSerializerContext")
        );
    }
}
