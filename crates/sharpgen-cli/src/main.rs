mod sink;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use sharpgen_core::config::{self, CONFIG_FILE_NAME, GeneratorConfig, Visibility};
use sharpgen_core::diagnostics::{CollectedDiagnostics, Level};
use sharpgen_core::ir::{GenerationPlan, ModelPlan, PathSegment, ResponsePlan};
use sharpgen_core::model::{self, ApiDocument};
use sharpgen_core::parse::{self, merge::merge_documents};
use sharpgen_core::{CodeGenerator, DocumentGenerator};
use sharpgen_csharp::CSharpGenerator;
use sharpgen_csharp::type_mapper::type_ref_to_cs;

use sink::DirectorySink;

#[derive(Parser)]
#[command(
    name = "sharpgen",
    about = "Generate C# HttpClient code from OpenAPI 3.x documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a C# client project from an OpenAPI document
    Generate(GenerateArgs),

    /// Validate an OpenAPI document
    Validate {
        /// Path to the OpenAPI document (YAML or JSON)
        document: PathBuf,
    },

    /// Print the generation plan of an OpenAPI document
    Inspect {
        /// Path to the OpenAPI document (YAML or JSON)
        document: PathBuf,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a default .sharpgen.yaml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(clap::Args)]
struct GenerateArgs {
    /// Name of the project
    project: String,

    /// Path to the OpenAPI document (YAML or JSON)
    document: PathBuf,

    /// Additional document merged into the main one; may be repeated
    #[arg(short = 'a', long = "additional-document")]
    additional: Vec<PathBuf>,

    /// Namespace of the generated files (defaults to the project name)
    #[arg(short, long)]
    namespace: Option<String>,

    /// Directory to place the files in
    #[arg(short, long, default_value = ".")]
    directory: PathBuf,

    /// Access modifier of the generated types
    #[arg(short, long)]
    modifier: Option<Modifier>,

    /// Access modifier of the generated clients (defaults to --modifier)
    #[arg(long)]
    client_modifier: Option<Modifier>,

    /// Delete the output directory before generating
    #[arg(short, long)]
    clean_directory: bool,

    /// Only generate clients whose tag matches this regex
    #[arg(short, long)]
    filter: Option<String>,

    /// Skip models no generated client uses
    #[arg(short = 's', long)]
    tree_shake: bool,

    /// Include System.Text.Json source generators
    #[arg(short, long)]
    json_source_generators: bool,

    /// Mark non-nullable properties with the C# 11 `required` keyword
    #[arg(short, long)]
    required_properties: bool,

    /// Generate interfaces for the clients
    #[arg(short, long)]
    interfaces: bool,

    /// Do not generate a .csproj
    #[arg(short = 'p', long)]
    no_project: bool,

    /// Do not generate deprecated operations
    #[arg(short = 'o', long)]
    no_obsolete: bool,

    /// Attribute placed on the parameterless model constructor
    #[arg(long)]
    json_constructor_attribute: Option<String>,

    /// Pooled string builders used for query strings; 0 disables pooling
    #[arg(long = "stringbuilder-pool-size")]
    string_builder_pool_size: Option<u32>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Modifier {
    Public,
    Internal,
}

impl From<Modifier> for Visibility {
    fn from(modifier: Modifier) -> Self {
        match modifier {
            Modifier::Public => Visibility::Public,
            Modifier::Internal => Visibility::Internal,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Commands::Generate(args) if args.verbose);
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "info" }),
    )
    .init();

    match cli.command {
        Commands::Generate(args) => cmd_generate(args),

        Commands::Validate { document } => cmd_validate(&document),

        Commands::Inspect { document, format } => cmd_inspect(&document, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "sharpgen", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<GeneratorConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Read a document into a raw tree, picking the syntax by extension.
fn read_document(path: &Path) -> Result<serde_json::Value> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let json = path.extension().and_then(|e| e.to_str()) == Some("json");
    parse::value_from_str(&content, json).with_context(|| format!("failed to parse {}", path.display()))
}

/// Load the main document, merge every additional one over it in order, and
/// build the model.
fn load_document(
    path: &Path,
    additional: &[PathBuf],
    diagnostics: &mut CollectedDiagnostics,
) -> Result<ApiDocument> {
    let mut merged = read_document(path)?;
    for extra in additional {
        merge_documents(&mut merged, read_document(extra)?);
        log::debug!("merged {}", extra.display());
    }
    let spec = parse::from_value(merged)
        .with_context(|| format!("invalid OpenAPI document {}", path.display()))?;
    let doc = model::build_document(&spec, diagnostics)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Ok(doc)
}

/// Layer CLI flags over the config file. Flags only ever switch features on
/// (or off, for the `no-*` flags); absent flags keep the file's value.
fn apply_args(mut cfg: GeneratorConfig, args: &GenerateArgs) -> GeneratorConfig {
    cfg.project_name = args.project.clone();
    if let Some(namespace) = &args.namespace {
        cfg.namespace = Some(namespace.clone());
    }
    if let Some(modifier) = args.modifier {
        cfg.visibility = modifier.into();
    }
    if let Some(modifier) = args.client_modifier {
        cfg.client_visibility = Some(modifier.into());
    }
    if let Some(filter) = &args.filter {
        cfg.tag_filter = Some(filter.clone());
    }
    if let Some(attribute) = &args.json_constructor_attribute {
        cfg.json_constructor_attribute = attribute.clone();
    }
    if let Some(size) = args.string_builder_pool_size {
        cfg.string_builder_pool_size = size;
    }
    cfg.tree_shake |= args.tree_shake;
    cfg.json_source_generators |= args.json_source_generators;
    cfg.required_properties |= args.required_properties;
    cfg.include_interfaces |= args.interfaces;
    cfg.exclude_deprecated |= args.no_obsolete;
    if args.no_project {
        cfg.include_project = false;
    }
    cfg
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let cfg = apply_args(try_load_config()?.unwrap_or_default(), &args);

    let mut diagnostics = CollectedDiagnostics::logging();
    let doc = load_document(&args.document, &args.additional, &mut diagnostics)?;

    let mut sink = DirectorySink::new(&args.directory);
    if args.clean_directory {
        sink.clean()
            .with_context(|| format!("failed to clean {}", args.directory.display()))?;
    }

    let report = sharpgen_core::run(
        &CSharpGenerator::new(),
        &doc,
        &cfg,
        &mut sink,
        &mut diagnostics,
    )?;

    eprintln!(
        "Generated {} clients and {} models ({} files) in {}",
        report.clients,
        report.models,
        sink.written(),
        args.directory.display()
    );
    let warnings = diagnostics.count(Level::Warning);
    if warnings > 0 {
        eprintln!("{warnings} warning(s) reported");
    }
    Ok(())
}

fn cmd_validate(document: &Path) -> Result<()> {
    let mut diagnostics = CollectedDiagnostics::logging();
    let doc = load_document(document, &[], &mut diagnostics)?;

    eprintln!(
        "Valid OpenAPI document: {}",
        doc.info.title.as_deref().unwrap_or("(untitled)")
    );
    if let Some(version) = &doc.info.version {
        eprintln!("  Version: {version}");
    }
    eprintln!("  Schemas: {}", doc.schemas.len());
    eprintln!("  Operations: {}", doc.operations.len());
    eprintln!("  Warnings: {}", diagnostics.count(Level::Warning));

    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(document: &Path, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let mut diagnostics = CollectedDiagnostics::logging();
    let doc = load_document(document, &[], &mut diagnostics)?;

    let generator = CSharpGenerator::new();
    let plan = DocumentGenerator::new(&cfg, generator.keywords()).plan(&doc, &mut diagnostics)?;
    let summary = build_inspect_summary(&plan);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(plan: &GenerationPlan) -> serde_json::Value {
    let models: Vec<serde_json::Value> = plan
        .models
        .iter()
        .map(|m| {
            serde_json::json!({
                "name": m.name(),
                "key": m.key(),
                "kind": match m {
                    ModelPlan::Enum(_) => "enum",
                    ModelPlan::Class(_) => "class",
                },
            })
        })
        .collect();

    let clients: Vec<serde_json::Value> = plan
        .clients
        .iter()
        .map(|client| {
            let methods: Vec<serde_json::Value> = client
                .methods
                .iter()
                .map(|m| {
                    let path: String = m
                        .path
                        .iter()
                        .map(|segment| match segment {
                            PathSegment::Literal(text) => text.clone(),
                            PathSegment::Variable(var) => format!("{{{var}}}"),
                        })
                        .collect();
                    let response = match &m.response {
                        ResponsePlan::Typed(type_ref) => type_ref_to_cs(type_ref),
                        ResponsePlan::Stream => "stream".to_string(),
                        ResponsePlan::Void => "void".to_string(),
                    };
                    serde_json::json!({
                        "name": m.name,
                        "method": m.method.as_str(),
                        "path": path,
                        "arguments": m.argument_names(),
                        "response": response,
                        "deprecated": m.deprecated,
                    })
                })
                .collect();
            serde_json::json!({
                "name": client.name,
                "tag": client.tag,
                "methods": methods,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": plan.info.title,
            "version": plan.info.version,
        },
        "namespace": plan.namespace,
        "clients": clients,
        "models": models,
    })
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::ffi::OsString;

    use super::*;

    const PETSTORE: &str = include_str!("../../sharpgen-core/tests/fixtures/petstore.yaml");

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "sharpgen", "generate", "PetStore", "petstore.yaml", "-m", "internal", "-i", "-o",
            "-p", "--stringbuilder-pool-size", "0", "-f", "^Pets$",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let cfg = apply_args(GeneratorConfig::default(), &args);
        assert_eq!(cfg.project_name, "PetStore");
        assert_eq!(cfg.visibility, Visibility::Internal);
        assert_eq!(cfg.client_visibility(), Visibility::Internal);
        assert!(cfg.include_interfaces);
        assert!(cfg.exclude_deprecated);
        assert!(!cfg.include_project);
        assert_eq!(cfg.string_builder_pool_size, 0);
        assert_eq!(cfg.tag_filter.as_deref(), Some("^Pets$"));
        assert!(cfg.required_constructor_parameters);
    }

    #[test]
    fn test_additional_documents_are_merged() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("petstore.yaml");
        fs::write(&main, PETSTORE).unwrap();
        let extra = dir.path().join("extra.json");
        fs::write(
            &extra,
            r#"{"info": {"title": "Merged"}, "components": {"schemas": {"Extra": {"type": "object"}}}}"#,
        )
        .unwrap();

        let doc = load_document(&main, &[extra], &mut CollectedDiagnostics::new()).unwrap();
        assert_eq!(doc.info.title.as_deref(), Some("Merged"));
        assert!(doc.schemas.contains_key("Extra"));
        assert!(doc.schemas.contains_key("Pet"));
    }

    #[test]
    fn test_generate_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let main = dir.path().join("petstore.yaml");
        fs::write(&main, PETSTORE).unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("Models")).unwrap();
        fs::write(out.join("Models/Stale.cs"), "stale").unwrap();

        let argv: Vec<OsString> = vec![
            "sharpgen".into(),
            "generate".into(),
            "PetStore".into(),
            main.into_os_string(),
            "-d".into(),
            out.clone().into_os_string(),
            "-c".into(),
        ];
        let cli = Cli::parse_from(argv);
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        cmd_generate(args).unwrap();

        assert!(!out.join("Models/Stale.cs").exists());
        assert!(out.join("PetStore.csproj").exists());
        let client = fs::read_to_string(out.join("Clients/PetsClient.cs")).unwrap();
        assert!(client.contains("namespace PetStore.Clients;"));
    }

    #[test]
    fn test_missing_document_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let err = load_document(
            &dir.path().join("missing.yaml"),
            &[],
            &mut CollectedDiagnostics::new(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
        assert!(!out.exists());
    }

    #[test]
    fn test_inspect_summary() {
        let spec = parse::from_yaml(PETSTORE).unwrap();
        let doc = model::build_document(&spec, &mut CollectedDiagnostics::new()).unwrap();
        let cfg = GeneratorConfig::default();
        let generator = CSharpGenerator::new();
        let plan = DocumentGenerator::new(&cfg, generator.keywords())
            .plan(&doc, &mut CollectedDiagnostics::new())
            .unwrap();
        let summary = build_inspect_summary(&plan);
        assert_eq!(summary["namespace"], "Api");
        assert_eq!(summary["clients"][0]["name"], "PetsClient");
        assert_eq!(summary["clients"][0]["methods"][0]["path"], "/pets/{id}");
        assert_eq!(summary["clients"][0]["methods"][1]["response"], "void");
        assert_eq!(summary["models"][2]["kind"], "enum");
    }
}
