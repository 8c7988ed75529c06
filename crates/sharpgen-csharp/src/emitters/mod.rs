pub mod clients;
pub mod models;
pub mod project;
pub mod support;

use minijinja::Environment;

use crate::error::GeneratorError;

pub const GENERATOR_NAME: &str = "sharpgen";
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Escape text placed inside XML doc comments and MSBuild elements.
fn xml_doc(value: String) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Template environment shared by every emitter.
pub fn environment() -> Result<Environment<'static>, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("xml_doc", xml_doc);
    env.add_global("generator", GENERATOR_NAME);
    env.add_global("version", GENERATOR_VERSION);
    env.add_global(
        "generated_code",
        format!(
            "[System.CodeDom.Compiler.GeneratedCode(\"{GENERATOR_NAME}\", \"{GENERATOR_VERSION}\")]"
        ),
    );

    env.add_template("header.j2", include_str!("../../templates/header.j2"))?;
    env.add_template("can_iterate.cs.j2", include_str!("../../templates/can_iterate.cs.j2"))?;
    env.add_template("model_class.cs.j2", include_str!("../../templates/model_class.cs.j2"))?;
    env.add_template("model_enum.cs.j2", include_str!("../../templates/model_enum.cs.j2"))?;
    env.add_template("client.cs.j2", include_str!("../../templates/client.cs.j2"))?;
    env.add_template(
        "client_options.cs.j2",
        include_str!("../../templates/client_options.cs.j2"),
    )?;
    env.add_template(
        "query_builder.cs.j2",
        include_str!("../../templates/query_builder.cs.j2"),
    )?;
    env.add_template(
        "string_builder_pool.cs.j2",
        include_str!("../../templates/string_builder_pool.cs.j2"),
    )?;
    env.add_template("json_context.cs.j2", include_str!("../../templates/json_context.cs.j2"))?;
    env.add_template(
        "registrations.cs.j2",
        include_str!("../../templates/registrations.cs.j2"),
    )?;
    env.add_template("project.csproj.j2", include_str!("../../templates/project.csproj.j2"))?;
    Ok(env)
}

/// Split a free-text description into doc comment lines.
pub fn doc_lines(text: Option<&str>) -> Vec<String> {
    text.map(|t| {
        t.lines()
            .map(|l| l.trim_end().to_string())
            .skip_while(|l| l.is_empty())
            .collect::<Vec<_>>()
    })
    .map(|mut lines| {
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    })
    .unwrap_or_default()
}
