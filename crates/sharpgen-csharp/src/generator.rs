use sharpgen_core::config::GeneratorConfig;
use sharpgen_core::ir::GenerationPlan;
use sharpgen_core::transform::KeywordTable;
use sharpgen_core::{CodeGenerator, GeneratedFile};

use crate::emitters;
use crate::error::GeneratorError;
use crate::keywords::csharp_keywords;

/// C# client generator: models, one client per tag, runtime support files
/// and an optional project file.
pub struct CSharpGenerator {
    keywords: KeywordTable,
}

impl CSharpGenerator {
    pub fn new() -> Self {
        Self {
            keywords: csharp_keywords(),
        }
    }
}

impl Default for CSharpGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for CSharpGenerator {
    type Error = GeneratorError;

    fn keywords(&self) -> &KeywordTable {
        &self.keywords
    }

    fn generate(
        &self,
        plan: &GenerationPlan,
        config: &GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        let env = emitters::environment()?;

        let mut files = emitters::models::emit_models(&env, plan, config)?;
        let models = files.len();
        files.extend(emitters::clients::emit_clients(&env, plan, config)?);
        log::debug!(
            "rendered {} model files and {} client files",
            models,
            files.len() - models
        );
        files.extend(emitters::support::emit_support(&env, plan, config)?);
        if let Some(project) = emitters::project::emit_project(&env, plan, config)? {
            files.push(project);
        }

        log::info!(
            "rendered {} files for namespace {}",
            files.len(),
            plan.namespace
        );
        Ok(files)
    }
}
