pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod ir;
pub mod model;
pub mod parse;
pub mod transform;

use error::EmitError;
use transform::names::KeywordTable;

pub use generator::{DocumentGenerator, GenerationReport, run};

/// A generated file with path and content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative to the output root, `/`-separated.
    pub path: String,
    pub content: String,
}

/// Trait for target generators that render files from a generation plan.
pub trait CodeGenerator {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reserved words of the target language, consulted while naming.
    fn keywords(&self) -> &KeywordTable;

    fn generate(
        &self,
        plan: &ir::GenerationPlan,
        config: &config::GeneratorConfig,
    ) -> Result<Vec<GeneratedFile>, Self::Error>;
}

/// Destination of generated files.
pub trait EmissionSink {
    fn emit(&mut self, file: &GeneratedFile) -> Result<(), EmitError>;
}

/// Collects into memory.
impl EmissionSink for Vec<GeneratedFile> {
    fn emit(&mut self, file: &GeneratedFile) -> Result<(), EmitError> {
        self.push(file.clone());
        Ok(())
    }
}
