use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("{0}")]
    Other(String),
}
