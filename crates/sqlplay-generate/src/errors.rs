use thiserror::Error;

/// Errors emitted by the dataset generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("invalid blueprint: {0}")]
    InvalidBlueprint(String),
    #[error("no parent rows for fk {table}.{column}")]
    MissingParent { table: String, column: String },
    #[error(transparent)]
    Core(#[from] sqlplay_core::Error),
}
