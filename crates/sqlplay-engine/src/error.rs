use thiserror::Error;

/// A statement failed to parse, plan or execute.
///
/// Carries the engine's own message so it can be shown to the user as is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct QueryExecutionError {
    pub message: String,
}

impl QueryExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failures outside of query execution itself.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to register table '{table}': {message}")]
    Registration { table: String, message: String },
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("engine runtime error: {0}")]
    Runtime(String),
    #[error(transparent)]
    Core(#[from] sqlplay_core::Error),
}
