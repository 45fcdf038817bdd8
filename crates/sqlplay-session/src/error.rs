use thiserror::Error;

use sqlplay_engine::{EngineError, QueryExecutionError};
use sqlplay_generate::GenerationError;

use crate::history::RecordId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("history index {index} out of range (history has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no history record with id {0}")]
    UnknownRecord(RecordId),
}

/// Failures turning a data source into a dataset.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("malformed input: {0}")]
    MalformedInput(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

impl From<sqlplay_core::Error> for ResolveError {
    fn from(err: sqlplay_core::Error) -> Self {
        match err {
            sqlplay_core::Error::Validation(message)
            | sqlplay_core::Error::InvalidTable(message) => ResolveError::Validation(message),
            sqlplay_core::Error::MalformedInput(message) => ResolveError::MalformedInput(message),
            other => ResolveError::MalformedInput(other.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Query(#[from] QueryExecutionError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error(transparent)]
    Core(#[from] sqlplay_core::Error),
    #[error("no active dataset: generate or upload one first")]
    NoActiveDataset,
    #[error("query text is empty")]
    EmptyQuery,
    #[error("unknown table: {0}")]
    UnknownTable(String),
}
