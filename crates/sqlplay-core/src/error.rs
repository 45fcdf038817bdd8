use thiserror::Error;

/// Core error type shared across sqlplay crates.
#[derive(Debug, Error)]
pub enum Error {
    /// Uploaded content could not be parsed into a table.
    #[error("malformed input: {0}")]
    MalformedInput(String),
    /// A configuration value is outside its accepted range.
    #[error("validation error: {0}")]
    Validation(String),
    /// The table violates internal invariants.
    #[error("invalid table: {0}")]
    InvalidTable(String),
    /// Failure while encoding a table.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience alias for results returned by sqlplay crates.
pub type Result<T> = std::result::Result<T, Error>;
