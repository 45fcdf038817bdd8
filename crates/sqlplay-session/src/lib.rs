//! Session state for the SQL playground.
//!
//! A [`Session`] owns the active dataset, the query engine it is registered
//! with and the history of successful queries. Data sources are turned into
//! datasets by [`resolve`].

pub mod error;
pub mod history;
pub mod session;
pub mod source;

pub use error::{HistoryError, ResolveError, SessionError};
pub use history::{QueryHistory, QueryRecord, RecordId};
pub use session::Session;
pub use source::{
    DEFAULT_ROWS, DEFAULT_SEED, DEFAULT_UPLOAD_TABLE, DataSource, GenerationParams, Limits,
    normalize_table_name, resolve,
};
