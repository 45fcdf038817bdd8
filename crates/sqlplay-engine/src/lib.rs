//! SQL execution over in-memory tables.
//!
//! The [`QueryEngine`] trait is the seam the session talks to. The only
//! implementation shipped here embeds DataFusion.

pub mod convert;
pub mod datafusion_engine;
pub mod engine;
pub mod error;

pub use datafusion_engine::DataFusionEngine;
pub use engine::{QueryEngine, RESULT_TABLE, register_all};
pub use error::{EngineError, QueryExecutionError};
