//! Core contracts and helpers for sqlplay.
//!
//! This crate defines the table model shared by the generator, the query
//! engine adapter and the session, plus the CSV codec used for uploads and
//! downloads.

pub mod codec;
pub mod error;
pub mod schema;
pub mod types;
pub mod validation;

pub use codec::{CSV_CONTENT_TYPE, Download, read_csv, read_csv_from, to_csv_bytes, write_csv};
pub use error::{Error, Result};
pub use schema::{Column, Dataset, Row, Table};
pub use types::{DATE_FORMAT, DataType, Value};
pub use validation::validate_table;
