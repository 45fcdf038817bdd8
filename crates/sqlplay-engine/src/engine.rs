use sqlplay_core::{Column, Dataset, Table};

use crate::error::{EngineError, QueryExecutionError};

/// Name given to every query result table.
pub const RESULT_TABLE: &str = "result";

/// An embedded SQL engine that queries registered tables by name.
pub trait QueryEngine {
    /// Make `table` queryable under its own name, replacing any table already
    /// registered with that name.
    fn register(&mut self, table: &Table) -> Result<(), EngineError>;

    /// Remove a table. Returns whether a table with that name existed.
    fn deregister(&mut self, name: &str) -> Result<bool, EngineError>;

    /// Run one SQL statement and materialize its result.
    fn execute(&mut self, sql: &str) -> Result<Table, QueryExecutionError>;

    /// Names of every registered table, sorted.
    fn table_names(&self) -> Vec<String>;

    /// Column layout of a registered table.
    fn describe(&self, name: &str) -> Result<Vec<Column>, EngineError>;
}

/// Register every table of `dataset`, stopping at the first failure.
pub fn register_all<E: QueryEngine + ?Sized>(
    engine: &mut E,
    dataset: &Dataset,
) -> Result<(), EngineError> {
    for table in dataset.tables() {
        engine.register(table)?;
    }
    Ok(())
}
