use std::collections::BTreeMap;

use rand::{Rng, RngCore};

use sqlplay_core::{Table, Value};

use crate::errors::GenerationError;

/// Source of foreign-key values for fact tables.
pub trait ForeignContext {
    /// Sample one value from `table.column` as already materialized.
    fn pick_fk(
        &self,
        table: &str,
        column: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Value, GenerationError>;
}

/// Column values of every table generated so far in one call.
#[derive(Debug, Default)]
pub struct KeyPool {
    column_values: BTreeMap<String, BTreeMap<String, Vec<Value>>>,
}

impl KeyPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the non-null values of every column of `table`.
    pub fn ingest_table(&mut self, table: &Table) {
        let mut columns: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for (idx, column) in table.columns().iter().enumerate() {
            let values = table
                .rows()
                .iter()
                .map(|row| &row[idx])
                .filter(|value| !value.is_null())
                .cloned()
                .collect();
            columns.insert(column.name.clone(), values);
        }
        self.column_values.insert(table.name().to_string(), columns);
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.column_values.contains_key(table)
    }

    pub fn values(&self, table: &str, column: &str) -> Option<&[Value]> {
        self.column_values
            .get(table)
            .and_then(|columns| columns.get(column))
            .map(Vec::as_slice)
    }
}

impl ForeignContext for KeyPool {
    fn pick_fk(
        &self,
        table: &str,
        column: &str,
        rng: &mut dyn RngCore,
    ) -> Result<Value, GenerationError> {
        let values = self
            .values(table, column)
            .filter(|values| !values.is_empty())
            .ok_or_else(|| GenerationError::MissingParent {
                table: table.to_string(),
                column: column.to_string(),
            })?;
        let idx = rng.random_range(0..values.len());
        Ok(values[idx].clone())
    }
}
