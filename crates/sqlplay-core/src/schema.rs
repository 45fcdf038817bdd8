use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::{DataType, Value};
use crate::validation::validate_table;

/// Column metadata for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// One row, aligned with the owning table's columns.
pub type Row = Vec<Value>;

/// A named table with a fixed, ordered set of columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table, checking column uniqueness and row width.
    pub fn new(name: impl Into<String>, columns: Vec<Column>, rows: Vec<Row>) -> Result<Self> {
        let table = Self {
            name: name.into(),
            columns,
            rows,
        };
        validate_table(&table)?;
        Ok(table)
    }

    pub fn empty(name: impl Into<String>, columns: Vec<Column>) -> Result<Self> {
        Self::new(name, columns, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|col| col.name.as_str())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Cell lookup by row position and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|row| row.get(idx))
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(column)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::InvalidTable(format!(
                "row has {} values but table '{}' has {} columns",
                row.len(),
                self.name,
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Ordered set of uniquely named tables produced together.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    tables: Vec<Table>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tables(tables: Vec<Table>) -> Result<Self> {
        let mut dataset = Self::new();
        for table in tables {
            dataset.push(table)?;
        }
        Ok(dataset)
    }

    pub fn push(&mut self, table: Table) -> Result<()> {
        if self.get(table.name()).is_some() {
            return Err(Error::InvalidTable(format!(
                "duplicate table name: {}",
                table.name()
            )));
        }
        self.tables.push(table);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|table| table.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Rename one table, keeping names unique.
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if from == to {
            return if self.get(from).is_some() {
                Ok(())
            } else {
                Err(Error::InvalidTable(format!("unknown table: {from}")))
            };
        }
        if self.get(to).is_some() {
            return Err(Error::InvalidTable(format!("duplicate table name: {to}")));
        }
        let table = self
            .tables
            .iter_mut()
            .find(|table| table.name == from)
            .ok_or_else(|| Error::InvalidTable(format!("unknown table: {from}")))?;
        table.name = to.to_string();
        Ok(())
    }
}

impl IntoIterator for Dataset {
    type Item = Table;
    type IntoIter = std::vec::IntoIter<Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}
