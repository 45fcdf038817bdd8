use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::Table;

/// Validate internal consistency of a table.
///
/// This checks:
/// - the table name is not blank
/// - column names are non-empty and unique
/// - every row matches the column count
/// - every non-null cell matches its column type
pub fn validate_table(table: &Table) -> Result<()> {
    if table.name().trim().is_empty() {
        return Err(Error::InvalidTable("table name is empty".to_string()));
    }

    let mut names = BTreeSet::new();
    for column in table.columns() {
        if column.name.is_empty() {
            return Err(Error::InvalidTable(format!(
                "empty column name in table {}",
                table.name()
            )));
        }
        if !names.insert(column.name.as_str()) {
            return Err(Error::InvalidTable(format!(
                "duplicate column name: {}.{}",
                table.name(),
                column.name
            )));
        }
    }

    for (idx, row) in table.rows().iter().enumerate() {
        if row.len() != table.columns().len() {
            return Err(Error::InvalidTable(format!(
                "row {} of table {} has {} values, expected {}",
                idx + 1,
                table.name(),
                row.len(),
                table.columns().len()
            )));
        }
        for (value, column) in row.iter().zip(table.columns()) {
            if !value.fits(column.data_type) {
                return Err(Error::InvalidTable(format!(
                    "row {} of table {}: value {:?} does not fit {} column {}",
                    idx + 1,
                    table.name(),
                    value,
                    column.data_type,
                    column.name
                )));
            }
        }
    }

    Ok(())
}
