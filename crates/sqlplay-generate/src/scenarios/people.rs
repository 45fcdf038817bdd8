use std::collections::BTreeSet;

use crate::blueprint::{ColumnSpec, TableSpec};
use crate::generators::faker::FakeKind;
use crate::model::PersonColumn;

pub const PEOPLE: &str = "personas";

pub const SAMPLE_QUERY: &str = "SELECT * FROM personas LIMIT 10";

/// Single table with a random `id` token followed by the selected columns.
pub fn table(row_count: usize, selected: &BTreeSet<PersonColumn>) -> TableSpec {
    let mut columns = vec![ColumnSpec::token("id")];
    columns.extend(selected.iter().map(|column| {
        let kind = match column {
            PersonColumn::Name => FakeKind::FirstName,
            PersonColumn::Surname => FakeKind::LastName,
            PersonColumn::Email => FakeKind::Email,
            PersonColumn::BirthDate => FakeKind::BirthDate,
            PersonColumn::Address => FakeKind::Address,
            PersonColumn::Company => FakeKind::Company,
        };
        ColumnSpec::fake(column.column_name(), kind)
    }));

    TableSpec {
        name: PEOPLE,
        rows: row_count,
        columns,
    }
}
