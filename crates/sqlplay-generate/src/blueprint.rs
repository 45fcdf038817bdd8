use sqlplay_core::DataType;

use crate::generators::faker::FakeKind;

/// Where the values of a generated column come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Dense sequential integers starting at 1.
    Sequence,
    /// Random unique token (UUID v4 formatted).
    Token,
    /// Realistic value from the faker catalog.
    Fake(FakeKind),
    /// Uniform integer in `min..=max`.
    IntRange { min: i64, max: i64 },
    /// One of a fixed set of labels.
    Choice(&'static [&'static str]),
    /// Sampled from a column of a table generated earlier in the same call.
    ForeignKey {
        table: &'static str,
        column: &'static str,
    },
}

/// A column to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub data_type: DataType,
    pub source: ValueSource,
}

impl ColumnSpec {
    pub fn new(name: &'static str, data_type: DataType, source: ValueSource) -> Self {
        Self {
            name,
            data_type,
            source,
        }
    }

    pub fn sequence(name: &'static str) -> Self {
        Self::new(name, DataType::Int, ValueSource::Sequence)
    }

    pub fn token(name: &'static str) -> Self {
        Self::new(name, DataType::Text, ValueSource::Token)
    }

    pub fn fake(name: &'static str, kind: FakeKind) -> Self {
        Self::new(name, kind.data_type(), ValueSource::Fake(kind))
    }

    pub fn int_range(name: &'static str, min: i64, max: i64) -> Self {
        Self::new(name, DataType::Int, ValueSource::IntRange { min, max })
    }

    pub fn choice(name: &'static str, labels: &'static [&'static str]) -> Self {
        Self::new(name, DataType::Text, ValueSource::Choice(labels))
    }

    pub fn foreign_key(name: &'static str, table: &'static str, column: &'static str) -> Self {
        Self::new(name, DataType::Int, ValueSource::ForeignKey { table, column })
    }
}

/// A table to generate with its row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub rows: usize,
    pub columns: Vec<ColumnSpec>,
}

impl TableSpec {
    /// Tables this one samples foreign keys from.
    pub fn parents(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().filter_map(|column| match column.source {
            ValueSource::ForeignKey { table, .. } => Some(table),
            _ => None,
        })
    }
}
