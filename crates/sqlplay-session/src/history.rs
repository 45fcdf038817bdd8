use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sqlplay_core::Table;

use crate::error::HistoryError;

/// Stable identifier of a history record.
///
/// Ids are never reused within one history, so they stay valid after other
/// records are deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One successfully executed query and its materialized result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRecord {
    id: RecordId,
    query: String,
    result: Table,
    executed_at: DateTime<Utc>,
}

impl QueryRecord {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn result(&self) -> &Table {
        &self.result
    }

    pub fn executed_at(&self) -> DateTime<Utc> {
        self.executed_at
    }
}

/// Ordered log of successful queries. Position doubles as the display index.
#[derive(Debug, Clone, Default)]
pub struct QueryHistory {
    records: Vec<QueryRecord>,
    next_id: u64,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a record at the end. Identical queries are kept as separate records.
    pub fn append(&mut self, query: impl Into<String>, result: Table) -> RecordId {
        self.next_id += 1;
        let id = RecordId(self.next_id);
        self.records.push(QueryRecord {
            id,
            query: query.into(),
            result,
            executed_at: Utc::now(),
        });
        id
    }

    pub fn remove_at(&mut self, index: usize) -> Result<QueryRecord, HistoryError> {
        if index >= self.records.len() {
            return Err(HistoryError::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    pub fn remove(&mut self, id: RecordId) -> Result<QueryRecord, HistoryError> {
        let index = self
            .position(id)
            .ok_or(HistoryError::UnknownRecord(id))?;
        Ok(self.records.remove(index))
    }

    pub fn list(&self) -> &[QueryRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&QueryRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }

    pub fn last(&self) -> Option<&QueryRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
