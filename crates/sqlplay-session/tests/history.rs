use sqlplay_core::{Column, DataType, Table, Value};
use sqlplay_session::{HistoryError, QueryHistory, RecordId};

fn result(value: i64) -> Table {
    Table::new(
        "result",
        vec![Column::new("c", DataType::Int)],
        vec![vec![Value::Int(value)]],
    )
    .expect("table")
}

#[test]
fn append_pushes_at_the_end() {
    let mut history = QueryHistory::new();
    history.append("SELECT 1", result(1));
    let id = history.append("SELECT 2", result(2));

    let last = history.last().expect("last record");
    assert_eq!(last.id(), id);
    assert_eq!(last.query(), "SELECT 2");
    assert_eq!(last.result(), &result(2));
    assert_eq!(history.len(), 2);
}

#[test]
fn identical_queries_are_not_deduplicated() {
    let mut history = QueryHistory::new();
    let a = history.append("SELECT 1", result(1));
    let b = history.append("SELECT 1", result(1));
    assert_ne!(a, b);
    assert_eq!(history.len(), 2);
}

#[test]
fn remove_at_shifts_later_records_down() {
    let mut history = QueryHistory::new();
    history.append("q0", result(0));
    history.append("q1", result(1));
    history.append("q2", result(2));

    let removed = history.remove_at(1).expect("remove");
    assert_eq!(removed.query(), "q1");
    let queries: Vec<&str> = history.list().iter().map(|r| r.query()).collect();
    assert_eq!(queries, vec!["q0", "q2"]);
}

#[test]
fn remove_at_out_of_range_leaves_history_unchanged() {
    let mut history = QueryHistory::new();
    history.append("q0", result(0));

    let err = history.remove_at(1).expect_err("out of range");
    assert_eq!(err, HistoryError::IndexOutOfRange { index: 1, len: 1 });
    assert_eq!(history.len(), 1);

    let mut empty = QueryHistory::new();
    assert!(empty.remove_at(0).is_err());
}

#[test]
fn ids_stay_valid_after_earlier_deletions() {
    let mut history = QueryHistory::new();
    let first = history.append("q0", result(0));
    let second = history.append("q1", result(1));
    let third = history.append("q2", result(2));

    history.remove(first).expect("remove first");
    assert_eq!(history.position(third), Some(1));
    assert_eq!(history.remove(third).expect("remove third").query(), "q2");
    assert_eq!(history.get(second).map(|r| r.query()), Some("q1"));

    let err = history.remove(first).expect_err("already removed");
    assert_eq!(err, HistoryError::UnknownRecord(first));
    assert_eq!(history.remove(RecordId::from(99)).ok(), None);
}

#[test]
fn ids_are_never_reused() {
    let mut history = QueryHistory::new();
    let first = history.append("q0", result(0));
    history.remove(first).expect("remove");
    let next = history.append("q1", result(1));
    assert!(next > first);
}
