use std::collections::BTreeMap;

use sqlplay_core::{Column, DataType, Dataset, Table, Value, read_csv};
use sqlplay_engine::{EngineError, QueryEngine, QueryExecutionError};
use sqlplay_generate::{PersonColumn, Scenario};
use sqlplay_session::{
    DataSource, GenerationParams, Limits, ResolveError, Session, SessionError,
};

fn session() -> Session {
    Session::with_datafusion(Limits::default()).expect("session")
}

fn people_as_t() -> DataSource {
    DataSource::Generate(GenerationParams {
        seed: 1234,
        row_count: 10,
        scenario: Scenario::People,
        columns: [PersonColumn::Name, PersonColumn::Email].into_iter().collect(),
        table_name: Some("t".to_string()),
        ..GenerationParams::default()
    })
}

#[test]
fn count_over_generated_table() {
    let mut session = session();
    session.load(&people_as_t()).expect("load");

    let record = session
        .run_query("SELECT COUNT(*) AS c FROM t")
        .expect("query");
    let result = record.result();
    assert_eq!(result.columns(), &[Column::new("c", DataType::Int)]);
    assert_eq!(result.rows(), &[vec![Value::Int(10)]]);
    assert_eq!(session.history().len(), 1);
}

#[test]
fn uploaded_rows_come_back_in_id_order() {
    let mut session = session();
    let csv = b"id,name\n1,Ana\n2,Luis\n".to_vec();
    session
        .load(&DataSource::upload("uploaded", csv.clone()))
        .expect("load");

    let record = session
        .run_query("SELECT * FROM uploaded ORDER BY id")
        .expect("query");
    let uploaded = read_csv("result", &csv).expect("csv");
    assert_eq!(record.result(), &uploaded);
}

#[test]
fn failed_query_leaves_history_unchanged() {
    let mut session = session();
    session.load(&people_as_t()).expect("load");
    session.run_query("SELECT 1").expect("first query");

    let err = session.run_query("SELEKT * FROM x").expect_err("bad query");
    assert!(matches!(err, SessionError::Query(_)));
    assert_eq!(session.history().len(), 1);
}

#[test]
fn queries_need_an_active_dataset() {
    let mut session = session();
    let err = session.run_query("SELECT 1").expect_err("no dataset");
    assert!(matches!(err, SessionError::NoActiveDataset));
}

#[test]
fn blank_queries_are_rejected() {
    let mut session = session();
    session.load(&people_as_t()).expect("load");
    let err = session.run_query("   \n").expect_err("blank");
    assert!(matches!(err, SessionError::EmptyQuery));
    assert!(session.history().is_empty());
}

#[test]
fn loading_replaces_and_deregisters_old_tables() {
    let mut session = session();
    session
        .load(&DataSource::Generate(GenerationParams::default()))
        .expect("generate");
    assert_eq!(
        session.engine().table_names(),
        vec!["clientes", "consumo", "empresas"]
    );

    session
        .load(&DataSource::upload("ventas", b"id\n1\n".to_vec()))
        .expect("upload");
    assert_eq!(session.engine().table_names(), vec!["ventas"]);
    let names: Vec<&str> = session
        .dataset()
        .expect("active dataset")
        .table_names()
        .collect();
    assert_eq!(names, vec!["ventas"]);
    assert!(session.run_query("SELECT * FROM clientes").is_err());
}

#[test]
fn loading_drops_tables_created_through_sql() {
    let mut session = session();
    session
        .load(&DataSource::Generate(GenerationParams::default()))
        .expect("generate");
    session
        .run_query("CREATE TABLE extra AS SELECT * FROM clientes")
        .expect("create table");
    assert!(session.engine().table_names().contains(&"extra".to_string()));

    session
        .load(&DataSource::upload("ventas", b"id\n1\n".to_vec()))
        .expect("upload");
    assert_eq!(session.engine().table_names(), vec!["ventas"]);
    assert!(matches!(
        session.run_query("SELECT COUNT(*) AS c FROM extra"),
        Err(SessionError::Query(_))
    ));
}

#[test]
fn failed_load_keeps_previous_dataset() {
    let mut session = session();
    session.load(&people_as_t()).expect("load");

    let bad_seed = DataSource::Generate(GenerationParams {
        seed: 0,
        ..GenerationParams::default()
    });
    let err = session.load(&bad_seed).expect_err("invalid seed");
    assert!(matches!(err, SessionError::Resolve(ResolveError::Validation(_))));

    let err = session
        .load(&DataSource::upload("x", b"a,b\n1\n".to_vec()))
        .expect_err("ragged upload");
    assert!(matches!(
        err,
        SessionError::Resolve(ResolveError::MalformedInput(_))
    ));

    assert!(session.dataset().and_then(|d| d.get("t")).is_some());
    session.run_query("SELECT * FROM t").expect("still queryable");
}

#[test]
fn delete_by_id_survives_earlier_deletions() {
    let mut session = session();
    session.load(&people_as_t()).expect("load");
    let first = session.run_query("SELECT 1").expect("q1").id();
    let second = session.run_query("SELECT 2").expect("q2").id();
    let third = session.run_query("SELECT 3").expect("q3").id();

    session.delete_record(first).expect("delete first");
    let removed = session.delete_record(third).expect("delete third");
    assert_eq!(removed.query(), "SELECT 3");

    let remaining: Vec<_> = session.history().list().iter().map(|r| r.id()).collect();
    assert_eq!(remaining, vec![second]);
    assert!(session.delete_at(5).is_err());
    session.delete_at(0).expect("delete by position");
    assert!(session.history().is_empty());
}

#[test]
fn exports_are_named_after_their_source() {
    let mut session = session();
    session.load(&people_as_t()).expect("load");
    let id = session.run_query("SELECT COUNT(*) AS c FROM t").expect("query").id();

    let table = session.export_table("t").expect("export table");
    assert_eq!(table.file_name, "t.csv");
    assert_eq!(table.content_type, "text/csv");

    let record = session.export_record(id).expect("export record");
    assert_eq!(record.file_name, format!("consulta_{id}.csv"));
    let text = String::from_utf8(record.bytes).expect("utf-8");
    assert_eq!(text.lines().collect::<Vec<_>>(), vec!["c", "10"]);

    assert!(matches!(
        session.export_table("nope"),
        Err(SessionError::UnknownTable(_))
    ));
}

#[test]
fn describe_delegates_to_engine() {
    let mut session = session();
    session.load(&people_as_t()).expect("load");
    let columns = session.describe("t").expect("describe");
    let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "nombre", "email"]);
}

/// Engine that refuses to register one table name.
#[derive(Debug, Default)]
struct PickyEngine {
    tables: BTreeMap<String, Table>,
}

impl QueryEngine for PickyEngine {
    fn register(&mut self, table: &Table) -> Result<(), EngineError> {
        if table.name() == "boom" {
            return Err(EngineError::Registration {
                table: "boom".to_string(),
                message: "refused".to_string(),
            });
        }
        self.tables.insert(table.name().to_string(), table.clone());
        Ok(())
    }

    fn deregister(&mut self, name: &str) -> Result<bool, EngineError> {
        Ok(self.tables.remove(name).is_some())
    }

    fn execute(&mut self, sql: &str) -> Result<Table, QueryExecutionError> {
        self.tables
            .get(sql.trim())
            .map(|table| table.clone().with_name("result"))
            .ok_or_else(|| QueryExecutionError::new(format!("no table {sql}")))
    }

    fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    fn describe(&self, name: &str) -> Result<Vec<Column>, EngineError> {
        self.tables
            .get(name)
            .map(|table| table.columns().to_vec())
            .ok_or_else(|| EngineError::UnknownTable(name.to_string()))
    }
}

fn single(name: &str) -> Dataset {
    let table = Table::new(
        name,
        vec![Column::new("id", DataType::Int)],
        vec![vec![Value::Int(1)]],
    )
    .expect("table");
    Dataset::from_tables(vec![table]).expect("dataset")
}

#[test]
fn registration_failure_restores_previous_tables() {
    let mut session = Session::new(PickyEngine::default(), Limits::default());
    session.load_dataset(single("ok")).expect("first load");

    let mut failing = single("fine");
    failing.push(single("boom").into_iter().next().expect("table")).expect("push");
    let err = session.load_dataset(failing).expect_err("registration fails");
    assert!(matches!(err, SessionError::Engine(EngineError::Registration { .. })));

    assert_eq!(session.engine().table_names(), vec!["ok".to_string()]);
    assert!(session.dataset().and_then(|d| d.get("ok")).is_some());
    session.run_query("ok").expect("previous table still answers");
}
