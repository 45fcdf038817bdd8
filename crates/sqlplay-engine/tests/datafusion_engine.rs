use chrono::NaiveDate;

use sqlplay_core::{Column, DataType, Dataset, Table, Value, read_csv};
use sqlplay_engine::{DataFusionEngine, EngineError, QueryEngine, RESULT_TABLE, register_all};

fn numbers(name: &str, rows: i64) -> Table {
    Table::new(
        name,
        vec![
            Column::new("id", DataType::Int),
            Column::new("label", DataType::Text),
        ],
        (1..=rows)
            .map(|id| vec![Value::Int(id), Value::Text(format!("row {id}"))])
            .collect(),
    )
    .expect("table")
}

fn engine() -> DataFusionEngine {
    DataFusionEngine::new().expect("engine")
}

#[test]
fn count_star_sees_every_row() {
    let mut engine = engine();
    engine.register(&numbers("t", 10)).expect("register");

    let result = engine.execute("SELECT COUNT(*) FROM t").expect("query");
    assert_eq!(result.name(), RESULT_TABLE);
    assert_eq!(result.row_count(), 1);
    assert_eq!(result.rows()[0][0], Value::Int(10));
}

#[test]
fn uploaded_table_can_be_ordered() {
    let table = read_csv("up", b"a,b\n1,x\n2,y\n").expect("csv");
    let mut engine = engine();
    engine.register(&table).expect("register");

    let result = engine
        .execute("SELECT b FROM up ORDER BY a DESC")
        .expect("query");
    assert_eq!(result.columns(), &[Column::new("b", DataType::Text)]);
    assert_eq!(
        result.rows(),
        &[vec![Value::from("y")], vec![Value::from("x")]]
    );
}

#[test]
fn syntax_errors_are_reported_not_raised() {
    let mut engine = engine();
    engine.register(&numbers("t", 3)).expect("register");

    let err = engine.execute("SELEKT * FROM t").expect_err("bad syntax");
    assert!(!err.message.is_empty());

    let err = engine
        .execute("SELECT missing FROM t")
        .expect_err("unknown column");
    assert!(err.message.contains("missing"), "{}", err.message);

    // The engine stays usable afterwards.
    let result = engine.execute("SELECT id FROM t").expect("query");
    assert_eq!(result.row_count(), 3);
}

#[test]
fn registering_twice_replaces_the_table() {
    let mut engine = engine();
    engine.register(&numbers("t", 10)).expect("first");
    engine.register(&numbers("t", 4)).expect("second");

    let result = engine.execute("SELECT COUNT(*) FROM t").expect("query");
    assert_eq!(result.rows()[0][0], Value::Int(4));
    assert_eq!(engine.table_names(), vec!["t".to_string()]);
}

#[test]
fn deregister_reports_presence() {
    let mut engine = engine();
    engine.register(&numbers("t", 2)).expect("register");

    assert!(engine.deregister("t").expect("deregister"));
    assert!(!engine.deregister("t").expect("deregister again"));
    assert!(engine.execute("SELECT * FROM t").is_err());
}

#[test]
fn unordered_scans_keep_insertion_order() {
    let mut engine = engine();
    engine.register(&numbers("t", 50)).expect("register");

    let result = engine.execute("SELECT id FROM t").expect("query");
    let ids: Vec<i64> = result
        .rows()
        .iter()
        .filter_map(|row| row[0].as_i64())
        .collect();
    assert_eq!(ids, (1..=50).collect::<Vec<_>>());
}

#[test]
fn joins_across_registered_dataset() {
    let customers = Table::new(
        "clientes",
        vec![
            Column::new("cliente_id", DataType::Int),
            Column::new("nombre", DataType::Text),
        ],
        vec![
            vec![Value::Int(1), Value::from("Ana")],
            vec![Value::Int(2), Value::from("Luis")],
        ],
    )
    .expect("clientes");
    let usage = Table::new(
        "consumo",
        vec![
            Column::new("cliente_id", DataType::Int),
            Column::new("coste_mes", DataType::Int),
        ],
        vec![
            vec![Value::Int(2), Value::Int(30)],
            vec![Value::Int(1), Value::Int(10)],
            vec![Value::Int(2), Value::Int(5)],
        ],
    )
    .expect("consumo");
    let dataset = Dataset::from_tables(vec![customers, usage]).expect("dataset");

    let mut engine = engine();
    register_all(&mut engine, &dataset).expect("register all");
    assert_eq!(
        engine.table_names(),
        vec!["clientes".to_string(), "consumo".to_string()]
    );

    let result = engine
        .execute(
            "SELECT c.nombre, SUM(u.coste_mes) AS total \
             FROM consumo u JOIN clientes c ON u.cliente_id = c.cliente_id \
             GROUP BY c.nombre ORDER BY total DESC",
        )
        .expect("join");
    assert_eq!(
        result.rows(),
        &[
            vec![Value::from("Luis"), Value::Int(35)],
            vec![Value::from("Ana"), Value::Int(10)],
        ]
    );
}

#[test]
fn dates_nulls_and_bools_round_trip_through_queries() {
    let date = NaiveDate::from_ymd_opt(1980, 6, 1).expect("date");
    let table = Table::new(
        "p",
        vec![
            Column::new("nacido", DataType::Date),
            Column::new("activo", DataType::Bool),
            Column::new("nota", DataType::Float),
        ],
        vec![
            vec![Value::Date(date), Value::Bool(true), Value::Float(7.5)],
            vec![Value::Null, Value::Bool(false), Value::Null],
        ],
    )
    .expect("table");

    let mut engine = engine();
    engine.register(&table).expect("register");
    let result = engine.execute("SELECT * FROM p").expect("query");

    assert_eq!(result.columns(), table.columns());
    assert_eq!(result.rows(), table.rows());
}

#[test]
fn empty_results_keep_their_columns() {
    let mut engine = engine();
    engine.register(&numbers("t", 3)).expect("register");

    let result = engine
        .execute("SELECT id, label FROM t WHERE id > 100")
        .expect("query");
    assert!(result.is_empty());
    let names: Vec<&str> = result.column_names().collect();
    assert_eq!(names, vec!["id", "label"]);
}

#[test]
fn describe_lists_mapped_columns() {
    let mut engine = engine();
    engine.register(&numbers("t", 1)).expect("register");

    let columns = engine.describe("t").expect("describe");
    assert_eq!(
        columns,
        vec![
            Column::new("id", DataType::Int),
            Column::new("label", DataType::Text),
        ]
    );

    let err = engine.describe("nope").expect_err("unknown table");
    assert!(matches!(err, EngineError::UnknownTable(name) if name == "nope"));
}

#[test]
fn select_star_over_a_join_keeps_both_key_columns() {
    let customers = Table::new(
        "clientes",
        vec![
            Column::new("cliente_id", DataType::Int),
            Column::new("nombre", DataType::Text),
        ],
        vec![vec![Value::Int(1), Value::from("Ana")]],
    )
    .expect("clientes");
    let usage = Table::new(
        "consumo",
        vec![
            Column::new("cliente_id", DataType::Int),
            Column::new("coste_mes", DataType::Int),
        ],
        vec![vec![Value::Int(1), Value::Int(10)]],
    )
    .expect("consumo");
    let dataset = Dataset::from_tables(vec![customers, usage]).expect("dataset");

    let mut engine = engine();
    register_all(&mut engine, &dataset).expect("register all");

    let result = engine
        .execute("SELECT * FROM consumo JOIN clientes ON consumo.cliente_id = clientes.cliente_id")
        .expect("join query");
    let names: Vec<&str> = result.column_names().collect();
    assert_eq!(
        names,
        vec!["consumo.cliente_id", "coste_mes", "clientes.cliente_id", "nombre"]
    );
    assert_eq!(
        result.rows(),
        &[vec![Value::Int(1), Value::Int(10), Value::Int(1), Value::from("Ana")]]
    );
}
