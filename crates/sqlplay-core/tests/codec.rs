use chrono::NaiveDate;

use sqlplay_core::{
    CSV_CONTENT_TYPE, Column, DataType, Download, Error, Table, Value, read_csv, to_csv_bytes,
};

fn sample_table() -> Table {
    Table::new(
        "clientes",
        vec![
            Column::new("cliente_id", DataType::Int),
            Column::new("nombre", DataType::Text),
            Column::new("saldo", DataType::Float),
            Column::new("fecha_nacimiento", DataType::Date),
            Column::new("activo", DataType::Bool),
        ],
        vec![
            vec![
                Value::Int(1),
                Value::from("Ana, \"la\" jefa"),
                Value::Float(10.25),
                Value::Date(NaiveDate::from_ymd_opt(1990, 5, 17).expect("date")),
                Value::Bool(true),
            ],
            vec![
                Value::Int(2),
                Value::from("Bruno"),
                Value::Null,
                Value::Date(NaiveDate::from_ymd_opt(2001, 12, 1).expect("date")),
                Value::Bool(false),
            ],
        ],
    )
    .expect("valid table")
}

#[test]
fn export_then_parse_reproduces_rows_and_columns() {
    let table = sample_table();
    let bytes = to_csv_bytes(&table).expect("encode");
    let parsed = read_csv("clientes", &bytes).expect("decode");

    assert_eq!(parsed.columns(), table.columns());
    assert_eq!(parsed.rows(), table.rows());
}

#[test]
fn export_writes_header_first() {
    let bytes = to_csv_bytes(&sample_table()).expect("encode");
    let text = String::from_utf8(bytes).expect("utf8");
    let first = text.lines().next().expect("header line");
    assert_eq!(first, "cliente_id,nombre,saldo,fecha_nacimiento,activo");
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn download_is_named_for_its_table() {
    let download = Download::for_table(&sample_table()).expect("download");
    assert_eq!(download.file_name, "clientes.csv");
    assert_eq!(download.content_type, CSV_CONTENT_TYPE);
    assert!(download.bytes.starts_with(b"cliente_id,"));
}

#[test]
fn upload_infers_column_types() {
    let table = read_csv("uploaded", b"id,name,score\n2,Bea,3.5\n1,Ana,\n").expect("decode");

    let types: Vec<DataType> = table.columns().iter().map(|col| col.data_type).collect();
    assert_eq!(types, vec![DataType::Int, DataType::Text, DataType::Float]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, "id"), Some(&Value::Int(2)));
    assert_eq!(table.value(1, "score"), Some(&Value::Null));
}

#[test]
fn ragged_rows_are_malformed() {
    let err = read_csv("uploaded", b"id,name\n1,Ana\n2\n").expect_err("ragged rows");
    match err {
        Error::MalformedInput(message) => assert!(!message.is_empty()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn invalid_utf8_is_malformed() {
    let err = read_csv("uploaded", b"id,name\n1,\xff\xfe\n").expect_err("bad encoding");
    assert!(matches!(err, Error::MalformedInput(_)));
}

#[test]
fn empty_input_is_malformed() {
    let err = read_csv("uploaded", b"").expect_err("no header");
    assert!(matches!(err, Error::MalformedInput(_)));
}

#[test]
fn duplicate_headers_are_malformed() {
    let err = read_csv("uploaded", b"id,id\n1,2\n").expect_err("duplicate header");
    assert!(matches!(err, Error::MalformedInput(_)));
}

#[test]
fn header_only_upload_yields_empty_table() {
    let table = read_csv("uploaded", b"id,name\n").expect("decode");
    assert!(table.is_empty());
    assert_eq!(table.columns().len(), 2);
}
