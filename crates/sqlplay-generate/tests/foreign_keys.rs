use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sqlplay_core::{Column, DataType, Table, Value};
use sqlplay_generate::GenerationError;
use sqlplay_generate::blueprint::{ColumnSpec, TableSpec};
use sqlplay_generate::foreign::{ForeignContext, KeyPool};
use sqlplay_generate::planner::plan_tables;
use sqlplay_generate::{GenerateOptions, GenerationEngine};

fn key_set(table: &Table, column: &str) -> BTreeSet<i64> {
    table
        .column_values(column)
        .expect("column exists")
        .into_iter()
        .map(|value| value.as_i64().expect("integer key"))
        .collect()
}

#[test]
fn consumption_keys_exist_in_dimensions() {
    let options = GenerateOptions {
        companies: Some(3),
        ..GenerateOptions::default()
    };
    let dataset = GenerationEngine::new(options)
        .generate(1234, 10)
        .expect("generate");

    let clientes = dataset.get("clientes").expect("clientes");
    let empresas = dataset.get("empresas").expect("empresas");
    let consumo = dataset.get("consumo").expect("consumo");

    let customer_ids = key_set(clientes, "cliente_id");
    let company_ids = key_set(empresas, "empresa_id");
    assert_eq!(customer_ids, (1..=10).collect());
    assert_eq!(company_ids, (1..=3).collect());

    for id in key_set(consumo, "cliente_id") {
        assert!(customer_ids.contains(&id), "dangling cliente_id {id}");
    }
    for id in key_set(consumo, "empresa_id") {
        assert!((1..=3).contains(&id), "empresa_id {id} outside [1,3]");
    }
}

#[test]
fn dimension_tables_come_before_facts() {
    let dataset = GenerationEngine::new(GenerateOptions::default())
        .generate(5, 30)
        .expect("generate");
    let names: Vec<&str> = dataset.table_names().collect();
    assert_eq!(names, vec!["clientes", "empresas", "consumo"]);
}

#[test]
fn planner_moves_parents_first() {
    let fact = TableSpec {
        name: "hechos",
        rows: 5,
        columns: vec![ColumnSpec::foreign_key("dim_id", "dim", "dim_id")],
    };
    let dim = TableSpec {
        name: "dim",
        rows: 2,
        columns: vec![ColumnSpec::sequence("dim_id")],
    };

    let planned = plan_tables(vec![fact, dim]).expect("plan");
    let order: Vec<&str> = planned.iter().map(|spec| spec.name).collect();
    assert_eq!(order, vec!["dim", "hechos"]);
}

#[test]
fn planner_rejects_unknown_parent() {
    let fact = TableSpec {
        name: "hechos",
        rows: 5,
        columns: vec![ColumnSpec::foreign_key("dim_id", "dim", "dim_id")],
    };
    let err = plan_tables(vec![fact]).expect_err("unknown parent");
    assert!(matches!(err, GenerationError::InvalidBlueprint(_)));
}

#[test]
fn planner_rejects_cycles() {
    let a = TableSpec {
        name: "a",
        rows: 1,
        columns: vec![
            ColumnSpec::sequence("a_id"),
            ColumnSpec::foreign_key("b_id", "b", "b_id"),
        ],
    };
    let b = TableSpec {
        name: "b",
        rows: 1,
        columns: vec![
            ColumnSpec::sequence("b_id"),
            ColumnSpec::foreign_key("a_id", "a", "a_id"),
        ],
    };
    let err = plan_tables(vec![a, b]).expect_err("cycle");
    assert!(err.to_string().contains("cyclic"));
}

#[test]
fn key_pool_refuses_tables_not_yet_generated() {
    let pool = KeyPool::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let err = pool
        .pick_fk("clientes", "cliente_id", &mut rng)
        .expect_err("no parent rows yet");
    assert!(matches!(err, GenerationError::MissingParent { .. }));
}

#[test]
fn key_pool_samples_only_ingested_values() {
    let parent = Table::new(
        "clientes",
        vec![Column::new("cliente_id", DataType::Int)],
        vec![vec![Value::Int(4)], vec![Value::Int(9)], vec![Value::Null]],
    )
    .expect("table");
    let mut pool = KeyPool::new();
    pool.ingest_table(&parent);

    let mut rng = ChaCha8Rng::seed_from_u64(3);
    for _ in 0..50 {
        let value = pool
            .pick_fk("clientes", "cliente_id", &mut rng)
            .expect("pick");
        assert!(matches!(value, Value::Int(4) | Value::Int(9)));
    }
}
