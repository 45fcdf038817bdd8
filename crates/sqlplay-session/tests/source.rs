use sqlplay_core::{DataType, Value};
use sqlplay_generate::{PersonColumn, Scenario};
use sqlplay_session::{DataSource, GenerationParams, Limits, ResolveError, resolve};

#[test]
fn seed_outside_bounds_is_rejected() {
    let limits = Limits::default();
    for seed in [0, 10_001] {
        let params = GenerationParams {
            seed,
            ..GenerationParams::default()
        };
        let err = resolve(&DataSource::Generate(params), &limits).expect_err("bad seed");
        assert!(matches!(err, ResolveError::Validation(_)), "{err}");
    }
}

#[test]
fn row_bounds_depend_on_scenario() {
    let limits = Limits::default();
    let too_few = GenerationParams {
        row_count: 9,
        ..GenerationParams::default()
    };
    assert!(too_few.validate(&limits).is_err());

    let consumption = GenerationParams {
        row_count: 5_000,
        ..GenerationParams::default()
    };
    assert!(consumption.validate(&limits).is_err());

    let people = GenerationParams {
        row_count: 5_000,
        scenario: Scenario::People,
        ..GenerationParams::default()
    };
    assert!(people.validate(&limits).is_ok());

    let edges = GenerationParams {
        seed: 10_000,
        row_count: 1_000,
        ..GenerationParams::default()
    };
    assert!(edges.validate(&limits).is_ok());
}

#[test]
fn zero_companies_is_a_validation_error() {
    let params = GenerationParams {
        companies: Some(0),
        ..GenerationParams::default()
    };
    let err = params.validate(&Limits::default()).expect_err("zero companies");
    assert!(matches!(err, ResolveError::Validation(_)));
}

#[test]
fn companies_cannot_exceed_row_count() {
    let too_many = GenerationParams {
        row_count: 50,
        companies: Some(4_000_000_000),
        ..GenerationParams::default()
    };
    let err = too_many.validate(&Limits::default()).expect_err("unbounded companies");
    assert!(matches!(err, ResolveError::Validation(_)));
    assert!(resolve(&DataSource::Generate(too_many), &Limits::default()).is_err());

    let edge = GenerationParams {
        row_count: 50,
        companies: Some(50),
        ..GenerationParams::default()
    };
    assert!(edge.validate(&Limits::default()).is_ok());
}

#[test]
fn generated_consumption_has_three_tables() {
    let dataset = resolve(
        &DataSource::Generate(GenerationParams::default()),
        &Limits::default(),
    )
    .expect("resolve");
    let names: Vec<&str> = dataset.table_names().collect();
    assert_eq!(names, vec!["clientes", "empresas", "consumo"]);
}

#[test]
fn single_table_output_can_be_renamed() {
    let params = GenerationParams {
        scenario: Scenario::People,
        row_count: 10,
        columns: [PersonColumn::Name].into_iter().collect(),
        table_name: Some("T".to_string()),
        ..GenerationParams::default()
    };
    let dataset = resolve(&DataSource::Generate(params), &Limits::default()).expect("resolve");
    let table = dataset.get("t").expect("renamed table");
    assert_eq!(table.row_count(), 10);
}

#[test]
fn renaming_multi_table_output_is_rejected() {
    let params = GenerationParams {
        table_name: Some("t".to_string()),
        ..GenerationParams::default()
    };
    let err = resolve(&DataSource::Generate(params), &Limits::default())
        .expect_err("multi-table rename");
    assert!(matches!(err, ResolveError::Validation(_)));
}

#[test]
fn upload_uses_normalized_name_and_inferred_types() {
    let source = DataSource::upload("Mis Datos", b"id,name,score\n1,Ana,9.5\n2,Luis,\n".to_vec());
    let dataset = resolve(&source, &Limits::default()).expect("resolve");

    let table = dataset.get("mis_datos").expect("normalized name");
    let types: Vec<DataType> = table.columns().iter().map(|c| c.data_type).collect();
    assert_eq!(types, vec![DataType::Int, DataType::Text, DataType::Float]);
    assert_eq!(table.value(1, "score"), Some(&Value::Null));
}

#[test]
fn ragged_upload_is_malformed() {
    let source = DataSource::upload("x", b"a,b\n1,2\n3\n".to_vec());
    let err = resolve(&source, &Limits::default()).expect_err("ragged");
    assert!(matches!(err, ResolveError::MalformedInput(_)), "{err}");
}

#[test]
fn blank_upload_name_falls_back_to_default() {
    let source = DataSource::upload("", b"id\n1\n".to_vec());
    let dataset = resolve(&source, &Limits::default()).expect("resolve");
    assert!(dataset.get("uploaded").is_some());
}
