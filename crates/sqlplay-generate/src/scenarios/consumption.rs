//! Customers, companies and their monthly consumption.
//!
//! `clientes` and `empresas` are dimension tables keyed by dense sequential
//! ids; `consumo` is the fact table whose `cliente_id` and `empresa_id` are
//! sampled from those ids.

use crate::blueprint::{ColumnSpec, TableSpec};
use crate::generators::faker::FakeKind;

pub const CUSTOMERS: &str = "clientes";
pub const COMPANIES: &str = "empresas";
pub const CONSUMPTION: &str = "consumo";

pub const CUSTOMER_KEY: &str = "cliente_id";
pub const COMPANY_KEY: &str = "empresa_id";

const TARIFFS: &[&str] = &["Básica", "Intermedia", "Premium"];
const QUARTERS: &[&str] = &["Q1", "Q2", "Q3", "Q4"];

/// Example query offered to learners for this scenario.
pub const SAMPLE_QUERY: &str = "SELECT c.nombre, c.apellido, e.empresa, e.tarifa, k.trimestre, k.facturacion_mes \
FROM consumo k \
JOIN clientes c ON k.cliente_id = c.cliente_id \
JOIN empresas e ON k.empresa_id = e.empresa_id \
ORDER BY k.facturacion_mes DESC LIMIT 10";

pub fn tables(row_count: usize, companies: usize) -> Vec<TableSpec> {
    vec![
        TableSpec {
            name: CUSTOMERS,
            rows: row_count,
            columns: vec![
                ColumnSpec::sequence(CUSTOMER_KEY),
                ColumnSpec::fake("nombre", FakeKind::FirstName),
                ColumnSpec::fake("apellido", FakeKind::LastName),
                ColumnSpec::fake("email", FakeKind::Email),
                ColumnSpec::fake("fecha_nacimiento", FakeKind::BirthDate),
                ColumnSpec::fake("ciudad", FakeKind::City),
            ],
        },
        TableSpec {
            name: COMPANIES,
            rows: companies,
            columns: vec![
                ColumnSpec::sequence(COMPANY_KEY),
                ColumnSpec::fake("empresa", FakeKind::Company),
                ColumnSpec::choice("tarifa", TARIFFS),
            ],
        },
        TableSpec {
            name: CONSUMPTION,
            rows: row_count,
            columns: vec![
                ColumnSpec::sequence("consumo_id"),
                ColumnSpec::foreign_key(CUSTOMER_KEY, CUSTOMERS, CUSTOMER_KEY),
                ColumnSpec::foreign_key(COMPANY_KEY, COMPANIES, COMPANY_KEY),
                ColumnSpec::choice("trimestre", QUARTERS),
                ColumnSpec::int_range("consumo_mes", 0, 99),
                ColumnSpec::int_range("facturacion_mes", 0, 99_999),
                ColumnSpec::int_range("coste_mes", 0, 999),
            ],
        },
    ]
}
