//! Conversion between the table model and Arrow record batches.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use datafusion::arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
};
use datafusion::arrow::datatypes::{
    DataType as ArrowType, Date32Type, Field, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type,
    Int64Type, Schema, SchemaRef, UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::{RecordBatch, RecordBatchOptions};
use datafusion::arrow::util::display::array_value_to_string;

use sqlplay_core::{Column, DataType, Row, Table, Value};

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn date_to_days(date: NaiveDate) -> i32 {
    (date - epoch()).num_days() as i32
}

fn days_to_date(days: i32) -> Option<NaiveDate> {
    let offset = Days::new(days.unsigned_abs() as u64);
    if days >= 0 {
        epoch().checked_add_days(offset)
    } else {
        epoch().checked_sub_days(offset)
    }
}

pub fn arrow_type(data_type: DataType) -> ArrowType {
    match data_type {
        DataType::Int => ArrowType::Int64,
        DataType::Float => ArrowType::Float64,
        DataType::Text => ArrowType::Utf8,
        DataType::Date => ArrowType::Date32,
        DataType::Bool => ArrowType::Boolean,
    }
}

/// Logical type an Arrow column is presented as.
pub fn logical_type(arrow_type: &ArrowType) -> DataType {
    match arrow_type {
        ArrowType::Int8
        | ArrowType::Int16
        | ArrowType::Int32
        | ArrowType::Int64
        | ArrowType::UInt8
        | ArrowType::UInt16
        | ArrowType::UInt32
        | ArrowType::UInt64 => DataType::Int,
        ArrowType::Float16
        | ArrowType::Float32
        | ArrowType::Float64
        | ArrowType::Decimal128(_, _)
        | ArrowType::Decimal256(_, _) => DataType::Float,
        ArrowType::Boolean => DataType::Bool,
        ArrowType::Date32 => DataType::Date,
        _ => DataType::Text,
    }
}

pub fn table_schema(table: &Table) -> SchemaRef {
    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|column| Field::new(&column.name, arrow_type(column.data_type), true))
        .collect();
    Arc::new(Schema::new(fields))
}

/// Build a single record batch holding every row of `table`.
pub fn table_to_batch(table: &Table) -> Result<RecordBatch, ArrowError> {
    let schema = table_schema(table);
    let rows = table.rows();
    let arrays: Vec<ArrayRef> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| column_array(rows, idx, column.data_type))
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
    RecordBatch::try_new_with_options(schema, arrays, &options)
}

fn column_array(rows: &[Row], idx: usize, data_type: DataType) -> ArrayRef {
    let cells = rows.iter().map(|row| &row[idx]);
    match data_type {
        DataType::Int => Arc::new(cells.map(Value::as_i64).collect::<Int64Array>()),
        DataType::Float => Arc::new(cells.map(Value::as_f64).collect::<Float64Array>()),
        DataType::Text => Arc::new(cells.map(Value::as_str).collect::<StringArray>()),
        DataType::Date => Arc::new(
            cells
                .map(|value| value.as_date().map(date_to_days))
                .collect::<Date32Array>(),
        ),
        DataType::Bool => Arc::new(cells.map(Value::as_bool).collect::<BooleanArray>()),
    }
}

/// Result column names with collisions resolved.
///
/// A name shared by several columns is prefixed with its table qualifier
/// (`clientes.cliente_id`). Anything still colliding gets a `_2`, `_3`, ...
/// suffix.
pub fn unique_column_names(fields: &[(Option<String>, String)]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for (_, name) in fields {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    let mut seen: HashSet<String> = HashSet::new();
    fields
        .iter()
        .map(|(qualifier, name)| {
            let base = match qualifier {
                Some(qualifier) if counts[name.as_str()] > 1 => format!("{qualifier}.{name}"),
                _ => name.clone(),
            };
            let mut candidate = base.clone();
            let mut suffix = 2;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            candidate
        })
        .collect()
}

/// Materialize query output into a table named `name`.
///
/// `schema` is used for the column layout so that empty results keep their
/// columns.
pub fn batches_to_table(
    name: &str,
    schema: &Schema,
    batches: &[RecordBatch],
) -> Result<Table, ArrowError> {
    let width = schema.fields().len();
    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|field| Column::new(field.name().clone(), logical_type(field.data_type())))
        .collect();

    let total: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut rows: Vec<Row> = (0..total).map(|_| Vec::with_capacity(width)).collect();

    for (col_idx, column) in columns.iter_mut().enumerate() {
        let mut offset = 0;
        let mut mixed = false;
        for batch in batches {
            let array = batch.column(col_idx);
            for row_idx in 0..batch.num_rows() {
                let value = cell(array, row_idx)?;
                mixed |= !value.fits(column.data_type);
                rows[offset + row_idx].push(value);
            }
            offset += batch.num_rows();
        }
        // Out-of-range cells fall back to text, so the whole column does too.
        if mixed {
            column.data_type = DataType::Text;
            for row in rows.iter_mut() {
                if !row[col_idx].is_null() {
                    row[col_idx] = Value::Text(row[col_idx].to_csv());
                }
            }
        }
    }

    Table::new(name, columns, rows).map_err(|err| ArrowError::ExternalError(Box::new(err)))
}

fn cell(array: &ArrayRef, row: usize) -> Result<Value, ArrowError> {
    if array.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match array.data_type() {
        ArrowType::Int8 => Value::Int(array.as_primitive::<Int8Type>().value(row) as i64),
        ArrowType::Int16 => Value::Int(array.as_primitive::<Int16Type>().value(row) as i64),
        ArrowType::Int32 => Value::Int(array.as_primitive::<Int32Type>().value(row) as i64),
        ArrowType::Int64 => Value::Int(array.as_primitive::<Int64Type>().value(row)),
        ArrowType::UInt8 => Value::Int(array.as_primitive::<UInt8Type>().value(row) as i64),
        ArrowType::UInt16 => Value::Int(array.as_primitive::<UInt16Type>().value(row) as i64),
        ArrowType::UInt32 => Value::Int(array.as_primitive::<UInt32Type>().value(row) as i64),
        ArrowType::UInt64 => {
            let value = array.as_primitive::<UInt64Type>().value(row);
            i64::try_from(value)
                .map(Value::Int)
                .unwrap_or_else(|_| Value::Text(value.to_string()))
        }
        ArrowType::Float32 => Value::Float(array.as_primitive::<Float32Type>().value(row) as f64),
        ArrowType::Float64 => Value::Float(array.as_primitive::<Float64Type>().value(row)),
        ArrowType::Decimal128(_, _) | ArrowType::Decimal256(_, _) | ArrowType::Float16 => {
            let text = array_value_to_string(array, row)?;
            text.parse::<f64>()
                .map(Value::Float)
                .map_err(|err| ArrowError::ParseError(format!("{text}: {err}")))?
        }
        ArrowType::Utf8 => Value::Text(array.as_string::<i32>().value(row).to_string()),
        ArrowType::LargeUtf8 => Value::Text(array.as_string::<i64>().value(row).to_string()),
        ArrowType::Utf8View => Value::Text(array.as_string_view().value(row).to_string()),
        ArrowType::Boolean => Value::Bool(array.as_boolean().value(row)),
        ArrowType::Date32 => {
            let days = array.as_primitive::<Date32Type>().value(row);
            match days_to_date(days) {
                Some(date) => Value::Date(date),
                None => Value::Text(array_value_to_string(array, row)?),
            }
        }
        _ => Value::Text(array_value_to_string(array, row)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colliding_names_take_their_qualifier() {
        let fields = vec![
            (Some("consumo".to_string()), "cliente_id".to_string()),
            (Some("consumo".to_string()), "coste_mes".to_string()),
            (Some("clientes".to_string()), "cliente_id".to_string()),
            (None, "x".to_string()),
            (None, "x".to_string()),
        ];
        assert_eq!(
            unique_column_names(&fields),
            vec!["consumo.cliente_id", "coste_mes", "clientes.cliente_id", "x", "x_2"]
        );
    }

    #[test]
    fn dates_survive_day_offsets() {
        let date = NaiveDate::from_ymd_opt(1955, 3, 14).expect("date");
        assert_eq!(days_to_date(date_to_days(date)), Some(date));
        assert_eq!(date_to_days(epoch()), 0);
    }

    #[test]
    fn null_cells_become_arrow_nulls() {
        let table = Table::new(
            "t",
            vec![
                Column::new("a", DataType::Int),
                Column::new("b", DataType::Text),
            ],
            vec![
                vec![Value::Int(1), Value::Null],
                vec![Value::Null, Value::from("x")],
            ],
        )
        .expect("table");
        let batch = table_to_batch(&table).expect("batch");
        assert_eq!(batch.num_rows(), 2);
        assert!(batch.column(0).is_null(1));
        assert!(batch.column(1).is_null(0));

        let back = batches_to_table("t", &batch.schema(), &[batch.clone()]).expect("table");
        assert_eq!(back, table);
    }
}
