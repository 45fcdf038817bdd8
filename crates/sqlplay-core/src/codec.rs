//! Delimited-text codec for tables.
//!
//! Decoding infers one type per column from its non-empty cells; encoding
//! writes a header row followed by data rows in column order.

use std::io::{Read, Write};

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::schema::{Column, Row, Table};
use crate::types::{DATE_FORMAT, DataType, Value};

/// Content type announced for every CSV artifact.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// A downloadable CSV artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Download {
    /// Artifact named after the table itself (`<table>.csv`).
    pub fn for_table(table: &Table) -> Result<Self> {
        Self::named(table.name(), table)
    }

    pub fn named(stem: &str, table: &Table) -> Result<Self> {
        Ok(Self {
            file_name: format!("{stem}.csv"),
            content_type: CSV_CONTENT_TYPE,
            bytes: to_csv_bytes(table)?,
        })
    }
}

/// Parse CSV bytes with a header row into a table named `name`.
pub fn read_csv(name: &str, bytes: &[u8]) -> Result<Table> {
    read_csv_from(name, bytes)
}

pub fn read_csv_from<R: Read>(name: &str, reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|header| header.is_empty()) {
        return Err(Error::MalformedInput("missing header row".to_string()));
    }

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record.map_err(malformed)?);
    }

    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            let data_type = infer_type(records.iter().filter_map(|record| record.get(idx)));
            Column::new(header.clone(), data_type)
        })
        .collect();

    let mut rows: Vec<Row> = Vec::with_capacity(records.len());
    for record in &records {
        let row = record
            .iter()
            .zip(&columns)
            .map(|(cell, column)| parse_cell(cell, column.data_type))
            .collect::<Result<Row>>()?;
        rows.push(row);
    }

    Table::new(name, columns, rows).map_err(|err| match err {
        Error::InvalidTable(message) => Error::MalformedInput(message),
        other => other,
    })
}

/// Write a table as CSV with deterministic column ordering.
///
/// Returns the number of bytes written.
pub fn write_csv<W: Write>(writer: W, table: &Table) -> Result<u64> {
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);

    let header: Vec<&str> = table.column_names().collect();
    writer.write_record(&header)?;

    for row in table.rows() {
        let record: Vec<String> = row.iter().map(Value::to_csv).collect();
        writer.write_record(&record)?;
    }

    writer.flush().map_err(csv::Error::from)?;
    let counting = writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))?;
    Ok(counting.bytes_written())
}

pub fn to_csv_bytes(table: &Table) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, table)?;
    Ok(buffer)
}

fn malformed(err: csv::Error) -> Error {
    Error::MalformedInput(err.to_string())
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let mut int = true;
    let mut float = true;
    let mut date = true;
    let mut boolean = true;
    let mut seen = false;

    for cell in cells {
        let cell = cell.trim();
        if cell.is_empty() {
            continue;
        }
        seen = true;
        int = int && cell.parse::<i64>().is_ok();
        float = float && parse_float(cell).is_some();
        date = date && NaiveDate::parse_from_str(cell, DATE_FORMAT).is_ok();
        boolean = boolean && parse_bool(cell).is_some();
        if !(int || float || date || boolean) {
            return DataType::Text;
        }
    }

    match (seen, int, float, date, boolean) {
        (false, ..) => DataType::Text,
        (true, true, ..) => DataType::Int,
        (true, _, true, ..) => DataType::Float,
        (true, _, _, true, _) => DataType::Date,
        (true, _, _, _, true) => DataType::Bool,
        _ => DataType::Text,
    }
}

fn parse_cell(cell: &str, data_type: DataType) -> Result<Value> {
    if data_type != DataType::Text && cell.trim().is_empty() {
        return Ok(Value::Null);
    }
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    let trimmed = cell.trim();
    let value = match data_type {
        DataType::Int => trimmed.parse::<i64>().ok().map(Value::Int),
        DataType::Float => parse_float(trimmed).map(Value::Float),
        DataType::Date => NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
            .ok()
            .map(Value::Date),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool),
        DataType::Text => Some(Value::Text(cell.to_string())),
    };
    value.ok_or_else(|| {
        Error::MalformedInput(format!("cell '{cell}' is not a valid {data_type}"))
    })
}

fn parse_float(cell: &str) -> Option<f64> {
    if !cell.bytes().any(|byte| byte.is_ascii_digit()) {
        return None;
    }
    cell.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "true" | "TRUE" | "True" => Some(true),
        "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
