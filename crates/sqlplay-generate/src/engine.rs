use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use sqlplay_core::{Column, Dataset, Row, Table};

use crate::blueprint::TableSpec;
use crate::errors::GenerationError;
use crate::foreign::KeyPool;
use crate::generators::{RowContext, generate_value};
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::planner::plan_tables;
use crate::scenarios::blueprints;

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: Dataset,
    pub report: GenerationReport,
}

/// Entry point for generating deterministic datasets.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate the scenario's tables for `seed` and `row_count`.
    ///
    /// Identical inputs always produce identical tables.
    pub fn generate(&self, seed: u64, row_count: usize) -> Result<Dataset, GenerationError> {
        self.run(seed, row_count).map(|result| result.dataset)
    }

    pub fn run(&self, seed: u64, row_count: usize) -> Result<GenerationResult, GenerationError> {
        if row_count == 0 {
            return Err(GenerationError::InvalidOptions(
                "row count must be positive".to_string(),
            ));
        }

        let start = Instant::now();
        let tasks = plan_tables(blueprints(&self.options, row_count)?)?;

        info!(
            seed,
            scenario = %self.options.scenario,
            tables = tasks.len(),
            rows = row_count,
            "generation started"
        );

        let mut pool = KeyPool::new();
        let mut dataset = Dataset::new();
        let mut reports = Vec::with_capacity(tasks.len());

        for task in &tasks {
            let table_start = Instant::now();
            let table = generate_table(task, hash_seed(seed, task.name), &pool)?;
            pool.ingest_table(&table);

            let duration_ms = table_start.elapsed().as_millis() as u64;
            info!(
                table = %task.name,
                rows_generated = table.row_count(),
                duration_ms,
                "table generated"
            );
            reports.push(TableReport {
                table: task.name.to_string(),
                rows_generated: table.row_count() as u64,
                duration_ms,
            });
            dataset.push(table)?;
        }

        let report = GenerationReport {
            seed,
            scenario: self.options.scenario,
            tables: reports,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            seed,
            tables = report.tables.len(),
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { dataset, report })
    }
}

fn generate_table(
    task: &TableSpec,
    table_seed: u64,
    pool: &KeyPool,
) -> Result<Table, GenerationError> {
    let mut rng = ChaCha8Rng::seed_from_u64(table_seed);
    let columns: Vec<Column> = task
        .columns
        .iter()
        .map(|spec| Column::new(spec.name, spec.data_type))
        .collect();

    let mut rows: Vec<Row> = Vec::with_capacity(task.rows);
    for row_index in 0..task.rows {
        let ctx = RowContext {
            row_index,
            foreign: pool,
        };
        let row = task
            .columns
            .iter()
            .map(|spec| generate_value(spec, &ctx, &mut rng))
            .collect::<Result<Row, _>>()?;
        rows.push(row);
    }

    Ok(Table::new(task.name, columns, rows)?)
}

/// Derive an independent seed per table so tables never share a stream.
fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}
