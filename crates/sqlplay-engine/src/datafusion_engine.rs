use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Instant;

use datafusion::arrow::datatypes::{Field, Schema, SchemaRef};
use datafusion::arrow::record_batch::RecordBatch;
use datafusion::catalog::SchemaProvider;
use datafusion::common::{DFSchema, TableReference};
use datafusion::datasource::MemTable;
use datafusion::error::DataFusionError;
use datafusion::prelude::{SessionConfig, SessionContext};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use sqlplay_core::{Column, Table};

use crate::convert::{batches_to_table, logical_type, table_to_batch, unique_column_names};
use crate::engine::{QueryEngine, RESULT_TABLE};
use crate::error::{EngineError, QueryExecutionError};

/// DataFusion-backed [`QueryEngine`].
///
/// Owns a current-thread Tokio runtime and blocks on every DataFusion future,
/// so it must not be driven from inside another Tokio runtime.
pub struct DataFusionEngine {
    ctx: SessionContext,
    runtime: Runtime,
}

impl DataFusionEngine {
    pub fn new() -> Result<Self, EngineError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| EngineError::Runtime(err.to_string()))?;
        // A single partition keeps unordered scans in insertion order.
        let config = SessionConfig::new().with_target_partitions(1);
        Ok(Self {
            ctx: SessionContext::new_with_config(config),
            runtime,
        })
    }

    fn schema_provider(&self) -> Option<Arc<dyn SchemaProvider>> {
        let state = self.ctx.state();
        let options = state.config_options();
        self.ctx
            .catalog(&options.catalog.default_catalog)?
            .schema(&options.catalog.default_schema)
    }

    fn run_sql(&self, sql: &str) -> Result<(SchemaRef, Vec<RecordBatch>), DataFusionError> {
        self.runtime.block_on(async {
            let frame = self.ctx.sql(sql).await?;
            let schema = result_schema(frame.schema());
            let batches = frame.collect().await?;
            Ok((schema, batches))
        })
    }
}

/// Arrow schema of a query result with unique column names, so that
/// `SELECT *` over a join keeps both sides of a shared column.
fn result_schema(schema: &DFSchema) -> SchemaRef {
    let qualified: Vec<(Option<String>, String)> = schema
        .iter()
        .map(|(qualifier, field)| {
            (
                qualifier.map(|table| table.table().to_string()),
                field.name().clone(),
            )
        })
        .collect();
    let names = unique_column_names(&qualified);
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .zip(names)
        .map(|(field, name)| field.as_ref().clone().with_name(name))
        .collect();
    Arc::new(Schema::new(fields))
}

impl std::fmt::Debug for DataFusionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFusionEngine")
            .field("tables", &self.table_names())
            .finish()
    }
}

impl QueryEngine for DataFusionEngine {
    fn register(&mut self, table: &Table) -> Result<(), EngineError> {
        let registration = |message: String| EngineError::Registration {
            table: table.name().to_string(),
            message,
        };

        let batch = table_to_batch(table).map_err(|err| registration(err.to_string()))?;
        let provider = MemTable::try_new(batch.schema(), vec![vec![batch]])
            .map_err(|err| registration(err.to_string()))?;

        let reference = TableReference::bare(table.name());
        self.ctx
            .deregister_table(reference.clone())
            .map_err(|err| registration(err.to_string()))?;
        self.ctx
            .register_table(reference, Arc::new(provider))
            .map_err(|err| registration(err.to_string()))?;

        info!(
            table = table.name(),
            rows = table.row_count(),
            columns = table.columns().len(),
            "table registered"
        );
        Ok(())
    }

    fn deregister(&mut self, name: &str) -> Result<bool, EngineError> {
        let removed = self
            .ctx
            .deregister_table(TableReference::bare(name))
            .map_err(|err| EngineError::Registration {
                table: name.to_string(),
                message: err.to_string(),
            })?;
        debug!(table = name, removed = removed.is_some(), "table deregistered");
        Ok(removed.is_some())
    }

    fn execute(&mut self, sql: &str) -> Result<Table, QueryExecutionError> {
        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| self.run_sql(sql)));

        let (schema, batches) = match outcome {
            Ok(Ok(parts)) => parts,
            Ok(Err(err)) => {
                let error = QueryExecutionError::new(err.to_string());
                warn!(error = %error, "query failed");
                return Err(error);
            }
            Err(_) => {
                let error = QueryExecutionError::new("query engine panicked while executing");
                warn!(error = %error, "query failed");
                return Err(error);
            }
        };

        let table = batches_to_table(RESULT_TABLE, &schema, &batches)
            .map_err(|err| QueryExecutionError::new(err.to_string()))?;
        info!(
            rows = table.row_count(),
            columns = table.columns().len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "query executed"
        );
        Ok(table)
    }

    fn table_names(&self) -> Vec<String> {
        let mut names = self
            .schema_provider()
            .map(|schema| schema.table_names())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn describe(&self, name: &str) -> Result<Vec<Column>, EngineError> {
        let schema = self
            .schema_provider()
            .ok_or_else(|| EngineError::UnknownTable(name.to_string()))?;
        let provider = self
            .runtime
            .block_on(schema.table(name))
            .map_err(|err| EngineError::Runtime(err.to_string()))?
            .ok_or_else(|| EngineError::UnknownTable(name.to_string()))?;

        Ok(provider
            .schema()
            .fields()
            .iter()
            .map(|field| Column::new(field.name().clone(), logical_type(field.data_type())))
            .collect())
    }
}
