use tracing::{info, warn};

use sqlplay_core::{Column, Dataset, Download};
use sqlplay_engine::{DataFusionEngine, QueryEngine, register_all};

use crate::error::{HistoryError, ResolveError, SessionError};
use crate::history::{QueryHistory, QueryRecord, RecordId};
use crate::source::{DataSource, Limits, resolve};

/// One user's playground: the active dataset, the engine it is registered
/// with and the query history.
#[derive(Debug)]
pub struct Session<E: QueryEngine = DataFusionEngine> {
    engine: E,
    limits: Limits,
    dataset: Option<Dataset>,
    history: QueryHistory,
}

impl Session<DataFusionEngine> {
    /// Session backed by a fresh DataFusion engine.
    pub fn with_datafusion(limits: Limits) -> Result<Self, SessionError> {
        Ok(Self::new(DataFusionEngine::new()?, limits))
    }
}

impl<E: QueryEngine> Session<E> {
    pub fn new(engine: E, limits: Limits) -> Self {
        Self {
            engine,
            limits,
            dataset: None,
            history: QueryHistory::new(),
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn history(&self) -> &QueryHistory {
        &self.history
    }

    /// Resolve `source` and make it the active dataset.
    ///
    /// Every table registered with the engine is replaced. On any error the
    /// previous dataset stays active and registered.
    pub fn load(&mut self, source: &DataSource) -> Result<&Dataset, SessionError> {
        let dataset = resolve(source, &self.limits)?;
        self.load_dataset(dataset)
    }

    /// Replace the active dataset with an already resolved one.
    pub fn load_dataset(&mut self, dataset: Dataset) -> Result<&Dataset, SessionError> {
        if dataset.is_empty() {
            return Err(ResolveError::Validation("dataset has no tables".to_string()).into());
        }

        // Tables created through SQL go too, not just the previous dataset's.
        for name in self.engine.table_names() {
            self.engine.deregister(&name)?;
        }

        if let Err(err) = register_all(&mut self.engine, &dataset) {
            warn!(error = %err, "dataset registration failed, restoring previous tables");
            self.restore(&dataset);
            return Err(err.into());
        }

        info!(
            tables = dataset.len(),
            names = ?dataset.table_names().collect::<Vec<_>>(),
            "dataset loaded"
        );
        Ok(&*self.dataset.insert(dataset))
    }

    fn restore(&mut self, failed: &Dataset) {
        for name in failed.table_names() {
            if let Err(err) = self.engine.deregister(name) {
                warn!(table = name, error = %err, "could not drop partially registered table");
            }
        }
        if let Some(previous) = &self.dataset {
            if let Err(err) = register_all(&mut self.engine, previous) {
                warn!(error = %err, "could not re-register previous dataset");
            }
        }
    }

    /// Execute `sql` against the active dataset and record it on success.
    ///
    /// Failed queries leave the history untouched.
    pub fn run_query(&mut self, sql: &str) -> Result<&QueryRecord, SessionError> {
        if self.dataset.is_none() {
            return Err(SessionError::NoActiveDataset);
        }
        if sql.trim().is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        let result = self.engine.execute(sql)?;
        let id = self.history.append(sql, result);
        info!(record = %id, history = self.history.len(), "query recorded");
        self.history
            .get(id)
            .ok_or(SessionError::History(HistoryError::UnknownRecord(id)))
    }

    pub fn delete_record(&mut self, id: RecordId) -> Result<QueryRecord, SessionError> {
        let record = self.history.remove(id)?;
        info!(record = %id, history = self.history.len(), "history record deleted");
        Ok(record)
    }

    pub fn delete_at(&mut self, index: usize) -> Result<QueryRecord, SessionError> {
        let record = self.history.remove_at(index)?;
        info!(record = %record.id(), index, "history record deleted");
        Ok(record)
    }

    /// CSV download of a table in the active dataset.
    pub fn export_table(&self, name: &str) -> Result<Download, SessionError> {
        let table = self
            .dataset
            .as_ref()
            .ok_or(SessionError::NoActiveDataset)?
            .get(name)
            .ok_or_else(|| SessionError::UnknownTable(name.to_string()))?;
        Ok(Download::for_table(table)?)
    }

    /// CSV download of a recorded result, named `consulta_<id>.csv`.
    pub fn export_record(&self, id: RecordId) -> Result<Download, SessionError> {
        let record = self
            .history
            .get(id)
            .ok_or(HistoryError::UnknownRecord(id))?;
        Ok(Download::named(&format!("consulta_{id}"), record.result())?)
    }

    pub fn describe(&self, name: &str) -> Result<Vec<Column>, SessionError> {
        Ok(self.engine.describe(name)?)
    }
}
