use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use sqlplay_core::{Dataset, read_csv};
use sqlplay_generate::{GenerateOptions, GenerationEngine, PersonColumn, Scenario};

use crate::error::ResolveError;

pub const DEFAULT_SEED: u64 = 1234;
pub const DEFAULT_ROWS: usize = 100;
pub const DEFAULT_UPLOAD_TABLE: &str = "uploaded";

/// Accepted ranges for user-supplied generation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub min_seed: u64,
    pub max_seed: u64,
    pub min_rows: usize,
    pub max_rows_consumption: usize,
    pub max_rows_people: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_seed: 1,
            max_seed: 10_000,
            min_rows: 10,
            max_rows_consumption: 1_000,
            max_rows_people: 10_000,
        }
    }
}

impl Limits {
    pub fn max_rows(&self, scenario: Scenario) -> usize {
        match scenario {
            Scenario::Consumption => self.max_rows_consumption,
            Scenario::People => self.max_rows_people,
        }
    }
}

/// Parameters of a synthetic data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationParams {
    pub seed: u64,
    pub row_count: usize,
    pub scenario: Scenario,
    pub companies: Option<usize>,
    pub columns: BTreeSet<PersonColumn>,
    /// Registers a single-table scenario under this name instead of its own.
    pub table_name: Option<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            row_count: DEFAULT_ROWS,
            scenario: Scenario::default(),
            companies: None,
            columns: PersonColumn::ALL.into_iter().collect(),
            table_name: None,
        }
    }
}

impl GenerationParams {
    pub fn validate(&self, limits: &Limits) -> Result<(), ResolveError> {
        if !(limits.min_seed..=limits.max_seed).contains(&self.seed) {
            return Err(ResolveError::Validation(format!(
                "seed must be between {} and {} (got {})",
                limits.min_seed, limits.max_seed, self.seed
            )));
        }
        let max_rows = limits.max_rows(self.scenario);
        if !(limits.min_rows..=max_rows).contains(&self.row_count) {
            return Err(ResolveError::Validation(format!(
                "rows must be between {} and {} for the {} scenario (got {})",
                limits.min_rows, max_rows, self.scenario, self.row_count
            )));
        }
        if let Some(companies) = self.companies {
            if companies == 0 || companies > self.row_count {
                return Err(ResolveError::Validation(format!(
                    "companies must be between 1 and the row count {} (got {companies})",
                    self.row_count
                )));
            }
        }
        if self.table_name.is_some() && self.scenario != Scenario::People {
            return Err(ResolveError::Validation(format!(
                "a table name can only be set for single-table scenarios, not {}",
                self.scenario
            )));
        }
        Ok(())
    }

    pub fn options(&self) -> GenerateOptions {
        GenerateOptions {
            scenario: self.scenario,
            companies: self.companies,
            columns: self.columns.clone(),
        }
    }
}

/// Where the active dataset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Generate(GenerationParams),
    Upload { table_name: String, bytes: Vec<u8> },
}

impl DataSource {
    pub fn upload(table_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        DataSource::Upload {
            table_name: table_name.into(),
            bytes,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Generate(params) => write!(
                f,
                "generated {} (seed {}, {} rows)",
                params.scenario, params.seed, params.row_count
            ),
            DataSource::Upload { table_name, bytes } => write!(
                f,
                "upload '{}' ({} bytes)",
                normalize_table_name(table_name),
                bytes.len()
            ),
        }
    }
}

/// Turn a data source into a dataset with at least one table.
pub fn resolve(source: &DataSource, limits: &Limits) -> Result<Dataset, ResolveError> {
    let dataset = match source {
        DataSource::Upload { table_name, bytes } => {
            let name = normalize_table_name(table_name);
            let table = read_csv(&name, bytes)?;
            Dataset::from_tables(vec![table])?
        }
        DataSource::Generate(params) => {
            params.validate(limits)?;
            let mut dataset =
                GenerationEngine::new(params.options()).generate(params.seed, params.row_count)?;
            if let Some(raw) = &params.table_name {
                let target = normalize_table_name(raw);
                let current = dataset
                    .table_names()
                    .next()
                    .map(str::to_string)
                    .ok_or_else(|| ResolveError::Validation("no table generated".to_string()))?;
                dataset.rename(&current, &target)?;
            }
            dataset
        }
    };

    info!(
        source = %source,
        tables = dataset.len(),
        "dataset resolved"
    );
    Ok(dataset)
}

/// Lowercase SQL identifier for a user-supplied table name.
///
/// Anything outside `[a-z0-9_]` becomes `_`, a leading digit gets a `t_`
/// prefix and a blank name falls back to [`DEFAULT_UPLOAD_TABLE`].
pub fn normalize_table_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_UPLOAD_TABLE.to_string();
    }
    let mut name: String = trimmed
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "t_");
    }
    name
}
