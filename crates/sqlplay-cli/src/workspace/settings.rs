use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use sqlplay_generate::{PersonColumn, Scenario};
use sqlplay_session::{DEFAULT_ROWS, DEFAULT_SEED, GenerationParams, Limits};

use super::{WorkspaceError, WorkspaceResult};

pub const DEFAULT_SETTINGS_FILE: &str = "sqlplay.toml";

/// Playground defaults read from `sqlplay.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundSettings {
    pub seed: u64,
    pub rows: usize,
    pub scenario: Scenario,
    pub companies: Option<usize>,
    pub columns: Vec<PersonColumn>,
    pub preview_rows: usize,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub limits: Limits,
}

impl Default for PlaygroundSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            rows: DEFAULT_ROWS,
            scenario: Scenario::default(),
            companies: None,
            columns: PersonColumn::ALL.to_vec(),
            preview_rows: 10,
            export_dir: PathBuf::from("exports"),
            log_file: PathBuf::from("sqlplay.log"),
            limits: Limits::default(),
        }
    }
}

impl PlaygroundSettings {
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            seed: self.seed,
            row_count: self.rows,
            scenario: self.scenario,
            companies: self.companies,
            columns: self.columns.iter().copied().collect::<BTreeSet<_>>(),
            table_name: None,
        }
    }
}

/// Load settings from `path`, or from `sqlplay.toml` when present.
///
/// An explicit path that does not exist is an error. A missing default file
/// yields the built-in defaults.
pub fn load_settings(path: Option<&Path>) -> WorkspaceResult<PlaygroundSettings> {
    let path = match path {
        Some(path) if !path.exists() => {
            return Err(WorkspaceError::Invalid(format!(
                "settings file not found: {}",
                path.display()
            )));
        }
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_SETTINGS_FILE);
            if !default.exists() {
                return Ok(PlaygroundSettings::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path)?;
    parse_settings(&content)
}

fn parse_settings(content: &str) -> WorkspaceResult<PlaygroundSettings> {
    let settings: PlaygroundSettings = toml::from_str(content)?;
    if settings.preview_rows == 0 {
        return Err(WorkspaceError::Invalid(
            "preview_rows must be positive".to_string(),
        ));
    }
    Ok(settings)
}
