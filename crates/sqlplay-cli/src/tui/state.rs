use std::path::PathBuf;

use sqlplay_generate::Scenario;
use sqlplay_generate::scenarios::consumption::SAMPLE_QUERY;
use sqlplay_session::{DEFAULT_UPLOAD_TABLE, DataSource, GenerationParams, Session};
use tracing::info;

use crate::CliError;
use crate::workspace::PlaygroundSettings;

pub const MAX_MESSAGES: usize = 1000;

#[derive(Debug, Clone)]
pub struct PaletteEntry {
    pub command: &'static str,
    pub description: &'static str,
}

/// What the active dataset was loaded from, for the header and `/status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    None,
    Generate,
    Upload { path: PathBuf, table: String },
}

pub struct App {
    pub session: Session,
    pub settings: PlaygroundSettings,
    pub params: GenerationParams,
    pub source: SourceMode,
    pub input: String,
    pub messages: Vec<String>,
    pub should_quit: bool,
    pub scroll_offset: u16,
    pub palette_select: usize,
}

impl App {
    pub fn new(settings: PlaygroundSettings, params: GenerationParams) -> Result<Self, CliError> {
        let session = Session::with_datafusion(settings.limits.clone())?;
        let input = if params.scenario == Scenario::Consumption {
            SAMPLE_QUERY.to_string()
        } else {
            String::new()
        };

        Ok(Self {
            session,
            settings,
            params,
            source: SourceMode::None,
            input,
            messages: Vec::new(),
            should_quit: false,
            scroll_offset: 0,
            palette_select: 0,
        })
    }

    pub fn push_message(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
        if self.messages.len() > MAX_MESSAGES {
            let overflow = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(0..overflow);
        }
    }

    pub fn push_lines(&mut self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            self.push_message(line);
        }
    }

    pub fn record_command(&mut self, command: &str) {
        if !self.messages.is_empty() {
            self.push_message("");
        }
        self.push_message(format!("► {}", command));
    }

    /// Regenerate the dataset from `params`. The new parameters are kept only
    /// if the load succeeds.
    pub fn regenerate(&mut self, params: GenerationParams) -> Result<(), CliError> {
        let dataset = self.session.load(&DataSource::Generate(params.clone()))?;
        let summary = dataset_summary(dataset.table_names(), dataset.len());
        info!(seed = params.seed, rows = params.row_count, scenario = %params.scenario, "playground regenerated");
        self.params = params;
        self.source = SourceMode::Generate;
        self.push_message(format!("generated {summary}"));
        Ok(())
    }

    pub fn upload(&mut self, path: PathBuf, table_name: Option<String>) -> Result<(), CliError> {
        let bytes = std::fs::read(&path)?;
        let name = table_name.unwrap_or_else(|| DEFAULT_UPLOAD_TABLE.to_string());
        let dataset = self.session.load(&DataSource::upload(name, bytes))?;
        let table = dataset
            .table_names()
            .next()
            .map(str::to_string)
            .unwrap_or_default();
        let rows = dataset.get(&table).map(|t| t.row_count()).unwrap_or(0);
        info!(path = %path.display(), table = %table, rows, "playground upload loaded");
        self.push_message(format!("loaded {} as '{table}' ({rows} rows)", path.display()));
        self.source = SourceMode::Upload { path, table };
        Ok(())
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.source, SourceMode::Generate)
    }

    pub fn source_display(&self) -> String {
        match &self.source {
            SourceMode::None => "none".to_string(),
            SourceMode::Generate => format!(
                "{} . seed {} . {} rows",
                self.params.scenario, self.params.seed, self.params.row_count
            ),
            SourceMode::Upload { path, table } => format!("upload {} as {table}", path.display()),
        }
    }
}

fn dataset_summary<'a>(names: impl Iterator<Item = &'a str>, count: usize) -> String {
    let names: Vec<&str> = names.collect();
    format!("{count} table(s): {}", names.join(", "))
}
