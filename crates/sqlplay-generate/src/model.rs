use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which family of tables to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Customers, companies and a consumption fact table joined by sequential ids.
    #[default]
    Consumption,
    /// A single free-form `personas` table with a user-chosen set of columns.
    People,
}

impl Scenario {
    pub fn as_str(self) -> &'static str {
        match self {
            Scenario::Consumption => "consumption",
            Scenario::People => "people",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "consumption" | "consumo" => Ok(Scenario::Consumption),
            "people" | "personas" => Ok(Scenario::People),
            other => Err(format!("unknown scenario '{other}' (expected consumption or people)")),
        }
    }
}

/// Optional columns of the `personas` table, in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonColumn {
    Name,
    Surname,
    Email,
    BirthDate,
    Address,
    Company,
}

impl PersonColumn {
    pub const ALL: [PersonColumn; 6] = [
        PersonColumn::Name,
        PersonColumn::Surname,
        PersonColumn::Email,
        PersonColumn::BirthDate,
        PersonColumn::Address,
        PersonColumn::Company,
    ];

    /// Column name in the generated table.
    pub fn column_name(self) -> &'static str {
        match self {
            PersonColumn::Name => "nombre",
            PersonColumn::Surname => "apellido",
            PersonColumn::Email => "email",
            PersonColumn::BirthDate => "fecha_nacimiento",
            PersonColumn::Address => "direccion",
            PersonColumn::Company => "empresa",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PersonColumn::Name => "name",
            PersonColumn::Surname => "surname",
            PersonColumn::Email => "email",
            PersonColumn::BirthDate => "birth_date",
            PersonColumn::Address => "address",
            PersonColumn::Company => "company",
        }
    }
}

impl fmt::Display for PersonColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonColumn {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase().replace(['-', ' '], "_");
        PersonColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == normalized || column.column_name() == normalized)
            .ok_or_else(|| format!("unknown column '{value}'"))
    }
}

/// Options for the dataset generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub scenario: Scenario,
    /// Rows in the `empresas` dimension; defaults to a tenth of the row count.
    pub companies: Option<usize>,
    /// Columns of the `personas` table besides its `id`.
    pub columns: BTreeSet<PersonColumn>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            scenario: Scenario::Consumption,
            companies: None,
            columns: PersonColumn::ALL.into_iter().collect(),
        }
    }
}

impl GenerateOptions {
    pub fn company_count(&self, row_count: usize) -> usize {
        self.companies.unwrap_or_else(|| (row_count / 10).max(1))
    }
}

/// Summary of a generated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReport {
    pub table: String,
    pub rows_generated: u64,
    pub duration_ms: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub seed: u64,
    pub scenario: Scenario,
    pub tables: Vec<TableReport>,
    pub duration_ms: u64,
}
