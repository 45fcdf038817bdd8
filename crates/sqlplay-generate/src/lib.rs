//! Deterministic synthetic dataset generation for sqlplay.
//!
//! A scenario expands into table blueprints, the planner orders them so that
//! dimension tables come before the fact tables sampling their keys, and the
//! engine fills each table from its own seeded RNG.

pub mod blueprint;
pub mod engine;
pub mod errors;
pub mod foreign;
pub mod generators;
pub mod model;
pub mod planner;
pub mod scenarios;

pub use engine::{GenerationEngine, GenerationResult};
pub use errors::GenerationError;
pub use model::{GenerateOptions, GenerationReport, PersonColumn, Scenario, TableReport};
