pub mod faker;

use rand::{Rng, RngCore};

use sqlplay_core::Value;

use crate::blueprint::{ColumnSpec, ValueSource};
use crate::errors::GenerationError;
use crate::foreign::ForeignContext;

/// Per-row context handed to value generation.
pub struct RowContext<'a, F: ForeignContext + ?Sized> {
    /// Zero-based position of the row being generated.
    pub row_index: usize,
    pub foreign: &'a F,
}

/// Produce the value of `column` for one row.
pub fn generate_value<F: ForeignContext + ?Sized>(
    column: &ColumnSpec,
    ctx: &RowContext<'_, F>,
    rng: &mut dyn RngCore,
) -> Result<Value, GenerationError> {
    match &column.source {
        ValueSource::Sequence => Ok(Value::Int(ctx.row_index as i64 + 1)),
        ValueSource::Token => Ok(Value::Text(random_token(rng))),
        ValueSource::Fake(kind) => Ok(kind.generate(rng)),
        ValueSource::IntRange { min, max } => {
            if min > max {
                return Err(GenerationError::InvalidBlueprint(format!(
                    "{}: range min must be <= max",
                    column.name
                )));
            }
            Ok(Value::Int(rng.random_range(*min..=*max)))
        }
        ValueSource::Choice(labels) => {
            if labels.is_empty() {
                return Err(GenerationError::InvalidBlueprint(format!(
                    "{}: choice needs at least one label",
                    column.name
                )));
            }
            let idx = rng.random_range(0..labels.len());
            Ok(Value::Text(labels[idx].to_string()))
        }
        ValueSource::ForeignKey { table, column } => ctx.foreign.pick_fk(table, column, rng),
    }
}

/// Random UUID v4 drawn from the seeded RNG, so tokens stay reproducible.
pub fn random_token(rng: &mut dyn RngCore) -> String {
    let bytes: [u8; 16] = rng.random();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}
