use crate::blueprint::TableSpec;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, Scenario};

pub mod consumption;
pub mod people;

/// Table specs for the selected scenario, in declaration order.
pub fn blueprints(
    options: &GenerateOptions,
    row_count: usize,
) -> Result<Vec<TableSpec>, GenerationError> {
    match options.scenario {
        Scenario::Consumption => {
            let companies = options.company_count(row_count);
            if companies == 0 {
                return Err(GenerationError::InvalidOptions(
                    "companies must be at least 1".to_string(),
                ));
            }
            Ok(consumption::tables(row_count, companies))
        }
        Scenario::People => Ok(vec![people::table(row_count, &options.columns)]),
    }
}
