use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::blueprint::{TableSpec, ValueSource};
use crate::errors::GenerationError;

/// Order table specs so that every parent is generated before its children.
///
/// Tables without foreign-key dependencies keep their declared order, which
/// keeps the output order (and with it the per-table seeds) stable.
pub fn plan_tables(specs: Vec<TableSpec>) -> Result<Vec<TableSpec>, GenerationError> {
    if specs.is_empty() {
        return Err(GenerationError::InvalidBlueprint(
            "no tables to generate".to_string(),
        ));
    }

    let by_name: HashMap<&str, &TableSpec> =
        specs.iter().map(|spec| (spec.name, spec)).collect();
    if by_name.len() != specs.len() {
        return Err(GenerationError::InvalidBlueprint(
            "duplicate table name in blueprint".to_string(),
        ));
    }

    for spec in &specs {
        check_foreign_keys(spec, &by_name)?;
    }

    let mut pending: HashMap<&str, BTreeSet<&str>> = specs
        .iter()
        .map(|spec| (spec.name, spec.parents().collect()))
        .collect();

    let mut order: Vec<&str> = Vec::with_capacity(specs.len());
    let mut ready: VecDeque<&str> = specs
        .iter()
        .map(|spec| spec.name)
        .filter(|name| pending.get(name).is_some_and(BTreeSet::is_empty))
        .collect();

    while let Some(name) = ready.pop_front() {
        order.push(name);
        for spec in &specs {
            if let Some(parents) = pending.get_mut(spec.name) {
                if parents.remove(name) && parents.is_empty() {
                    ready.push_back(spec.name);
                }
            }
        }
    }

    if order.len() != specs.len() {
        return Err(GenerationError::InvalidBlueprint(
            "cyclic foreign keys between tables".to_string(),
        ));
    }

    let mut specs: HashMap<&str, TableSpec> =
        specs.into_iter().map(|spec| (spec.name, spec)).collect();
    order
        .into_iter()
        .map(|name| {
            specs.remove(name).ok_or_else(|| {
                GenerationError::InvalidBlueprint(format!("table '{name}' vanished while planning"))
            })
        })
        .collect()
}

fn check_foreign_keys(
    spec: &TableSpec,
    by_name: &HashMap<&str, &TableSpec>,
) -> Result<(), GenerationError> {
    for column in &spec.columns {
        let ValueSource::ForeignKey { table, column: target } = column.source else {
            continue;
        };
        if table == spec.name {
            return Err(GenerationError::InvalidBlueprint(format!(
                "{}.{} references its own table",
                spec.name, column.name
            )));
        }
        let parent = by_name.get(table).ok_or_else(|| {
            GenerationError::InvalidBlueprint(format!(
                "{}.{} references unknown table '{}'",
                spec.name, column.name, table
            ))
        })?;
        let parent_column = parent
            .columns
            .iter()
            .find(|col| col.name == target)
            .ok_or_else(|| {
                GenerationError::InvalidBlueprint(format!(
                    "{}.{} references unknown column '{}.{}'",
                    spec.name, column.name, table, target
                ))
            })?;
        if parent_column.data_type != column.data_type {
            return Err(GenerationError::InvalidBlueprint(format!(
                "{}.{} is {} but {}.{} is {}",
                spec.name,
                column.name,
                column.data_type,
                table,
                target,
                parent_column.data_type
            )));
        }
    }
    Ok(())
}
