//! Table operations: row filter, column projection, inner join and summary.

use std::collections::{BTreeSet, HashMap};

use crate::core::table::Table;
use crate::ops::OpError;

fn column_index(table: &Table, column: &str) -> Result<usize, OpError> {
    table
        .column_index(column)
        .ok_or_else(|| OpError::MissingColumn {
            table: table.name.clone(),
            column: column.to_string(),
        })
}

fn build(name: &str, columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Table, OpError> {
    Table::new(name, columns, rows).map_err(|e| OpError::InvalidArgument(e.to_string()))
}

/// Rows whose `column` equals `value` exactly
///
/// # Errors
///
/// Returns `OpError::MissingColumn` if `column` is not in the table.
pub fn filter_equals(
    table: &Table,
    column: &str,
    value: &str,
    new_name: &str,
) -> Result<Table, OpError> {
    let index = column_index(table, column)?;
    let rows = table
        .rows
        .iter()
        .filter(|row| row[index] == value)
        .cloned()
        .collect();

    Ok(build(new_name, table.columns.clone(), rows)?.with_description(format!(
        "{} where {column} equals {value}",
        table.name
    )))
}

/// Projection onto `columns`, in the requested order
///
/// # Errors
///
/// Returns `OpError::MissingColumn` for an unknown column and
/// `OpError::InvalidArgument` if a column is requested twice or none are.
pub fn pick_columns(table: &Table, columns: &[String], new_name: &str) -> Result<Table, OpError> {
    if columns.is_empty() {
        return Err(OpError::InvalidArgument(
            "Name at least one column to pick".to_string(),
        ));
    }

    let indices = columns
        .iter()
        .map(|c| column_index(table, c))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = table
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(build(new_name, columns.to_vec(), rows)?.with_description(format!(
        "columns {} of {}",
        columns.join(", "),
        table.name
    )))
}

/// Inner join on `column`: every matching pair, in left-table order.
///
/// The right table's key column is dropped; any other right column whose name
/// clashes with a left column gets a `_<right table name>` suffix.
///
/// # Errors
///
/// Returns `OpError::MissingColumn` if either table lacks `column`.
pub fn join_on(left: &Table, right: &Table, column: &str, new_name: &str) -> Result<Table, OpError> {
    let left_key = column_index(left, column)?;
    let right_key = column_index(right, column)?;

    let mut columns = left.columns.clone();
    for (i, c) in right.columns.iter().enumerate() {
        if i == right_key {
            continue;
        }
        if left.columns.contains(c) {
            columns.push(format!("{c}_{}", right.name));
        } else {
            columns.push(c.clone());
        }
    }

    let mut by_key: HashMap<&str, Vec<&Vec<String>>> = HashMap::new();
    for row in &right.rows {
        by_key.entry(row[right_key].as_str()).or_default().push(row);
    }

    let mut rows = Vec::new();
    for row in &left.rows {
        let Some(matches) = by_key.get(row[left_key].as_str()) else {
            continue;
        };
        for other in matches {
            let mut combined = row.clone();
            combined.extend(
                other
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != right_key)
                    .map(|(_, v)| v.clone()),
            );
            rows.push(combined);
        }
    }

    Ok(build(new_name, columns, rows)?.with_description(format!(
        "{} joined with {} on {column}",
        left.name, right.name
    )))
}

/// Per-column summary: numeric columns get min/max/mean, others a distinct count
#[must_use]
pub fn summarize(table: &Table) -> Vec<String> {
    let mut lines = vec![
        format!("Summary of {}", table.name),
        format!("Rows: {}", table.rows.len()),
        format!("Columns: {}", table.columns.len()),
    ];
    if table.columns.is_empty() {
        lines.push("Headers: none".to_string());
        return lines;
    }
    lines.push(format!("Headers: {}", table.columns.join(", ")));

    for (i, column) in table.columns.iter().enumerate() {
        let values: Vec<&str> = table
            .rows
            .iter()
            .map(|row| row[i].as_str())
            .filter(|v| !v.is_empty())
            .collect();

        let numbers: Vec<f64> = values.iter().filter_map(|v| v.parse().ok()).collect();
        if !numbers.is_empty() && numbers.len() == values.len() {
            let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
            let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            #[allow(clippy::cast_precision_loss)]
            let mean = numbers.iter().sum::<f64>() / numbers.len() as f64;
            lines.push(format!(
                "{column}: numeric, min {min}, max {max}, mean {mean:.2}"
            ));
        } else {
            let distinct: BTreeSet<&str> = values.iter().copied().collect();
            lines.push(format!(
                "{column}: {} values, {} distinct",
                values.len(),
                distinct.len()
            ));
        }
    }

    lines
}
