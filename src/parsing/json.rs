//! Parser for JSON record files using serde_json.
//!
//! - an object becomes a one-row table
//! - an array of objects becomes one row per object; columns are the sorted
//!   union of keys and missing keys become empty cells
//! - an array of scalars becomes a single `value` column

use std::collections::BTreeSet;
use std::io::BufRead;

use serde_json::{Map, Value};

use crate::parsing::{FileFormat, Loaded, ParseError, RawTable, RecordParser};
use crate::utils::validation::check_record_limit;

pub struct JsonParser;

impl RecordParser for JsonParser {
    fn format(&self) -> FileFormat {
        FileFormat::Json
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let value: Value =
            serde_json::from_reader(reader).map_err(|e| ParseError::Json(e.to_string()))?;

        let table = match value {
            Value::Object(object) => objects_to_table(&[object]),
            Value::Array(items) if items.iter().all(Value::is_object) => {
                let objects: Vec<Map<String, Value>> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(object) => Some(object),
                        _ => None,
                    })
                    .collect();
                objects_to_table(&objects)
            }
            Value::Array(items) => {
                if items.iter().any(|v| v.is_object() || v.is_array()) {
                    return Err(ParseError::InvalidFormat(
                        "JSON array mixes records with other values".to_string(),
                    ));
                }
                RawTable::new(
                    vec!["value".to_string()],
                    items.iter().map(|v| vec![cell(v)]).collect(),
                )
            }
            _ => {
                return Err(ParseError::InvalidFormat(
                    "JSON input must be an object or an array".to_string(),
                ))
            }
        };

        if check_record_limit(table.rows.len()).is_some() {
            return Err(ParseError::TooManyRecords(table.rows.len()));
        }
        if table.columns.is_empty() {
            return Err(ParseError::InvalidFormat(
                "JSON records have no fields".to_string(),
            ));
        }

        Ok(Loaded::Table {
            format: FileFormat::Json,
            table,
        })
    }
}

fn objects_to_table(objects: &[Map<String, Value>]) -> RawTable {
    let columns: Vec<String> = objects
        .iter()
        .flat_map(|o| o.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rows = objects
        .iter()
        .map(|object| {
            columns
                .iter()
                .map(|column| object.get(column).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    RawTable::new(columns, rows)
}

/// Strings unquoted, null empty, everything else as compact JSON
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
