use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("Empty column name at position {0}")]
    EmptyColumn(usize),

    #[error("Row {row} has {found} fields, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// An immutable table with an ordered, unique header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    /// Each row holds exactly one value per column, in column order
    pub rows: Vec<Vec<String>>,
    pub description: String,
}

impl Table {
    /// Build a table, checking header uniqueness and row widths.
    ///
    /// # Errors
    ///
    /// Returns `TableError` for duplicate/empty column names or ragged rows.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    ) -> Result<Self, TableError> {
        check_columns(&columns)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RaggedRow {
                    row: i + 1,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            columns,
            rows,
            description: String::new(),
        })
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Row `index` as a column → value mapping
    #[must_use]
    pub fn row_map(&self, index: usize) -> Option<BTreeMap<String, String>> {
        self.rows.get(index).map(|row| {
            self.columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect()
        })
    }

    /// Re-run the construction checks; used by invariant checks
    pub fn validate(&self) -> Result<(), TableError> {
        check_columns(&self.columns)?;
        match self
            .rows
            .iter()
            .position(|row| row.len() != self.columns.len())
        {
            Some(i) => Err(TableError::RaggedRow {
                row: i + 1,
                expected: self.columns.len(),
                found: self.rows[i].len(),
            }),
            None => Ok(()),
        }
    }
}

fn check_columns(columns: &[String]) -> Result<(), TableError> {
    let mut seen = HashSet::new();
    for (i, column) in columns.iter().enumerate() {
        if column.trim().is_empty() {
            return Err(TableError::EmptyColumn(i + 1));
        }
        if !seen.insert(column.as_str()) {
            return Err(TableError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_table_new() {
        let table = Table::new(
            "t",
            cols(&["gene", "count"]),
            vec![cols(&["abc", "1"]), cols(&["def", "2"])],
        )
        .unwrap();
        assert_eq!(table.column_index("count"), Some(1));
        assert_eq!(table.row_map(1).unwrap()["gene"], "def");
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let err = Table::new("t", cols(&["a", "a"]), vec![]).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = Table::new("t", cols(&["a", "b"]), vec![cols(&["1"])]).unwrap_err();
        assert!(matches!(err, TableError::RaggedRow { row: 1, .. }));
    }
}
