//! Serializable projection of the workspace.
//!
//! This is the format-stable record shape consumed by every front end and by
//! workspace export/import. Fields may be added; renaming or removing one is a
//! breaking change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::alignment::AlignmentResult;
use crate::core::report::Report;
use crate::core::sequence::{ResidueError, SequenceRecord};
use crate::core::table::{Table, TableError};
use crate::core::types::{Alphabet, Category};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Sequence '{name}': {source}")]
    Residue {
        name: String,
        #[source]
        source: ResidueError,
    },

    #[error("Sequence '{name}' declares length {declared} but has {actual} residues")]
    LengthMismatch {
        name: String,
        declared: usize,
        actual: usize,
    },

    #[error("Table '{name}': {source}")]
    Table {
        name: String,
        #[source]
        source: TableError,
    },

    #[error("Table '{table}' row {row} has no value for column '{column}'")]
    MissingCell {
        table: String,
        row: usize,
        column: String,
    },

    #[error("Duplicate {category} '{name}'")]
    Duplicate { category: Category, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceEntry {
    pub name: String,
    pub alphabet: Alphabet,
    pub sequence: String,
    pub length: usize,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
    #[serde(default)]
    pub md5: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentEntry {
    pub name: String,
    pub lines: Vec<String>,
    pub score: i64,
    pub members: Vec<String>,
    #[serde(default)]
    pub method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    pub columns: Vec<String>,
    /// Rows as column → value objects; `columns` carries the order
    pub rows: Vec<BTreeMap<String, String>>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub name: String,
    pub lines: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Read-only projection of all four collections plus the activity history
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub sequences: Vec<SequenceEntry>,
    pub alignments: Vec<AlignmentEntry>,
    pub tables: Vec<TableEntry>,
    pub reports: Vec<ReportEntry>,
    #[serde(default)]
    pub history: Vec<String>,
}

impl WorkspaceSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
            && self.alignments.is_empty()
            && self.tables.is_empty()
            && self.reports.is_empty()
    }

    #[must_use]
    pub fn sequence(&self, name: &str) -> Option<&SequenceEntry> {
        self.sequences.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn alignment(&self, name: &str) -> Option<&AlignmentEntry> {
        self.alignments.iter().find(|a| a.name == name)
    }

    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableEntry> {
        self.tables.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn report(&self, name: &str) -> Option<&ReportEntry> {
        self.reports.iter().find(|r| r.name == name)
    }
}

/// Case-insensitive display order, byte order as tie-break
pub(crate) fn sort_key(name: &str) -> (String, String) {
    (name.to_lowercase(), name.to_string())
}

impl From<&SequenceRecord> for SequenceEntry {
    fn from(record: &SequenceRecord) -> Self {
        Self {
            name: record.name.clone(),
            alphabet: record.alphabet,
            sequence: record.sequence.clone(),
            length: record.length(),
            description: record.description.clone(),
            source_format: record.source_format.clone(),
            md5: record.md5(),
        }
    }
}

impl TryFrom<SequenceEntry> for SequenceRecord {
    type Error = SnapshotError;

    fn try_from(entry: SequenceEntry) -> Result<Self, Self::Error> {
        let record = SequenceRecord::new(&entry.name, entry.alphabet, &entry.sequence)
            .map_err(|source| SnapshotError::Residue {
                name: entry.name.clone(),
                source,
            })?;

        if record.length() != entry.length {
            return Err(SnapshotError::LengthMismatch {
                name: entry.name,
                declared: entry.length,
                actual: record.length(),
            });
        }

        let record = record.with_description(entry.description);
        Ok(match entry.source_format {
            Some(format) => record.with_source_format(format),
            None => record,
        })
    }
}

impl From<&AlignmentResult> for AlignmentEntry {
    fn from(alignment: &AlignmentResult) -> Self {
        Self {
            name: alignment.name.clone(),
            lines: alignment.lines.clone(),
            score: alignment.score,
            members: alignment.members.clone(),
            method: alignment.method.clone(),
        }
    }
}

impl From<AlignmentEntry> for AlignmentResult {
    fn from(entry: AlignmentEntry) -> Self {
        AlignmentResult::new(
            entry.name,
            entry.lines,
            entry.score,
            entry.members,
            entry.method,
        )
    }
}

impl From<&Table> for TableEntry {
    fn from(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            columns: table.columns.clone(),
            rows: (0..table.rows.len())
                .filter_map(|i| table.row_map(i))
                .collect(),
            description: table.description.clone(),
        }
    }
}

impl TryFrom<TableEntry> for Table {
    type Error = SnapshotError;

    fn try_from(entry: TableEntry) -> Result<Self, Self::Error> {
        let mut rows = Vec::with_capacity(entry.rows.len());
        for (i, row) in entry.rows.iter().enumerate() {
            let mut values = Vec::with_capacity(entry.columns.len());
            for column in &entry.columns {
                let value = row.get(column).ok_or_else(|| SnapshotError::MissingCell {
                    table: entry.name.clone(),
                    row: i + 1,
                    column: column.clone(),
                })?;
                values.push(value.clone());
            }
            rows.push(values);
        }

        let table = Table::new(&entry.name, entry.columns, rows).map_err(|source| {
            SnapshotError::Table {
                name: entry.name.clone(),
                source,
            }
        })?;
        Ok(table.with_description(entry.description))
    }
}

impl From<&Report> for ReportEntry {
    fn from(report: &Report) -> Self {
        Self {
            name: report.name.clone(),
            lines: report.lines.clone(),
            description: report.description.clone(),
        }
    }
}

impl From<ReportEntry> for Report {
    fn from(entry: ReportEntry) -> Self {
        Report::new(entry.name, entry.lines).with_description(entry.description)
    }
}
