//! Writers for workspace entities: FASTA, delimited tables, plain text, and
//! the JSON workspace document used by `export workspace` / `load workspace`.

pub mod fasta;
pub mod table;
pub mod text;
pub mod workspace;

use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write table: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to parse workspace document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid workspace document: {0}")]
    Invalid(String),
}

/// Create the parent directory of `path` if it has one
pub(crate) fn ensure_parent(path: &Path) -> Result<(), std::io::Error> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
