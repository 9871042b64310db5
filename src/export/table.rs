use std::path::Path;

use crate::core::table::Table;
use crate::export::{ensure_parent, ExportError};
use crate::utils::validation::inner_extension;

/// Comma for `.csv` targets, tab otherwise
#[must_use]
pub fn delimiter_for(path: &Path) -> u8 {
    match inner_extension(path).as_deref() {
        Some("csv") => b',',
        _ => b'\t',
    }
}

/// Write the header row and every data row
pub fn write_table(path: &Path, table: &Table) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter_for(path))
        .from_path(path)?;

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
