use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::export::{ensure_parent, ExportError};

/// Write one line per entry, newline-terminated
pub fn write_lines(path: &Path, lines: &[String]) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    writer.flush()?;
    Ok(())
}
