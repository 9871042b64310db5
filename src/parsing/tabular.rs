//! Parser for delimited tables (CSV and TSV) using the csv crate.
//!
//! The first row is the header and must name every column uniquely. Rows of a
//! different width than the header are rejected.

use std::collections::HashSet;
use std::io::BufRead;

use csv::ReaderBuilder;

use crate::parsing::{FileFormat, Loaded, ParseError, RawTable, RecordParser};
use crate::utils::validation::check_record_limit;

pub struct DelimitedParser {
    format: FileFormat,
}

impl DelimitedParser {
    /// `format` must be `FileFormat::Csv` or `FileFormat::Tsv`
    pub fn new(format: FileFormat) -> Self {
        Self { format }
    }

    fn delimiter(&self) -> u8 {
        match self.format {
            FileFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

impl RecordParser for DelimitedParser {
    fn format(&self) -> FileFormat {
        self.format
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter())
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()
            .map_err(|e| ParseError::Csv(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        if columns.is_empty() || columns.iter().all(String::is_empty) {
            return Err(ParseError::InvalidFormat(
                "Table file has no header row".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ParseError::InvalidFormat(format!(
                    "Duplicate column '{column}' in table header"
                )));
            }
        }

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            // csv reports ragged rows as UnequalLengths with the line number
            let record = result.map_err(|e| ParseError::Csv(e.to_string()))?;

            if check_record_limit(rows.len()).is_some() {
                return Err(ParseError::TooManyRecords(rows.len()));
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Loaded::Table {
            format: self.format,
            table: RawTable::new(columns, rows),
        })
    }
}
