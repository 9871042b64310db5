//! Parser for VCF variant records.
//!
//! Meta lines (`##...`) are skipped; the `#CHROM` header line supplies the
//! column names (fixed columns plus any sample columns) and every data line
//! must match its width. gzip/bgzip input is decompressed by the caller.

use std::io::BufRead;

use crate::parsing::{FileFormat, Loaded, ParseError, RawTable, RecordParser};
use crate::utils::validation::check_record_limit;

/// Fixed columns every VCF header line starts with
const REQUIRED_COLUMNS: [&str; 8] = ["CHROM", "POS", "ID", "REF", "ALT", "QUAL", "FILTER", "INFO"];

pub struct VcfParser;

impl RecordParser for VcfParser {
    fn format(&self) -> FileFormat {
        FileFormat::Vcf
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut columns: Option<Vec<String>> = None;
        let mut rows = Vec::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = i + 1;

            if line.starts_with("##") || line.trim().is_empty() {
                continue;
            }

            if let Some(header) = line.strip_prefix('#') {
                columns = Some(parse_header_line(header)?);
                continue;
            }

            let Some(header) = columns.as_ref() else {
                return Err(ParseError::InvalidFormat(format!(
                    "VCF data on line {line_num} before the #CHROM header"
                )));
            };

            let fields: Vec<String> = line.split('\t').map(str::to_string).collect();
            if fields.len() != header.len() {
                return Err(ParseError::InvalidFormat(format!(
                    "VCF line {line_num} has {} columns, header has {}",
                    fields.len(),
                    header.len()
                )));
            }
            if fields[1].parse::<u64>().is_err() {
                return Err(ParseError::InvalidFormat(format!(
                    "VCF line {line_num}: invalid POS '{}'",
                    fields[1]
                )));
            }

            if check_record_limit(rows.len()).is_some() {
                return Err(ParseError::TooManyRecords(rows.len()));
            }
            rows.push(fields);
        }

        let columns = columns.ok_or_else(|| {
            ParseError::InvalidFormat("No #CHROM header line found in VCF".to_string())
        })?;

        Ok(Loaded::Table {
            format: FileFormat::Vcf,
            table: RawTable::new(columns, rows),
        })
    }
}

/// Parse the `#CHROM ...` line (leading `#` already stripped)
fn parse_header_line(header: &str) -> Result<Vec<String>, ParseError> {
    let columns: Vec<String> = header.split('\t').map(str::to_string).collect();

    if columns.len() < REQUIRED_COLUMNS.len()
        || columns
            .iter()
            .zip(REQUIRED_COLUMNS)
            .any(|(found, expected)| found != expected)
    {
        return Err(ParseError::InvalidFormat(format!(
            "Invalid VCF header line: #{header}"
        )));
    }

    Ok(columns)
}
