//! Parser for BAM alignment records using noodles.
//!
//! The BGZF container and binary records are decoded by noodles; each record
//! becomes one table row. Missing fields use SAM text conventions: `*` for
//! absent names and CIGARs, `0` for an absent position, `255` for an absent
//! mapping quality.
//!
//! | query | flag | ref | pos | mapq | cigar |
//! |-------|------|-----|-----|------|-------|

use std::io::BufRead;

use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::record::cigar::op::Kind;

use crate::parsing::{FileFormat, Loaded, ParseError, RawTable, RecordParser};
use crate::utils::validation::check_record_limit;

pub const BAM_COLUMNS: [&str; 6] = ["query", "flag", "ref", "pos", "mapq", "cigar"];

const MISSING: &str = "*";
const MISSING_MAPQ: u8 = 255;

pub struct BamParser;

impl RecordParser for BamParser {
    fn format(&self) -> FileFormat {
        FileFormat::Bam
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut bam_reader = bam::io::Reader::new(reader);
        let header = bam_reader
            .read_header()
            .map_err(|e| ParseError::Noodles(format!("Failed to read BAM header: {e}")))?;

        let mut table = RawTable::with_columns(&BAM_COLUMNS);

        for result in bam_reader.records() {
            let record = result
                .map_err(|e| ParseError::Noodles(format!("Failed to read BAM record: {e}")))?;

            if check_record_limit(table.rows.len()).is_some() {
                return Err(ParseError::TooManyRecords(table.rows.len()));
            }

            table.rows.push(record_row(&header, &record)?);
        }

        Ok(Loaded::Table {
            format: FileFormat::Bam,
            table,
        })
    }
}

fn record_row(header: &sam::Header, record: &bam::Record) -> Result<Vec<String>, ParseError> {
    let decode = |what: &str, e: std::io::Error| {
        ParseError::Noodles(format!("Invalid BAM record {what}: {e}"))
    };

    let query = record
        .name()
        .map_or_else(|| MISSING.to_string(), |name| name.to_string());

    let flag = record.flags().bits().to_string();

    let reference = match record.reference_sequence_id() {
        Some(id) => {
            let id = id.map_err(|e| decode("reference id", e))?;
            header
                .reference_sequences()
                .get_index(id)
                .map(|(name, _)| name.to_string())
                .ok_or_else(|| {
                    ParseError::InvalidFormat(format!(
                        "BAM record references sequence {id} missing from header"
                    ))
                })?
        }
        None => MISSING.to_string(),
    };

    let pos = match record.alignment_start() {
        Some(position) => usize::from(position.map_err(|e| decode("position", e))?).to_string(),
        None => "0".to_string(),
    };

    let mapq = record
        .mapping_quality()
        .map_or(MISSING_MAPQ, |mq| mq.get())
        .to_string();

    let mut cigar = String::new();
    for op in record.cigar().iter() {
        let op = op.map_err(|e| decode("CIGAR", e))?;
        cigar.push_str(&op.len().to_string());
        cigar.push(kind_symbol(op.kind()));
    }
    if cigar.is_empty() {
        cigar.push_str(MISSING);
    }

    Ok(vec![query, flag, reference, pos, mapq, cigar])
}

/// SAM text symbol for a CIGAR operation
fn kind_symbol(kind: Kind) -> char {
    match kind {
        Kind::Match => 'M',
        Kind::Insertion => 'I',
        Kind::Deletion => 'D',
        Kind::Skip => 'N',
        Kind::SoftClip => 'S',
        Kind::HardClip => 'H',
        Kind::Pad => 'P',
        Kind::SequenceMatch => '=',
        Kind::SequenceMismatch => 'X',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_symbols() {
        assert_eq!(kind_symbol(Kind::Match), 'M');
        assert_eq!(kind_symbol(Kind::SoftClip), 'S');
        assert_eq!(kind_symbol(Kind::SequenceMismatch), 'X');
    }

    #[test]
    fn test_truncated_container_is_error() {
        let mut reader: &[u8] = b"not a bgzf block";
        let result = BamParser.parse(&mut reader);
        assert!(result.is_err());
    }
}
