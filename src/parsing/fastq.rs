//! Parser for FASTQ files using noodles.
//!
//! Reads are kept as sequences; quality strings are checked for length and
//! then discarded.

use std::io::BufRead;

use noodles::fastq;

use crate::parsing::{FileFormat, Loaded, ParseError, RawSequence, RecordParser};
use crate::utils::validation::check_record_limit;

pub struct FastqParser;

impl RecordParser for FastqParser {
    fn format(&self) -> FileFormat {
        FileFormat::Fastq
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut fastq_reader = fastq::io::Reader::new(reader);
        let mut records = Vec::new();

        for result in fastq_reader.records() {
            let record = result
                .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTQ record: {e}")))?;

            if check_record_limit(records.len()).is_some() {
                return Err(ParseError::TooManyRecords(records.len()));
            }

            let id = String::from_utf8_lossy(record.name()).to_string();
            let sequence = record.sequence();
            let qualities = record.quality_scores();

            if sequence.len() != qualities.len() {
                return Err(ParseError::InvalidFormat(format!(
                    "Read '{id}' has {} bases but {} quality scores",
                    sequence.len(),
                    qualities.len()
                )));
            }

            records.push(RawSequence {
                id,
                residues: String::from_utf8_lossy(sequence).to_string(),
            });
        }

        if records.is_empty() {
            return Err(ParseError::InvalidFormat(
                "No reads found in FASTQ file".to_string(),
            ));
        }

        Ok(Loaded::Sequences {
            format: FileFormat::Fastq,
            records,
        })
    }
}
