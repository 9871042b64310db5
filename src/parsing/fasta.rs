//! Parser for FASTA files using noodles.
//!
//! Every record becomes one raw sequence. Residue validation happens later,
//! against the alphabet named in the load command.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.fna`, `.faa` (uncompressed)
//! - any of the above with `.gz` or `.bgz` (gzip compressed)

use std::io::BufRead;

use noodles::fasta;

use crate::parsing::{FileFormat, Loaded, ParseError, RawSequence, RecordParser};
use crate::utils::validation::check_record_limit;

pub struct FastaParser;

impl RecordParser for FastaParser {
    fn format(&self) -> FileFormat {
        FileFormat::Fasta
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut fasta_reader = fasta::io::Reader::new(reader);
        let records = read_records(&mut fasta_reader)?;

        if records.is_empty() {
            return Err(ParseError::InvalidFormat(
                "No sequences found in FASTA file".to_string(),
            ));
        }

        Ok(Loaded::Sequences {
            format: FileFormat::Fasta,
            records,
        })
    }
}

/// Collect every record from a noodles FASTA reader
pub(crate) fn read_records<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<RawSequence>, ParseError> {
    let mut records = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| ParseError::Noodles(format!("Failed to parse FASTA record: {e}")))?;

        if check_record_limit(records.len()).is_some() {
            return Err(ParseError::TooManyRecords(records.len()));
        }

        let id = String::from_utf8_lossy(record.name()).to_string();
        let residues = String::from_utf8_lossy(record.sequence().as_ref()).to_string();
        records.push(RawSequence { id, residues });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{load_path, load_text};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sequences(loaded: Loaded) -> Vec<RawSequence> {
        match loaded {
            Loaded::Sequences { records, .. } => records,
            other => panic!("expected sequences, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_multi_record() {
        let text = ">chr1 first\nACGT\nACGT\n>chr2\nggcc\n";
        let records = sequences(load_text(text, FileFormat::Fasta).unwrap());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "chr1");
        assert_eq!(records[0].residues, "ACGTACGT");
        assert_eq!(records[1].residues, "ggcc");
    }

    #[test]
    fn test_empty_input_is_error() {
        let result = load_text("", FileFormat::Fasta);
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_gzipped_file() {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut temp = tempfile::Builder::new().suffix(".fa.gz").tempfile().unwrap();
        {
            let mut encoder = GzEncoder::new(temp.as_file_mut(), Compression::default());
            encoder.write_all(b">s1\nACGTACGT\n").unwrap();
            encoder.finish().unwrap();
        }

        let records = sequences(load_path(temp.path(), FileFormat::Fasta).unwrap());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].residues, "ACGTACGT");
    }

    #[test]
    fn test_plain_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, ">s1").unwrap();
        writeln!(temp, "AC").unwrap();
        writeln!(temp, "GT").unwrap();

        let records = sequences(load_path(temp.path(), FileFormat::Fasta).unwrap());
        assert_eq!(records[0].residues, "ACGT");
    }
}
