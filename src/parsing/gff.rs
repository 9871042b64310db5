//! Parser for GFF3 feature files.
//!
//! Comment and directive lines (`#`, `##gff-version 3`) are skipped. A
//! `##FASTA` directive ends the feature section. Every other line must carry
//! exactly nine tab-separated columns.

use std::io::BufRead;

use crate::parsing::{FileFormat, Loaded, ParseError, RawTable, RecordParser};
use crate::utils::validation::check_record_limit;

pub const GFF_COLUMNS: [&str; 9] = [
    "seqid",
    "source",
    "type",
    "start",
    "end",
    "score",
    "strand",
    "phase",
    "attributes",
];

pub struct GffParser;

impl RecordParser for GffParser {
    fn format(&self) -> FileFormat {
        FileFormat::Gff
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut table = RawTable::with_columns(&GFF_COLUMNS);

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            let line_num = i + 1;

            if line.starts_with("##FASTA") {
                break;
            }
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != GFF_COLUMNS.len() {
                return Err(ParseError::InvalidFormat(format!(
                    "GFF line {line_num} has {} columns, expected 9",
                    fields.len()
                )));
            }

            for (column, value) in [("start", fields[3]), ("end", fields[4])] {
                if value.parse::<u64>().is_err() {
                    return Err(ParseError::InvalidFormat(format!(
                        "GFF line {line_num}: invalid {column} '{value}'"
                    )));
                }
            }

            if check_record_limit(table.rows.len()).is_some() {
                return Err(ParseError::TooManyRecords(table.rows.len()));
            }
            table.rows.push(fields.iter().map(|f| (*f).to_string()).collect());
        }

        Ok(Loaded::Table {
            format: FileFormat::Gff,
            table,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::load_text;

    #[test]
    fn test_parse_gff() {
        let text = "##gff-version 3\n\
                    chr1\tsrc\tgene\t1\t100\t.\t+\t.\tID=g1\n\
                    # comment\n\
                    chr1\tsrc\texon\t10\t50\t.\t+\t.\tParent=g1\n\
                    ##FASTA\n>chr1\nACGT\n";

        let Loaded::Table { table, .. } = load_text(text, FileFormat::Gff).unwrap() else {
            panic!("expected table");
        };

        assert_eq!(table.columns.len(), 9);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][2], "exon");
        assert_eq!(table.rows[1][8], "Parent=g1");
    }

    #[test]
    fn test_wrong_column_count() {
        let err = load_text("chr1\tsrc\tgene\t1\n", FileFormat::Gff).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_bad_coordinate() {
        let text = "chr1\tsrc\tgene\tone\t100\t.\t+\t.\tID=g1\n";
        assert!(load_text(text, FileFormat::Gff).is_err());
    }
}
