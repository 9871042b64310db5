//! Parser for GenBank flat files using gb-io.
//!
//! Only the primary sequence of each record and a minimal feature list are
//! kept. Features land in one table with 1-based inclusive coordinates:
//!
//! | seqid | type | start | end | strand | label |
//! |-------|------|-------|-----|--------|-------|

use std::io::BufRead;

use gb_io::reader::SeqReader;
use gb_io::seq::{Feature, Location};

use crate::parsing::{FileFormat, Loaded, ParseError, RawSequence, RawTable, RecordParser};
use crate::utils::validation::check_record_limit;

pub const FEATURE_COLUMNS: [&str; 6] = ["seqid", "type", "start", "end", "strand", "label"];

/// Qualifiers tried in order when naming a feature
const LABEL_QUALIFIERS: [&str; 4] = ["label", "gene", "locus_tag", "product"];

pub struct GenBankParser;

impl RecordParser for GenBankParser {
    fn format(&self) -> FileFormat {
        FileFormat::GenBank
    }

    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError> {
        let mut records = Vec::new();
        let mut features = RawTable::with_columns(&FEATURE_COLUMNS);

        for result in SeqReader::new(reader) {
            let seq = result.map_err(|e| ParseError::GenBank(e.to_string()))?;

            if check_record_limit(records.len()).is_some() {
                return Err(ParseError::TooManyRecords(records.len()));
            }

            let id = seq
                .name
                .clone()
                .unwrap_or_else(|| format!("record_{}", records.len() + 1));

            for feature in &seq.features {
                if check_record_limit(features.rows.len()).is_some() {
                    return Err(ParseError::TooManyRecords(features.rows.len()));
                }
                if let Some(row) = feature_row(&id, feature) {
                    features.rows.push(row);
                }
            }

            records.push(RawSequence {
                id,
                residues: String::from_utf8_lossy(&seq.seq).to_string(),
            });
        }

        if records.is_empty() {
            return Err(ParseError::InvalidFormat(
                "No records found in GenBank file".to_string(),
            ));
        }

        Ok(Loaded::Annotated {
            format: FileFormat::GenBank,
            records,
            features,
        })
    }
}

/// One table row per feature; features without a resolvable range are skipped
fn feature_row(seqid: &str, feature: &Feature) -> Option<Vec<String>> {
    let mut ranges = Vec::new();
    collect_ranges(&feature.location, &mut ranges);

    let start = ranges.iter().map(|(from, _)| *from).min()?;
    let end = ranges.iter().map(|(_, to)| *to).max()?;

    let strand = if is_reverse(&feature.location) { "-" } else { "+" };
    let label = LABEL_QUALIFIERS
        .iter()
        .find_map(|key| feature.qualifier_values((*key).into()).next())
        .unwrap_or_default();

    Some(vec![
        seqid.to_string(),
        feature.kind.to_string(),
        // gb-io ranges are 0-based half-open
        (start + 1).to_string(),
        end.to_string(),
        strand.to_string(),
        label.to_string(),
    ])
}

fn collect_ranges(location: &Location, ranges: &mut Vec<(i64, i64)>) {
    match location {
        Location::Range((from, _), (to, _)) | Location::Between(from, to) => {
            if *from < 0 || *to < 0 {
                return;
            }
            ranges.push(((*from).min(*to), (*from).max(*to)));
        }
        Location::Complement(inner) => collect_ranges(inner, ranges),
        Location::Join(parts)
        | Location::Order(parts)
        | Location::Bond(parts)
        | Location::OneOf(parts) => {
            for part in parts {
                collect_ranges(part, ranges);
            }
        }
        Location::External(_, maybe_loc) => {
            if let Some(loc) = maybe_loc {
                collect_ranges(loc, ranges);
            }
        }
        Location::Gap(_) => {}
    }
}

/// Outermost complement decides the strand
fn is_reverse(location: &Location) -> bool {
    match location {
        Location::Complement(_) => true,
        Location::Join(parts) | Location::Order(parts) => {
            !parts.is_empty() && parts.iter().all(is_reverse)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::load_text;

    const PLASMID: &str = "\
LOCUS       pTiny                     24 bp    DNA     circular SYN 01-JAN-2024
DEFINITION  Tiny test plasmid.
ACCESSION   pTiny
VERSION     pTiny
KEYWORDS    .
SOURCE      synthetic construct
  ORGANISM  synthetic construct
            other sequences.
FEATURES             Location/Qualifiers
     gene            1..12
                     /gene=\"tinyA\"
     CDS             complement(13..24)
                     /label=\"tinyB\"
ORIGIN
        1 atgaaacccg ggtttaaata gtag
//
";

    #[test]
    fn test_parse_record_and_features() {
        let Loaded::Annotated {
            records, features, ..
        } = load_text(PLASMID, FileFormat::GenBank).unwrap()
        else {
            panic!("expected annotated record");
        };

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "pTiny");
        assert_eq!(records[0].residues.len(), 24);

        assert_eq!(features.columns, FEATURE_COLUMNS);
        assert_eq!(features.rows.len(), 2);
        assert_eq!(features.rows[0], ["pTiny", "gene", "1", "12", "+", "tinyA"]);
        assert_eq!(features.rows[1], ["pTiny", "CDS", "13", "24", "-", "tinyB"]);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(load_text("", FileFormat::GenBank).is_err());
    }

    #[test]
    fn test_collect_ranges_join() {
        let location = Location::Join(vec![
            Location::simple_range(0, 5),
            Location::simple_range(10, 20),
        ]);
        let mut ranges = Vec::new();
        collect_ranges(&location, &mut ranges);
        assert_eq!(ranges, vec![(0, 5), (10, 20)]);
        assert!(!is_reverse(&location));
        assert!(is_reverse(&Location::Complement(Box::new(location))));
    }
}
