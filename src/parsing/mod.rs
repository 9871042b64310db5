//! Parsers that turn bioinformatics files into workspace entities.
//!
//! Every format implements [`RecordParser`]: read a byte stream, produce
//! either raw sequences, a raw table, or both (annotated GenBank records).
//! Conversion into validated workspace entities happens in one place,
//! [`Loaded::into_entities`], so a malformed record anywhere in a file fails
//! the whole load before anything is committed.
//!
//! | Format  | Module        | Produces |
//! |---------|---------------|----------|
//! | FASTA   | [`fasta`]     | sequences (noodles) |
//! | FASTQ   | [`fastq`]     | sequences, quality length checked (noodles) |
//! | GenBank | [`genbank`]   | sequences + feature table (gb-io) |
//! | GFF3    | [`gff`]       | 9-column table |
//! | VCF     | [`vcf`]       | variant table |
//! | BAM     | [`bam`]       | alignment-record table (noodles) |
//! | CSV/TSV | [`tabular`]   | table (csv) |
//! | JSON    | [`json`]      | table (serde_json) |
//! | Text    | [`notes`]     | report lines |
//!
//! ## Example
//!
//! ```rust,no_run
//! use biospeak::core::types::Alphabet;
//! use biospeak::parsing::{load_path, FileFormat};
//! use std::path::Path;
//!
//! let loaded = load_path(Path::new("yeast.fa"), FileFormat::Fasta).unwrap();
//! let entities = loaded.into_entities("yeast", Alphabet::Dna).unwrap();
//! ```

pub mod bam;
pub mod fasta;
pub mod fastq;
pub mod genbank;
pub mod gff;
pub mod json;
pub mod notes;
pub mod tabular;
pub mod vcf;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use thiserror::Error;
use tracing::debug;

use crate::core::report::Report;
use crate::core::sequence::SequenceRecord;
use crate::core::table::Table;
use crate::core::types::Alphabet;
use crate::core::workspace::Entity;
use crate::utils::validation::{inner_extension, is_gzipped};

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("GenBank error: {0}")]
    GenBank(String),

    /// csv's own messages already start with "CSV error"
    #[error("{0}")]
    Csv(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Too many records: {0} exceeds maximum allowed (1000000)")]
    TooManyRecords(usize),
}

/// Formats the engine can load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fasta,
    Fastq,
    GenBank,
    Gff,
    Vcf,
    Bam,
    Csv,
    Tsv,
    Json,
    Text,
}

impl FileFormat {
    /// Short lowercase label, also recorded as a sequence's `source_format`
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fasta => "fasta",
            Self::Fastq => "fastq",
            Self::GenBank => "genbank",
            Self::Gff => "gff",
            Self::Vcf => "vcf",
            Self::Bam => "bam",
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Text => "text",
        }
    }

    /// Pick CSV or TSV for a generic table file from its extension.
    ///
    /// `.tsv`, `.tab`, `.txt` and `.gff` are tab-delimited, everything else is CSV.
    #[must_use]
    pub fn table_from_path(path: &Path) -> Self {
        match inner_extension(path).as_deref() {
            Some("tsv" | "tab" | "txt" | "gff") => Self::Tsv,
            _ => Self::Csv,
        }
    }

    /// Guess the loader for a file from its extension, looking through `.gz`.
    ///
    /// Unknown extensions fall back to FASTA, the most common input.
    #[must_use]
    pub fn detect(path: &Path) -> Self {
        match inner_extension(path).as_deref() {
            Some("fastq" | "fq") => Self::Fastq,
            Some("gb" | "gbk" | "genbank") => Self::GenBank,
            Some("gff" | "gff3") => Self::Gff,
            Some("vcf") => Self::Vcf,
            Some("bam") => Self::Bam,
            Some("csv") => Self::Csv,
            Some("tsv" | "tab") => Self::Tsv,
            Some("json") => Self::Json,
            Some("txt" | "md") => Self::Text,
            _ => Self::Fasta,
        }
    }

    /// BGZF containers carry their own compression
    fn self_compressed(self) -> bool {
        matches!(self, Self::Bam)
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One sequence as read from a file, before alphabet validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSequence {
    /// Record identifier from the file
    pub id: String,
    pub residues: String,
}

/// Header plus rows as read from a file, before table validation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Build a table header from static column names
    pub fn with_columns(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            rows: Vec::new(),
        }
    }
}

/// Everything a parser can produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loaded {
    Sequences {
        format: FileFormat,
        records: Vec<RawSequence>,
    },
    Table {
        format: FileFormat,
        table: RawTable,
    },
    /// Sequences with a feature table (GenBank)
    Annotated {
        format: FileFormat,
        records: Vec<RawSequence>,
        features: RawTable,
    },
    Lines(Vec<String>),
}

impl Loaded {
    /// Validate and name everything that was read.
    ///
    /// Sequences are named `name`, `name_2`, `name_3`, … in file order. A
    /// GenBank feature table, when non-empty, is named `name_features`.
    /// `alphabet` applies to sequence formats only.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidFormat` if any record has illegal residues
    /// or a table is malformed. Nothing is returned partially.
    pub fn into_entities(self, name: &str, alphabet: Alphabet) -> Result<Vec<Entity>, ParseError> {
        match self {
            Self::Sequences { format, records } => {
                sequences_to_entities(name, alphabet, format, records)
            }
            Self::Table { format, table } => {
                let description = format!("{format} table");
                Ok(vec![table_to_entity(name, table, description)?])
            }
            Self::Annotated {
                format,
                records,
                features,
            } => {
                let mut entities = sequences_to_entities(name, alphabet, format, records)?;
                if !features.rows.is_empty() {
                    let table_name = format!("{name}_features");
                    let description = format!("{format} features of {name}");
                    entities.push(table_to_entity(&table_name, features, description)?);
                }
                Ok(entities)
            }
            Self::Lines(lines) => Ok(vec![Entity::Report(
                Report::new(name, lines).with_description("notes"),
            )]),
        }
    }
}

fn sequences_to_entities(
    name: &str,
    alphabet: Alphabet,
    format: FileFormat,
    records: Vec<RawSequence>,
) -> Result<Vec<Entity>, ParseError> {
    if records.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "No sequences found in {format} input"
        )));
    }

    records
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let target = if i == 0 {
                name.to_string()
            } else {
                format!("{name}_{}", i + 1)
            };
            SequenceRecord::new(target, alphabet, &raw.residues)
                .map(|record| {
                    Entity::Sequence(
                        record
                            .with_description(raw.id.clone())
                            .with_source_format(format.label()),
                    )
                })
                .map_err(|e| ParseError::InvalidFormat(format!("Record '{}': {e}", raw.id)))
        })
        .collect()
}

fn table_to_entity(name: &str, raw: RawTable, description: String) -> Result<Entity, ParseError> {
    Table::new(name, raw.columns, raw.rows)
        .map(|t| Entity::Table(t.with_description(description)))
        .map_err(|e| ParseError::InvalidFormat(e.to_string()))
}

/// The one capability every format parser provides
pub trait RecordParser {
    fn format(&self) -> FileFormat;

    /// Read the whole stream. Any malformed record fails the whole parse.
    fn parse(&self, reader: &mut dyn BufRead) -> Result<Loaded, ParseError>;
}

/// Parser for `format`
#[must_use]
pub fn parser_for(format: FileFormat) -> Box<dyn RecordParser> {
    match format {
        FileFormat::Fasta => Box::new(fasta::FastaParser),
        FileFormat::Fastq => Box::new(fastq::FastqParser),
        FileFormat::GenBank => Box::new(genbank::GenBankParser),
        FileFormat::Gff => Box::new(gff::GffParser),
        FileFormat::Vcf => Box::new(vcf::VcfParser),
        FileFormat::Bam => Box::new(bam::BamParser),
        FileFormat::Csv => Box::new(tabular::DelimitedParser::new(FileFormat::Csv)),
        FileFormat::Tsv => Box::new(tabular::DelimitedParser::new(FileFormat::Tsv)),
        FileFormat::Json => Box::new(json::JsonParser),
        FileFormat::Text => Box::new(notes::NotesParser),
    }
}

/// Open `path`, transparently decompressing gzip for text formats
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_input(path: &Path, format: FileFormat) -> Result<Box<dyn BufRead>, ParseError> {
    let file = File::open(path)?;
    if is_gzipped(path) && !format.self_compressed() {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Load a file in the given format
///
/// # Errors
///
/// Returns `ParseError` if the file cannot be read or any record is malformed.
pub fn load_path(path: &Path, format: FileFormat) -> Result<Loaded, ParseError> {
    let parser = parser_for(format);
    debug!(path = %path.display(), format = %parser.format(), "Loading file");
    let mut reader = open_input(path, format)?;
    parser.parse(&mut reader)
}

/// Parse in-memory text in the given format
///
/// # Errors
///
/// Returns `ParseError` if any record is malformed.
pub fn load_text(text: &str, format: FileFormat) -> Result<Loaded, ParseError> {
    let mut reader = BufReader::new(text.as_bytes());
    parser_for(format).parse(&mut reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_from_path() {
        assert_eq!(FileFormat::table_from_path(Path::new("a.tsv")), FileFormat::Tsv);
        assert_eq!(FileFormat::table_from_path(Path::new("a.TAB")), FileFormat::Tsv);
        assert_eq!(FileFormat::table_from_path(Path::new("a.csv")), FileFormat::Csv);
        assert_eq!(FileFormat::table_from_path(Path::new("a.csv.gz")), FileFormat::Csv);
        assert_eq!(FileFormat::table_from_path(Path::new("noext")), FileFormat::Csv);
    }

    #[test]
    fn test_detect() {
        assert_eq!(FileFormat::detect(Path::new("reads.fq.gz")), FileFormat::Fastq);
        assert_eq!(FileFormat::detect(Path::new("pUC19.GBK")), FileFormat::GenBank);
        assert_eq!(FileFormat::detect(Path::new("calls.vcf.gz")), FileFormat::Vcf);
        assert_eq!(FileFormat::detect(Path::new("aln.bam")), FileFormat::Bam);
        assert_eq!(FileFormat::detect(Path::new("genome.fna")), FileFormat::Fasta);
        assert_eq!(FileFormat::detect(Path::new("mystery")), FileFormat::Fasta);
    }

    #[test]
    fn test_sequences_named_in_file_order() {
        let loaded = Loaded::Sequences {
            format: FileFormat::Fasta,
            records: vec![
                RawSequence {
                    id: "a".to_string(),
                    residues: "ACGT".to_string(),
                },
                RawSequence {
                    id: "b".to_string(),
                    residues: "GG".to_string(),
                },
            ],
        };

        let entities = loaded.into_entities("reads", Alphabet::Dna).unwrap();
        let names: Vec<_> = entities.iter().map(Entity::name).collect();
        assert_eq!(names, vec!["reads", "reads_2"]);
    }

    #[test]
    fn test_one_bad_record_fails_everything() {
        let loaded = Loaded::Sequences {
            format: FileFormat::Fasta,
            records: vec![
                RawSequence {
                    id: "good".to_string(),
                    residues: "ACGT".to_string(),
                },
                RawSequence {
                    id: "bad".to_string(),
                    residues: "AC!T".to_string(),
                },
            ],
        };

        let err = loaded.into_entities("x", Alphabet::Dna).unwrap_err();
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_empty_genbank_features_not_registered() {
        let loaded = Loaded::Annotated {
            format: FileFormat::GenBank,
            records: vec![RawSequence {
                id: "pUC".to_string(),
                residues: "ACGT".to_string(),
            }],
            features: RawTable::with_columns(&["type"]),
        };

        let entities = loaded.into_entities("p", Alphabet::Dna).unwrap();
        assert_eq!(entities.len(), 1);
    }
}
