//! Structured commands and the sentence grammar that produces them.
//!
//! A sentence is matched against an ordered template table
//! ([`grammar::templates`]); the first template that consumes every token
//! wins and builds one [`Command`] variant. Matching is purely syntactic:
//! names are not looked up and numbers are not range-checked here.

pub mod grammar;
pub mod parser;

use std::fmt;

use thiserror::Error;

use crate::core::types::Alphabet;
use crate::parsing::FileFormat;

pub use parser::Grammar;

/// Text that matched no template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized command: '{text}'")]
pub struct SyntaxError {
    pub text: String,
}

/// Integer capture; invalid text is kept so the handler can report it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Numeric {
    Int(i64),
    Invalid(String),
}

impl Numeric {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.parse().map_or_else(|_| Self::Invalid(raw.to_string()), Self::Int)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Invalid(raw) => write!(f, "{raw}"),
        }
    }
}

/// Record formats named by `load <kind> file ...`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Fastq,
    GenBank,
    Gff,
    Vcf,
    Bam,
    Table,
    Json,
    Notes,
}

impl RecordKind {
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fastq" => Some(Self::Fastq),
            "genbank" => Some(Self::GenBank),
            "gff" => Some(Self::Gff),
            "vcf" => Some(Self::Vcf),
            "bam" => Some(Self::Bam),
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "notes" => Some(Self::Notes),
            _ => None,
        }
    }

    /// Parser to use for `path`; generic tables pick CSV or TSV by extension
    #[must_use]
    pub fn file_format(self, path: &std::path::Path) -> FileFormat {
        match self {
            Self::Fastq => FileFormat::Fastq,
            Self::GenBank => FileFormat::GenBank,
            Self::Gff => FileFormat::Gff,
            Self::Vcf => FileFormat::Vcf,
            Self::Bam => FileFormat::Bam,
            Self::Table => FileFormat::table_from_path(path),
            Self::Json => FileFormat::Json,
            Self::Notes => FileFormat::Text,
        }
    }
}

/// One parsed sentence. Field names follow the grammar's slot names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    ListData,
    ListSequences,
    ListAlignments,
    ListTables,
    ListReports,
    ListIntegrations,
    ResetWorkspace,
    LoadSequenceFile {
        alphabet: Alphabet,
        path: String,
        name: String,
    },
    LoadSequenceText {
        alphabet: Alphabet,
        text: String,
        name: String,
    },
    LoadRecords {
        kind: RecordKind,
        path: String,
        name: String,
    },
    /// Format guessed from the file extension
    LoadFile {
        path: String,
        name: String,
    },
    LoadWorkspace {
        path: String,
    },
    Save {
        name: String,
        path: String,
    },
    Show {
        name: String,
    },
    Describe {
        name: String,
    },
    CountGc {
        name: String,
    },
    CountBases {
        name: String,
    },
    CountCodons {
        name: String,
    },
    FindMotif {
        motif: String,
        name: String,
    },
    Slice {
        name: String,
        start: Numeric,
        end: Numeric,
        new: String,
    },
    Split {
        name: String,
        length: Numeric,
        base: String,
    },
    JoinTables {
        first: String,
        second: String,
        column: String,
        new: String,
    },
    Join {
        first: String,
        second: String,
        new: String,
    },
    Transcribe {
        name: String,
        new: String,
    },
    TranslateFrames {
        name: String,
        new: String,
    },
    Translate {
        name: String,
        new: String,
    },
    ReverseComplement {
        name: String,
        new: String,
    },
    Reverse {
        name: String,
        new: String,
    },
    Complement {
        name: String,
        new: String,
    },
    ScanOrf {
        name: String,
        min: Numeric,
        base: String,
    },
    AlignGroup {
        members: Vec<String>,
        name: String,
    },
    Align {
        first: String,
        second: String,
        name: String,
        mode: String,
    },
    Compare {
        first: String,
        second: String,
    },
    MakeReport {
        name: String,
        new: String,
    },
    WriteReport {
        name: String,
        path: String,
    },
    FilterTable {
        table: String,
        column: String,
        value: String,
        new: String,
    },
    PickColumns {
        columns: Vec<String>,
        table: String,
        new: String,
    },
    AnalyzeTable {
        table: String,
    },
    PlotSequences {
        name: String,
        path: Option<String>,
    },
    ExportSequences {
        path: String,
    },
    ExportTable {
        table: String,
        path: String,
    },
    ExportWorkspace {
        path: String,
    },
    Verify,
}

impl Command {
    /// Stable verb name, used in logs and by grammar self-checks
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Exit => "exit",
            Self::Help => "help",
            Self::ListData => "list_data",
            Self::ListSequences => "list_sequences",
            Self::ListAlignments => "list_alignments",
            Self::ListTables => "list_tables",
            Self::ListReports => "list_reports",
            Self::ListIntegrations => "list_integrations",
            Self::ResetWorkspace => "reset_workspace",
            Self::LoadSequenceFile { .. } => "load_sequence_file",
            Self::LoadSequenceText { .. } => "load_sequence_text",
            Self::LoadRecords { .. } => "load_records",
            Self::LoadFile { .. } => "load_file",
            Self::LoadWorkspace { .. } => "load_workspace",
            Self::Save { .. } => "save",
            Self::Show { .. } => "show",
            Self::Describe { .. } => "describe",
            Self::CountGc { .. } => "count_gc",
            Self::CountBases { .. } => "count_bases",
            Self::CountCodons { .. } => "count_codons",
            Self::FindMotif { .. } => "find_motif",
            Self::Slice { .. } => "slice",
            Self::Split { .. } => "split",
            Self::JoinTables { .. } => "join_tables",
            Self::Join { .. } => "join",
            Self::Transcribe { .. } => "transcribe",
            Self::TranslateFrames { .. } => "translate_frames",
            Self::Translate { .. } => "translate",
            Self::ReverseComplement { .. } => "reverse_complement",
            Self::Reverse { .. } => "reverse",
            Self::Complement { .. } => "complement",
            Self::ScanOrf { .. } => "scan_orf",
            Self::AlignGroup { .. } => "align_group",
            Self::Align { .. } => "align",
            Self::Compare { .. } => "compare",
            Self::MakeReport { .. } => "make_report",
            Self::WriteReport { .. } => "write_report",
            Self::FilterTable { .. } => "filter_table",
            Self::PickColumns { .. } => "pick_columns",
            Self::AnalyzeTable { .. } => "analyze_table",
            Self::PlotSequences { .. } => "plot_sequences",
            Self::ExportSequences { .. } => "export_sequences",
            Self::ExportTable { .. } => "export_table",
            Self::ExportWorkspace { .. } => "export_workspace",
            Self::Verify => "verify",
        }
    }

    /// Commands that can change the workspace
    #[must_use]
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            Self::Exit
                | Self::Help
                | Self::ListData
                | Self::ListSequences
                | Self::ListAlignments
                | Self::ListTables
                | Self::ListReports
                | Self::ListIntegrations
                | Self::Save { .. }
                | Self::Show { .. }
                | Self::Describe { .. }
                | Self::CountGc { .. }
                | Self::CountBases { .. }
                | Self::CountCodons { .. }
                | Self::FindMotif { .. }
                | Self::Compare { .. }
                | Self::WriteReport { .. }
                | Self::PlotSequences { .. }
                | Self::ExportSequences { .. }
                | Self::ExportTable { .. }
                | Self::ExportWorkspace { .. }
        )
    }
}

/// Default plot target when `to file` is omitted
#[must_use]
pub fn default_plot_path(name: &str) -> String {
    format!("{name}_metrics.tsv")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_parse() {
        assert_eq!(Numeric::parse("12"), Numeric::Int(12));
        assert_eq!(Numeric::parse("-3"), Numeric::Int(-3));
        assert_eq!(Numeric::parse("ten"), Numeric::Invalid("ten".to_string()));
        assert_eq!(Numeric::parse("1.5").to_string(), "1.5");
    }

    #[test]
    fn test_record_kind_table_format() {
        use std::path::Path;
        assert_eq!(
            RecordKind::Table.file_format(Path::new("x.tsv")),
            FileFormat::Tsv
        );
        assert_eq!(
            RecordKind::Table.file_format(Path::new("x.csv")),
            FileFormat::Csv
        );
        assert_eq!(RecordKind::parse("GenBank"), Some(RecordKind::GenBank));
        assert_eq!(RecordKind::parse("sam"), None);
    }

    #[test]
    fn test_mutating_classification() {
        assert!(!Command::ListData.is_mutating());
        assert!(Command::ResetWorkspace.is_mutating());
        assert!(Command::Verify.is_mutating());
    }
}
