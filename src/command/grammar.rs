//! The ordered template table.
//!
//! Order is match priority: longer literal prefixes come before the generic
//! templates they would otherwise be confused with (`align group` before
//! `align`, `join table` before `join`, `reverse complement` before
//! `reverse`). Every template carries an example sentence that must parse
//! back to that same template; `verify` checks this.

use crate::command::parser::Captures;
use crate::command::{Command, RecordKind};

/// One grammar entry
#[derive(Clone, Copy)]
pub struct Template {
    pub pattern: &'static str,
    pub example: &'static str,
    pub build: fn(&Captures) -> Command,
}

impl Template {
    /// Pattern as shown by `help`, slot kinds stripped
    #[must_use]
    pub fn usage(&self) -> String {
        self.pattern
            .split_whitespace()
            .map(|piece| match piece.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
                Some(slot) => match slot.split_once(':') {
                    Some((name, "text" | "list")) => format!("<{name}...>"),
                    Some((name, _)) => format!("<{name}>"),
                    None => format!("<{slot}>"),
                },
                None => piece.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

fn t(pattern: &'static str, example: &'static str, build: fn(&Captures) -> Command) -> Template {
    Template {
        pattern,
        example,
        build,
    }
}

fn records(kind: RecordKind, c: &Captures) -> Command {
    Command::LoadRecords {
        kind,
        path: c.text("path"),
        name: c.text("name"),
    }
}

/// Every template in match-priority order
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn templates() -> Vec<Template> {
    vec![
        t("exit|quit|close|leave", "exit", |_| Command::Exit),
        t("help", "help", |_| Command::Help),
        t("list data", "list data", |_| Command::ListData),
        t("list sequences", "list sequences", |_| Command::ListSequences),
        t("list alignments", "list alignments", |_| Command::ListAlignments),
        t("list tables", "list tables", |_| Command::ListTables),
        t("list reports", "list reports", |_| Command::ListReports),
        t("list integrations", "list integrations", |_| Command::ListIntegrations),
        t("reset workspace", "reset workspace", |_| Command::ResetWorkspace),
        t(
            "load workspace file <path:text>",
            "load workspace file session.json",
            |c| Command::LoadWorkspace { path: c.text("path") },
        ),
        t(
            "load <alphabet:alphabet> file <path:text> as <name>",
            "load dna file data/yeast.fa as yeast",
            |c| Command::LoadSequenceFile {
                alphabet: c.alphabet("alphabet"),
                path: c.text("path"),
                name: c.text("name"),
            },
        ),
        t(
            "load <alphabet:alphabet> text <text:text> as <name>",
            "load dna text ACGTACGT as s1",
            |c| Command::LoadSequenceText {
                alphabet: c.alphabet("alphabet"),
                text: c.text("text"),
                name: c.text("name"),
            },
        ),
        t(
            "load fastq file <path:text> as <name>",
            "load fastq file reads.fq as reads",
            |c| records(RecordKind::Fastq, c),
        ),
        t(
            "load genbank file <path:text> as <name>",
            "load genbank file plasmid.gb as plasmid",
            |c| records(RecordKind::GenBank, c),
        ),
        t(
            "load gff file <path:text> as <name>",
            "load gff file genes.gff3 as genes",
            |c| records(RecordKind::Gff, c),
        ),
        t(
            "load vcf file <path:text> as <name>",
            "load vcf file calls.vcf.gz as calls",
            |c| records(RecordKind::Vcf, c),
        ),
        t(
            "load bam file <path:text> as <name>",
            "load bam file sample.bam as hits",
            |c| records(RecordKind::Bam, c),
        ),
        t(
            "load table file <path:text> as <name>",
            "load table file samples.csv as samples",
            |c| records(RecordKind::Table, c),
        ),
        t(
            "load json file <path:text> as <name>",
            "load json file meta.json as meta",
            |c| records(RecordKind::Json, c),
        ),
        t(
            "load notes file <path:text> as <name>",
            "load notes file notes.txt as notes",
            |c| records(RecordKind::Notes, c),
        ),
        t(
            "load file <path:text> as <name>",
            "load file reads.fastq as reads",
            |c| Command::LoadFile {
                path: c.text("path"),
                name: c.text("name"),
            },
        ),
        t(
            "save <name> to file <path:text>",
            "save s1 to file out/s1.fa",
            |c| Command::Save {
                name: c.text("name"),
                path: c.text("path"),
            },
        ),
        t("show <name>", "show s1", |c| Command::Show { name: c.text("name") }),
        t("describe <name>", "describe s1", |c| Command::Describe { name: c.text("name") }),
        t("count gc of <name>", "count gc of s1", |c| Command::CountGc { name: c.text("name") }),
        t("count bases of <name>", "count bases of s1", |c| Command::CountBases {
            name: c.text("name"),
        }),
        t("count codons of <name>", "count codons of s1", |c| Command::CountCodons {
            name: c.text("name"),
        }),
        t(
            "find motif <motif> in <name>",
            "find motif GAATTC in s1",
            |c| Command::FindMotif {
                motif: c.text("motif"),
                name: c.text("name"),
            },
        ),
        t(
            "slice <name> from <start:int> to <end:int> as <new>",
            "slice s1 from 1 to 4 as s1a",
            |c| Command::Slice {
                name: c.text("name"),
                start: c.int("start"),
                end: c.int("end"),
                new: c.text("new"),
            },
        ),
        t(
            "split <name> every <length:int> as <base>",
            "split s1 every 3 as piece",
            |c| Command::Split {
                name: c.text("name"),
                length: c.int("length"),
                base: c.text("base"),
            },
        ),
        t(
            "join table <first> with <second> on column <column> as <new>",
            "join table samples with counts on column id as merged",
            |c| Command::JoinTables {
                first: c.text("first"),
                second: c.text("second"),
                column: c.text("column"),
                new: c.text("new"),
            },
        ),
        t(
            "join <first> with <second> as <new>",
            "join s1 with s2 as s12",
            |c| Command::Join {
                first: c.text("first"),
                second: c.text("second"),
                new: c.text("new"),
            },
        ),
        t(
            "transcribe <name> as <new>",
            "transcribe s1 as s1_rna",
            |c| Command::Transcribe {
                name: c.text("name"),
                new: c.text("new"),
            },
        ),
        t(
            "translate frames of <name> as <new>",
            "translate frames of s1 as s1_frames",
            |c| Command::TranslateFrames {
                name: c.text("name"),
                new: c.text("new"),
            },
        ),
        t(
            "translate <name> as <new>",
            "translate s1 as s1_protein",
            |c| Command::Translate {
                name: c.text("name"),
                new: c.text("new"),
            },
        ),
        t(
            "reverse complement <name> as <new>",
            "reverse complement s1 as s1_rc",
            |c| Command::ReverseComplement {
                name: c.text("name"),
                new: c.text("new"),
            },
        ),
        t("reverse <name> as <new>", "reverse s1 as s1_rev", |c| Command::Reverse {
            name: c.text("name"),
            new: c.text("new"),
        }),
        t(
            "complement <name> as <new>",
            "complement s1 as s1_comp",
            |c| Command::Complement {
                name: c.text("name"),
                new: c.text("new"),
            },
        ),
        t(
            "scan orf of <name> minimum <min:int> as <base>",
            "scan orf of s1 minimum 30 as s1_orf",
            |c| Command::ScanOrf {
                name: c.text("name"),
                min: c.int("min"),
                base: c.text("base"),
            },
        ),
        t(
            "align group <members:list> as <name>",
            "align group s1 s2 s3 as trio",
            |c| Command::AlignGroup {
                members: c.list("members"),
                name: c.text("name"),
            },
        ),
        t(
            "align <first> with <second> as <name> using <mode>",
            "align s1 with s2 as pair using global",
            |c| Command::Align {
                first: c.text("first"),
                second: c.text("second"),
                name: c.text("name"),
                mode: c.text("mode"),
            },
        ),
        t("compare <first> with <second>", "compare s1 with s2", |c| Command::Compare {
            first: c.text("first"),
            second: c.text("second"),
        }),
        t(
            "make report for <name> as <new>",
            "make report for s1 as s1_report",
            |c| Command::MakeReport {
                name: c.text("name"),
                new: c.text("new"),
            },
        ),
        t(
            "write report of <name> to file <path:text>",
            "write report of s1_report to file out/report.txt",
            |c| Command::WriteReport {
                name: c.text("name"),
                path: c.text("path"),
            },
        ),
        t(
            "filter table <table> keep column <column> equals <value:text> as <new>",
            "filter table samples keep column tissue equals liver as liver_samples",
            |c| Command::FilterTable {
                table: c.text("table"),
                column: c.text("column"),
                value: c.text("value"),
                new: c.text("new"),
            },
        ),
        t(
            "pick columns <columns:list> from <table> as <new>",
            "pick columns id, tissue from samples as slim",
            |c| Command::PickColumns {
                columns: c.list("columns"),
                table: c.text("table"),
                new: c.text("new"),
            },
        ),
        t("analyze table <table>", "analyze table samples", |c| Command::AnalyzeTable {
            table: c.text("table"),
        }),
        t(
            "plot sequences <name> to file <path:text>",
            "plot sequences s1 to file out/s1_gc.tsv",
            |c| Command::PlotSequences {
                name: c.text("name"),
                path: c.optional_text("path"),
            },
        ),
        t("plot sequences <name>", "plot sequences s1", |c| Command::PlotSequences {
            name: c.text("name"),
            path: None,
        }),
        t(
            "export sequences to <path:text>",
            "export sequences to out/all.fa",
            |c| Command::ExportSequences { path: c.text("path") },
        ),
        t(
            "export table <table> to <path:text>",
            "export table samples to out/samples.tsv",
            |c| Command::ExportTable {
                table: c.text("table"),
                path: c.text("path"),
            },
        ),
        t(
            "export workspace to <path:text>",
            "export workspace to out/session.json",
            |c| Command::ExportWorkspace { path: c.text("path") },
        ),
        t("verify project", "verify project", |_| Command::Verify),
        t("verify", "verify", |_| Command::Verify),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_strips_kinds() {
        let table = templates();
        let slice = table.iter().find(|t| t.pattern.starts_with("slice")).unwrap();
        assert_eq!(slice.usage(), "slice <name> from <start> to <end> as <new>");

        let group = table.iter().find(|t| t.pattern.starts_with("align group")).unwrap();
        assert_eq!(group.usage(), "align group <members...> as <name>");
    }

    #[test]
    fn test_patterns_unique() {
        let table = templates();
        let mut patterns: Vec<_> = table.iter().map(|t| t.pattern).collect();
        patterns.sort_unstable();
        patterns.dedup();
        assert_eq!(patterns.len(), table.len());
    }
}
