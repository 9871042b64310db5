//! One handler per command verb.
//!
//! Handlers only read the workspace. They return an [`Outcome`] whose staged
//! [`Change`]s the engine commits after the handler has fully succeeded.

mod alignment;
mod io;
mod sequence;
mod table;
mod view;

use crate::alignment::integration::IntegrationRegistry;
use crate::command::{Command, Grammar, Numeric};
use crate::core::alignment::AlignmentResult;
use crate::core::report::Report;
use crate::core::sequence::SequenceRecord;
use crate::core::table::Table;
use crate::core::types::Category;
use crate::core::workspace::{Entity, Workspace};
use crate::engine::error::CommandError;
use crate::engine::EngineConfig;

/// A workspace mutation waiting for commit
#[derive(Debug)]
pub(crate) enum Change {
    Insert(Entity),
    Replace(Workspace),
    Clear,
}

/// Handler result: user-facing message plus staged changes
#[derive(Debug)]
pub(crate) struct Outcome {
    pub message: String,
    pub changes: Vec<Change>,
}

impl Outcome {
    fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            changes: Vec::new(),
        }
    }

    fn lines(lines: &[String]) -> Self {
        Self::message(lines.join("\n"))
    }

    fn insert(mut self, entity: Entity) -> Self {
        self.changes.push(Change::Insert(entity));
        self
    }

    fn insert_all(mut self, entities: impl IntoIterator<Item = Entity>) -> Self {
        self.changes.extend(entities.into_iter().map(Change::Insert));
        self
    }

    fn change(mut self, change: Change) -> Self {
        self.changes.push(change);
        self
    }
}

/// Read-only view handed to every handler
pub(crate) struct Context<'a> {
    pub workspace: &'a Workspace,
    pub config: &'a EngineConfig,
    pub integrations: &'a IntegrationRegistry,
    pub grammar: &'a Grammar,
}

/// An entity found by a cross-category lookup
#[derive(Clone, Copy)]
enum Found<'a> {
    Sequence(&'a SequenceRecord),
    Alignment(&'a AlignmentResult),
    Table(&'a Table),
    Report(&'a Report),
}

impl<'a> Context<'a> {
    fn sequence(&self, name: &str) -> Result<&'a SequenceRecord, CommandError> {
        self.workspace.sequence(name).ok_or_else(|| missing("sequence", name))
    }

    fn table(&self, name: &str) -> Result<&'a Table, CommandError> {
        self.workspace.table(name).ok_or_else(|| missing("table", name))
    }

    /// Resolve `name` across all four categories; present in more than one is an error
    fn lookup(&self, name: &str) -> Result<Found<'a>, CommandError> {
        let categories = self.workspace.categories_of(name);
        match categories.as_slice() {
            [] => Err(missing("entity", name)),
            [category] => {
                let found = match category {
                    Category::Sequence => self.workspace.sequence(name).map(Found::Sequence),
                    Category::Alignment => self.workspace.alignment(name).map(Found::Alignment),
                    Category::Table => self.workspace.table(name).map(Found::Table),
                    Category::Report => self.workspace.report(name).map(Found::Report),
                };
                found.ok_or_else(|| missing("entity", name))
            }
            many => Err(CommandError::AmbiguousName {
                name: name.to_string(),
                categories: many
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" and a "),
            }),
        }
    }
}

fn missing(category: &'static str, name: &str) -> CommandError {
    CommandError::MissingName {
        category,
        name: name.to_string(),
    }
}

/// Integer value of a numeric capture
fn integer(value: &Numeric, what: &'static str) -> Result<i64, CommandError> {
    match value {
        Numeric::Int(n) => Ok(*n),
        Numeric::Invalid(raw) => Err(CommandError::InvalidNumber {
            what,
            value: raw.clone(),
        }),
    }
}

/// `source → new (length unit)`
fn derived_message(source: &str, record: &SequenceRecord) -> String {
    format!(
        "{source} → {} ({} {})",
        record.name,
        record.length(),
        record.alphabet.unit()
    )
}

pub(crate) fn handle(command: &Command, ctx: &Context<'_>) -> Result<Outcome, CommandError> {
    match command {
        // The engine answers exit itself
        Command::Exit => Ok(Outcome::message("Goodbye.")),
        Command::Help => Ok(view::help(ctx)),
        Command::ListData => Ok(view::list_data(ctx)),
        Command::ListSequences => Ok(view::list_sequences(ctx)),
        Command::ListAlignments => Ok(view::list_alignments(ctx)),
        Command::ListTables => Ok(view::list_tables(ctx)),
        Command::ListReports => Ok(view::list_reports(ctx)),
        Command::ListIntegrations => Ok(view::list_integrations(ctx)),
        Command::ResetWorkspace => Ok(Outcome::message("Workspace cleared.").change(Change::Clear)),
        Command::LoadSequenceFile {
            alphabet,
            path,
            name,
        } => io::load_sequence_file(*alphabet, path, name),
        Command::LoadSequenceText {
            alphabet,
            text,
            name,
        } => io::load_sequence_text(*alphabet, text, name),
        Command::LoadRecords { kind, path, name } => io::load_records(*kind, path, name),
        Command::LoadFile { path, name } => io::load_file(path, name),
        Command::LoadWorkspace { path } => io::load_workspace(path),
        Command::Save { name, path } => io::save(ctx, name, path),
        Command::Show { name } => view::show(ctx, name),
        Command::Describe { name } => view::describe(ctx, name),
        Command::CountGc { name } => sequence::count_gc(ctx, name),
        Command::CountBases { name } => sequence::count_bases(ctx, name),
        Command::CountCodons { name } => sequence::count_codons(ctx, name),
        Command::FindMotif { motif, name } => sequence::find_motif(ctx, motif, name),
        Command::Slice {
            name,
            start,
            end,
            new,
        } => sequence::slice(ctx, name, start, end, new),
        Command::Split { name, length, base } => sequence::split(ctx, name, length, base),
        Command::JoinTables {
            first,
            second,
            column,
            new,
        } => table::join_tables(ctx, first, second, column, new),
        Command::Join { first, second, new } => sequence::join(ctx, first, second, new),
        Command::Transcribe { name, new } => sequence::transcribe(ctx, name, new),
        Command::TranslateFrames { name, new } => sequence::translate_frames(ctx, name, new),
        Command::Translate { name, new } => sequence::translate(ctx, name, new),
        Command::ReverseComplement { name, new } => sequence::reverse_complement(ctx, name, new),
        Command::Reverse { name, new } => sequence::reverse(ctx, name, new),
        Command::Complement { name, new } => sequence::complement(ctx, name, new),
        Command::ScanOrf { name, min, base } => sequence::scan_orf(ctx, name, min, base),
        Command::AlignGroup { members, name } => alignment::align_group(ctx, members, name),
        Command::Align {
            first,
            second,
            name,
            mode,
        } => alignment::align(ctx, first, second, name, mode),
        Command::Compare { first, second } => alignment::compare(ctx, first, second),
        Command::MakeReport { name, new } => sequence::make_report(ctx, name, new),
        Command::WriteReport { name, path } => io::write_report(ctx, name, path),
        Command::FilterTable {
            table,
            column,
            value,
            new,
        } => table::filter_table(ctx, table, column, value, new),
        Command::PickColumns {
            columns,
            table,
            new,
        } => table::pick_columns(ctx, columns, table, new),
        Command::AnalyzeTable { table } => table::analyze_table(ctx, table),
        Command::PlotSequences { name, path } => io::plot_sequences(ctx, name, path.as_deref()),
        Command::ExportSequences { path } => io::export_sequences(ctx, path),
        Command::ExportTable { table, path } => io::export_table(ctx, table, path),
        Command::ExportWorkspace { path } => io::export_workspace(ctx, path),
        Command::Verify => Ok(view::verify(ctx)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Alphabet;

    #[test]
    fn test_lookup_ambiguous_name() {
        let mut ws = Workspace::new();
        ws.insert(Entity::Sequence(
            SequenceRecord::new("x", Alphabet::Dna, "ACGT").unwrap(),
        ));
        ws.insert(Entity::Report(Report::new("x", vec![])));
        let config = EngineConfig::default();
        let integrations = IntegrationRegistry::default();
        let grammar = Grammar::new();
        let ctx = Context {
            workspace: &ws,
            config: &config,
            integrations: &integrations,
            grammar: &grammar,
        };

        let err = ctx.lookup("x").err().unwrap();
        assert_eq!(
            err.to_string(),
            "'x' is ambiguous: it names a sequence and a report"
        );
        assert!(matches!(ctx.lookup("y"), Err(CommandError::MissingName { .. })));
        assert!(ctx.sequence("x").is_ok());
    }

    #[test]
    fn test_integer() {
        assert_eq!(integer(&Numeric::Int(3), "start").unwrap(), 3);
        let err = integer(&Numeric::Invalid("x".to_string()), "start").unwrap_err();
        assert_eq!(err.to_string(), "'x' is not a valid start");
    }
}
