//! Handlers that touch the filesystem: loads, saves, exports and plots.
//!
//! Loads parse and validate the whole file before staging anything, so a
//! malformed record anywhere leaves the workspace as it was.

use std::path::Path;

use tracing::info;

use crate::command::{default_plot_path, RecordKind};
use crate::core::sequence::SequenceRecord;
use crate::core::snapshot::sort_key;
use crate::core::types::Alphabet;
use crate::core::workspace::Entity;
use crate::engine::error::CommandError;
use crate::engine::handlers::sequence::sequence_report;
use crate::engine::handlers::{Change, Context, Found, Outcome};
use crate::export::ensure_parent;
use crate::export::fasta::write_fasta;
use crate::export::table::write_table;
use crate::export::text::write_lines;
use crate::export::workspace::{read_workspace, write_workspace};
use crate::ops::require_nucleotide;
use crate::parsing::{load_path, FileFormat};

/// Summarize what a load produced, one sentence per category
fn loaded_message(entities: &[Entity]) -> String {
    let sequences: Vec<&str> = entities
        .iter()
        .filter(|e| matches!(e, Entity::Sequence(_)))
        .map(Entity::name)
        .collect();

    let mut parts = Vec::new();
    if !sequences.is_empty() {
        parts.push(format!(
            "Loaded {} sequence(s) as {}.",
            sequences.len(),
            sequences.join(", ")
        ));
    }
    for entity in entities {
        match entity {
            Entity::Table(t) => parts.push(format!(
                "Loaded table {} ({} rows, {} columns).",
                t.name,
                t.rows.len(),
                t.columns.len()
            )),
            Entity::Report(r) => {
                parts.push(format!("Loaded notes {} ({} lines).", r.name, r.lines.len()));
            }
            Entity::Sequence(_) | Entity::Alignment(_) => {}
        }
    }
    parts.join(" ")
}

fn load(path: &str, format: FileFormat, name: &str, alphabet: Alphabet) -> Result<Outcome, CommandError> {
    let entities = load_path(Path::new(path), format)?.into_entities(name, alphabet)?;
    info!(path, format = %format, name, records = entities.len(), "Loaded file");
    Ok(Outcome::message(loaded_message(&entities)).insert_all(entities))
}

pub(super) fn load_sequence_file(alphabet: Alphabet, path: &str, name: &str) -> Result<Outcome, CommandError> {
    load(path, FileFormat::Fasta, name, alphabet)
}

pub(super) fn load_sequence_text(alphabet: Alphabet, text: &str, name: &str) -> Result<Outcome, CommandError> {
    let record = SequenceRecord::new(name, alphabet, text)
        .map_err(|e| CommandError::InvalidArgument(format!("Cannot load {name}: {e}")))?;
    if record.sequence.is_empty() {
        return Err(CommandError::InvalidArgument(format!(
            "Cannot load {name}: no residues given"
        )));
    }
    let message = format!(
        "Loaded {alphabet} sequence {name} ({} {}).",
        record.length(),
        alphabet.unit()
    );
    Ok(Outcome::message(message).insert(Entity::Sequence(record)))
}

/// Record formats that carry sequences read them as DNA
pub(super) fn load_records(kind: RecordKind, path: &str, name: &str) -> Result<Outcome, CommandError> {
    load(path, kind.file_format(Path::new(path)), name, Alphabet::Dna)
}

pub(super) fn load_file(path: &str, name: &str) -> Result<Outcome, CommandError> {
    load(path, FileFormat::detect(Path::new(path)), name, Alphabet::Dna)
}

pub(super) fn load_workspace(path: &str) -> Result<Outcome, CommandError> {
    let workspace = read_workspace(Path::new(path))?;
    let message = format!(
        "Loaded workspace from {path} ({} entities, {} history lines).",
        workspace.len(),
        workspace.history().len()
    );
    Ok(Outcome::message(message).change(Change::Replace(workspace)))
}

pub(super) fn save(ctx: &Context<'_>, name: &str, path: &str) -> Result<Outcome, CommandError> {
    let target = Path::new(path);
    let category = match ctx.lookup(name)? {
        Found::Sequence(record) => {
            write_fasta(target, &[record])?;
            "sequence"
        }
        Found::Alignment(alignment) => {
            let mut lines = alignment.lines.clone();
            lines.push(format!("Score: {}", alignment.score));
            write_lines(target, &lines)?;
            "alignment"
        }
        Found::Table(table) => {
            write_table(target, table)?;
            "table"
        }
        Found::Report(report) => {
            write_lines(target, &report.lines)?;
            "report"
        }
    };
    Ok(Outcome::message(format!("Saved {category} {name} to {path}.")))
}

/// A stored report, or a freshly built summary when `name` is a sequence
pub(super) fn write_report(ctx: &Context<'_>, name: &str, path: &str) -> Result<Outcome, CommandError> {
    let lines = match ctx.lookup(name) {
        Ok(Found::Report(report)) => report.lines.clone(),
        Ok(Found::Sequence(record)) => sequence_report(record)?,
        Ok(Found::Alignment(_) | Found::Table(_)) | Err(CommandError::MissingName { .. }) => {
            return Err(CommandError::MissingName {
                category: "report or sequence",
                name: name.to_string(),
            });
        }
        Err(e) => return Err(e),
    };
    write_lines(Path::new(path), &lines)?;
    Ok(Outcome::message(format!(
        "Wrote report of {name} ({} lines) to {path}.",
        lines.len()
    )))
}

pub(super) fn plot_sequences(ctx: &Context<'_>, name: &str, path: Option<&str>) -> Result<Outcome, CommandError> {
    let record = ctx.sequence(name)?;
    require_nucleotide(record.alphabet, "plot sequences")?;

    let path = path.map_or_else(|| default_plot_path(name), ToString::to_string);
    let target = Path::new(&path);
    ensure_parent(target)?;
    let plotter = ctx.integrations.plot(record, target)?;
    info!(name, path = %path, plotter = %plotter, "Plotted sequence");
    Ok(Outcome::message(format!(
        "Saved sequence plots to {path} ({plotter})."
    )))
}

pub(super) fn export_sequences(ctx: &Context<'_>, path: &str) -> Result<Outcome, CommandError> {
    let mut records: Vec<&SequenceRecord> = ctx.workspace.sequences().collect();
    if records.is_empty() {
        return Err(CommandError::InvalidArgument(
            "No sequences to export".to_string(),
        ));
    }
    records.sort_by_key(|r| sort_key(&r.name));
    write_fasta(Path::new(path), &records)?;
    Ok(Outcome::message(format!(
        "Exported {} sequence(s) to {path}.",
        records.len()
    )))
}

pub(super) fn export_table(ctx: &Context<'_>, table: &str, path: &str) -> Result<Outcome, CommandError> {
    let found = ctx.table(table)?;
    write_table(Path::new(path), found)?;
    Ok(Outcome::message(format!(
        "Exported table {table} ({} rows) to {path}.",
        found.rows.len()
    )))
}

pub(super) fn export_workspace(ctx: &Context<'_>, path: &str) -> Result<Outcome, CommandError> {
    write_workspace(Path::new(path), ctx.workspace)?;
    Ok(Outcome::message(format!(
        "Exported workspace ({} entities) to {path}.",
        ctx.workspace.len()
    )))
}
