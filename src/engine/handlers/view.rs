use crate::core::snapshot::sort_key;
use crate::core::workspace::Entity;
use crate::engine::error::CommandError;
use crate::engine::handlers::{Context, Found, Outcome};
use crate::engine::verify;

/// Table rows printed by `show` before truncating
const SHOW_ROWS: usize = 20;

pub(super) fn help(ctx: &Context<'_>) -> Outcome {
    let mut lines = vec!["Available commands:".to_string()];
    lines.extend(ctx.grammar.templates().map(|t| format!("  {}", t.usage())));
    Outcome::lines(&lines)
}

/// Entries sorted the way snapshots sort them
fn sorted<'a, T: 'a>(items: impl Iterator<Item = &'a T>, name: fn(&T) -> &str) -> Vec<&'a T> {
    let mut items: Vec<&T> = items.collect();
    items.sort_by_key(|item| sort_key(name(item)));
    items
}

fn sequence_lines(ctx: &Context<'_>) -> Vec<String> {
    sorted(ctx.workspace.sequences(), |s| &s.name)
        .into_iter()
        .map(|s| format!("  {} ({}, {} {})", s.name, s.alphabet, s.length(), s.alphabet.unit()))
        .collect()
}

fn alignment_lines(ctx: &Context<'_>) -> Vec<String> {
    sorted(ctx.workspace.alignments(), |a| &a.name)
        .into_iter()
        .map(|a| {
            format!(
                "  {} ({}, score {}, members {})",
                a.name,
                a.method,
                a.score,
                a.members.join(", ")
            )
        })
        .collect()
}

fn table_lines(ctx: &Context<'_>) -> Vec<String> {
    sorted(ctx.workspace.tables(), |t| &t.name)
        .into_iter()
        .map(|t| format!("  {} ({} rows, {} columns)", t.name, t.rows.len(), t.columns.len()))
        .collect()
}

fn report_lines(ctx: &Context<'_>) -> Vec<String> {
    sorted(ctx.workspace.reports(), |r| &r.name)
        .into_iter()
        .map(|r| format!("  {} ({} lines)", r.name, r.lines.len()))
        .collect()
}

fn listing(title: &str, entries: Vec<String>) -> Vec<String> {
    if entries.is_empty() {
        vec![format!("No {} in the workspace.", title.to_lowercase())]
    } else {
        let mut lines = vec![format!("{title}:")];
        lines.extend(entries);
        lines
    }
}

pub(super) fn list_data(ctx: &Context<'_>) -> Outcome {
    if ctx.workspace.is_empty() {
        return Outcome::message("Workspace is empty.");
    }
    let mut lines = Vec::new();
    for (title, entries) in [
        ("Sequences", sequence_lines(ctx)),
        ("Alignments", alignment_lines(ctx)),
        ("Tables", table_lines(ctx)),
        ("Reports", report_lines(ctx)),
    ] {
        if !entries.is_empty() {
            lines.push(format!("{title}:"));
            lines.extend(entries);
        }
    }
    Outcome::lines(&lines)
}

pub(super) fn list_sequences(ctx: &Context<'_>) -> Outcome {
    Outcome::lines(&listing("Sequences", sequence_lines(ctx)))
}

pub(super) fn list_alignments(ctx: &Context<'_>) -> Outcome {
    Outcome::lines(&listing("Alignments", alignment_lines(ctx)))
}

pub(super) fn list_tables(ctx: &Context<'_>) -> Outcome {
    Outcome::lines(&listing("Tables", table_lines(ctx)))
}

pub(super) fn list_reports(ctx: &Context<'_>) -> Outcome {
    Outcome::lines(&listing("Reports", report_lines(ctx)))
}

pub(super) fn list_integrations(ctx: &Context<'_>) -> Outcome {
    let mut lines = vec!["Integrations:".to_string()];
    for status in ctx.integrations.status() {
        let state = if status.available { "available" } else { "not available" };
        lines.push(format!("  {}: {} ({state})", status.kind, status.name));
    }
    Outcome::lines(&lines)
}

pub(super) fn show(ctx: &Context<'_>, name: &str) -> Result<Outcome, CommandError> {
    let lines = match ctx.lookup(name)? {
        Found::Sequence(s) => vec![
            format!("{} ({}, {} {})", s.name, s.alphabet, s.length(), s.alphabet.unit()),
            s.sequence.clone(),
        ],
        Found::Alignment(a) => {
            let mut lines = vec![format!("{} ({})", a.name, a.method)];
            lines.extend(a.lines.iter().cloned());
            lines.push(format!("Score: {}", a.score));
            lines
        }
        Found::Table(t) => {
            let mut lines = vec![t.columns.join("\t")];
            lines.extend(t.rows.iter().take(SHOW_ROWS).map(|row| row.join("\t")));
            if t.rows.len() > SHOW_ROWS {
                lines.push(format!("... {} more rows", t.rows.len() - SHOW_ROWS));
            }
            lines
        }
        Found::Report(r) => r.lines.clone(),
    };
    Ok(Outcome::lines(&lines))
}

pub(super) fn describe(ctx: &Context<'_>, name: &str) -> Result<Outcome, CommandError> {
    let mut lines = match ctx.lookup(name)? {
        Found::Sequence(s) => {
            let mut lines = vec![
                format!("Sequence {}", s.name),
                format!("Alphabet: {}", s.alphabet),
                format!("Length: {} {}", s.length(), s.alphabet.unit()),
                format!("MD5: {}", s.md5()),
            ];
            if let Some(format) = &s.source_format {
                lines.push(format!("Source format: {format}"));
            }
            lines.push(describe_text(&s.description));
            lines
        }
        Found::Alignment(a) => vec![
            format!("Alignment {}", a.name),
            format!("Method: {}", a.method),
            format!("Members: {}", a.members.join(", ")),
            format!("Columns: {}", a.lines.first().map_or(0, |l| alignment_width(l))),
            format!("Score: {}", a.score),
        ],
        Found::Table(t) => vec![
            format!("Table {}", t.name),
            format!("Rows: {}", t.rows.len()),
            format!("Columns: {}", t.columns.join(", ")),
            describe_text(&t.description),
        ],
        Found::Report(r) => vec![
            format!("Report {}", r.name),
            format!("Lines: {}", r.lines.len()),
            describe_text(&r.description),
        ],
    };
    lines.retain(|l| !l.is_empty());
    Ok(Outcome::lines(&lines))
}

/// Residue columns in one display row; group rows carry a `name: ` prefix
fn alignment_width(row: &str) -> usize {
    row.rsplit_once(": ").map_or(row, |(_, residues)| residues).len()
}

fn describe_text(description: &str) -> String {
    if description.is_empty() {
        String::new()
    } else {
        format!("Description: {description}")
    }
}

pub(super) fn verify(ctx: &Context<'_>) -> Outcome {
    let report = verify::run(ctx.workspace, ctx.grammar);
    Outcome::lines(&report.lines).insert(Entity::Report(report))
}

#[cfg(test)]
mod tests {
    use crate::engine::result::Status;
    use crate::engine::Engine;

    fn engine() -> Engine {
        let mut engine = Engine::default();
        engine.execute_command("load dna text ACGTACGT as s1");
        engine.execute_command("load dna text GGCC as a0");
        engine.execute_command("align s1 with s1 as self using global");
        engine
    }

    #[test]
    fn test_help_lists_every_template() {
        let mut engine = Engine::default();
        let result = engine.execute_command("help");
        let count = engine.grammar().templates().count();
        assert_eq!(result.message.lines().count(), count + 1);
        assert!(result.message.contains("  slice <name> from <start> to <end> as <new>"));
    }

    #[test]
    fn test_list_sequences_sorted() {
        let mut engine = engine();
        let result = engine.execute_command("list sequences");
        assert_eq!(
            result.message,
            "Sequences:\n  a0 (dna, 4 bp)\n  s1 (dna, 8 bp)"
        );

        let result = engine.execute_command("list tables");
        assert_eq!(result.message, "No tables in the workspace.");
    }

    #[test]
    fn test_list_data_sections() {
        let mut engine = engine();
        let result = engine.execute_command("list data");
        assert!(result.message.starts_with("Sequences:\n"));
        assert!(result.message.contains("Alignments:\n  self (global, score 8, members s1, s1)"));
        assert!(!result.message.contains("Tables:"));

        let mut empty = Engine::default();
        assert_eq!(empty.execute_command("list data").message, "Workspace is empty.");
    }

    #[test]
    fn test_list_integrations_includes_fallbacks() {
        let mut engine = Engine::default();
        let result = engine.execute_command("list integrations");
        assert!(result
            .message
            .contains("aligner: progressive needleman-wunsch (available)"));
        assert!(result.message.contains("plotter: gc trend table (available)"));
    }

    #[test]
    fn test_show_and_describe() {
        let mut engine = engine();
        let result = engine.execute_command("show s1");
        assert_eq!(result.message, "s1 (dna, 8 bp)\nACGTACGT");

        let result = engine.execute_command("describe self");
        assert!(result.message.contains("Members: s1, s1"));
        assert!(result.message.contains("Columns: 8"));

        let result = engine.execute_command("describe nothing");
        assert_eq!(result.status, Status::Error);
    }

    #[test]
    fn test_show_ambiguous_name() {
        let mut engine = engine();
        engine.execute_command("make report for s1 as s1");
        let result = engine.execute_command("show s1");
        assert_eq!(result.message, "'s1' is ambiguous: it names a sequence and a report");
    }

    #[test]
    fn test_verify_stores_report() {
        let mut engine = engine();
        let result = engine.execute_command("verify");
        assert_eq!(result.status, Status::Ok, "{}", result.message);
        assert_eq!(result.created, vec!["verification_report"]);
        assert!(!result.message.contains("FAIL"), "{}", result.message);
    }
}
