use crate::command::Numeric;
use crate::core::report::Report;
use crate::core::sequence::SequenceRecord;
use crate::core::types::Alphabet;
use crate::core::workspace::Entity;
use crate::engine::error::CommandError;
use crate::engine::handlers::{derived_message, integer, Context, Outcome};
use crate::ops::composition::{
    codon_counts, find_motif as motif_positions, format_counts, gc_percent, residue_counts,
};
use crate::ops::transform;
use crate::ops::translation::{find_orfs, frame_lines, translate as translate_residues};

pub(super) fn count_gc(ctx: &Context<'_>, name: &str) -> Result<Outcome, CommandError> {
    let record = ctx.sequence(name)?;
    let gc = gc_percent(record)?;
    Ok(Outcome::message(format!("GC of {name} is {gc:.1}%.")))
}

pub(super) fn count_bases(ctx: &Context<'_>, name: &str) -> Result<Outcome, CommandError> {
    let counts = residue_counts(ctx.sequence(name)?);
    if counts.is_empty() {
        return Ok(Outcome::message(format!("{name} is empty.")));
    }
    Ok(Outcome::message(format!("Bases of {name}: {}", format_counts(&counts))))
}

pub(super) fn count_codons(ctx: &Context<'_>, name: &str) -> Result<Outcome, CommandError> {
    let codons = codon_counts(ctx.sequence(name)?)?;
    if codons.counts.is_empty() {
        return Ok(Outcome::message(format!("No complete codons in {name}.")));
    }

    let mut lines = vec![format!("Codon counts of {name}:")];
    lines.extend(codons.counts.iter().map(|(codon, n)| format!("  {codon}: {n}")));
    if codons.trailing > 0 {
        lines.push(format!("Ignored {} trailing base(s).", codons.trailing));
    }
    Ok(Outcome::lines(&lines))
}

pub(super) fn find_motif(ctx: &Context<'_>, motif: &str, name: &str) -> Result<Outcome, CommandError> {
    let positions = motif_positions(ctx.sequence(name)?, motif)?;
    if positions.is_empty() {
        return Ok(Outcome::message(format!("Motif {motif} not found in {name}.")));
    }

    let listed: Vec<String> = positions.iter().map(ToString::to_string).collect();
    Ok(Outcome::message(format!(
        "Motif {motif} found {} time(s) in {name} at positions: {}",
        positions.len(),
        listed.join(", ")
    )))
}

pub(super) fn slice(
    ctx: &Context<'_>,
    name: &str,
    start: &Numeric,
    end: &Numeric,
    new: &str,
) -> Result<Outcome, CommandError> {
    let record = ctx.sequence(name)?;
    let start = integer(start, "start position")?;
    let end = integer(end, "end position")?;

    let residues = transform::slice(record, start, end)?;
    let sliced = SequenceRecord::derived(new, record.alphabet, residues, format!("{name}:{start}-{end}"));
    Ok(Outcome::message(derived_message(name, &sliced)).insert(Entity::Sequence(sliced)))
}

pub(super) fn split(
    ctx: &Context<'_>,
    name: &str,
    length: &Numeric,
    base: &str,
) -> Result<Outcome, CommandError> {
    let record = ctx.sequence(name)?;
    let window = integer(length, "window length")?;

    let pieces: Vec<SequenceRecord> = transform::split(record, window)?
        .into_iter()
        .enumerate()
        .map(|(i, residues)| {
            SequenceRecord::derived(
                format!("{base}_{}", i + 1),
                record.alphabet,
                residues,
                format!("window {} of {name}", i + 1),
            )
        })
        .collect();

    let names: Vec<&str> = pieces.iter().map(|p| p.name.as_str()).collect();
    let message = format!(
        "Split {name} into {} piece(s): {}",
        pieces.len(),
        names.join(", ")
    );
    Ok(Outcome::message(message).insert_all(pieces.into_iter().map(Entity::Sequence)))
}

pub(super) fn join(ctx: &Context<'_>, first: &str, second: &str, new: &str) -> Result<Outcome, CommandError> {
    let a = ctx.sequence(first)?;
    let b = ctx.sequence(second)?;
    let joined = SequenceRecord::derived(
        new,
        a.alphabet,
        transform::join(a, b)?,
        format!("{first} + {second}"),
    );
    Ok(Outcome::message(derived_message(&format!("{first} + {second}"), &joined))
        .insert(Entity::Sequence(joined)))
}

/// Shared shape of the single-input sequence transforms
fn derive(
    ctx: &Context<'_>,
    name: &str,
    new: &str,
    alphabet: impl FnOnce(Alphabet) -> Alphabet,
    description: &str,
    apply: impl FnOnce(&SequenceRecord) -> Result<String, CommandError>,
) -> Result<Outcome, CommandError> {
    let record = ctx.sequence(name)?;
    let residues = apply(record)?;
    let created = SequenceRecord::derived(
        new,
        alphabet(record.alphabet),
        residues,
        format!("{description} of {name}"),
    );
    Ok(Outcome::message(derived_message(name, &created)).insert(Entity::Sequence(created)))
}

pub(super) fn transcribe(ctx: &Context<'_>, name: &str, new: &str) -> Result<Outcome, CommandError> {
    derive(ctx, name, new, |_| Alphabet::Rna, "transcript", |r| {
        Ok(transform::transcribe(r)?)
    })
}

pub(super) fn translate(ctx: &Context<'_>, name: &str, new: &str) -> Result<Outcome, CommandError> {
    derive(ctx, name, new, |_| Alphabet::Protein, "translation", |r| {
        Ok(translate_residues(r)?)
    })
}

pub(super) fn reverse(ctx: &Context<'_>, name: &str, new: &str) -> Result<Outcome, CommandError> {
    derive(ctx, name, new, |a| a, "reverse", |r| Ok(transform::reverse(r)))
}

pub(super) fn complement(ctx: &Context<'_>, name: &str, new: &str) -> Result<Outcome, CommandError> {
    derive(ctx, name, new, |a| a, "complement", |r| {
        Ok(transform::complement(r)?)
    })
}

pub(super) fn reverse_complement(ctx: &Context<'_>, name: &str, new: &str) -> Result<Outcome, CommandError> {
    derive(ctx, name, new, |a| a, "reverse complement", |r| {
        Ok(transform::reverse_complement(r)?)
    })
}

pub(super) fn translate_frames(ctx: &Context<'_>, name: &str, new: &str) -> Result<Outcome, CommandError> {
    let lines = frame_lines(ctx.sequence(name)?)?;

    let mut message = vec![format!("Stored three-frame translation of {name} as {new}:")];
    message.extend(lines.iter().cloned());

    let report = Report::new(new, lines).with_description(format!("three-frame translation of {name}"));
    Ok(Outcome::lines(&message).insert(Entity::Report(report)))
}

pub(super) fn scan_orf(
    ctx: &Context<'_>,
    name: &str,
    min: &Numeric,
    base: &str,
) -> Result<Outcome, CommandError> {
    let record = ctx.sequence(name)?;
    let min_aa = integer(min, "minimum length")?;
    let orfs = find_orfs(record, min_aa)?;

    if orfs.is_empty() {
        return Ok(Outcome::message(format!(
            "No ORFs of at least {min_aa} aa found in {name}."
        )));
    }

    let mut summaries = Vec::with_capacity(orfs.len());
    let mut records = Vec::with_capacity(orfs.len());
    for (i, orf) in orfs.into_iter().enumerate() {
        let orf_name = format!("{base}_{}", i + 1);
        summaries.push(format!(
            "{orf_name} (frame {}, {} aa)",
            orf.frame + 1,
            orf.protein_length
        ));
        records.push(SequenceRecord::derived(
            orf_name,
            record.alphabet,
            orf.residues,
            format!(
                "ORF of {name}, frame {}, start {}, {} aa",
                orf.frame + 1,
                orf.start + 1,
                orf.protein_length
            ),
        ));
    }

    let message = format!(
        "Found {} ORF(s) in {name}: {}",
        records.len(),
        summaries.join(", ")
    );
    Ok(Outcome::message(message).insert_all(records.into_iter().map(Entity::Sequence)))
}

/// Length, composition and frame translations of one sequence
pub(super) fn sequence_report(record: &SequenceRecord) -> Result<Vec<String>, CommandError> {
    let mut lines = vec![
        format!("Report for {}", record.name),
        format!("Type: {}", record.alphabet),
        format!("Length: {} {}", record.length(), record.alphabet.unit()),
    ];
    if record.alphabet.is_nucleotide() {
        lines.push(format!("GC: {:.1}%", gc_percent(record)?));
    }
    lines.push(format!("Residues: {}", format_counts(&residue_counts(record))));
    if record.alphabet.is_nucleotide() {
        lines.extend(frame_lines(record)?);
    }
    Ok(lines)
}

pub(super) fn make_report(ctx: &Context<'_>, name: &str, new: &str) -> Result<Outcome, CommandError> {
    let lines = sequence_report(ctx.sequence(name)?)?;
    let message = format!("Stored report {new} ({} lines) for {name}.", lines.len());
    let report = Report::new(new, lines).with_description(format!("sequence report of {name}"));
    Ok(Outcome::message(message).insert(Entity::Report(report)))
}

#[cfg(test)]
mod tests {
    use crate::engine::result::Status;
    use crate::engine::Engine;

    fn engine_with(residues: &str) -> Engine {
        let mut engine = Engine::default();
        let result = engine.execute_command(&format!("load dna text {residues} as s1"));
        assert!(result.is_ok(), "{}", result.message);
        engine
    }

    #[test]
    fn test_count_gc_message() {
        let mut engine = engine_with("ACGTACGT");
        let result = engine.execute_command("count gc of s1");
        assert_eq!(result.message, "GC of s1 is 50.0%.");
        assert!(result.created.is_empty());
    }

    #[test]
    fn test_count_codons_notes_trailing() {
        let mut engine = engine_with("ATGATGA");
        let result = engine.execute_command("count codons of s1");
        assert_eq!(
            result.message,
            "Codon counts of s1:\n  ATG: 2\nIgnored 1 trailing base(s)."
        );
    }

    #[test]
    fn test_find_motif() {
        let mut engine = engine_with("AAAA");
        let result = engine.execute_command("find motif aa in s1");
        assert!(result.message.ends_with("positions: 0, 1, 2"));

        let result = engine.execute_command("find motif G in s1");
        assert_eq!(result.message, "Motif G not found in s1.");
    }

    #[test]
    fn test_slice_creates_sequence() {
        let mut engine = engine_with("ACGTACGT");
        let result = engine.execute_command("slice s1 from 1 to 4 as s1a");
        assert_eq!(result.message, "s1 → s1a (4 bp)");
        assert_eq!(result.workspace.sequence("s1a").unwrap().sequence, "ACGT");
    }

    #[test]
    fn test_slice_rejects_bad_numbers() {
        let mut engine = engine_with("ACGTACGT");
        for text in [
            "slice s1 from 5 to 4 as x",
            "slice s1 from 0 to 4 as x",
            "slice s1 from 1 to 9 as x",
            "slice s1 from one to 4 as x",
        ] {
            let result = engine.execute_command(text);
            assert_eq!(result.status, Status::Error, "{text}");
            assert!(result.workspace.sequence("x").is_none());
        }
    }

    #[test]
    fn test_complement_protein_is_error() {
        let mut engine = Engine::default();
        engine.execute_command("load protein text MKV as p");
        let result = engine.execute_command("complement p as pc");
        assert_eq!(result.status, Status::Error);
        assert!(result.message.contains("protein"));
    }

    #[test]
    fn test_translate_and_transcribe() {
        let mut engine = engine_with("ATGAAATAG");
        engine.execute_command("translate s1 as p");
        engine.execute_command("transcribe s1 as r");

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.sequence("p").unwrap().sequence, "MK");
        assert_eq!(snapshot.sequence("r").unwrap().sequence, "AUGAAAUAG");

        // RNA translates to the same protein
        engine.execute_command("translate r as p2");
        assert_eq!(engine.snapshot().sequence("p2").unwrap().sequence, "MK");
    }

    #[test]
    fn test_scan_orf_none_found() {
        let mut engine = engine_with("ACGTACGT");
        let result = engine.execute_command("scan orf of s1 minimum 1 as s1_orf");
        assert_eq!(result.status, Status::Ok);
        assert!(result.created.is_empty());
        assert!(result.message.starts_with("No ORFs"));
    }

    #[test]
    fn test_scan_orf_names_in_order() {
        let mut engine = engine_with("ATGAAATAAGATGCCCGGGTGA");
        let result = engine.execute_command("scan orf of s1 minimum 1 as orf");
        assert_eq!(result.created, vec!["orf_1", "orf_2"]);
        assert_eq!(result.workspace.sequence("orf_1").unwrap().sequence, "ATGAAATAA");
    }

    #[test]
    fn test_join_alphabet_mismatch() {
        let mut engine = engine_with("ACGT");
        engine.execute_command("load rna text ACGU as r");
        let result = engine.execute_command("join s1 with r as j");
        assert_eq!(result.status, Status::Error);
        assert!(result.workspace.sequence("j").is_none());
    }

    #[test]
    fn test_make_report() {
        let mut engine = engine_with("ATGAAATAG");
        engine.execute_command("make report for s1 as rep");
        let snapshot = engine.snapshot();
        let report = snapshot.report("rep").unwrap();
        assert_eq!(report.lines[0], "Report for s1");
        assert!(report.lines.contains(&"Frame 1: MK*".to_string()));
    }
}
