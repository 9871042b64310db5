
use tracing::info;

use crate::alignment::group::MIN_GROUP_SIZE;
use crate::alignment::pairwise::{self, AlignMode};
use crate::core::alignment::AlignmentResult;
use crate::core::sequence::SequenceRecord;
use crate::core::workspace::Entity;
use crate::engine::error::CommandError;
use crate::engine::handlers::{Context, Outcome};

fn same_alphabet(a: &SequenceRecord, b: &SequenceRecord) -> Result<(), CommandError> {
    if a.alphabet == b.alphabet {
        Ok(())
    } else {
        Err(CommandError::WrongAlphabet(format!(
            "Cannot align {} ({}) with {} ({}): alphabets differ",
            a.name, a.alphabet, b.name, b.alphabet
        )))
    }
}

pub(super) fn align(
    ctx: &Context<'_>,
    first: &str,
    second: &str,
    name: &str,
    mode: &str,
) -> Result<Outcome, CommandError> {
    let a = ctx.sequence(first)?;
    let b = ctx.sequence(second)?;
    let mode: AlignMode = mode.parse().map_err(CommandError::UnsupportedMode)?;
    same_alphabet(a, b)?;

    let result = pairwise::align(a.as_bytes(), b.as_bytes(), mode, a.alphabet, &ctx.config.scoring);

    let mut message = if result.is_empty() {
        vec![format!(
            "No positive-scoring local alignment between {first} and {second}; stored empty alignment {name}."
        )]
    } else {
        let mut lines = vec![format!(
            "Aligned {first} with {second} as {name} ({mode}, {:.1}% identity):",
            result.identity_percent()
        )];
        lines.extend(result.lines());
        lines
    };
    message.push(format!("Score: {}", result.score));

    let alignment = AlignmentResult::new(
        name,
        result.lines(),
        result.score,
        vec![first.to_string(), second.to_string()],
        mode.to_string(),
    );
    Ok(Outcome::lines(&message).insert(Entity::Alignment(alignment)))
}

pub(super) fn align_group(ctx: &Context<'_>, members: &[String], name: &str) -> Result<Outcome, CommandError> {
    if members.len() < MIN_GROUP_SIZE {
        return Err(CommandError::InvalidArgument(format!(
            "Group alignment needs at least {MIN_GROUP_SIZE} sequences, got {}",
            members.len()
        )));
    }

    let records = members
        .iter()
        .map(|m| ctx.sequence(m))
        .collect::<Result<Vec<_>, _>>()?;
    for record in &records[1..] {
        same_alphabet(records[0], record)?;
    }

    let (group, method) = ctx.integrations.align_group(&records, &ctx.config.scoring)?;
    info!(name, members = members.len(), method = %method, "Group alignment");

    let lines = group.lines(members);
    let mut message = vec![format!(
        "Aligned {} sequences as {name} using {method}:",
        members.len()
    )];
    message.extend(lines.iter().cloned());
    message.push(format!("Score: {}", group.score));

    let alignment = AlignmentResult::new(name, lines, group.score, members.to_vec(), method);
    Ok(Outcome::lines(&message).insert(Entity::Alignment(alignment)))
}

pub(super) fn compare(ctx: &Context<'_>, first: &str, second: &str) -> Result<Outcome, CommandError> {
    let a = ctx.sequence(first)?;
    let b = ctx.sequence(second)?;
    same_alphabet(a, b)?;

    let comparison = crate::alignment::compare(a, b, &ctx.config.scoring);
    Ok(Outcome::message(format!(
        "{first} vs {second}: {:.2}% identity ({} of {} columns), score {}",
        comparison.identity_percent, comparison.matches, comparison.length, comparison.score
    )))
}

#[cfg(test)]
mod tests {
    use crate::engine::result::Status;
    use crate::engine::Engine;

    fn engine() -> Engine {
        let mut engine = Engine::default();
        for line in [
            "load dna text ACGTACGT as s1",
            "load dna text ACGTTCGT as s2",
            "load dna text ACGACGT as s3",
            "load protein text MKV as p",
        ] {
            assert!(engine.execute_command(line).is_ok());
        }
        engine
    }

    #[test]
    fn test_self_alignment_is_perfect() {
        let mut engine = engine();
        let result = engine.execute_command("align s1 with s1 as self_align using global");
        assert_eq!(result.status, Status::Ok);

        let snapshot = engine.snapshot();
        let alignment = snapshot.alignment("self_align").unwrap();
        assert_eq!(alignment.score, 8);
        assert_eq!(alignment.lines[1], "||||||||");
        assert_eq!(alignment.members, vec!["s1", "s1"]);
        assert_eq!(alignment.method, "global");
    }

    #[test]
    fn test_unsupported_mode() {
        let mut engine = engine();
        let result = engine.execute_command("align s1 with s2 as x using fancy");
        assert_eq!(result.status, Status::Error);
        assert!(result.message.contains("Unsupported alignment mode"));
        assert!(result.workspace.alignment("x").is_none());
    }

    #[test]
    fn test_local_without_positive_region_is_reported() {
        let mut engine = Engine::default();
        engine.execute_command("load dna text AAAA as a");
        engine.execute_command("load dna text TTTT as t");
        let result = engine.execute_command("align a with t as none using local");
        assert_eq!(result.status, Status::Ok);
        assert!(result.message.starts_with("No positive-scoring local alignment"));
        assert_eq!(result.workspace.alignment("none").unwrap().score, 0);
    }

    #[test]
    fn test_group_alignment() {
        let mut engine = engine();
        let result = engine.execute_command("align group s1 s2 s3 as trio");
        assert_eq!(result.status, Status::Ok, "{}", result.message);

        let snapshot = engine.snapshot();
        let trio = snapshot.alignment("trio").unwrap();
        assert_eq!(trio.members, vec!["s1", "s2", "s3"]);
        assert_eq!(trio.lines.len(), 3);
        assert!(trio.lines[0].starts_with("s1: "));
        assert_eq!(trio.method, "progressive needleman-wunsch");
    }

    #[test]
    fn test_group_needs_three_members() {
        let mut engine = engine();
        let result = engine.execute_command("align group s1 s2 as pair");
        assert!(result.message.contains("at least 3"));

        let result = engine.execute_command("align group s1 s2 p as mixed");
        assert_eq!(result.status, Status::Error);
        assert!(result.workspace.alignments.is_empty());
    }

    #[test]
    fn test_group_allows_repeated_members() {
        let mut engine = engine();
        let result = engine.execute_command("align group s1 s1 s1 as same");
        assert_eq!(result.status, Status::Ok, "{}", result.message);

        let same = result.workspace.alignment("same").unwrap();
        assert_eq!(same.members, vec!["s1", "s1", "s1"]);
        assert!(same.lines.iter().all(|line| line == "s1: ACGTACGT"));
    }

    #[test]
    fn test_compare_persists_nothing() {
        let mut engine = engine();
        let before = engine.snapshot();
        let result = engine.execute_command("compare s1 with s2");
        assert_eq!(
            result.message,
            "s1 vs s2: 87.50% identity (7 of 8 columns), score 6"
        );
        assert_eq!(result.workspace, before);
    }

    #[test]
    fn test_missing_sequence() {
        let mut engine = engine();
        let result = engine.execute_command("compare s1 with nope");
        assert_eq!(result.message, "No sequence named 'nope'");
    }
}
