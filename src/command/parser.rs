//! Template compiler and backtracking matcher.
//!
//! A pattern is a space-separated list of parts:
//!
//! | Part | Matches |
//! |------|---------|
//! | `word` / `a\|b` | one token equal (ignoring case) to a listed keyword |
//! | `<slot>` | exactly one token, case preserved |
//! | `<slot:int>` | one token, captured as [`Numeric`] |
//! | `<slot:alphabet>` | one of `dna`, `rna`, `protein` |
//! | `<slot:text>` | one or more tokens, rejoined with single spaces |
//! | `<slot:list>` | one or more tokens, split on commas |
//!
//! Multi-token slots are greedy: the longest span that still lets the rest of
//! the pattern match is taken, so `load dna file my as file.fa as x` reads the
//! path as `my as file.fa`.

use std::collections::HashMap;

use tracing::debug;

use crate::command::grammar::{templates, Template};
use crate::command::{Command, Numeric, SyntaxError};
use crate::core::types::Alphabet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotKind {
    Word,
    Int,
    Alphabet,
    Text,
    List,
}

impl SlotKind {
    fn parse(s: &str) -> Self {
        match s {
            "int" => Self::Int,
            "alphabet" => Self::Alphabet,
            "text" => Self::Text,
            "list" => Self::List,
            _ => Self::Word,
        }
    }

    fn is_greedy(self) -> bool {
        matches!(self, Self::Text | Self::List)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Keyword(Vec<&'static str>),
    Slot { name: &'static str, kind: SlotKind },
}

fn compile(pattern: &'static str) -> Vec<Part> {
    pattern
        .split_whitespace()
        .map(|piece| match piece.strip_prefix('<').and_then(|p| p.strip_suffix('>')) {
            Some(slot) => {
                let (name, kind) = slot.split_once(':').unwrap_or((slot, "word"));
                Part::Slot {
                    name,
                    kind: SlotKind::parse(kind),
                }
            }
            None => Part::Keyword(piece.split('|').collect()),
        })
        .collect()
}

/// Values captured by one successful match, keyed by slot name
#[derive(Debug, Default)]
pub struct Captures {
    values: HashMap<&'static str, Vec<String>>,
}

impl Captures {
    /// Single or multi-token capture joined by spaces; empty when absent
    #[must_use]
    pub fn text(&self, slot: &str) -> String {
        self.values.get(slot).map(|t| t.join(" ")).unwrap_or_default()
    }

    #[must_use]
    pub fn optional_text(&self, slot: &str) -> Option<String> {
        self.values.get(slot).map(|t| t.join(" "))
    }

    /// Comma or space separated names, empties dropped
    #[must_use]
    pub fn list(&self, slot: &str) -> Vec<String> {
        self.values
            .get(slot)
            .map(|tokens| {
                tokens
                    .iter()
                    .flat_map(|t| t.split(','))
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn int(&self, slot: &str) -> Numeric {
        Numeric::parse(&self.text(slot))
    }

    /// Only called for `:alphabet` slots, which the matcher has already checked
    #[must_use]
    pub fn alphabet(&self, slot: &str) -> Alphabet {
        Alphabet::parse(&self.text(slot)).unwrap_or(Alphabet::Dna)
    }
}

struct Compiled {
    template: Template,
    parts: Vec<Part>,
}

/// The ordered template table, compiled once
pub struct Grammar {
    compiled: Vec<Compiled>,
}

impl Default for Grammar {
    fn default() -> Self {
        Self::new()
    }
}

impl Grammar {
    #[must_use]
    pub fn new() -> Self {
        let compiled = templates()
            .into_iter()
            .map(|template| Compiled {
                parts: compile(template.pattern),
                template,
            })
            .collect();
        Self { compiled }
    }

    /// Templates in match-priority order
    pub fn templates(&self) -> impl Iterator<Item = &Template> {
        self.compiled.iter().map(|c| &c.template)
    }

    /// Parse one sentence into a command.
    ///
    /// # Errors
    ///
    /// Returns `SyntaxError` carrying the raw text when no template matches.
    pub fn parse(&self, text: &str) -> Result<Command, SyntaxError> {
        let tokens: Vec<&str> = text.split_whitespace().collect();

        for compiled in &self.compiled {
            let mut captures = Captures::default();
            if match_parts(&compiled.parts, &tokens, &mut captures) {
                let command = (compiled.template.build)(&captures);
                debug!(pattern = compiled.template.pattern, verb = command.verb(), "Matched");
                return Ok(command);
            }
        }

        Err(SyntaxError {
            text: text.trim().to_string(),
        })
    }

    /// Example sentences that fail to reach their own template
    #[must_use]
    pub fn check_examples(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for compiled in &self.compiled {
            let example = compiled.template.example;
            let tokens: Vec<&str> = example.split_whitespace().collect();
            let mut captures = Captures::default();
            if !match_parts(&compiled.parts, &tokens, &mut captures) {
                problems.push(format!("'{example}' does not match '{}'", compiled.template.pattern));
                continue;
            }

            let expected = (compiled.template.build)(&captures);
            match self.parse(example) {
                Ok(command) if command == expected => {}
                Ok(command) => problems.push(format!(
                    "'{example}' is shadowed: parsed as {}",
                    command.verb()
                )),
                Err(e) => problems.push(e.to_string()),
            }
        }

        problems
    }
}

/// Minimum number of tokens `parts` can consume
fn min_tokens(parts: &[Part]) -> usize {
    parts.len()
}

fn match_parts(parts: &[Part], tokens: &[&str], captures: &mut Captures) -> bool {
    let Some((part, rest)) = parts.split_first() else {
        return tokens.is_empty();
    };
    let Some((&token, remaining)) = tokens.split_first() else {
        return false;
    };

    match part {
        Part::Keyword(words) => {
            words.iter().any(|w| w.eq_ignore_ascii_case(token))
                && match_parts(rest, remaining, captures)
        }
        Part::Slot { name, kind } if kind.is_greedy() => {
            let reserved = min_tokens(rest);
            if tokens.len() < reserved + 1 {
                return false;
            }
            for take in (1..=tokens.len() - reserved).rev() {
                if match_parts(rest, &tokens[take..], captures) {
                    captures.values.insert(
                        *name,
                        tokens[..take].iter().map(|t| (*t).to_string()).collect(),
                    );
                    return true;
                }
            }
            false
        }
        Part::Slot { name, kind } => {
            if *kind == SlotKind::Alphabet && Alphabet::parse(token).is_none() {
                return false;
            }
            if match_parts(rest, remaining, captures) {
                captures.values.insert(*name, vec![token.to_string()]);
                true
            } else {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::RecordKind;

    fn parse(text: &str) -> Command {
        Grammar::new().parse(text).unwrap()
    }

    #[test]
    fn test_compile_pattern() {
        let parts = compile("count gc|bases of <name> minimum <min:int>");
        assert_eq!(parts.len(), 6);
        assert_eq!(parts[1], Part::Keyword(vec!["gc", "bases"]));
        assert_eq!(
            parts[5],
            Part::Slot {
                name: "min",
                kind: SlotKind::Int
            }
        );
    }

    #[test]
    fn test_keywords_ignore_case_names_keep_case() {
        assert_eq!(
            parse("TRANSLATE Yeast AS Yeast_Protein"),
            Command::Translate {
                name: "Yeast".to_string(),
                new: "Yeast_Protein".to_string()
            }
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            parse("  count   gc\tof  s1 "),
            Command::CountGc {
                name: "s1".to_string()
            }
        );
    }

    #[test]
    fn test_greedy_path_takes_last_as() {
        assert_eq!(
            parse("load dna file my as file.fa as x"),
            Command::LoadSequenceFile {
                alphabet: Alphabet::Dna,
                path: "my as file.fa".to_string(),
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_numeric_slots_are_syntactic() {
        assert_eq!(
            parse("slice s1 from one to 4 as s1a"),
            Command::Slice {
                name: "s1".to_string(),
                start: Numeric::Invalid("one".to_string()),
                end: Numeric::Int(4),
                new: "s1a".to_string()
            }
        );
    }

    #[test]
    fn test_specific_templates_win() {
        assert_eq!(parse("align group a b c as g").verb(), "align_group");
        assert_eq!(parse("align a with b as x using local").verb(), "align");
        assert_eq!(parse("join table a with b on column id as j").verb(), "join_tables");
        assert_eq!(parse("join a with b as ab").verb(), "join");
        assert_eq!(parse("reverse complement s as rc").verb(), "reverse_complement");
        assert_eq!(parse("reverse s as r").verb(), "reverse");
        assert_eq!(parse("translate frames of s as f").verb(), "translate_frames");
    }

    #[test]
    fn test_group_members_accept_commas() {
        assert_eq!(
            parse("align group a, b,c d as g"),
            Command::AlignGroup {
                members: vec!["a", "b", "c", "d"]
                    .into_iter()
                    .map(String::from)
                    .collect(),
                name: "g".to_string()
            }
        );
    }

    #[test]
    fn test_record_kinds() {
        assert_eq!(
            parse("load genbank file data/p.gb as p"),
            Command::LoadRecords {
                kind: RecordKind::GenBank,
                path: "data/p.gb".to_string(),
                name: "p".to_string()
            }
        );
        assert_eq!(parse("load file reads.fq as r").verb(), "load_file");
    }

    #[test]
    fn test_exit_synonyms() {
        for word in ["exit", "QUIT", "close", "Leave"] {
            assert_eq!(parse(word), Command::Exit);
        }
    }

    #[test]
    fn test_plot_target_optional() {
        assert_eq!(
            parse("plot sequences s1"),
            Command::PlotSequences {
                name: "s1".to_string(),
                path: None
            }
        );
        assert_eq!(
            parse("plot sequences s1 to file out/gc.tsv"),
            Command::PlotSequences {
                name: "s1".to_string(),
                path: Some("out/gc.tsv".to_string())
            }
        );
    }

    #[test]
    fn test_every_example_reaches_its_template() {
        assert_eq!(Grammar::new().check_examples(), Vec::<String>::new());
    }

    #[test]
    fn test_unrecognized_text() {
        let err = Grammar::new().parse("do a thing").unwrap_err();
        assert_eq!(err.text, "do a thing");
        assert!(Grammar::new().parse("").is_err());
        assert!(Grammar::new().parse("load dna file as x").is_err());
        assert!(Grammar::new().parse("load peptide text MK as p").is_err());
    }
}
