//! Alignment engine: pairwise global/local dynamic programming, progressive
//! group alignment, and the integration registry for external aligners.
//!
//! All modes share one [`Scoring`](scoring::Scoring) scheme, so `compare`,
//! `align ... using global` and group alignment agree on every score.

pub mod group;
pub mod integration;
pub mod pairwise;
pub mod scoring;

use crate::alignment::pairwise::global_align;
use crate::alignment::scoring::Scoring;
use crate::core::sequence::SequenceRecord;

/// Identity and score of a global alignment, nothing persisted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    pub identity_percent: f64,
    pub score: i64,
    pub matches: usize,
    pub length: usize,
}

/// Globally align `a` and `b` and summarize the result.
///
/// Ambiguity is judged with `a`'s alphabet.
#[must_use]
pub fn compare(a: &SequenceRecord, b: &SequenceRecord, scoring: &Scoring) -> Comparison {
    let alignment = global_align(a.as_bytes(), b.as_bytes(), a.alphabet, scoring);
    Comparison {
        identity_percent: alignment.identity_percent(),
        score: alignment.score,
        matches: alignment.matches(),
        length: alignment.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Alphabet;

    #[test]
    fn test_compare() {
        let a = SequenceRecord::new("a", Alphabet::Dna, "ACGT").unwrap();
        let b = SequenceRecord::new("b", Alphabet::Dna, "ACCT").unwrap();
        let c = compare(&a, &b, &Scoring::default());

        assert_eq!(c.length, 4);
        assert_eq!(c.matches, 3);
        assert_eq!(c.score, 2);
        assert!((c.identity_percent - 75.0).abs() < f64::EPSILON);
    }
}
