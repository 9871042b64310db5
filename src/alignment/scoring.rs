//! Substitution and gap scores shared by global, local and group alignment
//! and by `compare`.

use serde::{Deserialize, Serialize};

use crate::core::types::Alphabet;

/// Score for two identical, definite residues
pub const DEFAULT_MATCH_SCORE: i64 = 1;

/// Score for differing residues, or any pair involving an ambiguity code
pub const DEFAULT_MISMATCH_SCORE: i64 = -1;

/// Linear penalty per gap position
pub const DEFAULT_GAP_SCORE: i64 = -2;

/// Gap character in aligned rows
pub const GAP: u8 = b'-';

/// Ribbon symbol for an exact match
pub const MATCH_SYMBOL: char = '|';

/// Linear-gap scoring scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    pub match_score: i64,
    pub mismatch_score: i64,
    pub gap_score: i64,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_score: DEFAULT_MATCH_SCORE,
            mismatch_score: DEFAULT_MISMATCH_SCORE,
            gap_score: DEFAULT_GAP_SCORE,
        }
    }
}

impl Scoring {
    /// Check sign conventions: positive match, non-positive mismatch and gap.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.match_score <= 0 {
            return Err(format!(
                "match score must be positive (got {})",
                self.match_score
            ));
        }
        if self.mismatch_score > 0 {
            return Err(format!(
                "mismatch score must not be positive (got {})",
                self.mismatch_score
            ));
        }
        if self.gap_score > 0 {
            return Err(format!(
                "gap score must not be positive (got {})",
                self.gap_score
            ));
        }
        Ok(())
    }

    /// Whether `a` and `b` count as a match: equal, not a gap, not ambiguous
    #[must_use]
    pub fn is_match(a: u8, b: u8, alphabet: Alphabet) -> bool {
        a == b && a != GAP && !alphabet.is_ambiguous(a)
    }

    /// Substitution score for one aligned residue pair
    #[must_use]
    pub fn substitute(&self, a: u8, b: u8, alphabet: Alphabet) -> i64 {
        if Self::is_match(a, b, alphabet) {
            self.match_score
        } else {
            self.mismatch_score
        }
    }
}
