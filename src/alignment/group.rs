//! Progressive multiple alignment built from global pairwise steps.
//!
//! The first two members are aligned globally. Every later member is aligned
//! against the consensus of the rows so far; gap columns opened in the
//! consensus are copied into every existing row. The reported score is the
//! sum of the pairwise step scores.

use crate::alignment::pairwise::global_align;
use crate::alignment::scoring::{Scoring, GAP};
use crate::core::types::Alphabet;

/// Minimum number of members for a group alignment
pub const MIN_GROUP_SIZE: usize = 3;

/// Gapped rows of equal length, one per member, in member order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAlignment {
    pub rows: Vec<String>,
    pub score: i64,
}

impl GroupAlignment {
    /// `name: row` display lines
    #[must_use]
    pub fn lines(&self, names: &[String]) -> Vec<String> {
        names
            .iter()
            .zip(&self.rows)
            .map(|(name, row)| format!("{name}: {row}"))
            .collect()
    }
}

/// Most common non-gap residue per column; ties go to the earliest row
#[must_use]
pub fn consensus(rows: &[Vec<u8>]) -> Vec<u8> {
    let width = rows.first().map_or(0, Vec::len);

    (0..width)
        .map(|col| {
            let column: Vec<u8> = rows
                .iter()
                .filter_map(|row| row.get(col).copied())
                .filter(|&b| b != GAP)
                .collect();

            let mut best = GAP;
            let mut best_count = 0;
            for &residue in &column {
                let count = column.iter().filter(|&&b| b == residue).count();
                if count > best_count {
                    best = residue;
                    best_count = count;
                }
            }
            best
        })
        .collect()
}

/// Align `sequences` progressively. Fewer than two sequences are returned ungapped.
#[must_use]
pub fn progressive_align(sequences: &[&[u8]], alphabet: Alphabet, scoring: &Scoring) -> GroupAlignment {
    let (first, second) = match sequences {
        [] => {
            return GroupAlignment {
                rows: Vec::new(),
                score: 0,
            }
        }
        [only] => {
            return GroupAlignment {
                rows: vec![String::from_utf8_lossy(only).to_string()],
                score: 0,
            }
        }
        [first, second, ..] => (*first, *second),
    };

    let seed = global_align(first, second, alphabet, scoring);
    let mut score = seed.score;
    let mut rows: Vec<Vec<u8>> = vec![seed.aligned_a.into_bytes(), seed.aligned_b.into_bytes()];

    for next in &sequences[2..] {
        let profile = consensus(&rows);
        let step = global_align(&profile, next, alphabet, scoring);
        score += step.score;

        let mut merged: Vec<Vec<u8>> = vec![Vec::with_capacity(step.len()); rows.len()];
        let mut source_col = 0;
        for &profile_residue in step.aligned_a.as_bytes() {
            if profile_residue == GAP {
                for row in &mut merged {
                    row.push(GAP);
                }
            } else {
                for (row, old) in merged.iter_mut().zip(&rows) {
                    row.push(old[source_col]);
                }
                source_col += 1;
            }
        }

        merged.push(step.aligned_b.into_bytes());
        rows = merged;
    }

    GroupAlignment {
        rows: rows
            .into_iter()
            .map(|row| String::from_utf8_lossy(&row).to_string())
            .collect(),
        score,
    }
}

/// Sum-of-pairs score over every row pair; gap/gap columns score 0
#[must_use]
pub fn sum_of_pairs(rows: &[String], alphabet: Alphabet, scoring: &Scoring) -> i64 {
    let mut total = 0;
    for (i, a) in rows.iter().enumerate() {
        for b in &rows[i + 1..] {
            for (&x, &y) in a.as_bytes().iter().zip(b.as_bytes()) {
                total += match (x == GAP, y == GAP) {
                    (true, true) => 0,
                    (true, false) | (false, true) => scoring.gap_score,
                    (false, false) => scoring.substitute(x, y, alphabet),
                };
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn align(seqs: &[&str]) -> GroupAlignment {
        let bytes: Vec<&[u8]> = seqs.iter().map(|s| s.as_bytes()).collect();
        progressive_align(&bytes, Alphabet::Dna, &Scoring::default())
    }

    #[test]
    fn test_consensus_ties_go_to_first_row() {
        let rows = vec![b"AC-".to_vec(), b"GCT".to_vec()];
        assert_eq!(consensus(&rows), b"ACT".to_vec());
    }

    #[test]
    fn test_identical_members() {
        let g = align(&["ACGT", "ACGT", "ACGT"]);
        assert_eq!(g.rows, vec!["ACGT", "ACGT", "ACGT"]);
        assert_eq!(g.score, 8);
    }

    #[test]
    fn test_gap_propagates_into_existing_rows() {
        let g = align(&["ACGT", "ACGT", "ACGGT"]);
        assert_eq!(g.rows.len(), 3);
        let width = g.rows[0].len();
        assert!(g.rows.iter().all(|r| r.len() == width));
        assert_eq!(width, 5);
        for (row, original) in g.rows.iter().zip(["ACGT", "ACGT", "ACGGT"]) {
            assert_eq!(row.replace('-', ""), original);
        }
    }

    #[test]
    fn test_lines_are_named() {
        let g = align(&["AC", "AC", "AC"]);
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(g.lines(&names), vec!["a: AC", "b: AC", "c: AC"]);
    }

    #[test]
    fn test_sum_of_pairs() {
        let rows = vec!["AC".to_string(), "A-".to_string(), "AC".to_string()];
        // pairs: (AC,A-)=1-2, (AC,AC)=2, (A-,AC)=1-2
        assert_eq!(sum_of_pairs(&rows, Alphabet::Dna, &Scoring::default()), 0);
    }
}
