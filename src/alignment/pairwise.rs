//! Pairwise dynamic-programming alignment.
//!
//! Both modes fill an (m+1)×(n+1) matrix with the linear-gap recurrence
//!
//! ```text
//! S[i][j] = max(S[i-1][j-1] + subst(a[i-1], b[j-1]),
//!               S[i-1][j]   + gap,
//!               S[i][j-1]   + gap)
//! ```
//!
//! Global (Needleman–Wunsch) traces back from the last cell; local
//! (Smith–Waterman) clamps every cell at 0 and traces back from the first
//! maximal cell in row-major order until it reaches a 0. Ties in the
//! traceback go diagonal, then up (gap in `b`), then left (gap in `a`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alignment::scoring::{Scoring, GAP, MATCH_SYMBOL};
use crate::core::types::Alphabet;

/// Alignment mode named in `align ... using <mode>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignMode {
    Global,
    Local,
}

impl FromStr for AlignMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "local" => Ok(Self::Local),
            other => Err(format!(
                "Unsupported alignment mode '{other}' (use global or local)"
            )),
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => write!(f, "global"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// Two gapped rows of equal length plus the ribbon between them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseAlignment {
    pub aligned_a: String,
    pub ribbon: String,
    pub aligned_b: String,
    pub score: i64,
}

impl PairwiseAlignment {
    /// `[aligned_a, ribbon, aligned_b]`
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        vec![
            self.aligned_a.clone(),
            self.ribbon.clone(),
            self.aligned_b.clone(),
        ]
    }

    /// Number of alignment columns
    #[must_use]
    pub fn len(&self) -> usize {
        self.aligned_a.len()
    }

    /// A local alignment with no positive-scoring region
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aligned_a.is_empty()
    }

    #[must_use]
    pub fn matches(&self) -> usize {
        self.ribbon.chars().filter(|c| *c == MATCH_SYMBOL).count()
    }

    /// matches / alignment length × 100; 0 for an empty alignment
    #[must_use]
    pub fn identity_percent(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.matches() as f64 / self.len() as f64 * 100.0
        }
    }
}

/// Flat row-major score matrix
struct Matrix {
    cols: usize,
    cells: Vec<i64>,
}

impl Matrix {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            cells: vec![0; rows * cols],
        }
    }

    fn get(&self, i: usize, j: usize) -> i64 {
        self.cells[i * self.cols + j]
    }

    fn set(&mut self, i: usize, j: usize, value: i64) {
        self.cells[i * self.cols + j] = value;
    }
}

#[derive(Clone, Copy)]
enum Step {
    Diagonal,
    Up,
    Left,
}

struct Aligner<'a> {
    a: &'a [u8],
    b: &'a [u8],
    alphabet: Alphabet,
    scoring: &'a Scoring,
}

impl Aligner<'_> {
    fn fill(&self, local: bool) -> Matrix {
        let (m, n) = (self.a.len(), self.b.len());
        let gap = self.scoring.gap_score;
        let mut matrix = Matrix::new(m + 1, n + 1);

        if !local {
            for (i, factor) in (1..=m).zip(1i64..) {
                matrix.set(i, 0, factor * gap);
            }
            for (j, factor) in (1..=n).zip(1i64..) {
                matrix.set(0, j, factor * gap);
            }
        }

        for i in 1..=m {
            for j in 1..=n {
                let diagonal = matrix.get(i - 1, j - 1)
                    + self
                        .scoring
                        .substitute(self.a[i - 1], self.b[j - 1], self.alphabet);
                let up = matrix.get(i - 1, j) + gap;
                let left = matrix.get(i, j - 1) + gap;
                let mut best = diagonal.max(up).max(left);
                if local {
                    best = best.max(0);
                }
                matrix.set(i, j, best);
            }
        }

        matrix
    }

    /// Which predecessor produced cell (i, j), preferring diagonal, up, left
    fn step(&self, matrix: &Matrix, i: usize, j: usize) -> Step {
        let current = matrix.get(i, j);
        let gap = self.scoring.gap_score;

        if i > 0
            && j > 0
            && current
                == matrix.get(i - 1, j - 1)
                    + self
                        .scoring
                        .substitute(self.a[i - 1], self.b[j - 1], self.alphabet)
        {
            Step::Diagonal
        } else if i > 0 && (j == 0 || current == matrix.get(i - 1, j) + gap) {
            Step::Up
        } else {
            Step::Left
        }
    }

    fn traceback(
        &self,
        matrix: &Matrix,
        mut i: usize,
        mut j: usize,
        local: bool,
    ) -> (String, String, String) {
        let mut row_a = Vec::new();
        let mut ribbon = Vec::new();
        let mut row_b = Vec::new();

        loop {
            let done = if local {
                i == 0 || j == 0 || matrix.get(i, j) == 0
            } else {
                i == 0 && j == 0
            };
            if done {
                break;
            }

            match self.step(matrix, i, j) {
                Step::Diagonal => {
                    let (x, y) = (self.a[i - 1], self.b[j - 1]);
                    row_a.push(x);
                    row_b.push(y);
                    ribbon.push(if Scoring::is_match(x, y, self.alphabet) {
                        MATCH_SYMBOL as u8
                    } else {
                        b' '
                    });
                    i -= 1;
                    j -= 1;
                }
                Step::Up => {
                    row_a.push(self.a[i - 1]);
                    row_b.push(GAP);
                    ribbon.push(b' ');
                    i -= 1;
                }
                Step::Left => {
                    row_a.push(GAP);
                    row_b.push(self.b[j - 1]);
                    ribbon.push(b' ');
                    j -= 1;
                }
            }
        }

        row_a.reverse();
        ribbon.reverse();
        row_b.reverse();
        (
            String::from_utf8_lossy(&row_a).to_string(),
            String::from_utf8_lossy(&ribbon).to_string(),
            String::from_utf8_lossy(&row_b).to_string(),
        )
    }
}

/// Full-length Needleman–Wunsch alignment
#[must_use]
pub fn global_align(a: &[u8], b: &[u8], alphabet: Alphabet, scoring: &Scoring) -> PairwiseAlignment {
    let aligner = Aligner {
        a,
        b,
        alphabet,
        scoring,
    };
    let matrix = aligner.fill(false);
    let score = matrix.get(a.len(), b.len());
    let (aligned_a, ribbon, aligned_b) = aligner.traceback(&matrix, a.len(), b.len(), false);

    PairwiseAlignment {
        aligned_a,
        ribbon,
        aligned_b,
        score,
    }
}

/// Best-scoring local Smith–Waterman alignment; empty when nothing scores above 0
#[must_use]
pub fn local_align(a: &[u8], b: &[u8], alphabet: Alphabet, scoring: &Scoring) -> PairwiseAlignment {
    let aligner = Aligner {
        a,
        b,
        alphabet,
        scoring,
    };
    let matrix = aligner.fill(true);

    let mut best = (0i64, 0usize, 0usize);
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            if matrix.get(i, j) > best.0 {
                best = (matrix.get(i, j), i, j);
            }
        }
    }

    let (score, i, j) = best;
    let (aligned_a, ribbon, aligned_b) = aligner.traceback(&matrix, i, j, true);

    PairwiseAlignment {
        aligned_a,
        ribbon,
        aligned_b,
        score,
    }
}

/// Run the alignment for `mode`
#[must_use]
pub fn align(
    a: &[u8],
    b: &[u8],
    mode: AlignMode,
    alphabet: Alphabet,
    scoring: &Scoring,
) -> PairwiseAlignment {
    match mode {
        AlignMode::Global => global_align(a, b, alphabet, scoring),
        AlignMode::Local => local_align(a, b, alphabet, scoring),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(a: &str, b: &str) -> PairwiseAlignment {
        global_align(a.as_bytes(), b.as_bytes(), Alphabet::Dna, &Scoring::default())
    }

    fn local(a: &str, b: &str) -> PairwiseAlignment {
        local_align(a.as_bytes(), b.as_bytes(), Alphabet::Dna, &Scoring::default())
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("GLOBAL".parse::<AlignMode>().unwrap(), AlignMode::Global);
        assert_eq!("local".parse::<AlignMode>().unwrap(), AlignMode::Local);
        assert!("semi".parse::<AlignMode>().is_err());
    }

    #[test]
    fn test_self_alignment_is_perfect() {
        let r = global("ACGTACGT", "ACGTACGT");
        assert_eq!(r.score, 8);
        assert_eq!(r.ribbon, "||||||||");
        assert!((r.identity_percent() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_global_with_gap() {
        let r = global("ACGT", "AGT");
        assert_eq!(r.aligned_a, "ACGT");
        assert_eq!(r.aligned_b, "A-GT");
        assert_eq!(r.ribbon, "| ||");
        // 3 matches, one gap
        assert_eq!(r.score, 1);
    }

    #[test]
    fn test_global_against_empty() {
        let r = global("ACG", "");
        assert_eq!(r.aligned_a, "ACG");
        assert_eq!(r.aligned_b, "---");
        assert_eq!(r.score, -6);

        let r = global("", "");
        assert!(r.is_empty());
        assert_eq!(r.score, 0);
    }

    #[test]
    fn test_rows_have_equal_length() {
        for (a, b) in [("GATTACA", "GCATGCU"), ("AAAA", "TT"), ("A", "ACGTACGT")] {
            let r = global(a, b);
            assert_eq!(r.aligned_a.len(), r.aligned_b.len());
            assert_eq!(r.aligned_a.len(), r.ribbon.len());
            assert_eq!(r.aligned_a.replace('-', ""), a);
            assert_eq!(r.aligned_b.replace('-', ""), b);
        }
    }

    #[test]
    fn test_score_symmetry() {
        for (a, b) in [("GATTACA", "GCATGCT"), ("AAAA", "TT"), ("ACGTTGCA", "TTGC")] {
            assert_eq!(global(a, b).score, global(b, a).score);
            assert_eq!(local(a, b).score, local(b, a).score);
        }
    }

    #[test]
    fn test_ambiguous_bases_never_match() {
        let r = global("ANGT", "ANGT");
        assert_eq!(r.ribbon, "| ||");
        assert_eq!(r.score, 2);
    }

    #[test]
    fn test_local_finds_shared_core() {
        let r = local("TTTTACGTAAAA", "GGACGTGG");
        assert_eq!(r.aligned_a, "ACGT");
        assert_eq!(r.aligned_b, "ACGT");
        assert_eq!(r.score, 4);
    }

    #[test]
    fn test_local_without_positive_region_is_empty() {
        let r = local("AAAA", "TTTT");
        assert!(r.is_empty());
        assert_eq!(r.score, 0);
        assert_eq!(r.lines(), vec!["", "", ""]);
    }
}
