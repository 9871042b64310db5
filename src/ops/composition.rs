//! Composition queries: GC content, residue and codon counts, motif search.

use std::collections::BTreeMap;

use crate::core::sequence::SequenceRecord;
use crate::ops::{require_nucleotide, OpError};

/// GC percentage over definite bases only.
///
/// Ambiguity codes count in neither numerator nor denominator; an empty or
/// all-ambiguous sequence is 0.
///
/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein sequences.
pub fn gc_percent(record: &SequenceRecord) -> Result<f64, OpError> {
    require_nucleotide(record.alphabet, "GC content")?;

    let mut gc = 0usize;
    let mut definite = 0usize;
    for &b in record.as_bytes() {
        match b {
            b'G' | b'C' => {
                gc += 1;
                definite += 1;
            }
            b'A' | b'T' | b'U' => definite += 1,
            _ => {}
        }
    }

    if definite == 0 {
        return Ok(0.0);
    }
    #[allow(clippy::cast_precision_loss)] // Counts are far below 2^52
    Ok(gc as f64 / definite as f64 * 100.0)
}

/// Count of every residue present, in residue order
#[must_use]
pub fn residue_counts(record: &SequenceRecord) -> BTreeMap<char, usize> {
    let mut counts = BTreeMap::new();
    for c in record.sequence.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Non-overlapping triplet counts from offset 0
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodonCounts {
    pub counts: BTreeMap<String, usize>,
    /// Residues left over after the last full codon (0, 1 or 2)
    pub trailing: usize,
}

/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein sequences.
pub fn codon_counts(record: &SequenceRecord) -> Result<CodonCounts, OpError> {
    require_nucleotide(record.alphabet, "Codon counting")?;

    let bytes = record.as_bytes();
    let mut counts = BTreeMap::new();
    for codon in bytes.chunks_exact(3) {
        *counts
            .entry(String::from_utf8_lossy(codon).to_string())
            .or_insert(0) += 1;
    }

    Ok(CodonCounts {
        counts,
        trailing: bytes.len() % 3,
    })
}

/// Every 0-based start offset of `motif`, overlaps included, case-insensitive
///
/// # Errors
///
/// Returns `OpError::InvalidArgument` for an empty motif.
pub fn find_motif(record: &SequenceRecord, motif: &str) -> Result<Vec<usize>, OpError> {
    let motif = motif.trim().to_ascii_uppercase();
    if motif.is_empty() {
        return Err(OpError::InvalidArgument("Motif must not be empty".to_string()));
    }

    let needle = motif.as_bytes();
    Ok(record
        .as_bytes()
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(i, _)| i)
        .collect())
}

/// `A:2, C:2, G:2, T:2`
pub fn format_counts<K: std::fmt::Display>(counts: &BTreeMap<K, usize>) -> String {
    counts
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Alphabet;

    fn dna(s: &str) -> SequenceRecord {
        SequenceRecord::new("s", Alphabet::Dna, s).unwrap()
    }

    #[test]
    fn test_gc_percent() {
        assert!((gc_percent(&dna("ACGTACGT")).unwrap() - 50.0).abs() < f64::EPSILON);
        assert!((gc_percent(&dna("GGCC")).unwrap() - 100.0).abs() < f64::EPSILON);
        assert!(gc_percent(&dna("")).unwrap().abs() < f64::EPSILON);
        assert!(gc_percent(&dna("NNNN")).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn test_gc_ignores_ambiguity_codes() {
        // 2 G/C of 4 definite bases, N excluded from the denominator
        assert!((gc_percent(&dna("GCATNNNN")).unwrap() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gc_rna_and_protein() {
        let rna = SequenceRecord::new("r", Alphabet::Rna, "GCUU").unwrap();
        assert!((gc_percent(&rna).unwrap() - 50.0).abs() < f64::EPSILON);

        let protein = SequenceRecord::new("p", Alphabet::Protein, "MKV").unwrap();
        assert!(matches!(
            gc_percent(&protein),
            Err(OpError::WrongAlphabet { .. })
        ));
    }

    #[test]
    fn test_gc_bounds() {
        for s in ["", "A", "G", "ACGTNACGRY", "TTTTTTTTG"] {
            let gc = gc_percent(&dna(s)).unwrap();
            assert!((0.0..=100.0).contains(&gc), "{s}: {gc}");
        }
    }

    #[test]
    fn test_residue_counts() {
        let counts = residue_counts(&dna("ACGTAA"));
        assert_eq!(format_counts(&counts), "A:3, C:1, G:1, T:1");
    }

    #[test]
    fn test_codon_counts_drop_trailing() {
        let counts = codon_counts(&dna("ATGATGCC")).unwrap();
        assert_eq!(counts.counts.get("ATG"), Some(&2));
        assert_eq!(counts.counts.len(), 1);
        assert_eq!(counts.trailing, 2);
    }

    #[test]
    fn test_find_motif_overlapping() {
        assert_eq!(find_motif(&dna("AAAA"), "aa").unwrap(), vec![0, 1, 2]);
        assert_eq!(find_motif(&dna("ACGTACGT"), "CGT").unwrap(), vec![1, 5]);
        assert!(find_motif(&dna("ACGT"), "TTT").unwrap().is_empty());
        assert!(find_motif(&dna("AC"), "ACGT").unwrap().is_empty());
        assert!(find_motif(&dna("AC"), " ").is_err());
    }
}
