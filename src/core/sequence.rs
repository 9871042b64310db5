use thiserror::Error;

use crate::core::types::Alphabet;

/// A residue that is not part of the declared alphabet
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("illegal {alphabet} residue '{residue}' at position {position}")]
pub struct ResidueError {
    pub alphabet: Alphabet,
    pub residue: char,
    /// 1-based position in the normalized sequence
    pub position: usize,
}

/// Case-normalize raw sequence text and check it against `alphabet`.
///
/// Whitespace and digits (line breaks, GenBank-style coordinates) are dropped,
/// everything else is uppercased and must be legal for the alphabet.
///
/// # Errors
///
/// Returns `ResidueError` for the first illegal residue.
pub fn normalize_residues(raw: &str, alphabet: Alphabet) -> Result<String, ResidueError> {
    let mut normalized = String::with_capacity(raw.len());

    for c in raw.chars() {
        if c.is_whitespace() || c.is_ascii_digit() {
            continue;
        }
        let upper = c.to_ascii_uppercase();
        if !upper.is_ascii() || !alphabet.is_legal(upper as u8) {
            return Err(ResidueError {
                alphabet,
                residue: c,
                position: normalized.len() + 1,
            });
        }
        normalized.push(upper);
    }

    Ok(normalized)
}

/// A named, immutable biological sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
    /// Unique key within the sequence namespace
    pub name: String,

    pub alphabet: Alphabet,

    /// Uppercase residues, legal for `alphabet`
    pub sequence: String,

    /// Free-text provenance (source record id, operation that produced it)
    pub description: String,

    /// Format the record was loaded from, if any (`fasta`, `fastq`, `genbank`)
    pub source_format: Option<String>,
}

impl SequenceRecord {
    /// Build a record from raw text, normalizing case and validating residues.
    ///
    /// # Errors
    ///
    /// Returns `ResidueError` if the text contains residues outside `alphabet`.
    pub fn new(
        name: impl Into<String>,
        alphabet: Alphabet,
        raw: &str,
    ) -> Result<Self, ResidueError> {
        let sequence = normalize_residues(raw, alphabet)?;
        Ok(Self {
            name: name.into(),
            alphabet,
            sequence,
            description: String::new(),
            source_format: None,
        })
    }

    /// Build a record from residues already produced by a sequence operation
    pub(crate) fn derived(
        name: impl Into<String>,
        alphabet: Alphabet,
        sequence: String,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            alphabet,
            sequence,
            description: description.into(),
            source_format: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_source_format(mut self, format: impl Into<String>) -> Self {
        self.source_format = Some(format.into());
        self
    }

    /// Always the residue count of `sequence`
    #[must_use]
    pub fn length(&self) -> usize {
        self.sequence.len()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.sequence.as_bytes()
    }

    /// MD5 of the uppercase sequence (standard checksum convention)
    #[must_use]
    pub fn md5(&self) -> String {
        format!("{:x}", md5::compute(self.sequence.as_bytes()))
    }

    /// Re-check residues against the alphabet; used by invariant checks
    pub fn validate(&self) -> Result<(), ResidueError> {
        match self
            .sequence
            .bytes()
            .position(|b| !self.alphabet.is_legal(b))
        {
            Some(index) => Err(ResidueError {
                alphabet: self.alphabet,
                residue: char::from(self.sequence.as_bytes()[index]),
                position: index + 1,
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_whitespace_and_digits() {
        let seq = normalize_residues("  1 acgt acgt\n 9 NN", Alphabet::Dna).unwrap();
        assert_eq!(seq, "ACGTACGTNN");
    }

    #[test]
    fn test_normalize_rejects_illegal_residue() {
        let err = normalize_residues("ACGU", Alphabet::Dna).unwrap_err();
        assert_eq!(err.residue, 'U');
        assert_eq!(err.position, 4);
    }

    #[test]
    fn test_protein_keeps_stop() {
        let record = SequenceRecord::new("p", Alphabet::Protein, "mk*").unwrap();
        assert_eq!(record.sequence, "MK*");
        assert_eq!(record.length(), 3);
    }

    #[test]
    fn test_md5_matches_uppercase_convention() {
        // "ACGT" uppercase -> MD5 = f1f8f4bf413b16ad135722aa4591043e
        let record = SequenceRecord::new("s", Alphabet::Dna, "acgt").unwrap();
        assert_eq!(record.md5(), "f1f8f4bf413b16ad135722aa4591043e");
    }
}
