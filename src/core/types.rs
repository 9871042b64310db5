use serde::{Deserialize, Serialize};

/// IUPAC nucleotide ambiguity codes shared by DNA and RNA
const NUCLEOTIDE_AMBIGUITY: &[u8] = b"NRYSWKMBDHV";

/// Standard amino acid residues
const AMINO_ACIDS: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

/// Protein ambiguity codes
const PROTEIN_AMBIGUITY: &[u8] = b"XBZJ";

/// Stop symbol used in translated sequences
pub const STOP_SYMBOL: u8 = b'*';

/// Symbol set a sequence is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    Dna,
    Rna,
    Protein,
}

impl Alphabet {
    /// Parse an alphabet keyword (`dna`, `rna`, `protein`), case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dna" => Some(Self::Dna),
            "rna" => Some(Self::Rna),
            "protein" => Some(Self::Protein),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_nucleotide(self) -> bool {
        matches!(self, Self::Dna | Self::Rna)
    }

    /// Whether `residue` (uppercase) belongs to this alphabet, ambiguity codes included
    #[must_use]
    pub fn is_legal(self, residue: u8) -> bool {
        match self {
            Self::Dna => b"ACGT".contains(&residue) || NUCLEOTIDE_AMBIGUITY.contains(&residue),
            Self::Rna => b"ACGU".contains(&residue) || NUCLEOTIDE_AMBIGUITY.contains(&residue),
            Self::Protein => {
                AMINO_ACIDS.contains(&residue)
                    || PROTEIN_AMBIGUITY.contains(&residue)
                    || residue == STOP_SYMBOL
            }
        }
    }

    /// Ambiguity codes never count as matches or as definite bases
    #[must_use]
    pub fn is_ambiguous(self, residue: u8) -> bool {
        match self {
            Self::Dna | Self::Rna => NUCLEOTIDE_AMBIGUITY.contains(&residue),
            Self::Protein => PROTEIN_AMBIGUITY.contains(&residue),
        }
    }

    /// Unit used when reporting lengths
    #[must_use]
    pub fn unit(self) -> &'static str {
        match self {
            Self::Dna => "bp",
            Self::Rna => "nt",
            Self::Protein => "aa",
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dna => write!(f, "dna"),
            Self::Rna => write!(f, "rna"),
            Self::Protein => write!(f, "protein"),
        }
    }
}

/// The four independent namespaces of the workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Sequence,
    Alignment,
    Table,
    Report,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Alignment => write!(f, "alignment"),
            Self::Table => write!(f, "table"),
            Self::Report => write!(f, "report"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_parse() {
        assert_eq!(Alphabet::parse("DNA"), Some(Alphabet::Dna));
        assert_eq!(Alphabet::parse("rna"), Some(Alphabet::Rna));
        assert_eq!(Alphabet::parse("Protein"), Some(Alphabet::Protein));
        assert_eq!(Alphabet::parse("peptide"), None);
    }

    #[test]
    fn test_legal_residues() {
        assert!(Alphabet::Dna.is_legal(b'T'));
        assert!(!Alphabet::Dna.is_legal(b'U'));
        assert!(Alphabet::Rna.is_legal(b'U'));
        assert!(!Alphabet::Rna.is_legal(b'T'));
        assert!(Alphabet::Dna.is_legal(b'N'));
        assert!(Alphabet::Protein.is_legal(b'*'));
        assert!(Alphabet::Protein.is_legal(b'X'));
        assert!(!Alphabet::Protein.is_legal(b'1'));
    }

    #[test]
    fn test_ambiguity() {
        assert!(Alphabet::Dna.is_ambiguous(b'N'));
        assert!(!Alphabet::Dna.is_ambiguous(b'A'));
        assert!(Alphabet::Protein.is_ambiguous(b'X'));
        assert!(!Alphabet::Protein.is_ambiguous(b'N'));
    }
}
