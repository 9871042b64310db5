//! Residue transforms: slicing, splitting, joining, reversal, complement and
//! transcription. Each returns fresh residues; inputs are never modified.

use crate::core::sequence::SequenceRecord;
use crate::core::types::Alphabet;
use crate::ops::{require_nucleotide, OpError};

/// 1-based inclusive `[start, end]`
///
/// # Errors
///
/// Returns `OpError::InvalidRange` if either bound is non-positive,
/// `end < start`, or `end` is past the sequence end.
pub fn slice(record: &SequenceRecord, start: i64, end: i64) -> Result<String, OpError> {
    if start < 1 || end < 1 {
        return Err(OpError::InvalidRange(format!(
            "bounds must be positive (got {start} to {end})"
        )));
    }
    if end < start {
        return Err(OpError::InvalidRange(format!(
            "end {end} is before start {start}"
        )));
    }

    let length = record.length();
    let (start, end) = match (usize::try_from(start), usize::try_from(end)) {
        (Ok(s), Ok(e)) if e <= length => (s, e),
        _ => {
            return Err(OpError::InvalidRange(format!(
                "end {end} exceeds length {length} of '{}'",
                record.name
            )))
        }
    };

    Ok(record.sequence[start - 1..end].to_string())
}

/// Non-overlapping windows of `window` residues; the last may be shorter
///
/// # Errors
///
/// Returns `OpError::InvalidRange` if `window` is not positive.
pub fn split(record: &SequenceRecord, window: i64) -> Result<Vec<String>, OpError> {
    let window = usize::try_from(window)
        .ok()
        .filter(|w| *w > 0)
        .ok_or_else(|| {
            OpError::InvalidRange(format!("window length must be positive (got {window})"))
        })?;

    Ok(record
        .as_bytes()
        .chunks(window)
        .map(|chunk| String::from_utf8_lossy(chunk).to_string())
        .collect())
}

/// Concatenate two sequences of the same alphabet
///
/// # Errors
///
/// Returns `OpError::AlphabetMismatch` if the alphabets differ.
pub fn join(first: &SequenceRecord, second: &SequenceRecord) -> Result<String, OpError> {
    if first.alphabet != second.alphabet {
        return Err(OpError::AlphabetMismatch {
            first: first.alphabet,
            second: second.alphabet,
        });
    }
    Ok(format!("{}{}", first.sequence, second.sequence))
}

#[must_use]
pub fn reverse(record: &SequenceRecord) -> String {
    record.sequence.chars().rev().collect()
}

/// Base-pairing complement, IUPAC ambiguity codes included
///
/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein sequences.
pub fn complement(record: &SequenceRecord) -> Result<String, OpError> {
    require_nucleotide(record.alphabet, "Complement")?;
    Ok(record
        .as_bytes()
        .iter()
        .map(|&b| char::from(complement_base(b, record.alphabet)))
        .collect())
}

/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein sequences.
pub fn reverse_complement(record: &SequenceRecord) -> Result<String, OpError> {
    require_nucleotide(record.alphabet, "Reverse complement")?;
    Ok(record
        .as_bytes()
        .iter()
        .rev()
        .map(|&b| char::from(complement_base(b, record.alphabet)))
        .collect())
}

/// DNA to RNA (T becomes U)
///
/// # Errors
///
/// Returns `OpError::WrongAlphabet` unless the input is DNA.
pub fn transcribe(record: &SequenceRecord) -> Result<String, OpError> {
    if record.alphabet != Alphabet::Dna {
        return Err(OpError::WrongAlphabet {
            operation: "Transcription",
            alphabet: record.alphabet,
        });
    }
    Ok(record.sequence.replace('T', "U"))
}

fn complement_base(base: u8, alphabet: Alphabet) -> u8 {
    let thymine = if alphabet == Alphabet::Rna { b'U' } else { b'T' };
    match base {
        b'A' => thymine,
        b'T' | b'U' => b'A',
        b'C' => b'G',
        b'G' => b'C',
        b'R' => b'Y',
        b'Y' => b'R',
        b'K' => b'M',
        b'M' => b'K',
        b'B' => b'V',
        b'V' => b'B',
        b'D' => b'H',
        b'H' => b'D',
        // N, S and W pair with themselves
        other => other,
    }
}
