//! Translation with the standard genetic code (NCBI table 1) and ORF scanning.
//!
//! RNA input is read with U as T, so `translate(transcribe(dna))` equals
//! `translate(dna)`. Codons containing ambiguity codes translate to `X`.

use crate::core::sequence::SequenceRecord;
use crate::core::types::STOP_SYMBOL;
use crate::ops::{require_nucleotide, OpError};

const START_CODON: &[u8; 3] = b"ATG";

/// Amino acid for one codon (uppercase, U or T)
#[must_use]
pub fn codon_to_amino(codon: &[u8]) -> u8 {
    if codon.len() != 3 {
        return b'X';
    }
    let mut c = [0u8; 3];
    for (slot, &b) in c.iter_mut().zip(codon) {
        *slot = if b == b'U' { b'T' } else { b };
    }

    match &c {
        b"TTT" | b"TTC" => b'F',
        b"TTA" | b"TTG" | b"CTT" | b"CTC" | b"CTA" | b"CTG" => b'L',
        b"ATT" | b"ATC" | b"ATA" => b'I',
        b"ATG" => b'M',
        b"GTT" | b"GTC" | b"GTA" | b"GTG" => b'V',
        b"TCT" | b"TCC" | b"TCA" | b"TCG" | b"AGT" | b"AGC" => b'S',
        b"CCT" | b"CCC" | b"CCA" | b"CCG" => b'P',
        b"ACT" | b"ACC" | b"ACA" | b"ACG" => b'T',
        b"GCT" | b"GCC" | b"GCA" | b"GCG" => b'A',
        b"TAT" | b"TAC" => b'Y',
        b"TAA" | b"TAG" | b"TGA" => STOP_SYMBOL,
        b"CAT" | b"CAC" => b'H',
        b"CAA" | b"CAG" => b'Q',
        b"AAT" | b"AAC" => b'N',
        b"AAA" | b"AAG" => b'K',
        b"GAT" | b"GAC" => b'D',
        b"GAA" | b"GAG" => b'E',
        b"TGT" | b"TGC" => b'C',
        b"TGG" => b'W',
        b"CGT" | b"CGC" | b"CGA" | b"CGG" | b"AGA" | b"AGG" => b'R',
        b"GGT" | b"GGC" | b"GGA" | b"GGG" => b'G',
        _ => b'X',
    }
}

/// Full translation of one reading frame, stops included as `*`
fn translate_frame_bytes(residues: &[u8], frame: usize) -> String {
    residues
        .get(frame..)
        .unwrap_or_default()
        .chunks_exact(3)
        .map(|codon| char::from(codon_to_amino(codon)))
        .collect()
}

/// Translate from offset 0, stopping before the first stop codon
///
/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein sequences.
pub fn translate(record: &SequenceRecord) -> Result<String, OpError> {
    require_nucleotide(record.alphabet, "Translation")?;
    let full = translate_frame_bytes(record.as_bytes(), 0);
    Ok(match full.find(char::from(STOP_SYMBOL)) {
        Some(stop) => full[..stop].to_string(),
        None => full,
    })
}

/// Translations of forward frames 0, 1 and 2, stops kept
///
/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein sequences.
pub fn translate_frames(record: &SequenceRecord) -> Result<[String; 3], OpError> {
    require_nucleotide(record.alphabet, "Frame translation")?;
    let residues = record.as_bytes();
    Ok([0, 1, 2].map(|frame| translate_frame_bytes(residues, frame)))
}

/// `Frame 1: MK*` style report lines
///
/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein sequences.
pub fn frame_lines(record: &SequenceRecord) -> Result<Vec<String>, OpError> {
    Ok(translate_frames(record)?
        .iter()
        .enumerate()
        .map(|(i, protein)| format!("Frame {}: {protein}", i + 1))
        .collect())
}

/// An `ATG…stop` region in one forward frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenReadingFrame {
    /// Reading frame offset (0, 1 or 2)
    pub frame: usize,
    /// 0-based offset of the start codon
    pub start: usize,
    /// Nucleotides from start codon through stop codon
    pub residues: String,
    /// Amino acids, stop excluded
    pub protein_length: usize,
}

/// Scan the three forward frames for ORFs of at least `min_aa` amino acids.
///
/// Results come frame 0 first, then 1, then 2, left to right within a frame.
/// Scanning resumes after each stop codon, so ORFs never nest.
///
/// # Errors
///
/// Returns `OpError::WrongAlphabet` for protein input and
/// `OpError::InvalidRange` if `min_aa` is not positive.
pub fn find_orfs(record: &SequenceRecord, min_aa: i64) -> Result<Vec<OpenReadingFrame>, OpError> {
    require_nucleotide(record.alphabet, "ORF scan")?;
    let min_aa = usize::try_from(min_aa)
        .ok()
        .filter(|m| *m > 0)
        .ok_or_else(|| {
            OpError::InvalidRange(format!("minimum ORF length must be positive (got {min_aa})"))
        })?;

    let residues = record.as_bytes();
    let mut orfs = Vec::new();

    for frame in 0..3 {
        let mut pos = frame;
        while pos + 3 <= residues.len() {
            if !is_start(&residues[pos..pos + 3]) {
                pos += 3;
                continue;
            }

            let Some(stop) = next_stop(residues, pos) else {
                // No stop downstream in this frame, so no later start can close either
                break;
            };

            let protein_length = (stop - pos) / 3;
            if protein_length >= min_aa {
                orfs.push(OpenReadingFrame {
                    frame,
                    start: pos,
                    residues: record.sequence[pos..stop + 3].to_string(),
                    protein_length,
                });
            }
            pos = stop + 3;
        }
    }

    Ok(orfs)
}

fn is_start(codon: &[u8]) -> bool {
    codon.len() == 3
        && codon
            .iter()
            .zip(START_CODON)
            .all(|(&b, &s)| b == s || (b == b'U' && s == b'T'))
}

/// Offset of the first in-frame stop codon at or after `from`
fn next_stop(residues: &[u8], from: usize) -> Option<usize> {
    (from..)
        .step_by(3)
        .take_while(|i| i + 3 <= residues.len())
        .find(|&i| codon_to_amino(&residues[i..i + 3]) == STOP_SYMBOL)
}
