//! Stateless operations over sequences and tables.
//!
//! Every function here is pure: it reads borrowed records and returns new
//! residues, counts or rows. Registering results in the workspace is the
//! dispatcher's job.

pub mod composition;
pub mod table;
pub mod transform;
pub mod translation;

use thiserror::Error;

use crate::core::types::Alphabet;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("{operation} is not defined for {alphabet} sequences")]
    WrongAlphabet {
        operation: &'static str,
        alphabet: Alphabet,
    },

    #[error("Cannot join {first} with {second}: alphabets differ")]
    AlphabetMismatch { first: Alphabet, second: Alphabet },

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("Column '{column}' not found in table '{table}'")]
    MissingColumn { table: String, column: String },
}

/// Require a DNA or RNA alphabet for `operation`
pub(crate) fn require_nucleotide(
    alphabet: Alphabet,
    operation: &'static str,
) -> Result<(), OpError> {
    if alphabet.is_nucleotide() {
        Ok(())
    } else {
        Err(OpError::WrongAlphabet {
            operation,
            alphabet,
        })
    }
}
