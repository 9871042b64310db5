//! Core data types for the BioSpeak workspace.
//!
//! - [`SequenceRecord`](sequence::SequenceRecord): a named DNA, RNA or protein sequence
//! - [`AlignmentResult`](alignment::AlignmentResult): display rows and score of an alignment
//! - [`Table`](table::Table): ordered, uniquely-named columns and rows
//! - [`Report`](report::Report): multi-line text
//! - [`Workspace`](workspace::Workspace): the four name → entity collections of a session
//! - [`WorkspaceSnapshot`](snapshot::WorkspaceSnapshot): the serialized projection front ends read
//!
//! ## Alphabets
//!
//! | Alphabet | Definite residues | Ambiguity codes |
//! |----------|-------------------|-----------------|
//! | dna      | A C G T           | N R Y S W K M B D H V |
//! | rna      | A C G U           | N R Y S W K M B D H V |
//! | protein  | 20 standard + `*` | X B Z J |
//!
//! Entities are immutable once stored: operations that "modify" something
//! always register a new name.

pub mod alignment;
pub mod report;
pub mod sequence;
pub mod snapshot;
pub mod table;
pub mod types;
pub mod workspace;
