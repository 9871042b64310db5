//! # biospeak
//!
//! A natural-language command engine for bioinformatics workflows.
//!
//! Users type verb-phrase sentences such as `translate yeast as yeast_protein`
//! and the engine runs them against a named workspace of sequences,
//! alignments, tables and reports. The REPL, the script runner and any
//! embedding front end all go through the same [`Engine`], so identical
//! command text always produces identical results.
//!
//! ## Features
//!
//! - **Grammar**: ordered verb templates with typed capture slots
//! - **Transactions**: a failed command never leaves a partial change behind
//! - **Alignment**: Needleman-Wunsch, Smith-Waterman and progressive group alignment
//! - **Formats**: FASTA, FASTQ, GenBank, GFF3, VCF, BAM, CSV/TSV, JSON and text
//! - **Snapshots**: a format-stable serialized view, exportable and re-loadable
//!
//! ## Example
//!
//! ```rust
//! use biospeak::{Engine, Status};
//!
//! let mut engine = Engine::default();
//! engine.execute_command("load dna text ACGTACGT as s1");
//! engine.execute_command("slice s1 from 1 to 4 as s1a");
//!
//! let result = engine.execute_command("align s1 with s1 as self_align using global");
//! assert_eq!(result.status, Status::Ok);
//! assert_eq!(result.workspace.sequence("s1a").unwrap().sequence, "ACGT");
//! ```
//!
//! ## Modules
//!
//! - [`command`]: Grammar templates and the sentence parser
//! - [`engine`]: Dispatcher, handlers, script runner and self-verification
//! - [`core`]: Workspace entities and the snapshot format
//! - [`ops`]: Pure sequence and table operations
//! - [`alignment`]: Pairwise and group alignment, external integrations
//! - [`parsing`]: File format parsers
//! - [`export`]: FASTA, table, text and workspace writers
//! - [`cli`]: Command-line interface implementation

pub mod alignment;
pub mod cli;
pub mod command;
pub mod core;
pub mod engine;
pub mod export;
pub mod ops;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use command::{Command, Grammar};
pub use core::snapshot::WorkspaceSnapshot;
pub use core::types::*;
pub use engine::result::{ExecutionResult, Status};
pub use engine::{Engine, EngineConfig};
