//! Command-line interface for biospeak.
//!
//! Every subcommand drives the same [`Engine`](crate::engine::Engine), so a
//! sentence produces identical output whether it comes from a script, the
//! REPL or a single `exec`.
//!
//! - **run**: execute a script file line by line
//! - **repl**: interactive prompt on stdin
//! - **exec**: execute one sentence given on the command line
//! - **verify**: run self-verification
//!
//! ## Usage
//!
//! ```text
//! # Batch run
//! biospeak run session.bio
//!
//! # One sentence, full JSON result
//! biospeak exec --format json load dna text ACGTACGT as s1
//!
//! # Interactive
//! biospeak repl --gap-score -3
//! ```

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::alignment::scoring::{
    Scoring, DEFAULT_GAP_SCORE, DEFAULT_MATCH_SCORE, DEFAULT_MISMATCH_SCORE,
};
use crate::engine::result::ExecutionResult;
use crate::engine::EngineConfig;

pub mod exec;
pub mod repl;
pub mod run;
pub mod verify;

#[derive(Parser)]
#[command(name = "biospeak")]
#[command(version)]
#[command(about = "Run bioinformatics workflows written as plain sentences")]
#[command(
    long_about = "biospeak executes verb-phrase commands such as 'translate yeast as yeast_protein' against a named workspace of sequences, alignments, tables and reports.\n\nType 'help' in the REPL or run 'biospeak exec help' to list every command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a script of commands, one per line
    Run(run::RunArgs),

    /// Read commands interactively from stdin
    Repl,

    /// Execute a single command
    Exec(exec::ExecArgs),

    /// Run self-verification and report pass/fail
    Verify,
}

/// Alignment scoring and integration settings
#[derive(Args, Debug, Clone, Copy)]
pub struct EngineArgs {
    /// Score for a matching residue pair (must be positive)
    #[arg(long, global = true, default_value_t = DEFAULT_MATCH_SCORE, allow_negative_numbers = true)]
    pub match_score: i64,

    /// Score for a mismatching residue pair (must not be positive)
    #[arg(long, global = true, default_value_t = DEFAULT_MISMATCH_SCORE, allow_negative_numbers = true)]
    pub mismatch_score: i64,

    /// Score per gap position (must not be positive)
    #[arg(long, global = true, default_value_t = DEFAULT_GAP_SCORE, allow_negative_numbers = true)]
    pub gap_score: i64,

    /// Delegate group alignment to a locally installed aligner when available
    #[arg(long, global = true)]
    pub external_aligners: bool,
}

impl EngineArgs {
    /// Engine configuration for these flags
    ///
    /// # Errors
    ///
    /// Returns an error if the scoring scheme breaks its sign conventions.
    pub fn config(&self) -> anyhow::Result<EngineConfig> {
        let scoring = Scoring {
            match_score: self.match_score,
            mismatch_score: self.mismatch_score,
            gap_score: self.gap_score,
        };
        scoring
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid scoring: {e}"))?;
        Ok(EngineConfig {
            scoring,
            external_aligners: self.external_aligners,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print one result: messages to stdout, errors to stderr
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print_result(result: &ExecutionResult, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            if result.is_ok() || result.is_exit() {
                if !result.message.is_empty() {
                    println!("{}", result.message);
                }
            } else {
                eprintln!("Error: {}", result.message);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
    }
    Ok(())
}

/// Exit code for a front end that failed if `failed` is set
#[must_use]
pub fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
