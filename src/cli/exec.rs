use std::process::ExitCode;

use clap::Args;

use crate::cli::{exit_code, print_result, OutputFormat};
use crate::engine::{Engine, EngineConfig};

#[derive(Args)]
pub struct ExecArgs {
    /// Command words, e.g. `help` or `load dna text ACGT as s1`
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    pub words: Vec<String>,
}

/// Execute exec subcommand
///
/// # Errors
///
/// Returns an error if the result cannot be printed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ExecArgs, config: EngineConfig, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let mut engine = Engine::new(config);
    let result = engine.execute_command(&args.words.join(" "));
    print_result(&result, format)?;
    Ok(exit_code(!result.is_ok() && !result.is_exit()))
}
