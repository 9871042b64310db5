use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;

use crate::cli::{exit_code, OutputFormat};
use crate::engine::script::run_script_with;
use crate::engine::{Engine, EngineConfig};

#[derive(Args)]
pub struct RunArgs {
    /// Script file: one command per line, `#` comments and `note ...` lines skipped
    #[arg(required = true)]
    pub script: PathBuf,
}

/// Execute run subcommand
///
/// # Errors
///
/// Returns an error if the script cannot be read or the output cannot be serialized.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(
    args: RunArgs,
    config: EngineConfig,
    format: OutputFormat,
    verbose: bool,
) -> anyhow::Result<ExitCode> {
    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("Failed to read script {}", args.script.display()))?;

    let mut engine = Engine::new(config);
    let outcome = match format {
        OutputFormat::Text => run_script_with(&mut engine, &script, |line| {
            if verbose {
                println!("bio> {}", line.text);
            }
            if line.is_ok() || line.is_exit() {
                if !line.message.is_empty() {
                    println!("{}", line.message);
                }
            } else {
                eprintln!("Line {}: {}", line.line_number, line.message);
            }
        }),
        OutputFormat::Json => {
            let outcome = run_script_with(&mut engine, &script, |_| {});
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            outcome
        }
    };

    let failures = outcome.failures().count();
    if failures > 0 {
        eprintln!(
            "{failures} of {} commands failed in {}",
            outcome.lines.len(),
            args.script.display()
        );
    }
    Ok(exit_code(failures > 0))
}
