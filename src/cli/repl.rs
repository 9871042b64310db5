use std::io::{self, BufRead, Write};

use crate::cli::{print_result, OutputFormat};
use crate::engine::script::is_executable;
use crate::engine::{Engine, EngineConfig};

pub const PROMPT: &str = "bio> ";

/// Read-eval-print loop over `input`; stops on EOF or an exit verb
///
/// # Errors
///
/// Returns an error if reading input or writing the prompt fails.
pub fn run_with<R: BufRead>(input: R, config: EngineConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut engine = Engine::new(config);

    prompt()?;
    for line in input.lines() {
        let line = line?;
        if is_executable(&line) {
            let result = engine.execute_command(line.trim());
            print_result(&result, format)?;
            if result.is_exit() {
                return Ok(());
            }
        }
        prompt()?;
    }
    println!();
    Ok(())
}

fn prompt() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "{PROMPT}")?;
    stdout.flush()
}

/// Execute repl subcommand
///
/// # Errors
///
/// Returns an error if stdin or stdout fail.
pub fn run(config: EngineConfig, format: OutputFormat) -> anyhow::Result<()> {
    run_with(io::stdin().lock(), config, format)
}
