use std::process::ExitCode;

use crate::cli::{exit_code, print_result, OutputFormat};
use crate::engine::verify::{passed, VERIFICATION_REPORT};
use crate::engine::{Engine, EngineConfig};

/// Execute verify subcommand
///
/// # Errors
///
/// Returns an error if the report cannot be printed.
pub fn run(config: EngineConfig, format: OutputFormat) -> anyhow::Result<ExitCode> {
    let mut engine = Engine::new(config);
    let result = engine.execute_command("verify");
    print_result(&result, format)?;

    let ok = engine
        .workspace()
        .report(VERIFICATION_REPORT)
        .is_some_and(passed);
    Ok(exit_code(!ok))
}
