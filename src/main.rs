use std::process::ExitCode;

use biospeak::cli::{self, Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flag; stdout is reserved for command output
    let filter = if cli.verbose {
        EnvFilter::new("biospeak=debug,info")
    } else {
        EnvFilter::new("biospeak=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = cli.engine.config()?;

    match cli.command {
        Commands::Run(args) => cli::run::run(args, config, cli.format, cli.verbose),
        Commands::Repl => {
            cli::repl::run(config, cli.format)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Exec(args) => cli::exec::run(args, config, cli.format),
        Commands::Verify => cli::verify::run(config, cli.format),
    }
}
