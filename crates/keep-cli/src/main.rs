use std::process::ExitCode;

use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod progress;
mod ui;

/// Bad flags, unreadable prompt input, or missing directories with `--no-prompt`.
const EXIT_USAGE: u8 = 64;
/// The tracing subscriber could not be installed.
const EXIT_SOFTWARE: u8 = 70;
/// Configuration failed to load or validate.
const EXIT_CONFIG: u8 = 78;

fn main() -> ExitCode {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return if error.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(error) = init_tracing(cli.quiet, cli.verbose) {
        eprintln!("keep error: {error:#}");
        return ExitCode::from(EXIT_SOFTWARE);
    }

    let flags = cli.global_flags();
    ui::init(&flags);

    let config = match bootstrap::load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("keep error: {error:#}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let request = match bootstrap::acquire_request(&cli) {
        Ok(request) => request,
        Err(error) => {
            eprintln!("keep error: {error:#}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    commands::backup::handle(&request, &config, &flags)
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("KEEPSAKE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(progress::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
