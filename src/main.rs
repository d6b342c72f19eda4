use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use lintplug::cli::{Cli, Commands};
use lintplug::{logging, run_init};

const EXIT_OK: u8 = 0;
const EXIT_ERROR: u8 = 1;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.verbose) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{} {err:#}", "Error:".red().bold());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::from(EXIT_OK),
        Err(err) => {
            tracing::debug!("run failed: {err:?}");
            eprintln!("{} {err:#}", "Error:".red().bold());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Init(args) => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = run_init(&args.options(), &mut out)?;
            out.flush()?;
            tracing::info!(installed = summary.installed, "init finished");
        }
    }
    Ok(())
}
