//! Recuair CLI - Entry Point

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use recuair::app::cli::Cli;
use recuair::app::run::{print_report, run};
use recuair::logs::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let invocation = match cli.invocation() {
        Ok(invocation) => invocation,
        Err(e) => e.exit(),
    };

    let mut options = cli.options();
    options.color = std::io::stdout().is_terminal();

    if let Err(e) = init_logging(&options.log) {
        eprintln!("Failed to initialize logging: {e}");
    }
    debug!("Running with options: {:?}", options);

    let report = run(&options, &invocation).await?;
    print_report(&report, &options, &mut std::io::stdout().lock())?;

    if report.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
