//! Runs an invocation and prints its outcomes

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use tracing::info;

use crate::app::cli::Invocation;
use crate::app::options::{AppOptions, OutputFormat};
use crate::device::client::{DeviceApi, DeviceClient};
use crate::dispatch::dispatcher::{Dispatcher, Outcome, OutcomeRecord, Report};
use crate::errors::RecuairError;

/// Run the invocation against real devices
pub async fn run(options: &AppOptions, invocation: &Invocation) -> Result<Report, RecuairError> {
    let client = DeviceClient::new(options.client.clone())?;
    Ok(run_with(Arc::new(client), options, invocation).await)
}

/// Run the invocation through any [`DeviceApi`]
pub async fn run_with(
    api: Arc<dyn DeviceApi>,
    options: &AppOptions,
    invocation: &Invocation,
) -> Report {
    let dispatcher = Dispatcher::new(api, options.retry.clone());
    let report = dispatcher
        .dispatch(&invocation.command, &invocation.devices)
        .await;
    info!(
        "Finished with {} failure(s) out of {} device(s)",
        report.failures().count(),
        report.outcomes.len()
    );
    report
}

/// Print every outcome, in device order
pub fn print_report(
    report: &Report,
    options: &AppOptions,
    out: &mut impl Write,
) -> std::io::Result<()> {
    for outcome in &report.outcomes {
        match options.output {
            OutputFormat::Json => {
                let line = serde_json::to_string(&OutcomeRecord::from(outcome))?;
                writeln!(out, "{}", line)?;
            }
            OutputFormat::Text => match outcome {
                Outcome::Status(status) => writeln!(out, "{}", status)?,
                Outcome::Acknowledged { .. } => {}
                Outcome::Failure { error, .. } if options.color => {
                    writeln!(out, "{}", error.to_string().red())?
                }
                Outcome::Failure { error, .. } => writeln!(out, "{}", error)?,
            },
        }
    }
    out.flush()
}
