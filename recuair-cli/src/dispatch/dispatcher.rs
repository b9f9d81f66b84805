//! Runs one command against many devices concurrently

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::device::client::DeviceApi;
use crate::device::status::Status;
use crate::dispatch::command::Command;
use crate::dispatch::retry::RetryPolicy;
use crate::errors::RecuairError;

/// Result of one command on one device
#[derive(Debug)]
pub enum Outcome {
    /// Status fetched
    Status(Status),

    /// Command accepted by the device
    Acknowledged { device: String },

    /// All attempts failed, carries the last error
    Failure { device: String, error: RecuairError },
}

impl Outcome {
    pub fn device(&self) -> &str {
        match self {
            Outcome::Status(status) => &status.device,
            Outcome::Acknowledged { device } | Outcome::Failure { device, .. } => device,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}

/// Serializable form of an [`Outcome`]
#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum OutcomeRecord<'a> {
    Status {
        #[serde(flatten)]
        status: &'a Status,
    },
    Ok {
        device: &'a str,
    },
    Error {
        device: &'a str,
        message: String,
    },
}

impl<'a> From<&'a Outcome> for OutcomeRecord<'a> {
    fn from(outcome: &'a Outcome) -> Self {
        match outcome {
            Outcome::Status(status) => OutcomeRecord::Status { status },
            Outcome::Acknowledged { device } => OutcomeRecord::Ok { device },
            Outcome::Failure { device, error } => OutcomeRecord::Error {
                device,
                message: error.to_string(),
            },
        }
    }
}

/// Outcomes of one invocation, in the order the devices were given
#[derive(Debug)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(Outcome::is_failure)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }
}

/// Fans a command out to devices, one task per device
pub struct Dispatcher {
    api: Arc<dyn DeviceApi>,
    retry: RetryPolicy,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn DeviceApi>, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    /// Run `command` on every device.
    ///
    /// A failing device never cancels the others; every device gets an outcome.
    pub async fn dispatch(&self, command: &Command, devices: &[String]) -> Report {
        info!("Running {:?} on {} device(s)", command, devices.len());

        let mut handles = Vec::with_capacity(devices.len());
        for device in devices {
            let api = Arc::clone(&self.api);
            let retry = self.retry.clone();
            let command = command.clone();
            let device = device.clone();
            handles.push(tokio::spawn(async move {
                run_on_device(api.as_ref(), &retry, &command, &device).await
            }));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (device, handle) in devices.iter().zip(handles) {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => Outcome::Failure {
                    device: device.clone(),
                    error: RecuairError::Command {
                        device: device.clone(),
                        cause: format!("task failed: {}", e),
                    },
                },
            };
            debug!("Outcome for {}: {:?}", outcome.device(), outcome);
            outcomes.push(outcome);
        }

        Report { outcomes }
    }
}

/// Run one command on one device under the retry policy
pub async fn run_on_device(
    api: &dyn DeviceApi,
    retry: &RetryPolicy,
    command: &Command,
    device: &str,
) -> Outcome {
    let result = match command.request(device) {
        None => retry
            .run(device, move || api.fetch_status(device))
            .await
            .map(Outcome::Status),
        Some(request) => {
            let request = &request;
            retry
                .run(device, move || api.send_command(request))
                .await
                .map(|()| Outcome::Acknowledged {
                    device: device.to_string(),
                })
        }
    };

    result.unwrap_or_else(|error| Outcome::Failure {
        device: device.to_string(),
        error,
    })
}
