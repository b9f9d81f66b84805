//! HTTP client for the device status page and command form

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{redirect, Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::device::command::CommandRequest;
use crate::device::status::{parse_status, Status};
use crate::errors::{error_chain, RecuairError};

/// Device operations, as a trait for testability
#[async_trait]
pub trait DeviceApi: Send + Sync {
    /// Fetch and parse the current status of a device
    async fn fetch_status(&self, device: &str) -> Result<Status, RecuairError>;

    /// Submit a command form to a device
    async fn send_command(&self, request: &CommandRequest) -> Result<(), RecuairError>;
}

/// Device client options
#[derive(Debug, Clone)]
pub struct Options {
    /// Timeout for the status page
    pub status_timeout: Duration,

    /// Timeout for command submissions
    pub command_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            status_timeout: Duration::from_secs(2),
            command_timeout: Duration::from_secs(10),
        }
    }
}

/// HTTP implementation of [`DeviceApi`]
///
/// The inner client is shared by all in-flight requests.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    client: Client,
    options: Options,
}

impl DeviceClient {
    /// Create a new device client
    pub fn new(options: Options) -> Result<Self, RecuairError> {
        // The redirect answering a command is the success signal, never follow it.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| RecuairError::Config(error_chain(&e)))?;

        Ok(Self { client, options })
    }
}

/// Root URL of a device
fn device_url(device: &str) -> Result<Url, url::ParseError> {
    Url::parse(&format!("http://{}/", device))
}

/// Successful command answers. Firmware 12 redirects with 301, later ones with 303.
fn is_command_accepted(status: StatusCode) -> bool {
    matches!(status, StatusCode::MOVED_PERMANENTLY | StatusCode::SEE_OTHER)
}

#[async_trait]
impl DeviceApi for DeviceClient {
    async fn fetch_status(&self, device: &str) -> Result<Status, RecuairError> {
        let fetch_error = |cause: String| {
            debug!("Error encountered: {}", cause);
            RecuairError::Fetch {
                device: device.to_string(),
                cause,
            }
        };

        let url = device_url(device).map_err(|e| fetch_error(e.to_string()))?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .timeout(self.options.status_timeout)
            .send()
            .await
            .map_err(|e| fetch_error(error_chain(&e)))?;

        // Redirects are not followed, so anything but 2xx is a failure here.
        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {} for url ({})", status, url)));
        }

        // The declared charset is unreliable, the page is always UTF-8.
        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(error_chain(&e)))?;
        let html = String::from_utf8_lossy(&body);
        debug!("Response from {}: {}", device, html);

        parse_status(device, &html).map_err(|source| {
            debug!("Unable to parse status of {}: {}", device, source);
            RecuairError::InvalidResponse {
                device: device.to_string(),
                source,
            }
        })
    }

    async fn send_command(&self, request: &CommandRequest) -> Result<(), RecuairError> {
        let device = request.device.as_str();
        let command_error = |cause: String| {
            debug!("Error encountered: {}", cause);
            RecuairError::Command {
                device: device.to_string(),
                cause,
            }
        };

        let url = device_url(device).map_err(|e| command_error(e.to_string()))?;
        debug!("POST {} {:?}", url, request.parameters);

        let response = self
            .client
            .post(url)
            .timeout(self.options.command_timeout)
            .form(&request.parameters)
            .send()
            .await
            .map_err(|e| command_error(error_chain(&e)))?;

        let status = response.status();
        if !is_command_accepted(status) {
            // A plain 200 carries the status page, the device's way of rejecting a form.
            match response.text().await {
                Ok(body) => debug!("Command rejected by {}: {} - {}", device, status, body),
                Err(e) => debug!(
                    "Command rejected by {}: {}, body unreadable: {}",
                    device,
                    status,
                    error_chain(&e)
                ),
            }
            return Err(RecuairError::UnknownStatus {
                device: device.to_string(),
                code: status.as_u16(),
            });
        }

        Ok(())
    }
}
