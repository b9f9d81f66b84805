//! Error types for the Recuair client

use thiserror::Error;

/// Main error type for device operations
#[derive(Error, Debug)]
pub enum RecuairError {
    #[error("Error fetching status of device {device}: {cause}")]
    Fetch { device: String, cause: String },

    #[error("Invalid response returned from device {device}")]
    InvalidResponse {
        device: String,
        #[source]
        source: ParseError,
    },

    #[error("Error from device {device}: {cause}")]
    Command { device: String, cause: String },

    #[error("Unknown error from device {device}, status code {code}")]
    UnknownStatus { device: String, code: u16 },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`RecuairError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout or unexpected status code
    Transport,

    /// The status page could not be interpreted
    MalformedResponse,

    /// Local setup problem, not tied to a device
    Config,
}

impl RecuairError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecuairError::Fetch { .. }
            | RecuairError::Command { .. }
            | RecuairError::UnknownStatus { .. } => ErrorKind::Transport,
            RecuairError::InvalidResponse { .. } => ErrorKind::MalformedResponse,
            RecuairError::Config(_) => ErrorKind::Config,
        }
    }
}

/// Failure while reading the status page.
///
/// Only surfaced as the source of [`RecuairError::InvalidResponse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("missing attribute {attribute} on {element}")]
    MissingAttribute { element: String, attribute: String },

    #[error("invalid number {value:?} for {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("invalid selector {0:?}")]
    InvalidSelector(String),
}

/// Render an error with its whole source chain, `outer: inner: ...`
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
