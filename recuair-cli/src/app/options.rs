//! Application configuration options

use crate::device::client;
use crate::dispatch::retry::RetryPolicy;
use crate::logs::LogOptions;

/// How outcomes are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One human readable line per outcome
    #[default]
    Text,

    /// One JSON object per line
    Json,
}

/// Main application options
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Logging configuration
    pub log: LogOptions,

    /// Device HTTP client options
    pub client: client::Options,

    /// Retry policy applied to each device
    pub retry: RetryPolicy,

    /// Output format
    pub output: OutputFormat,

    /// Colorize failures
    pub color: bool,
}
