//! Command line definition

use std::time::Duration;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::app::options::{AppOptions, OutputFormat};
use crate::device::client;
use crate::dispatch::command::{Command, LightSettings};
use crate::dispatch::retry::{Backoff, CooldownOptions, RetryPolicy};
use crate::logs::{LogLevel, LogOptions};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_TIME"),
    ")"
);

/// Manage recuair devices
#[derive(Parser, Debug)]
#[command(name = "recuair-cli", version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Print debug logs
    #[arg(long, global = true, env = "RECUAIR_DEBUG")]
    pub debug: bool,

    /// Log level, takes precedence over --debug
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Write logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Print outcomes as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Status request timeout in seconds
    #[arg(long, global = true, default_value_t = 2, env = "RECUAIR_STATUS_TIMEOUT")]
    pub status_timeout: u64,

    /// Command request timeout in seconds
    #[arg(long, global = true, default_value_t = 10, env = "RECUAIR_COMMAND_TIMEOUT")]
    pub command_timeout: u64,

    /// Attempts per device before giving up
    #[arg(long, global = true, default_value_t = 20, env = "RECUAIR_ATTEMPTS")]
    pub attempts: u32,

    /// Delay between attempts in milliseconds
    #[arg(long, global = true, default_value_t = 1000, env = "RECUAIR_RETRY_DELAY")]
    pub retry_delay: u64,

    /// Double the delay after each failed attempt, up to 30 seconds
    #[arg(long, global = true)]
    pub exponential: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Print status of devices
    Status(Devices),

    /// Switch devices to automatic mode
    Start(Devices),

    /// Switch devices off
    Stop(Devices),

    /// Switch devices to holiday mode
    Holiday(Devices),

    /// Switch devices to bypass mode
    Bypass(Devices),

    /// Set the light: `light <intensity> <red> <green> <blue> <device>...` or `light off <device>...`
    Light {
        #[arg(required = true, num_args = 2.., value_name = "ARGS")]
        args: Vec<String>,
    },

    /// Acknowledge replaced filters
    ResetFilters(Devices),
}

#[derive(clap::Args, Debug)]
pub struct Devices {
    /// Device hostnames or addresses
    #[arg(required = true, value_name = "DEVICE")]
    pub devices: Vec<String>,
}

/// A command and the devices to run it on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub devices: Vec<String>,
}

impl Cli {
    /// Resolve the subcommand into a [`Command`] and its devices
    pub fn invocation(&self) -> Result<Invocation, clap::Error> {
        let (command, devices) = match &self.command {
            CliCommand::Status(d) => (Command::Status, &d.devices[..]),
            CliCommand::Start(d) => (Command::START, &d.devices[..]),
            CliCommand::Stop(d) => (Command::STOP, &d.devices[..]),
            CliCommand::Holiday(d) => (Command::HOLIDAY, &d.devices[..]),
            CliCommand::Bypass(d) => (Command::BYPASS, &d.devices[..]),
            CliCommand::ResetFilters(d) => (Command::ResetFilters, &d.devices[..]),
            CliCommand::Light { args } => match args.as_slice() {
                [first, devices @ ..] if first == "off" && !devices.is_empty() => {
                    (Command::light_off(), devices)
                }
                [intensity, red, green, blue, devices @ ..]
                    if intensity != "off" && !devices.is_empty() =>
                {
                    let light = LightSettings {
                        intensity: intensity.clone(),
                        red: red.clone(),
                        green: green.clone(),
                        blue: blue.clone(),
                    };
                    (Command::Light(light), devices)
                }
                _ => {
                    return Err(clap::Error::raw(
                        ErrorKind::WrongNumberOfValues,
                        "light expects <intensity> <red> <green> <blue> <device>... or off <device>...\n",
                    ))
                }
            },
        };

        Ok(Invocation {
            command,
            devices: devices.to_vec(),
        })
    }

    /// Collect the options for the run
    pub fn options(&self) -> AppOptions {
        let log_level = match (self.log_level, self.debug) {
            (Some(level), _) => level,
            (None, true) => LogLevel::Debug,
            (None, false) => LogLevel::default(),
        };

        let delay = Duration::from_millis(self.retry_delay);
        let backoff = if self.exponential {
            Backoff::Exponential(CooldownOptions {
                base_delay: delay,
                ..Default::default()
            })
        } else {
            Backoff::Fixed(delay)
        };

        AppOptions {
            log: LogOptions {
                log_level,
                json_format: self.log_json,
            },
            client: client::Options {
                status_timeout: Duration::from_secs(self.status_timeout),
                command_timeout: Duration::from_secs(self.command_timeout),
            },
            retry: RetryPolicy {
                max_attempts: self.attempts,
                backoff,
            },
            output: if self.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            color: false,
        }
    }
}
