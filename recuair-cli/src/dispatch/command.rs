//! Subcommands and the device action each maps to

use crate::device::command::CommandRequest;

/// Operating modes accepted by the `mode` form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Auto,
    Off,
    Holiday,
    Bypass,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Off => "off",
            Mode::Holiday => "holiday",
            Mode::Bypass => "bypass",
        }
    }
}

/// Color and intensity of the light, passed through verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightSettings {
    pub intensity: String,
    pub red: String,
    pub green: String,
    pub blue: String,
}

impl LightSettings {
    pub fn off() -> Self {
        Self {
            intensity: "0".to_string(),
            red: "0".to_string(),
            green: "0".to_string(),
            blue: "0".to_string(),
        }
    }
}

/// Selected subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the status page
    Status,

    /// Switch the operating mode
    Mode(Mode),

    /// Set the light; the device rejects partial updates
    Light(LightSettings),

    /// Acknowledge the filter replacement
    ResetFilters,
}

impl Command {
    pub const START: Command = Command::Mode(Mode::Auto);
    pub const STOP: Command = Command::Mode(Mode::Off);
    pub const HOLIDAY: Command = Command::Mode(Mode::Holiday);
    pub const BYPASS: Command = Command::Mode(Mode::Bypass);

    pub fn light_off() -> Self {
        Command::Light(LightSettings::off())
    }

    /// Form request for `device`, `None` for the read-only status command
    pub fn request(&self, device: &str) -> Option<CommandRequest> {
        match self {
            Command::Status => None,
            Command::Mode(mode) => Some(CommandRequest::new(device, [("mode", mode.as_str())])),
            Command::Light(light) => Some(CommandRequest::new(
                device,
                [
                    ("r", light.red.as_str()),
                    ("g", light.green.as_str()),
                    ("b", light.blue.as_str()),
                    ("intensity", light.intensity.as_str()),
                ],
            )),
            Command::ResetFilters => {
                Some(CommandRequest::new(device, [("filterNotification", "1")]))
            }
        }
    }
}
