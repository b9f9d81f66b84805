//! Outbound command requests

/// One form-encoded action for one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    /// Hostname of the target device
    pub device: String,

    /// Form fields, in the order they are sent
    pub parameters: Vec<(String, String)>,
}

impl CommandRequest {
    pub fn new<K, V>(device: &str, parameters: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            device: device.to_string(),
            parameters: parameters
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}
