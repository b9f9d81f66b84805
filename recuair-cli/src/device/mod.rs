//! Access to a single device

pub mod client;
pub mod command;
pub mod status;
