//! Command dispatch across devices

pub mod command;
pub mod dispatcher;
pub mod retry;
