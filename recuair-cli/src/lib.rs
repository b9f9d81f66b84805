//! Recuair client library
//!
//! Reads the status page of Recuair ventilation units and submits their
//! command form, for one or many devices at once.

pub mod app;
pub mod device;
pub mod dispatch;
pub mod errors;
pub mod logs;
