//! Core transmitter infrastructure
//!
//! Logging macros and the cooperative pump that replaces a scheduler.

pub mod logging;
pub mod pump;

pub use pump::{spin_until, wait, Pump};
