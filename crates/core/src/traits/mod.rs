//! Core traits for hardware-independent timing.
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - The soft clock in [`crate::clock`] is the target implementation

pub mod time;

pub use time::{MockTime, Ticks, TimeSource};
