//! yunibeer_core - Pure no_std building blocks for the Yunibeer transmitter
//!
//! This crate contains the hardware-independent half of the transmitter's
//! I/O and timing substrate. Everything here can be tested on the host
//! without feature flags or target support.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies, no allocation
//! - **Trait abstractions**: Hardware counters and time sources are injected via traits
//!
//! # Modules
//!
//! - [`ring`]: Fixed-capacity FIFO used for both serial directions
//! - [`traits`]: Time source abstraction (`TimeSource`, `MockTime`)
//! - [`clock`]: Soft clock built from a narrow counter plus an overflow tally
//! - [`timeout`]: `Deadline` and `Stopwatch` predicates
//! - [`bootseq`]: Bootloader trigger sequence filter
//! - [`command`]: Single-byte / marker+payload command framing
//! - [`calibration`]: Stick offset/gain calibration and its persisted layout

#![no_std]

pub mod bootseq;
pub mod calibration;
pub mod clock;
pub mod command;
pub mod ring;
pub mod timeout;
pub mod traits;
