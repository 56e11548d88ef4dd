#![cfg_attr(not(test), no_std)]

//! yunibeer - Cooperative I/O and timing for the Yunibeer RC transmitter
//!
//! This library provides the platform abstraction, the buffered serial
//! transport, the non-blocking device drivers and the pumped application
//! context of an 8-bit, OS-less radio-control transmitter.
//!
//! Hardware-independent algorithms (ring buffer, soft clock, deadlines,
//! command framing, calibration math) live in the `yunibeer_core` crate.

// Mock peripherals use std collections
#[cfg(all(feature = "mock", not(test)))]
extern crate std;

// Platform abstraction layer
pub mod platform;

// Cooperative pump and logging
pub mod core;

// Serial transport
pub mod communication;

// Device drivers using platform abstraction
pub mod devices;

// Construction-time settings and persisted calibration
pub mod parameters;

// Application context
pub mod transmitter;
