//! Mock platform implementation for testing
//!
//! This module provides mock implementations of platform traits that can be used
//! for unit testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled
//!
//! # Example
//!
//! ```ignore
//! use yunibeer::platform::mock::MockPlatform;
//! use yunibeer::platform::traits::{Platform, UartInterface};
//!
//! let mut platform = MockPlatform::new();
//! let mut uart = platform.create_uart(1, Default::default()).unwrap();
//! uart.inject_rx_data(b"1");
//! assert!(!uart.rx_empty());
//! ```

#![cfg(any(test, feature = "mock"))]

mod adc;
mod counter;
mod output;
mod platform;
mod storage;
mod uart;

pub use adc::MockAdc;
pub use counter::MockCounter;
pub use output::MockOutput;
pub use platform::MockPlatform;
pub use storage::MockStorage;
pub use uart::MockUart;
