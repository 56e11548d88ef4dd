//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the transmitter's microcontroller.
//! All register-level code is isolated to the platform implementations.

pub mod error;
pub mod traits;

// Platform implementations (feature-gated)
#[cfg(feature = "atmega128")]
pub mod atmega128;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{
    AdcInterface, NonVolatileStorage, Platform, SignalOutput, UartConfig, UartInterface,
};
