//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod adc;
pub mod output;
pub mod platform;
pub mod storage;
pub mod uart;

// Re-export trait interfaces
pub use adc::{AdcInterface, ADC_FULL_SCALE, ADC_INPUTS};
pub use output::{PinOutput, SignalOutput};
pub use platform::Platform;
pub use storage::NonVolatileStorage;
pub use uart::{UartConfig, UartInterface, UartParity, UartStatus, UartStopBits};
