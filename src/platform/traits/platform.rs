//! Root platform trait
//!
//! This module defines the root Platform trait that aggregates all peripheral interfaces.

use super::{AdcInterface, NonVolatileStorage, SignalOutput, UartConfig, UartInterface};
use crate::platform::Result;

/// Root platform trait
///
/// This trait aggregates the peripherals the transmitter core needs and hands
/// each of them out once.
///
/// The free-running time base is not part of this trait: its overflow
/// interrupt needs a `static` clock, so platforms expose it separately.
///
/// # Example
///
/// ```ignore
/// let mut platform = Atmega128Platform::init()?;
/// let uart = platform.create_uart(1, UartConfig::default())?;
/// let adc = platform.create_adc()?;
/// ```
pub trait Platform: Sized {
    /// UART peripheral type
    type Uart: UartInterface;

    /// ADC peripheral type
    type Adc: AdcInterface;

    /// Feedback output type
    type Output: SignalOutput;

    /// Non-volatile storage type
    type Storage: NonVolatileStorage;

    /// Initialize the platform
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the platform was
    /// already initialized.
    fn init() -> Result<Self>;

    /// Get system clock frequency in Hz
    fn system_clock_hz(&self) -> u32;

    /// Create a UART peripheral instance
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if the UART is already in
    /// use or the UART ID is invalid, `PlatformError::Uart(InvalidBaudRate)`
    /// if the baud rate cannot be generated.
    fn create_uart(&mut self, uart_id: u8, config: UartConfig) -> Result<Self::Uart>;

    /// Create the ADC instance
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if it was already taken.
    fn create_adc(&mut self) -> Result<Self::Adc>;

    /// Create the feedback output
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if it was already taken.
    fn create_signal_output(&mut self) -> Result<Self::Output>;

    /// Create the non-volatile storage instance
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if it was already taken.
    fn create_storage(&mut self) -> Result<Self::Storage>;
}
