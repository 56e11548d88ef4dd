//! Mock Platform implementation for testing

use crate::platform::{
    error::{PlatformError, UartError},
    traits::{Platform, UartConfig},
    Result,
};

use super::{MockAdc, MockOutput, MockStorage, MockUart};

/// Mock Platform implementation
///
/// Provides mock peripheral implementations for hardware-free testing.
///
/// # Example
///
/// ```ignore
/// use yunibeer::platform::mock::MockPlatform;
/// use yunibeer::platform::traits::{Platform, UartInterface};
///
/// let mut platform = MockPlatform::new();
/// let mut uart = platform.create_uart(1, Default::default()).unwrap();
/// uart.send(b'H');
/// assert_eq!(uart.tx_buffer(), b"H");
/// ```
#[derive(Debug)]
pub struct MockPlatform {
    uart_taken: [bool; Self::MAX_UARTS as usize],
    adc_taken: bool,
    output_taken: bool,
    storage_taken: bool,
}

impl MockPlatform {
    /// Create a new mock platform
    pub fn new() -> Self {
        Self {
            uart_taken: [false; Self::MAX_UARTS as usize],
            adc_taken: false,
            output_taken: false,
            storage_taken: false,
        }
    }

    /// Maximum number of UART peripherals
    pub const MAX_UARTS: u8 = 2;
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

fn take(flag: &mut bool) -> Result<()> {
    if core::mem::replace(flag, true) {
        Err(PlatformError::ResourceUnavailable)
    } else {
        Ok(())
    }
}

impl Platform for MockPlatform {
    type Uart = MockUart;
    type Adc = MockAdc;
    type Output = MockOutput;
    type Storage = MockStorage;

    fn init() -> Result<Self> {
        Ok(Self::new())
    }

    fn system_clock_hz(&self) -> u32 {
        16_000_000 // Simulated 16 MHz crystal
    }

    fn create_uart(&mut self, uart_id: u8, config: UartConfig) -> Result<Self::Uart> {
        let slot = self
            .uart_taken
            .get_mut(uart_id as usize)
            .ok_or(PlatformError::ResourceUnavailable)?;
        if config.baud_rate == 0 {
            return Err(PlatformError::Uart(UartError::InvalidBaudRate));
        }
        take(slot)?;
        Ok(MockUart::new(config))
    }

    fn create_adc(&mut self) -> Result<Self::Adc> {
        take(&mut self.adc_taken)?;
        Ok(MockAdc::new())
    }

    fn create_signal_output(&mut self) -> Result<Self::Output> {
        take(&mut self.output_taken)?;
        Ok(MockOutput::new())
    }

    fn create_storage(&mut self) -> Result<Self::Storage> {
        take(&mut self.storage_taken)?;
        Ok(MockStorage::new())
    }
}
