//! ATmega128 Platform implementation

use core::cell::Cell;

use critical_section::Mutex;

use crate::platform::{
    error::PlatformError,
    traits::{Platform, UartConfig},
    Result,
};

use super::{regs, write, Atmega128Adc, Atmega128Eeprom, Timer3Buzzer, Usart1, F_CPU};

// WDTCR
const WDE: u8 = 1 << 3;

static PLATFORM_TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// ATmega128 Platform implementation
///
/// Hands out each peripheral driver once. Only USART1 (id 1) is wired to
/// the radio, so it is the only UART offered.
pub struct Atmega128Platform {
    uart_taken: bool,
    adc_taken: bool,
    output_taken: bool,
    storage_taken: bool,
}

impl Atmega128Platform {
    /// Reset the MCU through the watchdog (shortest timeout). The
    /// bootloader runs first after any reset.
    pub fn reset() -> ! {
        critical_section::with(|_| write(regs::WDTCR, WDE));
        loop {}
    }
}

fn take(flag: &mut bool) -> Result<()> {
    if core::mem::replace(flag, true) {
        Err(PlatformError::ResourceUnavailable)
    } else {
        Ok(())
    }
}

impl Platform for Atmega128Platform {
    type Uart = Usart1;
    type Adc = Atmega128Adc;
    type Output = Timer3Buzzer;
    type Storage = Atmega128Eeprom;

    /// Claim the platform. Fails if it was already claimed.
    fn init() -> Result<Self> {
        let taken = critical_section::with(|cs| PLATFORM_TAKEN.borrow(cs).replace(true));
        if taken {
            return Err(PlatformError::ResourceUnavailable);
        }
        Ok(Self {
            uart_taken: false,
            adc_taken: false,
            output_taken: false,
            storage_taken: false,
        })
    }

    fn system_clock_hz(&self) -> u32 {
        F_CPU
    }

    fn create_uart(&mut self, uart_id: u8, config: UartConfig) -> Result<Self::Uart> {
        if uart_id != 1 || self.uart_taken {
            return Err(PlatformError::ResourceUnavailable);
        }
        let uart = Usart1::new(F_CPU, config)?;
        self.uart_taken = true;
        Ok(uart)
    }

    fn create_adc(&mut self) -> Result<Self::Adc> {
        take(&mut self.adc_taken)?;
        Ok(Atmega128Adc::new())
    }

    fn create_signal_output(&mut self) -> Result<Self::Output> {
        take(&mut self.output_taken)?;
        Ok(Timer3Buzzer::new())
    }

    fn create_storage(&mut self) -> Result<Self::Storage> {
        take(&mut self.storage_taken)?;
        Ok(Atmega128Eeprom::new())
    }
}
