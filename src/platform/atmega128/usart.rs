//! USART1 driver

use crate::platform::{
    error::{PlatformError, UartError},
    traits::{UartConfig, UartInterface, UartParity, UartStatus, UartStopBits},
    Result,
};

use super::{modify, read, regs, write};

// UCSR1A
const U2X: u8 = 1 << 1;
// UCSR1B
const RXCIE: u8 = 1 << 7;
const UDRIE: u8 = 1 << 5;
const RXEN: u8 = 1 << 4;
const TXEN: u8 = 1 << 3;
// UCSR1C
const UPM1: u8 = 1 << 5;
const UPM0: u8 = 1 << 4;
const USBS: u8 = 1 << 3;
const UCSZ1: u8 = 1 << 2;
const UCSZ0: u8 = 1 << 1;

/// Baud rate register value for double-speed mode, rounded to nearest.
///
/// Returns `None` if `baud` is zero or out of the 12-bit range.
pub const fn ubrr_for(f_cpu: u32, baud: u32) -> Option<u16> {
    if baud == 0 {
        return None;
    }
    let divisor = baud.saturating_mul(8);
    let ubrr = (f_cpu + divisor / 2) / divisor;
    if ubrr == 0 || ubrr > 4096 {
        return None;
    }
    Some((ubrr - 1) as u16)
}

/// USART1, 8 data bits, asynchronous, double speed
pub struct Usart1 {
    baud_rate: u32,
}

impl Usart1 {
    pub(super) fn new(f_cpu: u32, config: UartConfig) -> Result<Self> {
        let ubrr = ubrr_for(f_cpu, config.baud_rate)
            .ok_or(PlatformError::Uart(UartError::InvalidBaudRate))?;

        let parity = match config.parity {
            UartParity::None => 0,
            UartParity::Even => UPM1,
            UartParity::Odd => UPM1 | UPM0,
        };
        let stop = match config.stop_bits {
            UartStopBits::One => 0,
            UartStopBits::Two => USBS,
        };

        write(regs::UCSR1B, 0);
        write(regs::UBRR1H, (ubrr >> 8) as u8);
        write(regs::UBRR1L, ubrr as u8);
        write(regs::UCSR1A, U2X);
        write(regs::UCSR1C, parity | stop | UCSZ1 | UCSZ0);
        write(regs::UCSR1B, RXEN | TXEN);

        Ok(Self {
            baud_rate: config.baud_rate,
        })
    }

    /// Enable or disable the receive-complete interrupt
    pub fn set_rx_interrupt(&mut self, enable: bool) {
        critical_section::with(|_| {
            modify(regs::UCSR1B, |v| if enable { v | RXCIE } else { v & !RXCIE });
        });
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }
}

impl UartInterface for Usart1 {
    fn status(&self) -> UartStatus {
        UartStatus::from_bits_truncate(read(regs::UCSR1A))
    }

    fn recv(&mut self) -> u8 {
        read(regs::UDR1)
    }

    fn send(&mut self, byte: u8) {
        write(regs::UDR1, byte);
    }

    fn set_dre_interrupt(&mut self, enable: bool) {
        critical_section::with(|_| {
            modify(regs::UCSR1B, |v| if enable { v | UDRIE } else { v & !UDRIE });
        });
    }
}
