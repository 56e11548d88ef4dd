//! UART interface trait
//!
//! This module defines the byte-level UART interface the serial port is built on.
//! It mirrors how a simple MCU USART is driven: a status register, a data
//! register, and a data-register-empty interrupt enable.

use bitflags::bitflags;

bitflags! {
    /// UART status flags
    ///
    /// Bit positions match the AVR `UCSRnA` register so the hardware backend
    /// can convert the raw register value directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UartStatus: u8 {
        /// A received byte is waiting in the data register
        const RX_COMPLETE = 1 << 7;
        /// The last byte has been shifted out completely
        const TX_COMPLETE = 1 << 6;
        /// The data register can accept the next byte
        const DATA_REGISTER_EMPTY = 1 << 5;
        /// The waiting byte has a framing error
        const FRAME_ERROR = 1 << 4;
        /// At least one byte was lost before the waiting byte
        const DATA_OVERRUN = 1 << 3;
        /// The waiting byte has a parity error
        const PARITY_ERROR = 1 << 2;
    }
}

/// UART parity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartParity {
    /// No parity bit
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

/// UART stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartStopBits {
    /// One stop bit
    One,
    /// Two stop bits
    Two,
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baud_rate: u32,
    /// Parity
    pub parity: UartParity,
    /// Stop bits
    pub stop_bits: UartStopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            parity: UartParity::None,
            stop_bits: UartStopBits::One,
        }
    }
}

/// UART interface trait
///
/// Platform implementations must provide this interface for byte-wise serial I/O.
///
/// # Safety Invariants
///
/// - UART peripheral must be initialized before use
/// - Only one owner per UART instance
/// - `recv()` must only be called when `status()` reports `RX_COMPLETE`
/// - `send()` must only be called when `status()` reports `DATA_REGISTER_EMPTY`
pub trait UartInterface {
    /// Read the status flags
    fn status(&self) -> UartStatus;

    /// Read the received byte from the data register
    ///
    /// Reading clears `RX_COMPLETE`, `FRAME_ERROR` and `DATA_OVERRUN` for that byte.
    fn recv(&mut self) -> u8;

    /// Write a byte into the data register
    fn send(&mut self, byte: u8);

    /// Enable or disable the data-register-empty interrupt
    fn set_dre_interrupt(&mut self, enable: bool);

    /// Return true if no received byte is waiting
    fn rx_empty(&self) -> bool {
        !self.status().contains(UartStatus::RX_COMPLETE)
    }

    /// Return true if the data register can accept a byte
    fn tx_empty(&self) -> bool {
        self.status().contains(UartStatus::DATA_REGISTER_EMPTY)
    }

    /// Return true if the hardware lost data before the waiting byte
    fn overflow(&self) -> bool {
        self.status().contains(UartStatus::DATA_OVERRUN)
    }

    /// Return true if the waiting byte was received with a framing error
    fn frame_error(&self) -> bool {
        self.status().contains(UartStatus::FRAME_ERROR)
    }

    /// Return true once everything written has left the shift register
    fn transmitted(&self) -> bool {
        self.status().contains(UartStatus::TX_COMPLETE)
    }
}
