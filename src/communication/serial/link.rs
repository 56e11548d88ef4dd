//! Non-blocking serial access
//!
//! The transmitter context works against [`SerialLink`] so the same pumped
//! read/write loops run over a port it owns (polled mode) or over a port
//! shared with its interrupt handlers.

use crate::platform::traits::UartInterface;

use super::port::AsyncSerialPort;

/// Step-wise serial operations. None of these block.
pub trait SerialLink {
    /// Move one byte from the hardware into the receive buffer
    fn process_rx(&mut self) -> bool;

    /// Move one byte from the transmit buffer to the hardware
    fn process_tx(&mut self) -> bool;

    /// Take one received byte
    fn try_read(&mut self) -> Option<u8>;

    /// Queue one byte; false if there is no room yet
    fn try_write(&mut self, byte: u8) -> bool;

    /// Drain at most one byte; true once the transmit buffer is empty
    fn flush_step(&mut self) -> bool;

    /// Number of buffered received bytes
    fn read_size(&mut self) -> usize;

    /// Return true if more than `size` bytes of transmit buffer are free
    fn tx_reserve(&mut self, size: usize) -> bool;

    /// Loss events since the previous call, resetting the counter
    /// without a gap an interrupt could fall into
    fn take_overflow(&mut self) -> u32;

    /// Return true (once) if the bootloader trigger sequence was received
    fn take_boot_request(&mut self) -> bool;
}

impl<U: UartInterface, const RX: usize, const TX: usize> SerialLink for AsyncSerialPort<U, RX, TX> {
    fn process_rx(&mut self) -> bool {
        critical_section::with(|_| AsyncSerialPort::process_rx(self))
    }

    fn process_tx(&mut self) -> bool {
        critical_section::with(|_| AsyncSerialPort::process_tx(self))
    }

    fn try_read(&mut self) -> Option<u8> {
        critical_section::with(|_| AsyncSerialPort::try_read(self))
    }

    fn try_write(&mut self, byte: u8) -> bool {
        critical_section::with(|_| AsyncSerialPort::try_write(self, byte))
    }

    fn flush_step(&mut self) -> bool {
        critical_section::with(|_| AsyncSerialPort::flush_step(self))
    }

    fn read_size(&mut self) -> usize {
        AsyncSerialPort::read_size(self)
    }

    fn tx_reserve(&mut self, size: usize) -> bool {
        AsyncSerialPort::tx_reserve(self, size)
    }

    fn take_overflow(&mut self) -> u32 {
        critical_section::with(|_| AsyncSerialPort::take_overflow(self))
    }

    fn take_boot_request(&mut self) -> bool {
        AsyncSerialPort::take_boot_request(self)
    }
}
