//! Serial port shared with its interrupt handlers
//!
//! In interrupt mode the port is installed into a `static` [`SharedSerial`].
//! The receive-complete interrupt calls [`SharedSerial::on_receive`], the
//! data-register-empty interrupt calls [`SharedSerial::on_data_register_empty`],
//! and the foreground reaches the port through short critical sections.
//!
//! Foreground waits loop *outside* the critical section and re-enter it once
//! per step. Spinning inside it would keep the interrupts that are supposed
//! to make progress (and the clock overflow) from ever running.
//!
//! ```ignore
//! static SERIAL: SharedSerial<Usart1, 128, 128> = SharedSerial::new();
//!
//! #[avr_device::interrupt(atmega128a)]
//! fn USART1_RX() {
//!     SERIAL.on_receive();
//! }
//!
//! #[avr_device::interrupt(atmega128a)]
//! fn USART1_UDRE() {
//!     SERIAL.on_data_register_empty();
//! }
//! ```

use core::cell::RefCell;

use critical_section::Mutex;

use crate::platform::error::PlatformError;
use crate::platform::traits::UartInterface;
use crate::platform::Result;

use super::link::SerialLink;
use super::port::AsyncSerialPort;

/// Critical-section cell holding an [`AsyncSerialPort`]
pub struct SharedSerial<U, const RX: usize, const TX: usize> {
    port: Mutex<RefCell<Option<AsyncSerialPort<U, RX, TX>>>>,
}

impl<U, const RX: usize, const TX: usize> SharedSerial<U, RX, TX> {
    /// Create an empty cell
    pub const fn new() -> Self {
        Self {
            port: Mutex::new(RefCell::new(None)),
        }
    }
}

impl<U: UartInterface, const RX: usize, const TX: usize> SharedSerial<U, RX, TX> {
    /// Install the port, returning the previous one if any
    pub fn install(&self, port: AsyncSerialPort<U, RX, TX>) -> Option<AsyncSerialPort<U, RX, TX>> {
        critical_section::with(|cs| self.port.borrow_ref_mut(cs).replace(port))
    }

    /// Remove the port
    pub fn take(&self) -> Option<AsyncSerialPort<U, RX, TX>> {
        critical_section::with(|cs| self.port.borrow_ref_mut(cs).take())
    }

    /// Return true if a port is installed
    pub fn is_installed(&self) -> bool {
        critical_section::with(|cs| self.port.borrow_ref(cs).is_some())
    }

    /// Run `f` on the port inside one critical section
    pub fn with<R>(&self, f: impl FnOnce(&mut AsyncSerialPort<U, RX, TX>) -> R) -> Option<R> {
        critical_section::with(|cs| self.port.borrow_ref_mut(cs).as_mut().map(f))
    }

    /// Receive-complete interrupt body
    pub fn on_receive(&self) {
        self.with(|port| port.intr_rx());
    }

    /// Data-register-empty interrupt body
    pub fn on_data_register_empty(&self) {
        self.with(|port| port.intr_tx());
    }

    /// Read one byte, spinning until one is available
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if no port is installed.
    pub fn read(&self) -> Result<u8> {
        loop {
            match self.with(|port| port.try_read()) {
                None => return Err(PlatformError::ResourceUnavailable),
                Some(Some(byte)) => return Ok(byte),
                Some(None) => {}
            }
        }
    }

    /// Write one byte, spinning while the transmit path is full
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if no port is installed.
    pub fn write(&self, byte: u8) -> Result<()> {
        loop {
            match self.with(|port| port.try_write(byte)) {
                None => return Err(PlatformError::ResourceUnavailable),
                Some(true) => return Ok(()),
                Some(false) => {}
            }
        }
    }

    /// Spin until the transmit buffer is empty
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::ResourceUnavailable` if no port is installed.
    pub fn flush(&self) -> Result<()> {
        loop {
            match self.with(|port| port.flush_step()) {
                None => return Err(PlatformError::ResourceUnavailable),
                Some(true) => return Ok(()),
                Some(false) => {}
            }
        }
    }
}

impl<U, const RX: usize, const TX: usize> Default for SharedSerial<U, RX, TX> {
    fn default() -> Self {
        Self::new()
    }
}

/// Pumped access to a shared port. With no port installed, reads find
/// nothing and writes are refused.
impl<U: UartInterface, const RX: usize, const TX: usize> SerialLink for &SharedSerial<U, RX, TX> {
    fn process_rx(&mut self) -> bool {
        self.with(|port| port.process_rx()).unwrap_or(false)
    }

    fn process_tx(&mut self) -> bool {
        self.with(|port| port.process_tx()).unwrap_or(false)
    }

    fn try_read(&mut self) -> Option<u8> {
        self.with(|port| port.try_read()).flatten()
    }

    fn try_write(&mut self, byte: u8) -> bool {
        self.with(|port| port.try_write(byte)).unwrap_or(false)
    }

    fn flush_step(&mut self) -> bool {
        self.with(|port| port.flush_step()).unwrap_or(true)
    }

    fn read_size(&mut self) -> usize {
        self.with(|port| port.read_size()).unwrap_or(0)
    }

    fn tx_reserve(&mut self, size: usize) -> bool {
        self.with(|port| port.tx_reserve(size)).unwrap_or(false)
    }

    fn take_overflow(&mut self) -> u32 {
        self.with(|port| port.take_overflow()).unwrap_or(0)
    }

    fn take_boot_request(&mut self) -> bool {
        self.with(|port| port.take_boot_request()).unwrap_or(false)
    }
}
