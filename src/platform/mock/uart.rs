//! Mock UART implementation for testing

use crate::platform::traits::{UartConfig, UartInterface, UartStatus};
use core::cell::Cell;
use std::collections::VecDeque;
use std::vec::Vec;

/// Mock UART implementation
///
/// Simulates the data/status registers of a byte-oriented USART so the
/// serial port can be tested without hardware:
///
/// - injected bytes show up one at a time as `RX_COMPLETE`
/// - a sent byte keeps the data register busy for a configurable number of
///   status polls, which makes transmit backpressure observable
/// - overrun and framing errors can be injected
///
/// # Example
///
/// ```ignore
/// use yunibeer::platform::mock::MockUart;
/// use yunibeer::platform::traits::UartInterface;
///
/// let mut uart = MockUart::new(Default::default());
///
/// uart.inject_rx_data(b"W");
/// assert!(!uart.rx_empty());
/// assert_eq!(uart.recv(), b'W');
///
/// uart.send(b'H');
/// assert_eq!(uart.tx_buffer(), b"H");
/// ```
#[derive(Debug)]
pub struct MockUart {
    config: UartConfig,
    /// Pending received bytes with their framing-error flag
    rx_wire: VecDeque<(u8, bool)>,
    tx_buffer: Vec<u8>,
    /// Status polls a sent byte occupies the data register
    tx_latency: u32,
    tx_busy: Cell<u32>,
    overrun: bool,
    dre_interrupt: bool,
}

impl MockUart {
    /// Create a new mock UART whose transmitter is always ready
    pub fn new(config: UartConfig) -> Self {
        Self {
            config,
            rx_wire: VecDeque::new(),
            tx_buffer: Vec::new(),
            tx_latency: 0,
            tx_busy: Cell::new(0),
            overrun: false,
            dre_interrupt: false,
        }
    }

    /// Keep the data register busy for `polls` status reads after each send
    pub fn with_tx_latency(mut self, polls: u32) -> Self {
        self.tx_latency = polls;
        self
    }

    /// Get transmitted data (for test verification)
    pub fn tx_buffer(&self) -> Vec<u8> {
        self.tx_buffer.clone()
    }

    /// Clear transmit buffer
    pub fn clear_tx_buffer(&mut self) {
        self.tx_buffer.clear();
    }

    /// Inject receive data (for test setup)
    pub fn inject_rx_data(&mut self, data: &[u8]) {
        self.rx_wire.extend(data.iter().map(|&b| (b, false)));
    }

    /// Inject one byte that arrives with a framing error
    pub fn inject_frame_error(&mut self, byte: u8) {
        self.rx_wire.push_back((byte, true));
    }

    /// Flag a hardware overrun on the next received byte
    pub fn inject_overrun(&mut self) {
        self.overrun = true;
    }

    /// Number of received bytes not yet read
    pub fn rx_pending(&self) -> usize {
        self.rx_wire.len()
    }

    /// Return true if the data-register-empty interrupt is enabled
    pub fn dre_interrupt_enabled(&self) -> bool {
        self.dre_interrupt
    }

    /// Get current baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }
}

impl UartInterface for MockUart {
    fn status(&self) -> UartStatus {
        let mut status = UartStatus::empty();

        if let Some(&(_, frame_error)) = self.rx_wire.front() {
            status |= UartStatus::RX_COMPLETE;
            if frame_error {
                status |= UartStatus::FRAME_ERROR;
            }
            if self.overrun {
                status |= UartStatus::DATA_OVERRUN;
            }
        }

        let busy = self.tx_busy.get();
        if busy == 0 {
            status |= UartStatus::DATA_REGISTER_EMPTY;
            if !self.tx_buffer.is_empty() {
                status |= UartStatus::TX_COMPLETE;
            }
        } else {
            self.tx_busy.set(busy - 1);
        }

        status
    }

    fn recv(&mut self) -> u8 {
        self.overrun = false;
        self.rx_wire.pop_front().map(|(b, _)| b).unwrap_or(0)
    }

    fn send(&mut self, byte: u8) {
        self.tx_buffer.push(byte);
        self.tx_busy.set(self.tx_latency);
    }

    fn set_dre_interrupt(&mut self, enable: bool) {
        self.dre_interrupt = enable;
    }
}
