//! Buffered asynchronous serial port
//!
//! `AsyncSerialPort` puts a receive and a transmit [`FixedRingBuffer`] in
//! front of a byte-level UART. It can be driven two ways:
//!
//! - **Polled**: the foreground owns the port and moves bytes between the
//!   hardware and the buffers with `process_rx()` / `process_tx()`, usually
//!   from the pump.
//! - **Interrupt**: the port lives in a [`SharedSerial`](super::SharedSerial)
//!   and the receive-complete / data-register-empty interrupts call
//!   `intr_rx()` / `intr_tx()`.
//!
//! Lost data is never an error. Hardware overruns and bytes dropped because
//! the receive buffer was full all increment one saturating overflow counter.
//!
//! # Blocking
//!
//! `read()`, `write()` under backpressure and `flush()` spin until they can
//! complete and have no timeout. Each spin step runs in its own critical
//! section so interrupts (the clock overflow in particular) are serviced
//! between steps. [`AsyncSerialPort::flush_timeout`] is the bounded variant.

use core::fmt;

use yunibeer_core::bootseq::BootTriggerFilter;
use yunibeer_core::ring::FixedRingBuffer;
use yunibeer_core::timeout::Deadline;
use yunibeer_core::traits::{Ticks, TimeSource};

use crate::platform::error::{PlatformError, UartError};
use crate::platform::traits::{UartConfig, UartInterface, UartStatus};
use crate::platform::Result;

/// Serial port configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    /// Hardware UART settings
    pub uart: UartConfig,
    /// Arm the data-register-empty interrupt on every buffered write.
    ///
    /// Only meaningful when the port is shared with its interrupt handlers.
    pub async_tx: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            uart: UartConfig::default(),
            async_tx: false,
        }
    }
}

/// Buffered serial port over a UART
///
/// `RX` and `TX` are the buffer capacities. `TX == 0` disables transmit
/// buffering: `write()` waits for the hardware and sends directly.
///
/// # Example
///
/// ```ignore
/// use yunibeer::communication::serial::{AsyncSerialPort, SerialConfig};
/// use yunibeer::platform::mock::MockUart;
///
/// let uart = MockUart::new(Default::default());
/// let mut port: AsyncSerialPort<_, 16, 16> = AsyncSerialPort::new(uart, SerialConfig::default());
///
/// port.uart_mut().inject_rx_data(b"1");
/// assert_eq!(port.read(), b'1');
///
/// port.write(b'A');
/// port.flush();
/// assert_eq!(port.uart().tx_buffer(), b"A");
/// ```
pub struct AsyncSerialPort<U, const RX: usize, const TX: usize> {
    uart: U,
    rx: FixedRingBuffer<u8, RX>,
    tx: FixedRingBuffer<u8, TX>,
    bootseq: BootTriggerFilter,
    overflow: u32,
    async_tx: bool,
}

impl<U: UartInterface, const RX: usize, const TX: usize> AsyncSerialPort<U, RX, TX> {
    /// Create a port over an opened UART
    pub fn new(uart: U, config: SerialConfig) -> Self {
        Self {
            uart,
            rx: FixedRingBuffer::new(),
            tx: FixedRingBuffer::new(),
            bootseq: BootTriggerFilter::new(),
            overflow: 0,
            async_tx: config.async_tx,
        }
    }

    /// Return true if no received byte is buffered
    pub fn empty(&self) -> bool {
        self.rx.empty()
    }

    /// Return true if nothing is waiting to be transmitted
    pub fn tx_empty(&self) -> bool {
        self.tx.empty()
    }

    /// Return true if the transmit buffer can take another byte
    pub fn tx_ready(&self) -> bool {
        !self.tx.full()
    }

    /// Return true if more than `size` bytes of transmit buffer are free
    pub fn tx_reserve(&self, size: usize) -> bool {
        TX - self.tx.size() > size
    }

    /// Number of buffered received bytes
    pub fn read_size(&self) -> usize {
        self.rx.size()
    }

    /// Return true once the hardware has shifted out everything written to it
    pub fn transmitted(&self) -> bool {
        self.uart.transmitted()
    }

    /// Read one byte, spinning until one is available
    pub fn read(&mut self) -> u8 {
        loop {
            if let Some(byte) = critical_section::with(|_| self.try_read()) {
                return byte;
            }
        }
    }

    /// Read one byte if available, first collecting a pending hardware byte
    pub fn try_read(&mut self) -> Option<u8> {
        if self.rx.empty() {
            self.process_rx();
        }
        self.rx.pop()
    }

    /// Write one byte, spinning while the transmit path is full
    pub fn write(&mut self, byte: u8) {
        while !critical_section::with(|_| self.try_write(byte)) {}
    }

    /// Try to queue (or, unbuffered, send) one byte without spinning.
    ///
    /// A full buffer first gets one drain attempt. Returns false if the byte
    /// could not be accepted.
    pub fn try_write(&mut self, byte: u8) -> bool {
        if TX == 0 {
            if !self.uart.tx_empty() {
                return false;
            }
            self.uart.send(byte);
            return true;
        }

        if self.tx.full() {
            self.process_tx();
        }
        if !self.tx.push(byte) {
            return false;
        }
        if self.async_tx {
            self.uart.set_dre_interrupt(true);
        }
        true
    }

    /// Write every byte of `data`
    pub fn write_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.write(byte);
        }
    }

    /// Spin until the transmit buffer is empty
    pub fn flush(&mut self) {
        while !critical_section::with(|_| self.flush_step()) {}
    }

    /// One flush step: drain at most one byte, then report whether the
    /// transmit buffer is empty
    pub fn flush_step(&mut self) -> bool {
        self.process_tx();
        self.tx.empty()
    }

    /// Flush with an upper bound on the time spent waiting
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Uart(UartError::Timeout)` if bytes are still
    /// buffered after `timeout` ticks. They stay queued.
    pub fn flush_timeout<T>(&mut self, clock: &T, timeout: Ticks) -> Result<()>
    where
        T: TimeSource + ?Sized,
    {
        let deadline = Deadline::new(clock, timeout);
        loop {
            if critical_section::with(|_| self.flush_step()) {
                return Ok(());
            }
            if deadline.elapsed() {
                return Err(PlatformError::Uart(UartError::Timeout));
            }
        }
    }

    /// Collect a received byte from the hardware if one is waiting
    pub fn process_rx(&mut self) -> bool {
        if self.uart.rx_empty() {
            return false;
        }
        self.intr_rx()
    }

    /// Receive-complete handler.
    ///
    /// Returns false if the byte was discarded because of a framing error.
    pub fn intr_rx(&mut self) -> bool {
        let status = self.uart.status();
        if status.contains(UartStatus::DATA_OVERRUN) {
            self.overflow = self.overflow.saturating_add(1);
        }
        if status.contains(UartStatus::FRAME_ERROR) {
            self.uart.recv();
            return false;
        }
        let byte = self.bootseq.check(self.uart.recv());
        if !self.rx.push(byte) {
            self.overflow = self.overflow.saturating_add(1);
        }
        true
    }

    /// Send one buffered byte if the hardware can take it
    pub fn process_tx(&mut self) -> bool {
        if self.tx.empty() || !self.uart.tx_empty() {
            return false;
        }
        self.send_next()
    }

    /// Data-register-empty handler.
    ///
    /// Sends the next buffered byte, or disables the interrupt once the
    /// buffer has run dry.
    pub fn intr_tx(&mut self) -> bool {
        if self.send_next() {
            true
        } else {
            self.uart.set_dre_interrupt(false);
            false
        }
    }

    fn send_next(&mut self) -> bool {
        match self.tx.pop() {
            Some(byte) => {
                self.uart.send(byte);
                true
            }
            None => false,
        }
    }

    /// Loss events since the last `clear_overflow()`
    pub fn overflow(&self) -> u32 {
        self.overflow
    }

    /// Reset the loss counter
    pub fn clear_overflow(&mut self) {
        self.overflow = 0;
    }

    /// Read and reset the loss counter in one step
    pub fn take_overflow(&mut self) -> u32 {
        core::mem::take(&mut self.overflow)
    }

    /// Return true if buffered writes arm the transmit interrupt
    pub fn async_tx(&self) -> bool {
        self.async_tx
    }

    /// Switch interrupt-driven transmission on or off
    pub fn set_async_tx(&mut self, enable: bool) {
        self.async_tx = enable;
        if enable && !self.tx.empty() {
            self.uart.set_dre_interrupt(true);
        }
    }

    /// Return true (once) if the bootloader trigger sequence was received
    pub fn take_boot_request(&mut self) -> bool {
        self.bootseq.take_request()
    }

    /// Receive buffer
    pub fn rx_buffer(&self) -> &FixedRingBuffer<u8, RX> {
        &self.rx
    }

    /// Transmit buffer
    pub fn tx_buffer(&self) -> &FixedRingBuffer<u8, TX> {
        &self.tx
    }

    /// Underlying UART
    pub fn uart(&self) -> &U {
        &self.uart
    }

    /// Underlying UART, mutably
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Release the UART
    pub fn into_inner(self) -> U {
        self.uart
    }
}

impl<U: UartInterface, const RX: usize, const TX: usize> fmt::Write for AsyncSerialPort<U, RX, TX> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write_bytes(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockCounter, MockUart};
    use core::fmt::Write as _;
    use yunibeer_core::bootseq::BOOT_SEQUENCE;
    use yunibeer_core::clock::{OverflowTally, SoftClock};

    fn port<const RX: usize, const TX: usize>(uart: MockUart) -> AsyncSerialPort<MockUart, RX, TX> {
        AsyncSerialPort::new(uart, SerialConfig::default())
    }

    #[test]
    fn test_overrun_then_three_bytes() {
        let mut p = port::<8, 8>(MockUart::new(UartConfig::default()));
        p.uart_mut().inject_overrun();
        p.uart_mut().inject_rx_data(b"abc");

        while p.process_rx() {}

        assert_eq!(p.overflow(), 1);
        assert_eq!(p.read_size(), 3);
        assert_eq!(p.read(), b'a');
        assert_eq!(p.read(), b'b');
        assert_eq!(p.read(), b'c');
        assert!(p.empty());
    }

    #[test]
    fn test_rx_full_drops_and_counts() {
        let mut p = port::<2, 8>(MockUart::new(UartConfig::default()));
        p.uart_mut().inject_rx_data(b"xyz");
        while p.process_rx() {}

        assert_eq!(p.overflow(), 1);
        assert_eq!(p.try_read(), Some(b'x'));
        assert_eq!(p.try_read(), Some(b'y'));
        assert_eq!(p.try_read(), None);

        p.clear_overflow();
        assert_eq!(p.overflow(), 0);

        p.uart_mut().inject_rx_data(b"zzz");
        while p.process_rx() {}
        assert_eq!(p.take_overflow(), 1);
        assert_eq!(p.overflow(), 0);
    }

    #[test]
    fn test_frame_error_is_discarded() {
        let mut p = port::<8, 8>(MockUart::new(UartConfig::default()));
        p.uart_mut().inject_frame_error(0x13);
        p.uart_mut().inject_rx_data(b"k");

        assert!(!p.process_rx());
        assert!(p.process_rx());
        assert_eq!(p.read_size(), 1);
        assert_eq!(p.read(), b'k');
        assert_eq!(p.overflow(), 0);
    }

    #[test]
    fn test_writes_beyond_capacity_block_until_drained() {
        let uart = MockUart::new(UartConfig::default()).with_tx_latency(3);
        let mut p = port::<8, 4>(uart);

        for &b in b"0123456789" {
            p.write(b);
            assert!(p.tx_buffer().size() <= 4);
        }
        // Blocking writes had to push bytes out to make room
        assert!(p.uart().tx_buffer().len() >= 6);

        p.flush();
        assert!(p.tx_empty());
        assert_eq!(p.uart().tx_buffer(), b"0123456789");
    }

    #[test]
    fn test_unbuffered_tx_sends_directly() {
        let uart = MockUart::new(UartConfig::default()).with_tx_latency(5);
        let mut p = port::<8, 0>(uart);
        assert!(!p.tx_ready());

        p.write(b'a');
        assert_eq!(p.uart().tx_buffer(), b"a");
        assert!(!p.try_write(b'b'));
        p.write(b'b');
        assert_eq!(p.uart().tx_buffer(), b"ab");
        assert!(p.tx_empty());
    }

    #[test]
    fn test_async_tx_arms_and_disarms_interrupt() {
        let uart = MockUart::new(UartConfig::default());
        let config = SerialConfig {
            async_tx: true,
            ..Default::default()
        };
        let mut p: AsyncSerialPort<_, 8, 8> = AsyncSerialPort::new(uart, config);

        p.write(b'h');
        p.write(b'i');
        assert!(p.uart().dre_interrupt_enabled());

        // Simulated data-register-empty interrupts
        assert!(p.intr_tx());
        assert!(p.intr_tx());
        assert!(p.uart().dre_interrupt_enabled());
        assert!(!p.intr_tx());
        assert!(!p.uart().dre_interrupt_enabled());
        assert_eq!(p.uart().tx_buffer(), b"hi");
    }

    #[test]
    fn test_tx_reserve() {
        let uart = MockUart::new(UartConfig::default()).with_tx_latency(u32::MAX);
        let mut p = port::<8, 4>(uart);
        assert!(p.tx_reserve(3));
        assert!(!p.tx_reserve(4));
        assert!(p.try_write(1));
        assert!(p.tx_reserve(2));
        assert!(!p.tx_reserve(3));
    }

    #[test]
    fn test_boot_sequence_passes_through() {
        let mut p = port::<8, 8>(MockUart::new(UartConfig::default()));
        p.uart_mut().inject_rx_data(&BOOT_SEQUENCE);
        while p.process_rx() {}

        assert_eq!(p.read_size(), BOOT_SEQUENCE.len());
        assert!(p.take_boot_request());
        assert!(!p.take_boot_request());
        assert_eq!(p.read(), BOOT_SEQUENCE[0]);
    }

    #[test]
    fn test_flush_timeout_on_stuck_transmitter() {
        let tally = OverflowTally::new();
        let clock = SoftClock::new(MockCounter::new(&tally), &tally);

        let uart = MockUart::new(UartConfig::default()).with_tx_latency(u32::MAX);
        let mut p = port::<8, 8>(uart);
        // The first byte sent occupies the data register for good
        p.write(b'x');
        p.write(b'y');

        assert_eq!(
            p.flush_timeout(&clock, 1_000),
            Err(PlatformError::Uart(UartError::Timeout))
        );
        assert!(!p.tx_empty());
    }

    #[test]
    fn test_flush_timeout_succeeds_when_draining() {
        let time = yunibeer_core::traits::MockTime::new();
        let mut p = port::<8, 8>(MockUart::new(UartConfig::default()));
        p.write_bytes(b"ok");
        assert_eq!(p.flush_timeout(&time, 10), Ok(()));
        assert_eq!(p.uart().tx_buffer(), b"ok");
    }

    #[test]
    fn test_fmt_write() {
        let mut p = port::<8, 16>(MockUart::new(UartConfig::default()));
        write!(p, "v={}", 42).unwrap();
        p.flush();
        assert_eq!(p.uart().tx_buffer(), b"v=42");
    }
}
