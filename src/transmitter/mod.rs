//! Transmitter application context
//!
//! [`Transmitter`] owns everything the main loop works with: the serial link
//! to the radio/host, the ADC scanner, the feedback signaller, the command
//! framer, the battery monitor and the active stick calibration. It borrows
//! the clock, which is a `static` because its overflow interrupt needs it.
//!
//! Every blocking operation here (`read`, `write` under backpressure,
//! `flush`, `wait`) keeps calling [`Pump::pump`], so the ADC scan and the
//! signaller keep running while the foreground waits.
//!
//! ```text
//! pump():  signaller.process() → serial rx → serial tx → adc.process() → battery.check()
//! ```

use core::fmt;

use yunibeer_core::calibration::{Calibration, CalibrationSession, AXES};
use yunibeer_core::command::{CommandEvent, CommandFramer};
use yunibeer_core::timeout::Deadline;
use yunibeer_core::traits::{Ticks, TimeSource};

use crate::communication::serial::SerialLink;
use crate::core::pump::{self, Pump};
use crate::devices::adc_scanner::RoundRobinAdc;
use crate::devices::battery::BatteryMonitor;
use crate::devices::signaller::BlinkSignaller;
use crate::parameters::TransmitterConfig;
use crate::platform::traits::{AdcInterface, SignalOutput};
use crate::platform::Result;

/// Transmitter context
///
/// Generic over the time source `T`, the serial link `S` (an owned port in
/// polled mode, `&SharedSerial` in interrupt mode), the converter `A` and
/// the feedback output `O`.
pub struct Transmitter<'a, T: ?Sized, S, A, O> {
    clock: &'a T,
    serial: S,
    adc: RoundRobinAdc<A>,
    signaller: BlinkSignaller<'a, T, O>,
    framer: CommandFramer<'a, T>,
    battery: BatteryMonitor<'a, T>,
    telemetry: Deadline<'a, T>,
    calibration: Calibration,
    config: TransmitterConfig,
}

impl<'a, T, S, A, O> Transmitter<'a, T, S, A, O>
where
    T: TimeSource + ?Sized,
    S: SerialLink,
    A: AdcInterface,
    O: SignalOutput,
{
    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::InvalidConfig` if `config` does not validate
    /// and `PlatformError::Adc` if its channel table is unusable.
    pub fn new(
        clock: &'a T,
        serial: S,
        adc: A,
        output: O,
        config: TransmitterConfig,
        calibration: Calibration,
    ) -> Result<Self> {
        config.validate()?;
        let adc = RoundRobinAdc::new(adc, config.channels)?;

        Ok(Self {
            clock,
            serial,
            adc,
            signaller: BlinkSignaller::new(clock, output),
            framer: CommandFramer::new(clock, config.payload_timeout),
            battery: BatteryMonitor::new(
                clock,
                config.low_battery_threshold,
                config.low_battery_period,
                config.low_battery_alert,
            ),
            telemetry: Deadline::new(clock, config.telemetry_period),
            calibration,
            config,
        })
    }

    // ========================================================================
    // Serial
    // ========================================================================

    /// Read one byte, pumping until one arrives
    pub fn read(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.serial.try_read() {
                return byte;
            }
            self.pump();
        }
    }

    /// Take one received byte if there is one
    pub fn try_read(&mut self) -> Option<u8> {
        self.serial.try_read()
    }

    /// Return true if no received byte is waiting
    pub fn rx_empty(&mut self) -> bool {
        self.serial.read_size() == 0
    }

    /// Queue one byte, pumping while the transmit path is full
    pub fn write(&mut self, byte: u8) {
        while !self.serial.try_write(byte) {
            self.pump();
        }
    }

    /// Queue `data`
    pub fn send(&mut self, data: &[u8]) {
        for &byte in data {
            self.write(byte);
        }
    }

    /// Pump until everything queued has gone out
    pub fn flush(&mut self) {
        while !self.serial.flush_step() {
            self.pump();
        }
    }

    /// Return true if more than `size` bytes can be queued without waiting
    pub fn tx_reserve(&mut self, size: usize) -> bool {
        self.serial.tx_reserve(size)
    }

    /// Report and reset the receive loss counter. Returns the bytes lost
    /// since the previous call.
    pub fn take_overflow(&mut self) -> u32 {
        let lost = self.serial.take_overflow();
        if lost != 0 {
            crate::log_warn!("Serial RX lost {} byte(s)", lost);
        }
        lost
    }

    /// Return true (once) if the host sent the bootloader trigger sequence
    pub fn take_boot_request(&mut self) -> bool {
        let requested = self.serial.take_boot_request();
        if requested {
            crate::log_info!("Bootloader entry requested");
        }
        requested
    }

    /// Serial link
    pub fn serial(&self) -> &S {
        &self.serial
    }

    /// Serial link, mutably
    pub fn serial_mut(&mut self) -> &mut S {
        &mut self.serial
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Feed the next received byte through the command framer.
    ///
    /// `None` if nothing was received. A payload that arrives after the
    /// deadline comes back as `CommandEvent::Timeout` and is dropped.
    pub fn poll_command(&mut self) -> Option<CommandEvent> {
        let byte = self.serial.try_read()?;
        let event = self.framer.push_data(byte);
        if event == CommandEvent::Timeout {
            crate::log_warn!("Late extended command payload discarded");
        }
        Some(event)
    }

    /// Command framer (the payload of the last extended command is `framer()[0]`)
    pub fn framer(&self) -> &CommandFramer<'a, T> {
        &self.framer
    }

    // ========================================================================
    // Timing
    // ========================================================================

    /// Pump for at least `ticks`
    pub fn wait(&mut self, ticks: Ticks) {
        let clock = self.clock;
        pump::wait(clock, self, ticks);
    }

    /// Return true once per telemetry period
    pub fn telemetry_due(&mut self) -> bool {
        if self.telemetry.elapsed() {
            self.telemetry.restart();
            true
        } else {
            false
        }
    }

    /// Time source shared with the scanner and signaller
    pub fn clock(&self) -> &'a T {
        self.clock
    }

    // ========================================================================
    // Feedback
    // ========================================================================

    /// Start `count` pulses of the feedback output
    pub fn signal(&mut self, count: u16, on: Ticks, off: Ticks) {
        self.signaller.signal(count, on, off);
    }

    /// Start `count` pulses with the configured default timing
    pub fn signal_default(&mut self, count: u16) {
        self.signal(count, self.config.blink_on, self.config.blink_off);
    }

    /// Buzzer/LED pattern state
    pub fn signaller(&self) -> &BlinkSignaller<'a, T, O> {
        &self.signaller
    }

    /// Low-battery alert state
    pub fn battery_monitor(&self) -> &BatteryMonitor<'a, T> {
        &self.battery
    }

    // ========================================================================
    // Analog inputs
    // ========================================================================

    /// Calibrated reading of stick `axis`, `None` until it was converted once
    pub fn axis(&self, axis: usize) -> Option<i16> {
        if axis >= AXES {
            return None;
        }
        self.adc
            .value(axis)
            .map(|value| self.calibration.apply(axis, value))
    }

    /// Calibrated readings of all sticks, unconverted ones reading 0
    pub fn axes(&self) -> [i16; AXES] {
        let mut out = [0; AXES];
        for (i, v) in out.iter_mut().enumerate() {
            *v = self.axis(i).unwrap_or(0);
        }
        out
    }

    /// Centered battery reading
    pub fn battery(&self) -> Option<i16> {
        self.adc.value(self.config.battery_slot)
    }

    /// ADC scanner with the raw centered readings
    pub fn scanner(&self) -> &RoundRobinAdc<A> {
        &self.adc
    }

    /// ADC scanner, mutably
    pub fn scanner_mut(&mut self) -> &mut RoundRobinAdc<A> {
        &mut self.adc
    }

    // ========================================================================
    // Calibration
    // ========================================================================

    /// Active calibration
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Replace the active calibration
    pub fn set_calibration(&mut self, calibration: Calibration) {
        self.calibration = calibration;
    }

    /// Pump until the scanner completes a full sweep, then feed the
    /// uncalibrated stick values of that sweep to `session`.
    ///
    /// Returns the values recorded.
    pub fn calibration_sweep(&mut self, session: &mut CalibrationSession) -> [i16; AXES] {
        let start = self.adc.sweeps();
        pump::spin_until(self, |tx| tx.adc.sweeps() != start);

        let mut values = [0; AXES];
        for (i, v) in values.iter_mut().enumerate() {
            *v = self.adc.value(i).unwrap_or(0);
        }
        session.record_sweep(&values);
        crate::log_debug!(
            "Calibration sweep: {} {} {} {}",
            values[0],
            values[1],
            values[2],
            values[3]
        );
        values
    }

    /// Configuration the context was built with
    pub fn config(&self) -> &TransmitterConfig {
        &self.config
    }
}

impl<T, S, A, O> Pump for Transmitter<'_, T, S, A, O>
where
    T: TimeSource + ?Sized,
    S: SerialLink,
    A: AdcInterface,
    O: SignalOutput,
{
    fn pump(&mut self) {
        self.signaller.process();
        self.serial.process_rx();
        self.serial.process_tx();
        self.adc.process();
        let battery = self.adc.value(self.config.battery_slot);
        self.battery.check(battery, &mut self.signaller);
    }
}

impl<T, S, A, O> fmt::Write for Transmitter<'_, T, S, A, O>
where
    T: TimeSource + ?Sized,
    S: SerialLink,
    A: AdcInterface,
    O: SignalOutput,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.send(s.as_bytes());
        Ok(())
    }
}
