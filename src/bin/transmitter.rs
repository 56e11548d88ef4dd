//! Yunibeer transmitter firmware
//!
//! Wires the ATmega128 drivers into the transmitter context: Timer0 feeds
//! the soft clock, USART1 receives through its interrupt into a shared
//! port, and the main loop pumps the context and dispatches single-byte
//! commands from the host.
//!
//! Telemetry encoders and the radio connection sequencing live outside this
//! binary; it answers the service commands only.

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use core::fmt::Write;

use panic_halt as _;

use yunibeer::communication::serial::{AsyncSerialPort, SharedSerial};
use yunibeer::core::pump::Pump;
use yunibeer::parameters::{self, TransmitterConfig, BUILD_INFO};
use yunibeer::platform::atmega128::{
    Atmega128Adc, Atmega128Eeprom, Atmega128Platform, Timer0Counter, Timer3Buzzer, Usart1,
};
use yunibeer::platform::traits::Platform;
use yunibeer::platform::Result;
use yunibeer::transmitter::Transmitter;
use yunibeer_core::calibration::CalibrationSession;
use yunibeer_core::clock::{OverflowTally, SoftClock};
use yunibeer_core::command::CommandEvent;

const RX_CAPACITY: usize = 128;
const TX_CAPACITY: usize = 128;

/// Startup beep length
const STARTUP_BEEP: u32 = 1500;

/// Pause after the startup beep, 8192 ticks (~0.5 s)
const STARTUP_WAIT: u32 = 8192;

type Clock = SoftClock<'static, Timer0Counter>;
type Serial = SharedSerial<Usart1, RX_CAPACITY, TX_CAPACITY>;
type Tx = Transmitter<'static, Clock, &'static Serial, Atmega128Adc, Timer3Buzzer>;

static TIMER0_OVERFLOWS: OverflowTally = OverflowTally::new();
static CLOCK: Clock = SoftClock::new(Timer0Counter::new(), &TIMER0_OVERFLOWS);
static SERIAL: Serial = SharedSerial::new();

#[avr_device::interrupt(atmega128a)]
fn TIMER0_OVF() {
    CLOCK.process();
}

#[avr_device::interrupt(atmega128a)]
fn USART1_RX() {
    SERIAL.on_receive();
}

#[avr_device::interrupt(atmega128a)]
fn USART1_UDRE() {
    SERIAL.on_data_register_empty();
}

fn setup() -> Result<(Tx, Atmega128Eeprom)> {
    let mut platform = Atmega128Platform::init()?;
    let config = TransmitterConfig::default();

    let mut uart = platform.create_uart(1, config.serial.uart)?;
    uart.set_rx_interrupt(true);
    SERIAL.install(AsyncSerialPort::new(uart, config.serial));

    let adc = platform.create_adc()?;
    let buzzer = platform.create_signal_output()?;
    let mut eeprom = platform.create_storage()?;
    let calibration = parameters::load_or_default(&mut eeprom);

    CLOCK.counter().start();
    // SAFETY: every interrupt handler's shared state is initialized above.
    unsafe { avr_device::interrupt::enable() };

    let tx = Transmitter::new(&CLOCK, &SERIAL, adc, buzzer, config, calibration)?;
    Ok((tx, eeprom))
}

#[avr_device::entry]
fn main() -> ! {
    let (mut tx, mut eeprom) = match setup() {
        Ok(parts) => parts,
        Err(_) => panic!("setup failed"),
    };

    let blink_off = tx.config().blink_off;
    tx.signal(1, STARTUP_BEEP, blink_off);
    tx.wait(STARTUP_WAIT);

    loop {
        if tx.take_boot_request() {
            tx.flush();
            Atmega128Platform::reset();
        }
        tx.take_overflow();

        if let Some(CommandEvent::Command(command)) = tx.poll_command() {
            dispatch(&mut tx, &mut eeprom, command);
        }

        tx.pump();
    }
}

fn dispatch(tx: &mut Tx, eeprom: &mut Atmega128Eeprom, command: u8) {
    match command {
        b'n' => tx.write(b'\n'),
        b'?' => {
            let _ = write!(tx, "Yunibeer transmitter\n\t{}\n", BUILD_INFO);
        }
        b'r' => tx.signal_default(3),
        b'b' => {
            let battery = tx.battery().unwrap_or(0);
            let _ = write!(tx, "{}\r\n", battery);
        }
        b'C' => calibrate(tx, eeprom),
        _ => {}
    }
}

fn calibrate(tx: &mut Tx, eeprom: &mut Atmega128Eeprom) {
    let _ = tx.write_str("Calibration mode:\n\tcenter all axes and then press space\n");
    tx.flush();
    if tx.read() != b' ' {
        let _ = tx.write_str("Calibration canceled!\n");
        return;
    }

    let mut session = CalibrationSession::new();
    while !session.is_centered() {
        tx.calibration_sweep(&mut session);
    }

    let _ = tx.write_str("\tmove all axes across full range and then press space\n");
    tx.flush();
    while tx.rx_empty() {
        let values = tx.calibration_sweep(&mut session);
        for (axis, &value) in values.iter().enumerate() {
            let (min, max) = session.range(axis);
            let _ = write!(tx, "{:7} {:7} {:7} ", min, session.deviation(axis, value), max);
        }
        let _ = tx.write_str("\r\n");
        tx.flush();
    }
    if tx.read() != b' ' {
        let _ = tx.write_str("\tCalibration canceled!\n");
        return;
    }

    let calibration = match session.finish() {
        Ok(calibration) => calibration,
        Err(e) => {
            let _ = write!(tx, "\tCalibration failed: {}\n", e);
            return;
        }
    };
    for cal in calibration.axes.iter() {
        let _ = write!(tx, "{:7} {:7} {:7} ", cal.gain_neg, cal.offset, cal.gain_pos);
    }
    let _ = tx.write_str("\r\n");

    match parameters::store_calibration(eeprom, &calibration) {
        Ok(()) => {
            tx.set_calibration(calibration);
            let _ = tx.write_str("\tdone.\n");
        }
        Err(e) => {
            let _ = write!(tx, "\tstore failed: {}\n", e);
        }
    }
}
