//! Host integration tests: the transmitter context pumped over mock
//! peripherals, with the soft clock running on a mock Timer0 and the serial
//! port shared with simulated interrupt handlers.

use core::fmt::Write;

use serial_test::serial;
use yunibeer::communication::serial::{AsyncSerialPort, SerialConfig, SharedSerial};
use yunibeer::core::pump::{self, Pump};
use yunibeer::parameters::TransmitterConfig;
use yunibeer::platform::mock::{MockAdc, MockCounter, MockOutput, MockUart};
use yunibeer::platform::traits::UartConfig;
use yunibeer::transmitter::Transmitter;
use yunibeer_core::calibration::Calibration;
use yunibeer_core::clock::{OverflowTally, SoftClock};
use yunibeer_core::command::{CommandEvent, EXTENDED_MARKER};
use yunibeer_core::traits::TimeSource;

type Shared = SharedSerial<MockUart, 32, 16>;

/// Shared with the simulated interrupt handlers, like the firmware's port
static SERIAL: Shared = SharedSerial::new();

/// Install a fresh port into the shared cell
fn shared_port() -> &'static Shared {
    SERIAL.install(AsyncSerialPort::new(
        MockUart::new(UartConfig::default()),
        SerialConfig::default(),
    ));
    &SERIAL
}

/// Deliver `data` the way the receive-complete interrupt would
fn receive(shared: &Shared, data: &[u8]) {
    shared.with(|port| port.uart_mut().inject_rx_data(data));
    for _ in data {
        shared.on_receive();
    }
}

fn sent(shared: &Shared) -> Vec<u8> {
    shared
        .with(|port| port.uart().tx_buffer().to_vec())
        .unwrap_or_default()
}

#[test]
#[serial]
fn test_help_command_round_trip() {
    let tally = OverflowTally::new();
    let clock = SoftClock::new(MockCounter::new(&tally), &tally);
    let shared = shared_port();
    let mut tx = Transmitter::new(
        &clock,
        shared,
        MockAdc::new(),
        MockOutput::new(),
        TransmitterConfig::default(),
        Calibration::identity(),
    )
    .unwrap();

    receive(shared, b"?");
    assert_eq!(tx.poll_command(), Some(CommandEvent::Command(b'?')));

    // Longer than the transmit buffer: writes pump until there is room
    write!(tx, "Yunibeer transmitter\n\t{}\n", "0.1.0-test").unwrap();
    tx.flush();
    assert_eq!(sent(shared), b"Yunibeer transmitter\n\t0.1.0-test\n");
}

#[test]
#[serial]
fn test_extended_command_deadline_on_soft_clock() {
    let tally = OverflowTally::new();
    let clock = SoftClock::new(MockCounter::new(&tally), &tally);
    let shared = shared_port();
    let mut tx = Transmitter::new(
        &clock,
        shared,
        MockAdc::new(),
        MockOutput::new(),
        TransmitterConfig::default(),
        Calibration::identity(),
    )
    .unwrap();

    receive(shared, &[EXTENDED_MARKER, 0b0000_1010]);
    assert_eq!(tx.poll_command(), Some(CommandEvent::Pending));
    assert_eq!(tx.poll_command(), Some(CommandEvent::Extended(0b0000_1010)));
    assert_eq!(tx.framer()[0], 0b0000_1010);

    receive(shared, &[EXTENDED_MARKER]);
    assert_eq!(tx.poll_command(), Some(CommandEvent::Pending));
    // Well past the 2000 tick payload deadline, across many Timer0 overflows
    clock.counter().advance(3_000);
    receive(shared, &[0b0000_1010, b'1']);
    assert_eq!(tx.poll_command(), Some(CommandEvent::Timeout));
    assert_eq!(tx.poll_command(), Some(CommandEvent::Command(b'1')));
}

#[test]
#[serial]
fn test_wait_advances_scan_and_signaller() {
    let tally = OverflowTally::new();
    let clock = SoftClock::new(MockCounter::new(&tally), &tally);
    let shared = shared_port();
    let mut adc = MockAdc::new().with_conversion_polls(4);
    adc.set_reading(6, 900);
    let mut tx = Transmitter::new(
        &clock,
        shared,
        adc,
        MockOutput::new(),
        TransmitterConfig::default(),
        Calibration::identity(),
    )
    .unwrap();

    tx.signal(2, 100, 100);
    let start = clock.now();
    tx.wait(1_000);
    assert!(clock.elapsed_since(start) >= 1_000);

    // Every mock clock read advances the counter, so 1000 ticks take
    // hundreds of pumps: plenty for several full sweeps
    assert!(tx.scanner().sweeps() >= 2);
    assert_eq!(tx.battery(), Some(388));
    assert!(tx.signaller().is_idle());
    assert_eq!(tx.signaller().output().pulses(), 2);
    assert_eq!(tx.battery_monitor().alerts(), 0);
}

#[test]
#[serial]
fn test_bootloader_trigger_and_rx_loss() {
    let tally = OverflowTally::new();
    let clock = SoftClock::new(MockCounter::new(&tally), &tally);
    let shared = shared_port();
    let mut tx = Transmitter::new(
        &clock,
        shared,
        MockAdc::new(),
        MockOutput::new(),
        TransmitterConfig::default(),
        Calibration::identity(),
    )
    .unwrap();

    receive(shared, &[0x74, 0x7E, 0x7A, 0x33]);
    assert!(tx.take_boot_request());
    assert!(!tx.take_boot_request());
    // The trigger bytes are still delivered as data
    let drained: Vec<u8> = core::iter::from_fn(|| tx.try_read()).collect();
    assert_eq!(drained, [0x74, 0x7E, 0x7A, 0x33]);

    // 32-byte receive buffer: the last 8 of 40 bytes are dropped and counted
    receive(shared, &[b'x'; 40]);
    assert_eq!(tx.take_overflow(), 8);
    assert_eq!(tx.take_overflow(), 0);
}

#[test]
#[serial]
fn test_polled_mode_with_owned_port() {
    let tally = OverflowTally::new();
    let clock = SoftClock::new(MockCounter::new(&tally), &tally);
    let port: AsyncSerialPort<MockUart, 8, 4> = AsyncSerialPort::new(
        MockUart::new(UartConfig::default()).with_tx_latency(3),
        SerialConfig::default(),
    );
    let mut tx = Transmitter::new(
        &clock,
        port,
        MockAdc::new(),
        MockOutput::new(),
        TransmitterConfig::default(),
        Calibration::identity(),
    )
    .unwrap();

    tx.serial_mut().uart_mut().inject_rx_data(b"r");
    let spins = pump::spin_until(&mut tx, |tx| !tx.rx_empty());
    assert!(spins >= 1);
    assert_eq!(tx.poll_command(), Some(CommandEvent::Command(b'r')));

    tx.send(b"0123456789");
    tx.flush();
    assert_eq!(tx.serial().uart().tx_buffer(), b"0123456789");
    tx.pump();
}
