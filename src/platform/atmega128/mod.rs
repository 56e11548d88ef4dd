//! ATmega128 platform implementation
//!
//! Register-level drivers for the transmitter board. Peripherals are driven
//! through their data-space register addresses; `avr-device` supplies the
//! interrupt vectors, the entry point and the critical-section
//! implementation.
//!
//! # Feature Gate
//!
//! This module is only available when the `atmega128` feature is enabled:
//!
//! ```toml
//! [dependencies]
//! yunibeer = { version = "0.1", features = ["atmega128"] }
//! ```
//!
//! # Peripheral use
//!
//! | Peripheral | Use                                         |
//! |------------|---------------------------------------------|
//! | USART1     | Radio / host serial link                    |
//! | Timer0     | Soft clock counter (clk/1024, overflow IRQ) |
//! | ADC        | Sticks and battery divider                  |
//! | Timer3     | Buzzer tone on OC3A (PE3)                   |
//! | EEPROM     | Calibration block                           |

mod adc;
mod buzzer;
mod eeprom;
mod platform;
mod timer;
mod usart;

pub use adc::Atmega128Adc;
pub use buzzer::Timer3Buzzer;
pub use eeprom::Atmega128Eeprom;
pub use platform::Atmega128Platform;
pub use timer::Timer0Counter;
pub use usart::Usart1;

/// CPU clock of the transmitter board
pub const F_CPU: u32 = 16_000_000;

/// Data-space addresses of the registers used by the drivers
#[allow(dead_code)]
pub(crate) mod regs {
    pub const ADCL: *mut u8 = 0x24 as *mut u8;
    pub const ADCH: *mut u8 = 0x25 as *mut u8;
    pub const ADCSRA: *mut u8 = 0x26 as *mut u8;
    pub const ADMUX: *mut u8 = 0x27 as *mut u8;

    pub const DDRE: *mut u8 = 0x22 as *mut u8;

    pub const WDTCR: *mut u8 = 0x41 as *mut u8;

    pub const EECR: *mut u8 = 0x3C as *mut u8;
    pub const EEDR: *mut u8 = 0x3D as *mut u8;
    pub const EEARL: *mut u8 = 0x3E as *mut u8;
    pub const EEARH: *mut u8 = 0x3F as *mut u8;

    pub const TCNT0: *mut u8 = 0x52 as *mut u8;
    pub const TCCR0: *mut u8 = 0x53 as *mut u8;
    pub const TIMSK: *mut u8 = 0x57 as *mut u8;

    pub const OCR3AL: *mut u8 = 0x86 as *mut u8;
    pub const OCR3AH: *mut u8 = 0x87 as *mut u8;
    pub const TCCR3B: *mut u8 = 0x8A as *mut u8;
    pub const TCCR3A: *mut u8 = 0x8B as *mut u8;

    pub const UBRR1H: *mut u8 = 0x98 as *mut u8;
    pub const UBRR1L: *mut u8 = 0x99 as *mut u8;
    pub const UCSR1B: *mut u8 = 0x9A as *mut u8;
    pub const UCSR1A: *mut u8 = 0x9B as *mut u8;
    pub const UDR1: *mut u8 = 0x9C as *mut u8;
    pub const UCSR1C: *mut u8 = 0x9D as *mut u8;
}

/// Read an I/O register
#[inline(always)]
pub(crate) fn read(reg: *mut u8) -> u8 {
    // SAFETY: `reg` is one of the fixed register addresses in `regs`.
    unsafe { core::ptr::read_volatile(reg) }
}

/// Write an I/O register
#[inline(always)]
pub(crate) fn write(reg: *mut u8, value: u8) {
    // SAFETY: `reg` is one of the fixed register addresses in `regs`.
    unsafe { core::ptr::write_volatile(reg, value) }
}

/// Read-modify-write an I/O register.
///
/// Not atomic; registers also touched from interrupts must be modified
/// inside a critical section.
#[inline(always)]
pub(crate) fn modify(reg: *mut u8, f: impl FnOnce(u8) -> u8) {
    write(reg, f(read(reg)));
}
