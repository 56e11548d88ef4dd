//! Buzzer on Timer3 / OC3A

use crate::platform::traits::SignalOutput;

use super::{modify, regs, write};

// TCCR3A: toggle OC3A on compare match
const COM3A0: u8 = 1 << 6;
// TCCR3B: CTC on OCR3A, no prescaling
const WGM32: u8 = 1 << 3;
const CS30: u8 = 1 << 0;
// PE3
const OC3A_PIN: u8 = 1 << 3;

/// Tone half-period in timer counts (~488 Hz at 16 MHz)
const TONE_COMPARE: u16 = 0x4000;

/// Piezo buzzer driven by Timer3 in CTC mode.
///
/// The timer toggles OC3A continuously; `set()`/`clear()` connect and
/// disconnect the pin by switching its data direction.
pub struct Timer3Buzzer {
    _private: (),
}

impl Timer3Buzzer {
    pub(super) fn new() -> Self {
        // 16-bit register: high byte first
        write(regs::OCR3AH, (TONE_COMPARE >> 8) as u8);
        write(regs::OCR3AL, TONE_COMPARE as u8);
        write(regs::TCCR3A, COM3A0);
        write(regs::TCCR3B, WGM32 | CS30);
        Self { _private: () }
    }
}

impl SignalOutput for Timer3Buzzer {
    fn set(&mut self) {
        critical_section::with(|_| modify(regs::DDRE, |v| v | OC3A_PIN));
    }

    fn clear(&mut self) {
        critical_section::with(|_| modify(regs::DDRE, |v| v & !OC3A_PIN));
    }
}
