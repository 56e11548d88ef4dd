//! ADC driver

use core::cell::Cell;

use crate::platform::traits::{AdcInterface, ADC_INPUTS};

use super::{read, regs, write};

// ADMUX: AVCC reference
const REFS0: u8 = 1 << 6;
const MUX_MASK: u8 = 0x07;
// ADCSRA
const ADEN: u8 = 1 << 7;
const ADSC: u8 = 1 << 6;
const ADPS_128: u8 = 0x07;

/// Single-conversion ADC, prescaler 128 (125 kHz at 16 MHz)
pub struct Atmega128Adc {
    converting: Cell<bool>,
}

impl Atmega128Adc {
    pub(super) fn new() -> Self {
        write(regs::ADMUX, REFS0);
        write(regs::ADCSRA, ADEN | ADPS_128);
        Self {
            converting: Cell::new(false),
        }
    }
}

impl AdcInterface for Atmega128Adc {
    fn start(&mut self, channel: u8) {
        debug_assert!(channel < ADC_INPUTS);
        write(regs::ADMUX, REFS0 | (channel & MUX_MASK));
        write(regs::ADCSRA, ADEN | ADSC | ADPS_128);
        self.converting.set(true);
    }

    fn is_ready(&self) -> bool {
        self.converting.get() && read(regs::ADCSRA) & ADSC == 0
    }

    fn value(&mut self) -> u16 {
        self.converting.set(false);
        // ADCL first: it locks ADCH until ADCH is read
        let low = read(regs::ADCL) as u16;
        let high = read(regs::ADCH) as u16;
        (high << 8) | low
    }
}
