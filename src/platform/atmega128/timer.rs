//! Timer0 as the soft clock counter

use yunibeer_core::clock::HardwareCounter;

use super::{modify, read, regs, write};

// TCCR0: clk/1024
const CS_1024: u8 = (1 << 2) | (1 << 1) | 1;
// TIMSK
const TOIE0: u8 = 1 << 0;

/// Free-running 8-bit Timer0 at F_CPU / 1024 (64 us per count at 16 MHz)
///
/// Zero-sized, so the soft clock over it can live in a `static`. The
/// TIMER0_OVF handler must call `SoftClock::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timer0Counter;

impl Timer0Counter {
    pub const fn new() -> Self {
        Self
    }

    /// Start the counter and enable its overflow interrupt
    pub fn start(&self) {
        write(regs::TCNT0, 0);
        write(regs::TCCR0, CS_1024);
        critical_section::with(|_| modify(regs::TIMSK, |v| v | TOIE0));
    }
}

impl HardwareCounter for Timer0Counter {
    const BITS: u32 = 8;

    fn count(&self) -> u16 {
        read(regs::TCNT0) as u16
    }
}
