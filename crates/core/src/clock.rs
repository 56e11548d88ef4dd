//! Soft clock
//!
//! The ATmega128 only offers an 8-bit free-running counter. A wide monotonic
//! time is reconstructed from that counter plus a 16-bit tally of counter
//! overflows that the overflow interrupt maintains:
//!
//! ```text
//! now = (overflows << COUNTER_BITS) | counter
//! ```
//!
//! # Read protocol
//!
//! The tally is written by the interrupt and the counter keeps running while
//! the foreground reads both, and on an 8-bit core even the 16-bit tally read
//! is two instructions. Instead of disabling interrupts on every read,
//! `now()` samples the counter, samples the tally, then samples the counter
//! again. If the second counter sample is not strictly greater than the
//! first, the counter wrapped (or may have wrapped) somewhere in between and
//! the tally sample cannot be trusted, so the read is retried with the newer
//! counter sample as the reference.

use core::cell::UnsafeCell;

use crate::traits::{Ticks, TimeSource};

/// Free-running hardware counter that raises an interrupt on overflow.
pub trait HardwareCounter {
    /// Counter width in bits (8 or 16)
    const BITS: u32;

    /// Read the current counter value
    fn count(&self) -> u16;
}

/// Overflow tally shared between the overflow interrupt and the foreground.
///
/// The interrupt handler is the only writer. Foreground reads use volatile
/// loads and are only meaningful inside the soft clock's retry protocol.
pub struct OverflowTally {
    value: UnsafeCell<u16>,
}

// SAFETY: single-core target. The only writer is the overflow interrupt,
// which cannot be interrupted by itself. Readers tolerate torn reads through
// the retry protocol in `SoftClock::now`.
unsafe impl Sync for OverflowTally {}

impl OverflowTally {
    /// Create a tally starting at zero
    pub const fn new() -> Self {
        Self {
            value: UnsafeCell::new(0),
        }
    }

    /// Increment the tally.
    ///
    /// Must only be called from the counter's overflow interrupt (or from a
    /// test standing in for it).
    pub fn increment(&self) {
        // SAFETY: see the `Sync` impl; this is the sole writer.
        unsafe {
            let current = core::ptr::read_volatile(self.value.get());
            core::ptr::write_volatile(self.value.get(), current.wrapping_add(1));
        }
    }

    /// Sample the tally
    pub fn load(&self) -> u16 {
        // SAFETY: plain volatile load of an aligned u16.
        unsafe { core::ptr::read_volatile(self.value.get()) }
    }
}

impl Default for OverflowTally {
    fn default() -> Self {
        Self::new()
    }
}

/// Monotonic clock built from a narrow counter and an overflow tally.
///
/// # Example
///
/// ```ignore
/// static TIMER0_OVERFLOWS: OverflowTally = OverflowTally::new();
/// static CLOCK: SoftClock<'static, Timer0> = SoftClock::new(Timer0, &TIMER0_OVERFLOWS);
///
/// #[avr_device::interrupt(atmega128a)]
/// fn TIMER0_OVF() {
///     CLOCK.process();
/// }
/// ```
pub struct SoftClock<'a, C> {
    counter: C,
    overflows: &'a OverflowTally,
}

impl<'a, C: HardwareCounter> SoftClock<'a, C> {
    /// Width of the composite value in bits
    pub const WIDTH: u32 = C::BITS + 16;

    /// Mask selecting the composite bits of a tick value
    pub const MASK: Ticks = if Self::WIDTH >= Ticks::BITS {
        Ticks::MAX
    } else {
        (1 << Self::WIDTH) - 1
    };

    /// Create a clock over `counter` and the tally its interrupt maintains
    pub const fn new(counter: C, overflows: &'a OverflowTally) -> Self {
        Self { counter, overflows }
    }

    /// Record one counter overflow.
    ///
    /// Call this from the counter's overflow interrupt only.
    pub fn process(&self) {
        self.overflows.increment();
    }

    /// Read the composite time using the retry protocol
    pub fn now(&self) -> Ticks {
        let mut first = self.counter.count();
        loop {
            let overflows = self.overflows.load();
            let second = self.counter.count();
            if first < second {
                return ((overflows as Ticks) << C::BITS) | second as Ticks;
            }
            first = second;
        }
    }

    /// Access the underlying counter
    pub fn counter(&self) -> &C {
        &self.counter
    }
}

impl<C: HardwareCounter> TimeSource for SoftClock<'_, C> {
    fn now(&self) -> Ticks {
        SoftClock::now(self)
    }

    fn elapsed_since(&self, base: Ticks) -> Ticks {
        self.ticks_between(base, SoftClock::now(self))
    }

    fn ticks_between(&self, base: Ticks, now: Ticks) -> Ticks {
        now.wrapping_sub(base) & Self::MASK
    }
}
