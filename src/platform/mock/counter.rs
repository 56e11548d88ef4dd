//! Mock hardware counter for testing the soft clock

use core::cell::Cell;
use yunibeer_core::clock::{HardwareCounter, OverflowTally};

/// Free-running 8-bit counter
///
/// Every read advances the counter by one, like a real timer that keeps
/// running between instructions, and `advance()` jumps ahead. Each wrap
/// "fires" the overflow interrupt by incrementing the tally, so a
/// [`SoftClock`](yunibeer_core::clock::SoftClock) over this counter behaves
/// like the target's Timer0 clock.
///
/// # Example
///
/// ```ignore
/// use yunibeer::platform::mock::MockCounter;
/// use yunibeer_core::clock::{OverflowTally, SoftClock};
///
/// let tally = OverflowTally::new();
/// let clock = SoftClock::new(MockCounter::new(&tally), &tally);
///
/// let before = clock.now();
/// clock.counter().advance(1_000);
/// assert!(clock.now() - before >= 1_000);
/// ```
pub struct MockCounter<'a> {
    value: Cell<u8>,
    tally: &'a OverflowTally,
}

impl<'a> MockCounter<'a> {
    /// Create a counter at zero feeding `tally`
    pub fn new(tally: &'a OverflowTally) -> Self {
        Self {
            value: Cell::new(0),
            tally,
        }
    }

    /// Move the counter forward by `ticks`, firing one overflow per wrap
    pub fn advance(&self, ticks: u32) {
        let total = self.value.get() as u32 + ticks;
        for _ in 0..total >> 8 {
            self.tally.increment();
        }
        self.value.set(total as u8);
    }
}

impl HardwareCounter for MockCounter<'_> {
    const BITS: u32 = 8;

    fn count(&self) -> u16 {
        self.advance(1);
        self.value.get() as u16
    }
}
