//! Time abstraction traits for hardware-independent timing operations.
//!
//! This module provides the `TimeSource` trait that abstracts over the
//! on-target soft clock and a controllable mock clock, so that deadlines,
//! the command framer and the blink signaller can be tested on the host.

use core::cell::Cell;

/// Clock ticks.
///
/// On the ATmega128 the soft clock advances at F_CPU / 1024, so one tick is
/// 64 us and 256 ticks are 16.384 ms.
pub type Ticks = u32;

/// Monotonic tick source for deadlines and pulse generators.
///
/// This trait abstracts over different time providers:
/// - `SoftClock` (in [`crate::clock`]) for the hardware counter + overflow tally
/// - `MockTime` for host testing with controllable time
///
/// # Example
///
/// ```
/// use yunibeer_core::traits::{MockTime, TimeSource};
///
/// fn poll<T: TimeSource>(time: &T, last: &mut u32) -> bool {
///     if time.elapsed_since(*last) > 256 {
///         *last = time.now();
///         return true;
///     }
///     false
/// }
///
/// let time = MockTime::new();
/// let mut last = 0;
/// assert!(!poll(&time, &mut last));
/// time.advance(300);
/// assert!(poll(&time, &mut last));
/// ```
pub trait TimeSource {
    /// Returns the current time in ticks.
    fn now(&self) -> Ticks;

    /// Returns the ticks elapsed since `base`.
    ///
    /// Uses wrapping subtraction so a single wrap of the tick counter
    /// still yields the right distance.
    fn elapsed_since(&self, base: Ticks) -> Ticks {
        self.ticks_between(base, self.now())
    }

    /// Returns the ticks from `base` to an already sampled `now`.
    fn ticks_between(&self, base: Ticks, now: Ticks) -> Ticks {
        now.wrapping_sub(base)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Ticks {
        (**self).now()
    }

    fn elapsed_since(&self, base: Ticks) -> Ticks {
        (**self).elapsed_since(base)
    }

    fn ticks_between(&self, base: Ticks, now: Ticks) -> Ticks {
        (**self).ticks_between(base, now)
    }
}

// ============================================================================
// Mock Implementation (always available for testing)
// ============================================================================

/// Mock time source for testing with controllable time advancement.
///
/// # Example
///
/// ```
/// use yunibeer_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now(), 0);
///
/// time.advance(256);
/// assert_eq!(time.now(), 256);
/// ```
#[derive(Debug, Default)]
pub struct MockTime {
    current: Cell<Ticks>,
}

impl MockTime {
    /// Creates a new `MockTime` starting at tick 0.
    pub const fn new() -> Self {
        Self {
            current: Cell::new(0),
        }
    }

    /// Creates a new `MockTime` starting at the specified tick.
    pub const fn with_initial(ticks: Ticks) -> Self {
        Self {
            current: Cell::new(ticks),
        }
    }

    /// Sets the current time to an absolute value.
    pub fn set(&self, ticks: Ticks) {
        self.current.set(ticks);
    }

    /// Advances the current time by the specified amount.
    pub fn advance(&self, ticks: Ticks) {
        self.current.set(self.current.get().wrapping_add(ticks));
    }
}

impl TimeSource for MockTime {
    fn now(&self) -> Ticks {
        self.current.get()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_initial_value() {
        let time = MockTime::new();
        assert_eq!(time.now(), 0);
    }

    #[test]
    fn mock_time_with_initial() {
        let time = MockTime::with_initial(5_000);
        assert_eq!(time.now(), 5_000);
    }

    #[test]
    fn mock_time_set_and_advance() {
        let time = MockTime::new();
        time.set(1_000);
        time.advance(24);
        assert_eq!(time.now(), 1_024);
    }

    #[test]
    fn mock_time_elapsed_since() {
        let time = MockTime::new();
        time.set(10_000);
        assert_eq!(time.elapsed_since(3_000), 7_000);
    }

    #[test]
    fn elapsed_since_survives_counter_wrap() {
        let time = MockTime::with_initial(Ticks::MAX - 9);
        let base = time.now();
        time.advance(20);
        assert_eq!(time.elapsed_since(base), 20);
    }

    #[test]
    fn reference_forwards_to_source() {
        let time = MockTime::with_initial(42);
        let by_ref: &MockTime = &time;
        assert_eq!(TimeSource::now(&by_ref), 42);
    }
}
