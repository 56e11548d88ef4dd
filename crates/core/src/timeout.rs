//! Deadline and stopwatch predicates
//!
//! Both types borrow a [`TimeSource`] and are polled; nothing here fires on
//! its own. A `Deadline` answers "has more than D ticks passed since it was
//! armed", a `Stopwatch` simply measures.

use crate::traits::{Ticks, TimeSource};

/// One-shot timeout that can be restarted and cancelled.
///
/// # Example
///
/// ```
/// use yunibeer_core::timeout::Deadline;
/// use yunibeer_core::traits::MockTime;
///
/// let time = MockTime::new();
/// let mut deadline = Deadline::new(&time, 100);
/// time.advance(101);
/// assert!(deadline.elapsed());
///
/// deadline.cancel();
/// assert!(!deadline.elapsed());
///
/// deadline.restart();
/// assert!(!deadline.elapsed());
/// ```
pub struct Deadline<'a, T: ?Sized> {
    clock: &'a T,
    base: Ticks,
    duration: Ticks,
    armed: bool,
}

impl<'a, T: TimeSource + ?Sized> Deadline<'a, T> {
    /// Arm a deadline `duration` ticks from now
    pub fn new(clock: &'a T, duration: Ticks) -> Self {
        Self {
            clock,
            base: clock.now(),
            duration,
            armed: true,
        }
    }

    /// Create a deadline that stays silent until the first `restart()`
    pub fn cancelled(clock: &'a T, duration: Ticks) -> Self {
        let mut deadline = Self::new(clock, duration);
        deadline.cancel();
        deadline
    }

    /// Return true once strictly more than `duration` ticks have passed
    /// since the deadline was armed. A cancelled deadline never elapses.
    pub fn elapsed(&self) -> bool {
        self.armed && self.clock.elapsed_since(self.base) > self.duration
    }

    /// Re-arm the deadline from the current time
    pub fn restart(&mut self) {
        self.base = self.clock.now();
        self.armed = true;
    }

    /// Suspend the deadline until the next `restart()`
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Return true unless cancelled
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Configured duration in ticks
    pub fn duration(&self) -> Ticks {
        self.duration
    }

    /// Change the duration; the current base is kept
    pub fn set_duration(&mut self, duration: Ticks) {
        self.duration = duration;
    }
}

/// Elapsed-time measurement without firing semantics.
///
/// ```
/// use yunibeer_core::timeout::Stopwatch;
/// use yunibeer_core::traits::MockTime;
///
/// let time = MockTime::new();
/// let mut sw = Stopwatch::new(&time);
/// time.advance(17_000);
/// assert_eq!(sw.elapsed_time(), 17_000);
/// sw.clear();
/// assert_eq!(sw.elapsed_time(), 0);
/// ```
pub struct Stopwatch<'a, T: ?Sized> {
    clock: &'a T,
    base: Ticks,
}

impl<'a, T: TimeSource + ?Sized> Stopwatch<'a, T> {
    /// Start measuring from now
    pub fn new(clock: &'a T) -> Self {
        Self {
            clock,
            base: clock.now(),
        }
    }

    /// Ticks since construction or the last `clear()`
    pub fn elapsed_time(&self) -> Ticks {
        self.clock.elapsed_since(self.base)
    }

    /// Restart the measurement from now
    pub fn clear(&mut self) {
        self.base = self.clock.now();
    }
}
