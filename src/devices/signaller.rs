//! Blink/beep signaller
//!
//! Produces `count` on-pulses of `on` ticks separated by `off` ticks on a
//! [`SignalOutput`], without blocking. `signal()` switches the output on
//! immediately; `process()` (called from the pump) does the rest.

use yunibeer_core::traits::{Ticks, TimeSource};

use crate::platform::traits::SignalOutput;

/// Default on-time, 4000 ticks (~256 ms)
pub const DEFAULT_ON_TICKS: Ticks = 4000;

/// Default off-time, 3000 ticks (~192 ms)
pub const DEFAULT_OFF_TICKS: Ticks = 3000;

/// Non-blocking repeating pulse generator
///
/// # Example
///
/// ```ignore
/// use yunibeer::devices::signaller::BlinkSignaller;
/// use yunibeer::platform::mock::MockOutput;
/// use yunibeer_core::traits::MockTime;
///
/// let time = MockTime::new();
/// let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
///
/// signaller.signal(1, 100, 100);
/// assert!(signaller.output().is_set());
///
/// time.advance(101);
/// signaller.process();
/// assert!(!signaller.output().is_set());
/// assert!(signaller.is_idle());
/// ```
pub struct BlinkSignaller<'a, T: ?Sized, O> {
    clock: &'a T,
    output: O,
    base: Ticks,
    remaining: u16,
    on: Ticks,
    off: Ticks,
    active: bool,
}

impl<'a, T: TimeSource + ?Sized, O: SignalOutput> BlinkSignaller<'a, T, O> {
    /// Create an idle signaller. The output is not touched.
    pub fn new(clock: &'a T, output: O) -> Self {
        Self {
            clock,
            output,
            base: 0,
            remaining: 0,
            on: DEFAULT_ON_TICKS,
            off: DEFAULT_OFF_TICKS,
            active: true,
        }
    }

    /// Start `count` pulses. Any sequence in progress is replaced.
    pub fn signal(&mut self, count: u16, on: Ticks, off: Ticks) {
        self.remaining = count;
        self.on = on;
        self.off = off;
        self.base = self.clock.now();
        self.active = true;
        self.output.set();
    }

    /// [`signal`](Self::signal) with the default timing
    pub fn signal_default(&mut self, count: u16) {
        self.signal(count, DEFAULT_ON_TICKS, DEFAULT_OFF_TICKS);
    }

    /// Advance the pulse sequence
    pub fn process(&mut self) {
        if self.remaining == 0 {
            return;
        }

        let now = self.clock.now();
        let elapsed = self.clock.ticks_between(self.base, now);
        if !self.active && elapsed > self.off {
            self.output.set();
            self.active = true;
            self.base = now;
        } else if self.active && elapsed > self.on {
            self.output.clear();
            self.active = false;
            self.base = now;
            self.remaining -= 1;
        }
    }

    /// Pulses still to finish (the current one included)
    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    /// Return true once the sequence has finished
    pub fn is_idle(&self) -> bool {
        self.remaining == 0
    }

    /// Return true during an on-phase
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Driven output
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Driven output, mutably
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockOutput;
    use yunibeer_core::traits::MockTime;

    #[test]
    fn test_two_pulses_with_default_timing() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());

        signaller.signal(2, 4000, 3000);
        assert_eq!(signaller.output().pulses(), 1);

        let mut transitions = 0;
        let mut level = signaller.output().is_set();
        for _ in 0..20_000 {
            time.advance(1);
            signaller.process();
            if signaller.output().is_set() != level {
                level = !level;
                transitions += 1;
            }
        }

        assert_eq!(signaller.output().pulses(), 2);
        // on → off, off → on, on → off
        assert_eq!(transitions, 3);
        assert_eq!(signaller.remaining(), 0);
        assert!(!signaller.output().is_set());
    }

    /// Time source that moves one tick forward on every read
    struct SteppingTime {
        next: core::cell::Cell<Ticks>,
    }

    impl TimeSource for SteppingTime {
        fn now(&self) -> Ticks {
            let now = self.next.get();
            self.next.set(now + 1);
            now
        }
    }

    #[test]
    fn test_transitions_restamp_with_the_compared_time() {
        let time = SteppingTime {
            next: core::cell::Cell::new(0),
        };
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        signaller.signal(2, 10, 10);

        let mut steps = 0;
        while !signaller.is_idle() {
            signaller.process();
            steps += 1;
        }

        // Off at 11, on at 22, off at 33: one clock read per step
        assert_eq!(steps, 33);
        assert_eq!(time.next.get(), 34);
        assert_eq!(signaller.output().pulses(), 2);
    }

    #[test]
    fn test_phase_boundaries_are_strict() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        signaller.signal(1, 10, 5);

        time.advance(10);
        signaller.process();
        assert!(signaller.output().is_set());

        time.advance(1);
        signaller.process();
        assert!(!signaller.output().is_set());
        assert!(signaller.is_idle());
    }

    #[test]
    fn test_idle_signaller_leaves_output_alone() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        signaller.signal(1, 10, 10);
        time.advance(11);
        signaller.process();
        assert!(signaller.is_idle());

        // Somebody else drives the output now; an idle signaller must not fight it
        signaller.output_mut().set();
        for _ in 0..100 {
            time.advance(7);
            signaller.process();
        }
        assert!(signaller.output().is_set());
    }

    #[test]
    fn test_signal_restarts_running_sequence() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        signaller.signal(5, 10, 10);
        time.advance(11);
        signaller.process();
        assert!(!signaller.is_active());

        signaller.signal(1, 10, 10);
        assert!(signaller.is_active());
        assert!(signaller.output().is_set());
        assert_eq!(signaller.remaining(), 1);
    }

    #[test]
    fn test_zero_count_only_sets_output() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        signaller.signal(0, 10, 10);
        time.advance(1000);
        signaller.process();
        assert!(signaller.output().is_set());
    }
}
