//! Cooperative pump
//!
//! There is no scheduler on the transmitter. Everything that has to make
//! progress in the background (serial transfer in polled mode, the ADC scan,
//! the feedback signaller) is advanced by one call to [`Pump::pump`], and every
//! wait in the firmware is a loop that keeps pumping:
//!
//! ```text
//! while !condition {
//!     pump();
//! }
//! ```
//!
//! [`spin_until`] and [`wait`] are that loop.

use yunibeer_core::traits::{Ticks, TimeSource};

/// Something that advances all background state machines by one step.
pub trait Pump {
    /// Advance every sub-component once, in a fixed order
    fn pump(&mut self);
}

impl<P: Pump + ?Sized> Pump for &mut P {
    fn pump(&mut self) {
        (**self).pump();
    }
}

/// Pump until `done` returns true.
///
/// The condition is checked before each pump, so a condition that already
/// holds returns without pumping. Returns the number of pump calls made.
pub fn spin_until<P, F>(pump: &mut P, mut done: F) -> u32
where
    P: Pump + ?Sized,
    F: FnMut(&mut P) -> bool,
{
    let mut spins = 0u32;
    while !done(pump) {
        pump.pump();
        spins = spins.wrapping_add(1);
    }
    spins
}

/// Pump for at least `ticks` ticks of `clock`
pub fn wait<T, P>(clock: &T, pump: &mut P, ticks: Ticks)
where
    T: TimeSource + ?Sized,
    P: Pump + ?Sized,
{
    let base = clock.now();
    while clock.elapsed_since(base) < ticks {
        pump.pump();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yunibeer_core::traits::MockTime;

    /// Pump that advances a mock clock by a fixed step per call
    struct Stepper<'a> {
        time: &'a MockTime,
        step: Ticks,
        calls: u32,
    }

    impl Pump for Stepper<'_> {
        fn pump(&mut self) {
            self.time.advance(self.step);
            self.calls += 1;
        }
    }

    #[test]
    fn test_spin_until_checks_before_pumping() {
        let time = MockTime::new();
        let mut stepper = Stepper {
            time: &time,
            step: 1,
            calls: 0,
        };
        assert_eq!(spin_until(&mut stepper, |_| true), 0);
        assert_eq!(stepper.calls, 0);

        assert_eq!(spin_until(&mut stepper, |s| s.calls == 5), 5);
    }

    #[test]
    fn test_wait_pumps_for_duration() {
        let time = MockTime::with_initial(42);
        let mut stepper = Stepper {
            time: &time,
            step: 10,
            calls: 0,
        };
        wait(&time, &mut stepper, 100);
        assert_eq!(stepper.calls, 10);
        assert_eq!(time.now(), 142);
    }

    #[test]
    fn test_wait_zero_returns_immediately() {
        let time = MockTime::new();
        let mut stepper = Stepper {
            time: &time,
            step: 1,
            calls: 0,
        };
        wait(&time, &mut stepper, 0);
        assert_eq!(stepper.calls, 0);
    }

    #[test]
    fn test_pump_through_mut_reference() {
        let time = MockTime::new();
        let mut stepper = Stepper {
            time: &time,
            step: 1,
            calls: 0,
        };
        fn pump_twice<P: Pump>(mut p: P) {
            p.pump();
            p.pump();
        }
        pump_twice(&mut stepper);
        assert_eq!(stepper.calls, 2);
    }
}
