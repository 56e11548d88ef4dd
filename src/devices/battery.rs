//! Low-battery alert
//!
//! Watches the centered battery-divider reading and, while it stays below
//! the threshold, repeats an alert pattern on the signaller once per
//! re-alert period. The period is armed at construction, so a pack that is
//! already low at power-on is reported after one full period.

use yunibeer_core::timeout::Deadline;
use yunibeer_core::traits::{Ticks, TimeSource};

use crate::devices::signaller::BlinkSignaller;
use crate::platform::traits::SignalOutput;

/// Pulse pattern of a low-battery alert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertPattern {
    pub count: u16,
    pub on: Ticks,
    pub off: Ticks,
}

impl AlertPattern {
    pub const fn new(count: u16, on: Ticks, off: Ticks) -> Self {
        Self { count, on, off }
    }
}

/// Three short beeps
pub const DEFAULT_ALERT: AlertPattern = AlertPattern::new(3, 1500, 1000);

/// Re-alert period, 300000 ticks (~19.2 s)
pub const DEFAULT_REALERT_TICKS: Ticks = 300_000;

/// Battery threshold check with a re-alert deadline
pub struct BatteryMonitor<'a, T: ?Sized> {
    threshold: i16,
    pattern: AlertPattern,
    realert: Deadline<'a, T>,
    alerts: u32,
}

impl<'a, T: TimeSource + ?Sized> BatteryMonitor<'a, T> {
    /// Monitor alerting below `threshold` at most once per `period`.
    ///
    /// The period starts now, so the first alert comes after one full period.
    pub fn new(clock: &'a T, threshold: i16, period: Ticks, pattern: AlertPattern) -> Self {
        Self {
            threshold,
            pattern,
            realert: Deadline::new(clock, period),
            alerts: 0,
        }
    }

    /// Feed the latest battery reading.
    ///
    /// `None` (no conversion yet) never alerts. Returns true if an alert was
    /// started.
    pub fn check<O: SignalOutput>(
        &mut self,
        value: Option<i16>,
        signaller: &mut BlinkSignaller<'_, T, O>,
    ) -> bool {
        let Some(value) = value else {
            return false;
        };
        if value >= self.threshold || !self.realert.elapsed() {
            return false;
        }

        crate::log_warn!("Low battery: {} < {}", value, self.threshold);
        signaller.signal(self.pattern.count, self.pattern.on, self.pattern.off);
        self.realert.restart();
        self.alerts = self.alerts.wrapping_add(1);
        true
    }

    /// Alerts raised so far
    pub fn alerts(&self) -> u32 {
        self.alerts
    }

    pub fn threshold(&self) -> i16 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: i16) {
        self.threshold = threshold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockOutput;
    use yunibeer_core::traits::MockTime;

    #[test]
    fn test_no_alert_before_first_period() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        let mut monitor = BatteryMonitor::new(&time, 100, 1000, DEFAULT_ALERT);

        assert!(!monitor.check(Some(0), &mut signaller));
        time.advance(1000);
        assert!(!monitor.check(Some(0), &mut signaller));
        time.advance(1);
        assert!(monitor.check(Some(0), &mut signaller));
        assert_eq!(signaller.remaining(), 3);
        assert!(signaller.output().is_set());
    }

    #[test]
    fn test_realert_waits_a_full_period() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        let mut monitor = BatteryMonitor::new(&time, 100, 1000, DEFAULT_ALERT);

        time.advance(1001);
        assert!(monitor.check(Some(-50), &mut signaller));
        time.advance(500);
        assert!(!monitor.check(Some(-50), &mut signaller));
        time.advance(501);
        assert!(monitor.check(Some(-50), &mut signaller));
        assert_eq!(monitor.alerts(), 2);
    }

    #[test]
    fn test_healthy_or_unknown_reading_is_silent() {
        let time = MockTime::new();
        let mut signaller = BlinkSignaller::new(&time, MockOutput::new());
        let mut monitor = BatteryMonitor::new(&time, 100, 10, DEFAULT_ALERT);

        time.advance(100);
        assert!(!monitor.check(None, &mut signaller));
        assert!(!monitor.check(Some(100), &mut signaller));
        assert!(!monitor.check(Some(400), &mut signaller));
        assert_eq!(signaller.output().pulses(), 0);
        assert_eq!(monitor.alerts(), 0);
    }
}
