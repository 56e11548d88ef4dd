//! Mock ADC implementation for testing

use crate::platform::traits::{AdcInterface, ADC_INPUTS};
use core::cell::Cell;
use std::vec::Vec;

/// Mock ADC implementation
///
/// Each multiplexer input holds a settable raw reading. A started conversion
/// completes after a configurable number of `is_ready()` polls, and every
/// `start()` is logged so tests can check the scan order.
///
/// # Example
///
/// ```ignore
/// use yunibeer::platform::mock::MockAdc;
/// use yunibeer::platform::traits::AdcInterface;
///
/// let mut adc = MockAdc::new();
/// adc.set_reading(3, 700);
/// adc.start(3);
/// assert!(adc.is_ready());
/// assert_eq!(adc.value(), 700);
/// assert_eq!(adc.starts(), &[3]);
/// ```
#[derive(Debug)]
pub struct MockAdc {
    readings: [u16; ADC_INPUTS as usize],
    starts: Vec<u8>,
    channel: Option<u8>,
    conversion_polls: u32,
    remaining: Cell<u32>,
}

impl MockAdc {
    /// Create a mock ADC whose conversions complete immediately.
    /// All inputs read mid-scale.
    pub fn new() -> Self {
        Self {
            readings: [512; ADC_INPUTS as usize],
            starts: Vec::new(),
            channel: None,
            conversion_polls: 0,
            remaining: Cell::new(0),
        }
    }

    /// Let each conversion take `polls` calls to `is_ready()` before completing
    pub fn with_conversion_polls(mut self, polls: u32) -> Self {
        self.conversion_polls = polls;
        self
    }

    /// Set the raw reading returned for `channel`
    pub fn set_reading(&mut self, channel: u8, raw: u16) {
        self.readings[channel as usize] = raw;
    }

    /// Channels started so far, in order
    pub fn starts(&self) -> &[u8] {
        &self.starts
    }

    /// Forget the start log
    pub fn clear_starts(&mut self) {
        self.starts.clear();
    }

    /// Return true while a conversion is in flight
    pub fn busy(&self) -> bool {
        self.channel.is_some()
    }
}

impl Default for MockAdc {
    fn default() -> Self {
        Self::new()
    }
}

impl AdcInterface for MockAdc {
    fn start(&mut self, channel: u8) {
        self.starts.push(channel);
        self.channel = Some(channel);
        self.remaining.set(self.conversion_polls);
    }

    fn is_ready(&self) -> bool {
        if self.channel.is_none() {
            return false;
        }
        let remaining = self.remaining.get();
        if remaining == 0 {
            true
        } else {
            self.remaining.set(remaining - 1);
            false
        }
    }

    fn value(&mut self) -> u16 {
        match self.channel.take() {
            Some(channel) => self.readings[channel as usize],
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_adc_conversion_delay() {
        let mut adc = MockAdc::new().with_conversion_polls(2);
        adc.set_reading(1, 100);
        assert!(!adc.is_ready());

        adc.start(1);
        assert!(!adc.is_ready());
        assert!(!adc.is_ready());
        assert!(adc.is_ready());
        assert_eq!(adc.value(), 100);
        assert!(!adc.busy());
        assert!(!adc.is_ready());
    }
}
