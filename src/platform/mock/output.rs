//! Mock signal output for testing

use crate::platform::traits::SignalOutput;

/// Mock feedback output
///
/// Tracks the current level and counts rising edges so tests can count
/// pulses.
#[derive(Debug, Default)]
pub struct MockOutput {
    level: bool,
    pulses: u32,
}

impl MockOutput {
    /// Create a new mock output (off)
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level
    pub fn is_set(&self) -> bool {
        self.level
    }

    /// Number of off-to-on transitions seen
    pub fn pulses(&self) -> u32 {
        self.pulses
    }
}

impl SignalOutput for MockOutput {
    fn set(&mut self) {
        if !self.level {
            self.pulses += 1;
        }
        self.level = true;
    }

    fn clear(&mut self) {
        self.level = false;
    }
}
