//! Bootloader trigger sequence filter
//!
//! Every byte received on the serial port passes through a
//! [`BootTriggerFilter`] before it is buffered. The filter never alters or
//! swallows data; it only watches for the reserved sequence the host-side
//! flashing tool sends and latches a request when it has been seen, so the
//! firmware can hand control to the bootloader at a safe point.

/// Byte pattern that requests bootloader entry
pub const BOOT_SEQUENCE: [u8; 4] = [0x74, 0x7E, 0x7A, 0x33];

/// Stateful matcher for [`BOOT_SEQUENCE`].
///
/// # Example
///
/// ```
/// use yunibeer_core::bootseq::{BootTriggerFilter, BOOT_SEQUENCE};
///
/// let mut filter = BootTriggerFilter::new();
/// for &b in BOOT_SEQUENCE.iter() {
///     assert_eq!(filter.check(b), b); // data passes through unchanged
/// }
/// assert!(filter.take_request());
/// assert!(!filter.take_request());
/// ```
#[derive(Debug, Default, Clone)]
pub struct BootTriggerFilter {
    /// Number of sequence bytes matched so far
    matched: u8,
    requested: bool,
}

impl BootTriggerFilter {
    /// Create a filter in its initial state
    pub const fn new() -> Self {
        Self {
            matched: 0,
            requested: false,
        }
    }

    /// Observe one byte and return it unchanged
    pub fn check(&mut self, byte: u8) -> u8 {
        if BOOT_SEQUENCE[self.matched as usize] == byte {
            self.matched += 1;
            if self.matched as usize == BOOT_SEQUENCE.len() {
                self.requested = true;
                self.matched = 0;
            }
        } else if BOOT_SEQUENCE[0] == byte {
            self.matched = 1;
        } else {
            self.matched = 0;
        }
        byte
    }

    /// Return true if a complete sequence was seen since the last call
    pub fn take_request(&mut self) -> bool {
        core::mem::take(&mut self.requested)
    }

    /// Peek at the latched request without clearing it
    pub fn pending(&self) -> bool {
        self.requested
    }

    /// Current match progress (0 means idle)
    pub fn progress(&self) -> usize {
        self.matched as usize
    }
}
