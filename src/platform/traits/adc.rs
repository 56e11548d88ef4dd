//! ADC interface trait

/// Number of single-ended multiplexer inputs
pub const ADC_INPUTS: u8 = 8;

/// Full-scale value of a conversion (10-bit)
pub const ADC_FULL_SCALE: u16 = 1023;

/// ADC interface trait
///
/// A single converter with an input multiplexer. Only one conversion can be
/// in flight at a time; results are read back when `is_ready()` reports
/// completion.
///
/// # Safety Invariants
///
/// - `value()` is only meaningful after `is_ready()` returned true
/// - `start()` must not be called while a conversion is in flight
pub trait AdcInterface {
    /// Select `channel` and start a single conversion
    fn start(&mut self, channel: u8);

    /// Return true when the conversion started last has completed
    fn is_ready(&self) -> bool;

    /// Read the completed conversion (raw, 10-bit) and acknowledge it
    fn value(&mut self) -> u16;
}
