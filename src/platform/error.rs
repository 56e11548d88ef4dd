//! Platform error types
//!
//! This module defines error types for platform operations.

use core::fmt;

use yunibeer_core::calibration::CalibrationError;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their hardware-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformError {
    /// UART operation failed
    Uart(UartError),
    /// ADC operation failed
    Adc(AdcError),
    /// Non-volatile storage operation failed
    Storage(StorageError),
    /// Stored or computed calibration is unusable
    Calibration(CalibrationError),
    /// Invalid configuration provided
    InvalidConfig,
    /// Resource not available
    ResourceUnavailable,
}

/// UART-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Timeout occurred
    Timeout,
    /// Invalid baud rate
    InvalidBaudRate,
}

/// ADC-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// Channel number outside the multiplexer range
    InvalidChannel,
    /// Channel table has no room left
    TooManyChannels,
}

/// Storage-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Access beyond the end of the device
    OutOfBounds,
    /// Write did not complete
    WriteFailed,
}

impl From<CalibrationError> for PlatformError {
    fn from(e: CalibrationError) -> Self {
        PlatformError::Calibration(e)
    }
}

impl From<UartError> for PlatformError {
    fn from(e: UartError) -> Self {
        PlatformError::Uart(e)
    }
}

impl From<StorageError> for PlatformError {
    fn from(e: StorageError) -> Self {
        PlatformError::Storage(e)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Uart(e) => write!(f, "UART error: {:?}", e),
            PlatformError::Adc(e) => write!(f, "ADC error: {:?}", e),
            PlatformError::Storage(e) => write!(f, "Storage error: {:?}", e),
            PlatformError::Calibration(e) => write!(f, "Calibration error: {}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
            PlatformError::ResourceUnavailable => write!(f, "Resource not available"),
        }
    }
}

// yunibeer_core stays free of defmt, so the calibration variant is
// formatted by hand.
#[cfg(feature = "defmt")]
impl defmt::Format for PlatformError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            PlatformError::Uart(e) => defmt::write!(f, "UART error: {}", e),
            PlatformError::Adc(e) => defmt::write!(f, "ADC error: {}", e),
            PlatformError::Storage(e) => defmt::write!(f, "Storage error: {}", e),
            PlatformError::Calibration(_) => defmt::write!(f, "Calibration error"),
            PlatformError::InvalidConfig => defmt::write!(f, "Invalid configuration"),
            PlatformError::ResourceUnavailable => defmt::write!(f, "Resource not available"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            PlatformError::Uart(UartError::Timeout).to_string(),
            "UART error: Timeout"
        );
        assert_eq!(
            PlatformError::from(CalibrationError::NotCentered).to_string(),
            "Calibration error: axes were not centered"
        );
    }
}
