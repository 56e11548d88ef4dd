//! Non-volatile storage interface trait
//!
//! Byte-addressable storage (EEPROM on the transmitter). Unlike flash there is
//! no erase step; erased cells read as `0xFF`.

use crate::platform::Result;

/// Non-volatile storage interface trait
///
/// # Safety Invariants
///
/// - Accesses must lie within `capacity()`
/// - Writes are slow (milliseconds per byte on EEPROM); callers must not
///   write from interrupt context
pub trait NonVolatileStorage {
    /// Total size in bytes
    fn capacity(&self) -> usize;

    /// Read `buffer.len()` bytes starting at `offset`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Storage(StorageError::OutOfBounds)` if the
    /// range exceeds the device.
    fn read(&mut self, offset: u16, buffer: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `offset`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Storage` if the range exceeds the device or
    /// the write does not complete.
    fn write(&mut self, offset: u16, data: &[u8]) -> Result<()>;
}
